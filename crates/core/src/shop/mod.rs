//! Record shop site adapter.
//!
//! Everything that knows about the shop's HTML lives here: listing pages,
//! release tracklists, cover images and display metadata. The rest of the
//! pipeline only sees [`crate::catalog::PageFetcher`] and [`ReleaseFetcher`].

mod client;
mod parse;
mod types;

pub use client::ShopClient;
pub use types::{ReleaseDetails, ReleaseFetcher};
