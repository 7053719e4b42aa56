//! Community feed client.
//!
//! The feed is a wall-style community page: posts carry a text message plus
//! attachment references, one post may be pinned, and recent posts expose a
//! like count.

mod http;
mod pinboard;
mod types;

pub use http::HttpFeedClient;
pub use pinboard::refresh_pinned_post;
pub use types::{Attachment, FeedClient, FeedError, FeedPost, PhotoRef, MAX_ATTACHMENTS};
