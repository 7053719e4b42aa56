//! External audio index abstraction.
//!
//! The index is a remote search service resolving free-text track queries to
//! hosted audio entries. It rate-limits aggressively and signals a degraded
//! state that must stop the whole run; the cooldown is service-wide, not
//! per query.

mod http;
mod types;

pub use http::HttpAudioIndex;
pub use types::{AudioIndex, IndexEntry, IndexError};
