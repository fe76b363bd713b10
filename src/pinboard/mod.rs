//! Bookmarking API client.
//!
//! Thin typed wrapper over the Pinboard v1 JSON API. Two endpoints are
//! used per pass:
//! - `posts/update` - server-side time of the most recent change, used as
//!   a cheap freshness check before fetching everything
//! - `posts/all` - the posts themselves, optionally restricted by tag and
//!   by creation time

mod client;
mod error;
mod post;

pub use client::{ApiClient, DEFAULT_BASE_URL, MAX_TAGS};
pub use error::ApiError;
pub use post::Post;
