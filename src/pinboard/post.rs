//! Post model returned by the bookmarking API.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A single saved bookmark as returned by `posts/all`.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    /// The bookmarked URL.
    pub href: String,
    /// Title of the bookmark.
    #[serde(default)]
    pub description: String,
    /// Free-form notes.
    #[serde(default)]
    pub extended: String,
    /// Space-separated tag names.
    #[serde(default)]
    pub tags: String,
    /// Creation time of the bookmark.
    pub time: DateTime<Utc>,
    /// Server-assigned content hash.
    pub hash: String,
}

impl Post {
    /// Returns the individual tag names, skipping empty tokens.
    #[must_use]
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags.split_whitespace().collect()
    }
}
