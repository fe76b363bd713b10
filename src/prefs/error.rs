//! Error types for preference store operations.

use thiserror::Error;

/// Errors produced by preference store operations.
///
/// The store performs no local recovery: backend rejections surface
/// unchanged through these variants.
#[derive(Error, Debug)]
pub enum PrefsError {
    /// The backing database rejected the operation.
    #[error("preference database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value could not be encoded to or decoded from JSON.
    #[error("preference value codec error: {0}")]
    Codec(#[from] serde_json::Error),
}
