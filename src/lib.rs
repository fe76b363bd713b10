//! Pindown Core Library
//!
//! This library provides the core functionality for the pindown tool,
//! which mirrors saved Pinboard bookmarks as local annotated files.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`prefs`] - Preference store: scoped persistent key/value settings
//! - [`db`] - Database connection and schema management
//! - [`pinboard`] - Bookmarking API client
//! - [`download`] - One-pass download orchestration
//! - [`annotate`] - Finder-comment annotation of downloaded files
//! - [`logging`] - Log file and console subscriber setup

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod annotate;
pub mod db;
pub mod download;
pub mod logging;
pub mod pinboard;
pub mod prefs;

// Re-export commonly used types
pub use annotate::{AnnotateError, Annotator, OsascriptRunner, ScriptRunner};
pub use db::{Database, DbError};
pub use download::{
    DOWNLOAD_DIR_KEY, DownloadError, DownloadOptions, DownloadStats, Downloader, LAST_SYNC_KEY,
    TOKEN_ENV_VAR, TOKEN_KEY, bookmark_filename, reset, resolve_token, write_bookmark,
};
pub use pinboard::{ApiClient, ApiError, DEFAULT_BASE_URL, MAX_TAGS, Post};
pub use prefs::{BUNDLE_ID, PreferenceStore, PrefsError, UserScope, profile};
