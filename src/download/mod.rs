//! Download orchestration: one linear pass per invocation.
//!
//! The [`Downloader`] reads the preference profile, asks the server
//! whether anything changed since the stored last-sync marker, fetches the
//! (optionally tag-filtered) posts, mirrors each one as a bookmark file,
//! annotates the written files, and records the new marker.
//!
//! # Overview
//!
//! - [`Downloader`] - the pass itself
//! - [`DownloadOptions`] - per-invocation knobs from the CLI
//! - [`DownloadStats`] - counts returned by a pass
//! - [`reset`] - the alternative operation: clear or roll back the marker

mod filename;
mod webloc;

pub use filename::bookmark_filename;
pub use webloc::write_bookmark;

use std::env;
use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::annotate::Annotator;
use crate::pinboard::{ApiClient, ApiError, Post};
use crate::prefs::{PreferenceStore, PrefsError};

/// Profile key holding the RFC 3339 timestamp of the last completed pass.
pub const LAST_SYNC_KEY: &str = "last_sync";

/// Profile key holding the API token.
pub const TOKEN_KEY: &str = "api_token";

/// Profile key holding the directory bookmark files are written into.
pub const DOWNLOAD_DIR_KEY: &str = "download_directory";

/// Environment fallback for the API token when the profile has none.
pub const TOKEN_ENV_VAR: &str = "PINDOWN_API_TOKEN";

/// Errors produced by a download pass.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Preference read/write failure, propagated unchanged.
    #[error(transparent)]
    Prefs(#[from] PrefsError),

    /// API call failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// I/O failure creating the download directory or writing a bookmark.
    #[error("I/O error writing bookmarks: {0}")]
    Io(#[from] std::io::Error),

    /// No API token in the profile or the environment.
    #[error(
        "no API token configured: set the `{TOKEN_KEY}` preference or the \
         {TOKEN_ENV_VAR} environment variable"
    )]
    MissingToken,
}

/// Per-invocation options, parsed from the CLI.
#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    /// Tag filter; joined with spaces into one API parameter.
    pub tags: Vec<String>,
    /// Suppress the server-side freshness check before downloading.
    pub skip_update: bool,
}

/// Counts accumulated over one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadStats {
    /// Bookmark files newly written.
    pub downloaded: usize,
    /// Posts whose bookmark file already existed.
    pub skipped: usize,
    /// Written files whose annotation failed.
    pub annotation_failures: usize,
}

/// Resolves the API token from the profile, falling back to the
/// [`TOKEN_ENV_VAR`] environment variable.
///
/// # Errors
///
/// Returns [`DownloadError::MissingToken`] when neither source has a
/// token, or [`DownloadError::Prefs`] if the profile read fails.
pub async fn resolve_token(prefs: &PreferenceStore) -> Result<String, DownloadError> {
    if let Some(value) = prefs.get(TOKEN_KEY).await?
        && let Some(token) = value.as_str()
        && !token.is_empty()
    {
        return Ok(token.to_string());
    }
    env::var(TOKEN_ENV_VAR)
        .ok()
        .filter(|token| !token.is_empty())
        .ok_or(DownloadError::MissingToken)
}

/// Clears the last-sync marker, or rolls it back `days` days from now.
///
/// With no marker the next pass re-downloads everything.
///
/// # Errors
///
/// Returns [`DownloadError::Prefs`] if the profile write fails.
#[instrument(skip(prefs))]
pub async fn reset(prefs: &PreferenceStore, days: Option<i64>) -> Result<(), DownloadError> {
    match days {
        Some(days) => {
            let marker = Utc::now() - chrono::Duration::days(days);
            prefs
                .set(
                    LAST_SYNC_KEY,
                    marker.to_rfc3339_opts(SecondsFormat::Secs, true),
                )
                .await?;
            info!(days, marker = %marker, "Last-sync marker rolled back");
        }
        None => {
            prefs.delete(LAST_SYNC_KEY).await?;
            info!("Last-sync marker cleared; next pass downloads everything");
        }
    }
    Ok(())
}

/// One-shot bookmark mirroring pass.
pub struct Downloader {
    prefs: PreferenceStore,
    api: ApiClient,
    annotator: Annotator,
}

impl Downloader {
    /// Creates a downloader over the given profile, API client and
    /// annotator.
    #[must_use]
    pub fn new(prefs: PreferenceStore, api: ApiClient, annotator: Annotator) -> Self {
        Self {
            prefs,
            api,
            annotator,
        }
    }

    /// Runs one pass and returns its counts.
    ///
    /// Unless `skip_update` is set, the pass exits early with zero counts
    /// when the server reports no change since the stored marker.
    /// Annotation failures are logged and counted, never propagated.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] on preference, API, or bookmark-file
    /// failures.
    #[instrument(skip(self), fields(tags = ?options.tags, skip_update = options.skip_update))]
    pub async fn run(&self, options: &DownloadOptions) -> Result<DownloadStats, DownloadError> {
        let last_sync = self.stored_last_sync().await?;

        let mut server_update = None;
        if !options.skip_update {
            let update_time = self.api.last_update().await?;
            if let Some(last_sync) = last_sync
                && update_time <= last_sync
            {
                info!(update_time = %update_time, "No server-side changes since last sync");
                return Ok(DownloadStats::default());
            }
            server_update = Some(update_time);
        }

        let tag_filter = (!options.tags.is_empty()).then(|| options.tags.join(" "));
        let posts = self
            .api
            .all_posts(tag_filter.as_deref(), last_sync)
            .await?;
        info!(count = posts.len(), "Fetched posts");

        let dir = self.download_directory().await?;
        std::fs::create_dir_all(&dir)?;

        let mut stats = DownloadStats::default();
        for post in &posts {
            let path = dir.join(bookmark_filename(&post.description, &post.href));
            if write_bookmark(&path, &post.href)? {
                stats.downloaded += 1;
            } else {
                stats.skipped += 1;
                continue;
            }

            let comment = comment_text(post);
            if comment.is_empty() {
                continue;
            }
            if let Err(error) = self.annotator.set_comment(&path, &comment).await {
                warn!(path = %path.display(), %error, "Failed to annotate bookmark");
                stats.annotation_failures += 1;
            }
        }

        let marker = server_update.unwrap_or_else(Utc::now);
        self.prefs
            .set(
                LAST_SYNC_KEY,
                marker.to_rfc3339_opts(SecondsFormat::Secs, true),
            )
            .await?;

        info!(
            downloaded = stats.downloaded,
            skipped = stats.skipped,
            annotation_failures = stats.annotation_failures,
            "Pass complete"
        );
        Ok(stats)
    }

    /// Reads and parses the stored last-sync marker.
    ///
    /// An unparsable marker is treated as absent so a corrupted value
    /// degrades to a full re-download instead of a dead tool.
    async fn stored_last_sync(&self) -> Result<Option<DateTime<Utc>>, DownloadError> {
        let Some(value) = self.prefs.get(LAST_SYNC_KEY).await? else {
            return Ok(None);
        };
        let parsed = value
            .as_str()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc));
        if parsed.is_none() {
            warn!(?value, "Ignoring unparsable last-sync marker");
        }
        Ok(parsed)
    }

    async fn download_directory(&self) -> Result<PathBuf, DownloadError> {
        let value = self.prefs.get_or(DOWNLOAD_DIR_KEY, ".").await?;
        Ok(value
            .as_str()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")))
    }
}

/// Builds the Finder comment for a post: its notes followed by its tags
/// as `#name` markers.
fn comment_text(post: &Post) -> String {
    let hashtags = post
        .tag_list()
        .iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<_>>()
        .join(" ");

    match (post.extended.trim().is_empty(), hashtags.is_empty()) {
        (true, true) => String::new(),
        (true, false) => hashtags,
        (false, true) => post.extended.trim().to_string(),
        (false, false) => format!("{} {hashtags}", post.extended.trim()),
    }
}
