//! Named preference profile for the downloader's own settings bag.

use crate::db::Database;

use super::{PreferenceStore, UserScope};

/// Bundle-style identifier of the downloader's preference domain.
pub const BUNDLE_ID: &str = "com.pindown.bookmarks";

/// Returns the preference store the downloader uses for persistent
/// settings: pinned to [`BUNDLE_ID`] and the current-user scope.
///
/// Key names stored here (`last_sync`, `api_token`, `download_directory`)
/// are owned by the downloader and opaque to the store itself.
#[must_use]
pub fn profile(db: Database) -> PreferenceStore {
    PreferenceStore::new(db, BUNDLE_ID, UserScope::CurrentUser)
}
