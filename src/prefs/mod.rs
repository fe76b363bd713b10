//! Preference store: a persistent, scoped key/value settings domain.
//!
//! A [`PreferenceStore`] addresses one preference domain identified by the
//! triple `(application_id, user_scope, host_scope)` and backed by the
//! SQLite database from [`crate::db`]. The store holds no in-memory cache;
//! every read and write round-trips to the database.
//!
//! Lookup, membership, mutation and iteration all resolve against the same
//! scope triple. The host scope is fixed to the current host.
//!
//! # Example
//!
//! ```no_run
//! use pindown_core::{Database, PreferenceStore, UserScope};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new_in_memory().await?;
//! let prefs = PreferenceStore::new(db, "com.example.app", UserScope::AnyUser);
//! prefs.set("last_sync", "2023-01-01T00:00:00Z").await?;
//! assert!(prefs.has("last_sync").await?);
//! # Ok(())
//! # }
//! ```

mod error;
mod profile;

pub use error::PrefsError;
pub use profile::{BUNDLE_ID, profile};

use serde_json::Value;
use sqlx::Row;
use tracing::{debug, instrument};

use crate::db::Database;

/// Result type for preference store operations.
pub type Result<T> = std::result::Result<T, PrefsError>;

/// Reserved suffix stripped from application identifiers at construction.
const PLIST_SUFFIX: &str = ".plist";

/// Host-scope label for the current host.
///
/// The downloader never addresses any other host, so the partition is a
/// fixed constant rather than a machine identity lookup.
const CURRENT_HOST: &str = "current_host";

/// Whether a preference applies to the current user only or to any user
/// on the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserScope {
    /// Preferences visible to the current user only.
    CurrentUser,
    /// Preferences visible to any user on the machine.
    #[default]
    AnyUser,
}

impl UserScope {
    /// Stable label used as the database scope column value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CurrentUser => "current_user",
            Self::AnyUser => "any_user",
        }
    }
}

/// Key/value facade over one preference domain.
///
/// Cheap to construct and clone; all state lives in the backing database.
/// Writes are flushed immediately, one flush per call, so readers started
/// after a `set` returns observe the value.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    db: Database,
    application_id: String,
    user_scope: UserScope,
}

impl PreferenceStore {
    /// Creates a store addressing the domain
    /// `(application_id, user_scope, current host)`.
    ///
    /// A trailing `.plist` suffix on `application_id` is stripped exactly
    /// once, so `"com.example.app.plist"` and `"com.example.app"` address
    /// the same domain. Performs no I/O. Callers without a scope
    /// preference should pass `UserScope::default()`, which is
    /// [`UserScope::AnyUser`].
    #[must_use]
    pub fn new(db: Database, application_id: &str, user_scope: UserScope) -> Self {
        let application_id = application_id
            .strip_suffix(PLIST_SUFFIX)
            .unwrap_or(application_id)
            .to_string();
        Self {
            db,
            application_id,
            user_scope,
        }
    }

    /// Returns the normalized application identifier this store addresses.
    #[must_use]
    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    /// Returns the user scope this store addresses.
    #[must_use]
    pub fn user_scope(&self) -> UserScope {
        self.user_scope
    }

    /// Returns all key names currently stored in this domain, sorted.
    ///
    /// A domain with no entries yields an empty list. The list is a
    /// snapshot; mutations made after the query are not reflected.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::Database`] if the query fails.
    #[instrument(skip(self), fields(app_id = %self.application_id))]
    pub async fn keys(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT key FROM preferences \
             WHERE app_id = ? AND user_scope = ? AND host_scope = ? \
             ORDER BY key",
        )
        .bind(&self.application_id)
        .bind(self.user_scope.as_str())
        .bind(CURRENT_HOST)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("key").map_err(PrefsError::from))
            .collect()
    }

    /// Returns true iff a value is present for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::Database`] if the query fails.
    pub async fn has(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Returns the stored value for `key`, or `None` if absent.
    ///
    /// Absence is a normal outcome, never an error.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::Database`] if the query fails, or
    /// [`PrefsError::Codec`] if the stored value is not valid JSON.
    #[instrument(skip(self), fields(app_id = %self.application_id))]
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        let row = sqlx::query(
            "SELECT value FROM preferences \
             WHERE app_id = ? AND user_scope = ? AND host_scope = ? AND key = ?",
        )
        .bind(&self.application_id)
        .bind(self.user_scope.as_str())
        .bind(CURRENT_HOST)
        .bind(key)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(row) => {
                let raw: String = row.try_get("value")?;
                Ok(Some(serde_json::from_str(&raw)?))
            }
            None => Ok(None),
        }
    }

    /// Returns the stored value for `key`, or `default` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::Database`] if the query fails, or
    /// [`PrefsError::Codec`] if the stored value is not valid JSON.
    pub async fn get_or(&self, key: &str, default: impl Into<Value>) -> Result<Value> {
        Ok(self.get(key).await?.unwrap_or_else(|| default.into()))
    }

    /// Writes `value` for `key`, then flushes the domain to disk.
    ///
    /// A null value removes the key, matching the platform preference
    /// convention the store models. One flush per call, not batched.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::Database`] if the write is rejected, or
    /// [`PrefsError::Codec`] if the value cannot be encoded.
    #[instrument(skip(self, value), fields(app_id = %self.application_id))]
    pub async fn set(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        if value.is_null() {
            sqlx::query(
                "DELETE FROM preferences \
                 WHERE app_id = ? AND user_scope = ? AND host_scope = ? AND key = ?",
            )
            .bind(&self.application_id)
            .bind(self.user_scope.as_str())
            .bind(CURRENT_HOST)
            .bind(key)
            .execute(self.db.pool())
            .await?;
            debug!(key = %key, "Preference removed");
        } else {
            let encoded = serde_json::to_string(&value)?;
            sqlx::query(
                "INSERT INTO preferences (app_id, user_scope, host_scope, key, value, updated_at) \
                 VALUES (?, ?, ?, ?, ?, datetime('now')) \
                 ON CONFLICT (app_id, user_scope, host_scope, key) \
                 DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            )
            .bind(&self.application_id)
            .bind(self.user_scope.as_str())
            .bind(CURRENT_HOST)
            .bind(key)
            .bind(encoded)
            .execute(self.db.pool())
            .await?;
            debug!(key = %key, "Preference written");
        }
        self.flush().await
    }

    /// Removes `key` from the domain. Equivalent to `set(key, null)`;
    /// deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::Database`] if the delete is rejected.
    pub async fn delete(&self, key: &str) -> Result<()> {
        self.set(key, Value::Null).await
    }

    /// Forces written pages out of the WAL so readers started after this
    /// call observe the value.
    async fn flush(&self) -> Result<()> {
        sqlx::query("PRAGMA wal_checkpoint(PASSIVE)")
            .execute(self.db.pool())
            .await?;
        Ok(())
    }
}
