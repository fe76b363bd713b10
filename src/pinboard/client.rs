//! HTTP client for the bookmarking API.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use super::error::ApiError;
use super::post::Post;

/// Default API base URL. Must end with a trailing slash so endpoint paths
/// join underneath it.
pub const DEFAULT_BASE_URL: &str = "https://api.pinboard.in/v1/";

/// Maximum number of tag names the `tag` filter parameter accepts.
pub const MAX_TAGS: usize = 3;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 60;

/// Response body of `posts/update`.
#[derive(Debug, Deserialize)]
struct UpdateTime {
    update_time: DateTime<Utc>,
}

/// Typed client for the bookmarking API.
///
/// Created once per pass and reused across calls so the underlying
/// connection pool is shared. Authentication is a token attached as the
/// `auth_token` query parameter on every request.
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl ApiClient {
    /// Creates a client against the production API.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if HTTP client construction fails.
    pub fn new(token: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// When the base URL carries a path it must end with `/`, otherwise the
    /// final segment is replaced during endpoint resolution.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the base URL is invalid or HTTP client
    /// construction fails.
    pub fn with_base_url(token: impl Into<String>, base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            token: token.into(),
        })
    }

    /// Returns the server-side time of the most recent change to the
    /// account's posts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, or
    /// an undecodable response body.
    #[instrument(skip(self))]
    pub async fn last_update(&self) -> Result<DateTime<Utc>, ApiError> {
        let url = self.endpoint("posts/update")?;
        let response: UpdateTime = self
            .client
            .get(url)
            .query(&[("auth_token", self.token.as_str()), ("format", "json")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(update_time = %response.update_time, "Fetched server update time");
        Ok(response.update_time)
    }

    /// Returns all posts, optionally restricted to `tag` (up to
    /// [`MAX_TAGS`] space-separated names) and to posts created after
    /// `fromdt`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, or
    /// an undecodable response body.
    #[instrument(skip(self), fields(tag = tag.unwrap_or("<none>")))]
    pub async fn all_posts(
        &self,
        tag: Option<&str>,
        fromdt: Option<DateTime<Utc>>,
    ) -> Result<Vec<Post>, ApiError> {
        let url = self.endpoint("posts/all")?;

        let mut query: Vec<(&str, String)> = vec![
            ("auth_token", self.token.clone()),
            ("format", "json".to_string()),
        ];
        if let Some(tag) = tag {
            query.push(("tag", tag.to_string()));
        }
        if let Some(fromdt) = fromdt {
            query.push(("fromdt", fromdt.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }

        let posts: Vec<Post> = self
            .client
            .get(url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(count = posts.len(), "Fetched posts");
        Ok(posts)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Token intentionally omitted.
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}
