//! The remote page source.
//!
//! A page source turns a zero-based page index into a batch of records. The
//! store treats it as a black box: an empty batch means the upstream has run
//! out, and any error ends remote loading for the session.

use crate::record::Record;
use crate::show::Show;
use async_trait::async_trait;
use std::fmt;

/// Default upstream for the show catalog.
pub const DEFAULT_BASE_URL: &str = "https://api.tvmaze.com";

/// Why a page could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Network failure, unreadable body or malformed JSON.
    Transport(String),
    /// The upstream answered with a non-success status.
    Status {
        /// HTTP status code.
        code: u16,
        /// Canonical reason phrase, empty if unknown.
        reason: String,
    },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Transport(msg) => write!(f, "transport error: {msg}"),
            SourceError::Status { code, reason } if reason.is_empty() => {
                write!(f, "upstream returned status {code}")
            }
            SourceError::Status { code, reason } => {
                write!(f, "upstream returned status {code} {reason}")
            }
        }
    }
}

impl std::error::Error for SourceError {}

/// An asynchronous, paginated supplier of records.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use show_explorer::record::{Record, RecordId};
/// use show_explorer::source::{PageSource, SourceError};
///
/// #[derive(Clone)]
/// struct Item(RecordId);
///
/// impl Record for Item {
///     fn id(&self) -> RecordId {
///         self.0
///     }
/// }
///
/// struct Counting;
///
/// #[async_trait]
/// impl PageSource<Item> for Counting {
///     async fn fetch_page(&self, page: usize) -> Result<Vec<Item>, SourceError> {
///         if page > 2 {
///             return Ok(Vec::new());
///         }
///         let base = page as RecordId * 10;
///         Ok((base..base + 10).map(Item).collect())
///     }
/// }
/// ```
#[async_trait]
pub trait PageSource<R: Record>: Send + Sync {
    /// Fetches page `page`. Pages are numbered from zero.
    async fn fetch_page(&self, page: usize) -> Result<Vec<R>, SourceError>;
}

/// HTTP client for the TVmaze `/shows` index.
#[derive(Debug, Clone)]
pub struct TvMazeSource {
    client: reqwest::Client,
    base_url: String,
}

impl Default for TvMazeSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl TvMazeSource {
    /// A source for the API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// The API root requests go to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the given index page.
    pub fn page_url(&self, page: usize) -> String {
        format!("{}/shows?page={}", self.base_url.trim_end_matches('/'), page)
    }
}

#[async_trait]
impl PageSource<Show> for TvMazeSource {
    async fn fetch_page(&self, page: usize) -> Result<Vec<Show>, SourceError> {
        let url = self.page_url(page);
        tracing::debug!(%url, "requesting show page");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        response
            .json::<Vec<Show>>()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url() {
        let source = TvMazeSource::new("https://api.tvmaze.com/");
        assert_eq!(source.page_url(0), "https://api.tvmaze.com/shows?page=0");
        assert_eq!(source.page_url(12), "https://api.tvmaze.com/shows?page=12");
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(TvMazeSource::default().base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_error_display() {
        let err = SourceError::Status {
            code: 404,
            reason: "Not Found".into(),
        };
        assert_eq!(err.to_string(), "upstream returned status 404 Not Found");

        let err = SourceError::Status {
            code: 599,
            reason: String::new(),
        };
        assert_eq!(err.to_string(), "upstream returned status 599");

        let err = SourceError::Transport("connection reset".into());
        assert_eq!(err.to_string(), "transport error: connection reset");
    }
}
