use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned while talking to the Imgur API.
///
/// Status codes are classified into authentication failures, rate limiting and other request
/// failures. Envelope bodies reporting `success: false` surface as [`ImgurError::Api`].
///
/// Notes:
/// - Network/transport failures (including timeouts) are returned as [`ImgurError::Http`].
/// - Missing fields that the crate relies on are reported as [`ImgurError::MissingField`].
#[derive(Debug, Error)]
pub enum ImgurError {
    /// An invalid URL was provided or returned.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The server returned `401 Unauthorized` or `403 Forbidden`.
    #[error("authentication failed with status {0}")]
    AuthenticationFailed(StatusCode),
    /// The server returned `429 Too Many Requests`.
    #[error("rate limit exceeded")]
    RateLimited,
    /// A request completed but returned a non-success HTTP status.
    #[error("request failed with status {0}")]
    RequestFailed(StatusCode),
    /// A required field was missing in an API response body.
    #[error("{0}")]
    MissingField(&'static str),
    /// The API returned an error message or an unexpected response shape.
    #[error("api error: {0}")]
    Api(String),
    /// An underlying HTTP client operation failed.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ImgurError {
    /// Whether this error means the configured credentials were rejected.
    pub fn is_auth(&self) -> bool {
        matches!(self, ImgurError::AuthenticationFailed(_))
    }
}

/// Errors produced while loading `settings.ini`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or is not valid INI.
    #[error("cannot read config file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },
    /// The text is not valid INI.
    #[error("malformed config: {0}")]
    Malformed(#[from] ini::ParseError),
    /// A required key is absent or empty.
    #[error("missing required key `{key}` in section [{section}]")]
    MissingKey {
        section: &'static str,
        key: &'static str,
    },
    /// A key holds a value of the wrong shape.
    #[error("invalid value {value:?} for `{key}` in section [{section}]: {reason}")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Failure to fetch or store a single image.
///
/// These are never fatal for a gallery walk; the orchestrator logs them and moves on.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The derived file name would escape the destination folder.
    #[error("refusing unsafe file name {0:?}")]
    UnsafeFileName(String),
    /// Fetching the image bytes failed.
    #[error("fetch failed: {0}")]
    Fetch(#[from] ImgurError),
    /// Creating the folder or writing the file failed.
    #[error("write to {} failed: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures that abort a whole gallery walk.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// The gallery feed itself could not be listed.
    #[error("failed to list gallery: {0}")]
    Listing(#[from] ImgurError),
    /// The destination root could not be created.
    #[error("cannot create download folder {}: {source}", path.display())]
    Destination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
