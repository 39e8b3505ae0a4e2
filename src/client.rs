use std::time::Duration;

use reqwest::{Client, ClientBuilder, Url};
use tracing::debug;

use crate::models::{Credits, GalleryItem, GalleryQuery, Image};
use crate::transport::Transport;
use crate::utils::default_user_agent;
use crate::ImgurError;

const DEFAULT_BASE_URL: &str = "https://api.imgur.com/3/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Async client for the anonymous (Client-ID) subset of the Imgur API.
///
/// Every API request carries `Authorization: Client-ID <client_id>`. The client secret is only
/// kept so the settings round-trip; anonymous endpoints do not use it.
#[derive(Debug, Clone)]
pub struct ImgurClient {
    transport: Transport,
    client_secret: String,
}

/// Builder for [`ImgurClient`].
#[derive(Debug)]
pub struct ImgurClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
    timeout: Duration,
    builder: ClientBuilder,
}

impl ImgurClient {
    /// Build a client with the defaults and verify the credentials.
    ///
    /// This performs one request against the `credits` endpoint, so rejected credentials are
    /// reported before any listing happens.
    ///
    /// # Errors
    ///
    /// - [`ImgurError::AuthenticationFailed`] if the service rejects the client id
    /// - any other [`ImgurError`] if the verification request itself fails
    pub async fn authenticate(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, ImgurError> {
        ImgurClientBuilder::new()
            .authenticate(client_id, client_secret)
            .await
    }

    /// Start configuring a client with the crate's defaults.
    ///
    /// Defaults:
    /// - Base URL: `https://api.imgur.com/3/`
    /// - Timeout: 30 seconds
    /// - User agent: `imgur-gallery-dl/<version>`
    pub fn builder() -> ImgurClientBuilder {
        ImgurClientBuilder::new()
    }

    /// Current base URL.
    pub fn base_url(&self) -> &Url {
        self.transport.base_url()
    }

    /// Configured client id.
    pub fn client_id(&self) -> &str {
        self.transport.client_id()
    }

    /// Configured client secret.
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Fetch the remaining request allowance.
    ///
    /// # Errors
    ///
    /// - [`ImgurError::AuthenticationFailed`] / [`ImgurError::RequestFailed`] for non-2xx statuses
    /// - [`ImgurError::Api`] if the envelope reports a failure
    /// - [`ImgurError::Http`] for transport failures (including timeouts)
    pub async fn credits(&self) -> Result<Credits, ImgurError> {
        self.transport
            .get_data("credits", "credits response missing data")
            .await
    }

    /// List one page of the gallery feed described by `query`.
    ///
    /// # Errors
    ///
    /// - [`ImgurError::AuthenticationFailed`] / [`ImgurError::RateLimited`] /
    ///   [`ImgurError::RequestFailed`] for non-2xx statuses
    /// - [`ImgurError::Api`] if the envelope reports a failure or has an unexpected shape
    /// - [`ImgurError::Http`] for transport failures (including timeouts)
    pub async fn gallery(&self, query: &GalleryQuery) -> Result<Vec<GalleryItem>, ImgurError> {
        self.transport
            .get_data(&query.path(), "gallery response missing data")
            .await
    }

    /// List the images of an album.
    ///
    /// # Errors
    ///
    /// Same as [`ImgurClient::gallery`].
    pub async fn album_images(&self, album_id: &str) -> Result<Vec<Image>, ImgurError> {
        let path = format!("album/{album_id}/images");
        self.transport
            .get_data(&path, "album images response missing data")
            .await
    }

    /// Download the body of an absolute media URL.
    ///
    /// No API headers are attached; media hosts do not need them.
    ///
    /// # Errors
    ///
    /// - [`ImgurError::InvalidUrl`] if `url` does not parse
    /// - [`ImgurError::RequestFailed`] (or another status variant) for non-2xx statuses
    /// - [`ImgurError::Http`] for transport failures (including timeouts)
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ImgurError> {
        self.transport.get_bytes(url).await
    }
}

impl Default for ImgurClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImgurClientBuilder {
    /// Create a new builder using the crate defaults.
    ///
    /// This is equivalent to [`ImgurClient::builder`].
    pub fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
            builder: Client::builder(),
        }
    }

    /// Override the base URL used for API requests.
    ///
    /// Relative paths are joined with [`Url::join`], so a trailing slash is required.
    pub fn base_url(mut self, base_url: impl AsRef<str>) -> Result<Self, ImgurError> {
        self.base_url = Some(Url::parse(base_url.as_ref())?);
        Ok(self)
    }

    /// Set a custom user agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Configure the request timeout.
    ///
    /// This sets [`reqwest::ClientBuilder::timeout`], which applies a single deadline per request.
    /// Timeout failures surface as [`ImgurError::Http`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build an [`ImgurClient`] without contacting the service.
    pub fn build(
        self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<ImgurClient, ImgurError> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        let mut builder = self.builder.timeout(self.timeout);
        builder = builder.user_agent(self.user_agent.unwrap_or_else(default_user_agent));

        let client = builder.build()?;

        Ok(ImgurClient {
            transport: Transport::new(client, base_url, client_id),
            client_secret: client_secret.into(),
        })
    }

    /// Build an [`ImgurClient`] and verify the credentials against the `credits` endpoint.
    pub async fn authenticate(
        self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<ImgurClient, ImgurError> {
        let client = self.build(client_id, client_secret)?;
        let credits = client.credits().await?;
        debug!(
            client_remaining = credits.client_remaining,
            user_remaining = credits.user_remaining,
            "authenticated against {}",
            client.base_url()
        );
        Ok(client)
    }
}
