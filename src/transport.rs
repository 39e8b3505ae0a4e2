use reqwest::{
    Client, Method, RequestBuilder, StatusCode, Url,
    header::{ACCEPT, AUTHORIZATION},
};

use crate::ImgurError;
use crate::models::Envelope;

#[derive(Debug, Clone)]
pub(crate) struct Transport {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
    pub(crate) client_id: String,
}

impl Transport {
    pub(crate) fn new(client: Client, base_url: Url, client_id: impl Into<String>) -> Self {
        Self {
            client,
            base_url,
            client_id: client_id.into(),
        }
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn client_id(&self) -> &str {
        &self.client_id
    }

    /// GET a relative API path and unwrap the response envelope.
    pub(crate) async fn get_data<T>(&self, path: &str, missing: &'static str) -> Result<T, ImgurError>
    where
        T: serde::de::DeserializeOwned,
    {
        let builder = self.build_request(Method::GET, path)?;
        let response = builder.send().await?;
        Self::map_status(response.status())?;
        let envelope: Envelope = response.json().await?;
        envelope.into_data(missing)
    }

    /// GET an absolute media URL without API headers and return the body.
    pub(crate) async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ImgurError> {
        let url = Url::parse(url)?;
        let response = self.client.get(url).send().await?;
        Self::map_status(response.status())?;
        Ok(response.bytes().await?.to_vec())
    }

    fn build_request(&self, method: Method, path: &str) -> Result<RequestBuilder, ImgurError> {
        let url = self.join_path(path)?;
        let builder = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        Ok(self.attach_client_id(builder))
    }

    fn map_status(status: StatusCode) -> Result<(), ImgurError> {
        if status.is_success() {
            return Ok(());
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(ImgurError::AuthenticationFailed(status))
            }
            StatusCode::TOO_MANY_REQUESTS => Err(ImgurError::RateLimited),
            _ => Err(ImgurError::RequestFailed(status)),
        }
    }

    pub(crate) fn join_path(&self, path: &str) -> Result<Url, ImgurError> {
        Ok(self.base_url.join(path)?)
    }

    fn attach_client_id(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(AUTHORIZATION, format!("Client-ID {}", self.client_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> Transport {
        Transport::new(
            Client::new(),
            Url::parse("https://example.test/3/").unwrap(),
            "my-client",
        )
    }

    #[test]
    fn join_path_appends_relative_segment() {
        let url = transport().join_path("album/abc/images").unwrap();
        assert_eq!(url.as_str(), "https://example.test/3/album/abc/images");
    }

    #[test]
    fn join_path_keeps_query() {
        let url = transport()
            .join_path("gallery/hot/viral/0?showViral=true")
            .unwrap();
        assert_eq!(url.path(), "/3/gallery/hot/viral/0");
        assert_eq!(url.query(), Some("showViral=true"));
    }

    #[test]
    fn build_request_attaches_client_id() {
        let request = transport()
            .build_request(Method::GET, "credits")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Client-ID my-client"
        );
    }

    #[test]
    fn map_status_classifies_errors() {
        assert!(Transport::map_status(StatusCode::OK).is_ok());

        assert!(matches!(
            Transport::map_status(StatusCode::UNAUTHORIZED),
            Err(ImgurError::AuthenticationFailed(StatusCode::UNAUTHORIZED))
        ));
        assert!(matches!(
            Transport::map_status(StatusCode::FORBIDDEN),
            Err(ImgurError::AuthenticationFailed(StatusCode::FORBIDDEN))
        ));
        assert!(matches!(
            Transport::map_status(StatusCode::TOO_MANY_REQUESTS),
            Err(ImgurError::RateLimited)
        ));
        assert!(matches!(
            Transport::map_status(StatusCode::INTERNAL_SERVER_ERROR),
            Err(ImgurError::RequestFailed(StatusCode::INTERNAL_SERVER_ERROR))
        ));
    }

    #[tokio::test]
    async fn get_bytes_rejects_relative_url() {
        let err = transport().get_bytes("not a url").await.unwrap_err();
        assert!(matches!(err, ImgurError::InvalidUrl(_)));
    }
}
