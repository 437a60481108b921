//! REST wrapper for the frame's HTTP endpoints.
//!
//! [`FrameApi`] is stateless apart from its connection pool. Each call
//! takes the [`Endpoint`] to talk to, so the owner can re-point it between
//! calls without rebuilding the transport.

use std::fmt;

use pictureframe_core::connection::TokenProvider;
use pictureframe_core::picture::Picture;
use pictureframe_core::settings::{FrameSettings, PartialSettings};
use reqwest::{Method, StatusCode};
use url::Url;

use crate::config::ClientConfig;
use crate::error::FrameApiError;

/// Name of the multipart field carrying the uploaded image.
const UPLOAD_FIELD: &str = "file";

/// Where requests go and which token they carry.
#[derive(Clone)]
pub struct Endpoint {
    base_url: Option<Url>,
    token: TokenProvider,
}

impl Endpoint {
    pub fn new(base_url: Option<Url>, token: TokenProvider) -> Self {
        Self { base_url, token }
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Current token, looked up now.
    pub fn token(&self) -> String {
        (self.token)()
    }

    /// Host present on the base URL and a non-empty token.
    pub fn is_configured(&self) -> bool {
        let has_host = self
            .base_url
            .as_ref()
            .and_then(Url::host_str)
            .is_some_and(|host| !host.is_empty());
        has_host && !self.token().is_empty()
    }

    /// Join path segments onto the base URL. Segments are percent-encoded
    /// individually, so an id can never escape its path position.
    pub fn url(&self, segments: &[&str]) -> Result<Url, FrameApiError> {
        let base = self
            .base_url
            .as_ref()
            .ok_or_else(|| FrameApiError::InvalidUrl("no base URL configured".to_string()))?;
        let mut url = base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| FrameApiError::InvalidUrl(base.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("base_url", &self.base_url.as_ref().map(Url::as_str))
            .finish_non_exhaustive()
    }
}

/// HTTP client for a picture frame.
#[derive(Debug, Clone)]
pub struct FrameApi {
    client: reqwest::Client,
}

impl FrameApi {
    /// Build a client with the configured request and connect timeouts.
    pub fn new(config: &ClientConfig) -> Result<Self, FrameApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self::with_client(client))
    }

    /// Reuse an existing [`reqwest::Client`] (and its connection pool).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// `GET /api/pictures`
    pub async fn list_pictures(&self, endpoint: &Endpoint) -> Result<Vec<Picture>, FrameApiError> {
        let response = self
            .request(endpoint, Method::GET, &["api", "pictures"])?
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// `DELETE /api/pictures/{id}`
    pub async fn delete_picture(&self, endpoint: &Endpoint, id: &str) -> Result<(), FrameApiError> {
        let response = self
            .request(endpoint, Method::DELETE, &["api", "pictures", id])?
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// `PUT /api/pictures/{id}/pin`
    pub async fn pin_picture(&self, endpoint: &Endpoint, id: &str) -> Result<(), FrameApiError> {
        let response = self
            .request(endpoint, Method::PUT, &["api", "pictures", id, "pin"])?
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// `DELETE /api/pictures/{id}/pin`
    pub async fn unpin_picture(&self, endpoint: &Endpoint, id: &str) -> Result<(), FrameApiError> {
        let response = self
            .request(endpoint, Method::DELETE, &["api", "pictures", id, "pin"])?
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// `POST /api/pictures` as `multipart/form-data`.
    ///
    /// Sends a single part named `file`. The frame answers `201 Created`;
    /// any other status, even another 2xx, is a failure.
    pub async fn upload_picture(
        &self,
        endpoint: &Endpoint,
        bytes: Vec<u8>,
        filename: &str,
        mime: &str,
    ) -> Result<(), FrameApiError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime)?;
        let form = reqwest::multipart::Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .request(endpoint, Method::POST, &["api", "pictures"])?
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = Self::body_text(response).await;
            tracing::error!(status = status.as_u16(), body = %body, "Upload failed");
            return Err(FrameApiError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// `GET /api/settings`
    pub async fn get_settings(&self, endpoint: &Endpoint) -> Result<FrameSettings, FrameApiError> {
        let response = self
            .request(endpoint, Method::GET, &["api", "settings"])?
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// `PATCH /api/settings`
    ///
    /// Returns the full settings object as the frame stored it.
    pub async fn patch_settings(
        &self,
        endpoint: &Endpoint,
        patch: &PartialSettings,
    ) -> Result<FrameSettings, FrameApiError> {
        let response = self
            .request(endpoint, Method::PATCH, &["api", "settings"])?
            .json(patch)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Start a request with the joined URL and the bearer token.
    fn request(
        &self,
        endpoint: &Endpoint,
        method: Method,
        segments: &[&str],
    ) -> Result<reqwest::RequestBuilder, FrameApiError> {
        let url = endpoint.url(segments)?;
        tracing::debug!(%method, url = %url, "Frame request");
        Ok(self
            .client
            .request(method, url)
            .bearer_auth(endpoint.token()))
    }

    /// Ensure the status is below 300. Returns the response unchanged on
    /// success, or [`FrameApiError::UnexpectedStatus`] with the body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, FrameApiError> {
        let status = response.status();
        if status.as_u16() >= 300 {
            let body = Self::body_text(response).await;
            return Err(FrameApiError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, FrameApiError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Assert the status is accepted, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), FrameApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn body_text(response: reqwest::Response) -> String {
        response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string())
    }
}
