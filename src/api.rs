//! Client for the video-info and download endpoints of the backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::error::ApiError;
use crate::model::{DownloadTicket, VideoInfo};

/// The two exchanges the client has with the backend.
#[async_trait]
pub trait VideoApi: Send + Sync {
    async fn fetch_info(&self, url: &str) -> Result<VideoInfo, ApiError>;

    async fn request_download(&self, url: &str, quality: &str) -> Result<DownloadTicket, ApiError>;
}

#[derive(Serialize)]
struct InfoRequest<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct DownloadRequest<'a> {
    url: &'a str,
    quality: &'a str,
}

/// [`VideoApi`] over HTTP+JSON.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("vidgrab/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, &config.api_base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let endpoint = self.endpoint(path);
        tracing::debug!(%endpoint, "POST");
        let response = self.client.post(&endpoint).json(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        decode_body(status, &bytes)
    }
}

/// Turns a response body into `T`.
///
/// The body is looked at whatever the HTTP status: an `error` string in it
/// always wins over anything else.
fn decode_body<T: DeserializeOwned>(
    status: reqwest::StatusCode,
    bytes: &[u8],
) -> Result<T, ApiError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| ApiError::Malformed {
        status,
        detail: e.to_string(),
    })?;

    if let Some(err) = value.get("error").filter(|e| !e.is_null()) {
        let message = match err.as_str() {
            Some(s) => s.to_string(),
            None => err.to_string(),
        };
        tracing::warn!(%status, %message, "service reported an error");
        return Err(ApiError::Remote(message));
    }

    serde_json::from_value(value).map_err(|e| ApiError::Malformed {
        status,
        detail: e.to_string(),
    })
}

#[async_trait]
impl VideoApi for HttpApi {
    async fn fetch_info(&self, url: &str) -> Result<VideoInfo, ApiError> {
        let info: VideoInfo = self.post("/api/video-info", &InfoRequest { url }).await?;
        tracing::debug!(formats = info.formats.len(), "video info received");
        Ok(info)
    }

    async fn request_download(&self, url: &str, quality: &str) -> Result<DownloadTicket, ApiError> {
        self.post("/api/download", &DownloadRequest { url, quality })
            .await
    }
}

/// Joins the configured base address and a server-relative path.
pub fn resolve_download_target(base_url: &str, download_path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = download_path.trim_start_matches('/');
    format!("{base}/{path}")
}
