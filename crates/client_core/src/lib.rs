use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::{
    domain::ImageSlot,
    error::ServiceException,
    protocol::{HealthResponse, ProcessResponse, HEALTH_PATH, PROCESS_PATH},
};
use tracing::{debug, info};
use url::Url;

pub mod controller;
pub mod error;
mod readiness;
pub mod selection;
pub mod types;
pub mod view;

pub use controller::{ClientController, ControllerError};
pub use error::{ClientError, GENERIC_PROCESSING_FAILURE};
pub use readiness::{PollOutcome, ReadinessPollHandle, DEFAULT_POLL_INTERVAL};
pub use selection::{SelectedImage, SelectionError, Selections};
pub use types::{DecodedImage, ResultImage, ResultImageError};
pub use view::View;

/// The two remote operations the controller depends on.
#[async_trait]
pub trait FaceSwapApi: Send + Sync {
    async fn check_health(&self) -> Result<HealthResponse, ClientError>;
    async fn process(
        &self,
        source: &SelectedImage,
        target: &SelectedImage,
    ) -> Result<ResultImage, ClientError>;
}

/// HTTP client for the processing service.
pub struct FaceSwapClient {
    http: Client,
    server_url: String,
}

impl FaceSwapClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Self::with_http_client(server_url, Client::new())
    }

    pub fn with_timeout(server_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ClientError::Transport {
                url: server_url.to_string(),
                source,
            })?;
        Self::with_http_client(server_url, http)
    }

    pub fn with_http_client(server_url: &str, http: Client) -> Result<Self, ClientError> {
        let trimmed = server_url.trim().trim_end_matches('/');
        Url::parse(trimmed).map_err(|source| ClientError::InvalidServerUrl {
            url: server_url.to_string(),
            source,
        })?;
        Ok(Self {
            http,
            server_url: trimmed.to_string(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.server_url)
    }
}

fn image_part(image: &SelectedImage) -> Result<Part, ClientError> {
    Part::bytes(image.bytes().to_vec())
        .file_name(image.file_name().to_string())
        .mime_str(image.media_type())
        .map_err(|_| ClientError::InvalidMediaType {
            file_name: image.file_name().to_string(),
            media_type: image.media_type().to_string(),
        })
}

#[async_trait]
impl FaceSwapApi for FaceSwapClient {
    async fn check_health(&self) -> Result<HealthResponse, ClientError> {
        let url = self.endpoint(HEALTH_PATH);
        let body = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?
            .bytes()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;
        let health: HealthResponse =
            serde_json::from_slice(&body).map_err(|source| ClientError::Decode { url, source })?;
        debug!(
            models_loaded = health.models_loaded,
            status = ?health.status,
            message = health.message.as_deref().unwrap_or_default(),
            "health response"
        );
        Ok(health)
    }

    async fn process(
        &self,
        source: &SelectedImage,
        target: &SelectedImage,
    ) -> Result<ResultImage, ClientError> {
        let url = self.endpoint(PROCESS_PATH);
        let form = Form::new()
            .part(ImageSlot::Source.field_name(), image_part(source)?)
            .part(ImageSlot::Target.field_name(), image_part(target)?);

        info!(
            source = source.file_name(),
            target = target.file_name(),
            "submitting face swap"
        );
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ProcessResponse>(&body)
                .ok()
                .and_then(|parsed| parsed.error)
                .unwrap_or_else(|| GENERIC_PROCESSING_FAILURE.to_string());
            return Err(ServiceException::new(status.as_u16(), message).into());
        }

        let parsed: ProcessResponse =
            serde_json::from_slice(&body).map_err(|source| ClientError::Decode { url, source })?;
        match parsed {
            ProcessResponse {
                success: true,
                image: Some(image),
                ..
            } => Ok(ResultImage::new(image)),
            ProcessResponse { error, .. } => Err(ServiceException::new(
                status.as_u16(),
                error.unwrap_or_else(|| GENERIC_PROCESSING_FAILURE.to_string()),
            )
            .into()),
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
