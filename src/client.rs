use async_trait::async_trait;
use reqwest::{multipart, Client, Url};
use tracing::debug;

use crate::{
    error::{UploadError, PROCESSING_FALLBACK},
    prediction::{DetectResponse, PredictionList},
    preview::SelectedFile,
};

/// The single remote call the controller makes.
#[async_trait]
pub trait DetectClient: Send + Sync {
    async fn detect(&self, file: &SelectedFile) -> Result<PredictionList, UploadError>;
}

/// Posts the file as multipart field `image` to `<base>/detect`.
#[derive(Debug, Clone)]
pub struct HttpDetectClient {
    http: Client,
    endpoint: Url,
}

impl HttpDetectClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base = Url::parse(base_url)?;
        let endpoint = base.join("/detect")?;
        Ok(Self {
            http: Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl DetectClient for HttpDetectClient {
    async fn detect(&self, file: &SelectedFile) -> Result<PredictionList, UploadError> {
        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(file.mime_type())
            .map_err(request_error)?;
        let form = multipart::Form::new().part("image", part);

        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(request_error)?;
        debug!(%status, bytes = body.len(), "detect response received");

        let parsed: DetectResponse = serde_json::from_slice(&body).map_err(request_error)?;
        interpret(status.is_success(), parsed)
    }
}

fn request_error(err: impl std::fmt::Display) -> UploadError {
    UploadError::Request(err.to_string())
}

/// Maps a parsed body onto the contract: predictions on 2xx, otherwise the
/// server's message or the fallback.
pub fn interpret(ok: bool, response: DetectResponse) -> Result<PredictionList, UploadError> {
    match (ok, response.predictions) {
        (true, Some(predictions)) => Ok(predictions),
        _ => Err(UploadError::Request(
            response
                .error
                .unwrap_or_else(|| PROCESSING_FALLBACK.to_string()),
        )),
    }
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
