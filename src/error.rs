use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

pub const NO_FILE_SELECTED: &str = "Please select an image first.";
pub const PROCESSING_FALLBACK: &str = "Error processing image";

/// Failures surfaced by `UploadController::on_submit`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Request(String),
    #[error("a submission is already in flight")]
    Busy,
}

impl UploadError {
    pub fn no_file_selected() -> Self {
        Self::Validation(NO_FILE_SELECTED.to_string())
    }
}

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("unrecognized image data")]
    UnrecognizedFormat,
    #[error("preview worker failed: {0}")]
    Worker(String),
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("classifier request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("image worker failed: {0}")]
    Worker(String),
    #[error("classifier returned {status}: {body}")]
    Upstream { status: u16, body: String },
}

/// Error body returned by `/detect`: `{ "error": message }`.
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct DetectError {
    pub status: StatusCode,
    pub message: String,
}

impl DetectError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unavailable() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Image processing service is not available",
        )
    }

    pub fn processing(cause: impl std::fmt::Display) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("{PROCESSING_FALLBACK}: {cause}"),
        )
    }
}

impl IntoResponse for DetectError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}
