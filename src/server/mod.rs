use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::{config::Settings, error::DetectError, prediction::DetectResponse};

pub mod classifier;
mod pages;

pub use classifier::{Classifier, RemoteClassifier};

const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Clone)]
pub struct AppState {
    /// `None` when no classifier is configured; `/detect` then answers 503.
    pub classifier: Option<Arc<dyn Classifier>>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn from_settings(settings: &Settings) -> Self {
        let classifier = settings.classifier_url.as_ref().map(|url| {
            Arc::new(RemoteClassifier::new(
                url.clone(),
                settings.classifier_api_key.clone(),
                settings.top_k,
            )) as Arc<dyn Classifier>
        });
        if classifier.is_none() {
            warn!("CLASSIFIER_URL is not set, detection requests will be refused");
        }
        Self {
            classifier,
            max_upload_bytes: settings.max_upload_bytes,
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let limit = state.max_upload_bytes;
    Router::new()
        .route("/", get(index))
        .route("/api/docs", get(api_docs))
        .route("/detect", post(detect))
        .layer(DefaultBodyLimit::max(limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_settings(&settings));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "detect server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(pages::INDEX)
}

async fn api_docs() -> Html<&'static str> {
    Html(pages::API_DOCS)
}

pub fn allowed_file(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

async fn detect(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DetectResponse>, DetectError> {
    let Some(classifier) = state.classifier.clone() else {
        return Err(DetectError::unavailable());
    };
    let mut multipart = multipart.map_err(|rejection| {
        warn!(error = %rejection, "detect request is not multipart");
        DetectError::bad_request("No image provided")
    })?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DetectError::new(e.status(), e.body_text()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| DetectError::new(e.status(), e.body_text()))?;
        upload = Some((file_name, data));
        break;
    }

    let Some((file_name, data)) = upload else {
        return Err(DetectError::bad_request("No image provided"));
    };
    if file_name.is_empty() {
        return Err(DetectError::bad_request("No selected file"));
    }
    if !allowed_file(&file_name) {
        return Err(DetectError::bad_request("Invalid file type"));
    }

    info!(file = %file_name, bytes = data.len(), "processing image");
    match classifier.classify(&data).await {
        Ok(predictions) => {
            info!(count = predictions.len(), "image processed");
            Ok(Json(DetectResponse::predictions(predictions)))
        }
        Err(err) => {
            error!(error = %err, "error processing image");
            Err(DetectError::processing(err))
        }
    }
}

#[cfg(test)]
#[path = "../tests/server_tests.rs"]
mod tests;
