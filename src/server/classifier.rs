use std::io::Cursor;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageOutputFormat};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{error::ClassifierError, prediction::PredictionList};

/// Something that turns image bytes into ranked predictions.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, image: &[u8]) -> Result<PredictionList, ClassifierError>;
}

#[derive(Debug, Deserialize)]
struct UpstreamResponse {
    predictions: PredictionList,
}

/// Forwards images to a model service over HTTP.
pub struct RemoteClassifier {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
    top_k: usize,
}

impl RemoteClassifier {
    pub fn new(url: impl Into<String>, api_key: Option<String>, top_k: usize) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            api_key,
            top_k,
        }
    }
}

/// Decodes the upload, flattens it to RGB and re-encodes it as JPEG.
pub fn normalize_image(data: &[u8]) -> Result<Vec<u8>, ClassifierError> {
    let img = image::load_from_memory(data)?;
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

    let mut jpeg_bytes = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut jpeg_bytes), ImageOutputFormat::Jpeg(85))?;
    Ok(jpeg_bytes)
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, image: &[u8]) -> Result<PredictionList, ClassifierError> {
        let data = image.to_vec();
        let jpeg_bytes = tokio::task::spawn_blocking(move || normalize_image(&data))
            .await
            .map_err(|e| ClassifierError::Worker(e.to_string()))??;

        let payload = serde_json::json!({
            "image_base64": general_purpose::STANDARD.encode(&jpeg_bytes),
            "mime_type": "image/jpeg",
            "top_k": self.top_k,
        });

        debug!(url = %self.url, bytes = jpeg_bytes.len(), "sending image to classifier");
        let mut request = self.http.post(&self.url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Upstream {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        let mut parsed: UpstreamResponse = response.json().await?;
        parsed.predictions.truncate(self.top_k);
        info!(count = parsed.predictions.len(), "classifier returned predictions");
        Ok(parsed.predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, routing::post, Json, Router};
    use image::{ImageBuffer, Rgba};
    use tokio::net::TcpListener;

    fn png_bytes() -> Vec<u8> {
        let img = ImageBuffer::from_pixel(4, 4, Rgba([200u8, 10, 10, 128]));
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), ImageOutputFormat::Png)
            .expect("encode");
        out
    }

    async fn spawn_upstream(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve");
        });
        format!("http://{addr}/classify")
    }

    #[test]
    fn normalize_produces_jpeg() {
        let jpeg = normalize_image(&png_bytes()).expect("jpeg");
        assert_eq!(
            image::guess_format(&jpeg).expect("format"),
            image::ImageFormat::Jpeg
        );
    }

    #[test]
    fn normalize_rejects_garbage() {
        assert!(matches!(
            normalize_image(b"not an image"),
            Err(ClassifierError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn forwards_jpeg_and_truncates_to_top_k() {
        let router = Router::new().route(
            "/classify",
            post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["mime_type"], "image/jpeg");
                assert_eq!(body["top_k"], 2);
                let encoded = body["image_base64"].as_str().expect("image");
                let decoded = general_purpose::STANDARD.decode(encoded).expect("base64");
                assert_eq!(
                    image::guess_format(&decoded).expect("format"),
                    image::ImageFormat::Jpeg
                );
                assert_eq!(
                    headers.get("authorization").and_then(|v| v.to_str().ok()),
                    Some("Bearer key")
                );
                Json(serde_json::json!({
                    "predictions": [
                        { "label": "tabby", "confidence": 61.0 },
                        { "label": "tiger cat", "confidence": 20.5 },
                        { "label": "lynx", "confidence": 3.25 }
                    ]
                }))
            }),
        );
        let url = spawn_upstream(router).await;
        let classifier = RemoteClassifier::new(url, Some("key".to_string()), 2);

        let predictions = classifier.classify(&png_bytes()).await.expect("predictions");

        let labels: Vec<_> = predictions.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["tabby", "tiger cat"]);
    }

    #[tokio::test]
    async fn upstream_failure_keeps_status() {
        let router = Router::new().route(
            "/classify",
            post(|| async { (axum::http::StatusCode::BAD_GATEWAY, "model offline") }),
        );
        let url = spawn_upstream(router).await;
        let classifier = RemoteClassifier::new(url, None, 5);

        match classifier.classify(&png_bytes()).await {
            Err(ClassifierError::Upstream { status, body }) => {
                assert_eq!(status, 502);
                assert_eq!(body, "model offline");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
