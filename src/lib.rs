//! Image recognition upload flow.
//!
//! [`controller::UploadController`] previews a selected image, posts it to a
//! `/detect` endpoint and renders the ranked predictions through a
//! [`ui::UiSurface`]. [`server`] hosts that endpoint and forwards images to a
//! remote classifier.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod prediction;
pub mod preview;
pub mod server;
pub mod ui;

pub use client::{DetectClient, HttpDetectClient};
pub use controller::UploadController;
pub use error::UploadError;
pub use prediction::{Prediction, PredictionList};
pub use preview::{PreviewImage, SelectedFile};
pub use ui::{ConsoleSurface, UiState, UiSurface};
