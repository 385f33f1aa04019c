use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    client::DetectClient,
    error::UploadError,
    prediction::{PredictionList, ResultRow},
    preview::{PreviewImage, SelectedFile},
    ui::{transition, UiEvent, UiState, UiSurface},
};

/// Drives one upload form: selection, preview, submission and rendering.
pub struct UploadController<C, S> {
    client: C,
    surface: S,
    selected: Mutex<Option<SelectedFile>>,
    state: Mutex<UiState>,
    in_flight: AtomicBool,
}

/// Holds the single in-flight slot; releasing it re-enables the affordance.
struct InFlight<'a, S: UiSurface> {
    flag: &'a AtomicBool,
    surface: &'a S,
}

impl<S: UiSurface> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        self.surface.set_busy(false);
        self.flag.store(false, Ordering::Release);
    }
}

impl<C: DetectClient, S: UiSurface> UploadController<C, S> {
    pub fn new(client: C, surface: S) -> Self {
        Self {
            client,
            surface,
            selected: Mutex::new(None),
            state: Mutex::new(UiState::Idle),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub async fn state(&self) -> UiState {
        *self.state.lock().await
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    async fn apply(&self, event: UiEvent) -> UiState {
        let mut state = self.state.lock().await;
        *state = transition(*state, event);
        *state
    }

    pub async fn on_file_selected(&self, file: SelectedFile) {
        info!(name = %file.name, bytes = file.bytes.len(), "file selected");
        *self.selected.lock().await = Some(file.clone());
        self.apply(UiEvent::Reset).await;

        match PreviewImage::render_async(file).await {
            Ok(preview) => {
                self.surface.set_preview_source(&preview.data_url);
                self.surface.show_preview();
            }
            Err(err) => {
                warn!(error = %err, "preview rendering failed");
                self.surface.show_preview_warning(&err.to_string());
            }
        }
    }

    pub async fn on_submit(&self) -> Result<PredictionList, UploadError> {
        let Some(file) = self.selected.lock().await.clone() else {
            let err = UploadError::no_file_selected();
            self.show_error(&err.to_string());
            self.apply(UiEvent::Rejected).await;
            return Err(err);
        };

        let Some(_slot) = self.acquire() else {
            warn!("submission ignored, another request is in flight");
            return Err(UploadError::Busy);
        };

        self.apply(UiEvent::Submitted).await;
        self.hide_error();
        self.surface.hide_results();

        info!(name = %file.name, "submitting image for detection");
        match self.client.detect(&file).await {
            Ok(predictions) => {
                info!(count = predictions.len(), "detection succeeded");
                self.render(&predictions);
                self.apply(UiEvent::Succeeded).await;
                Ok(predictions)
            }
            Err(err) => {
                warn!(error = %err, "detection failed");
                self.show_error(&err.to_string());
                self.apply(UiEvent::Failed).await;
                Err(err)
            }
        }
    }

    fn acquire(&self) -> Option<InFlight<'_, S>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        self.surface.set_busy(true);
        Some(InFlight {
            flag: &self.in_flight,
            surface: &self.surface,
        })
    }

    pub fn render(&self, predictions: &PredictionList) {
        self.surface.clear_results();
        for prediction in predictions {
            self.surface.append_result(&ResultRow::from(prediction));
        }
        self.surface.show_results();
    }

    pub fn show_error(&self, message: &str) {
        self.surface.show_error(message);
    }

    pub fn hide_error(&self) {
        self.surface.hide_error();
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
