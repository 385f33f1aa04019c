use crate::prediction::ResultRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    Idle,
    Loading,
    ResultsShown,
    ErrorShown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// A new file was selected.
    Reset,
    Submitted,
    /// Submission refused before any request (no file).
    Rejected,
    Succeeded,
    Failed,
}

pub fn transition(state: UiState, event: UiEvent) -> UiState {
    match (state, event) {
        (UiState::Loading, UiEvent::Succeeded) => UiState::ResultsShown,
        (UiState::Loading, UiEvent::Failed) => UiState::ErrorShown,
        (UiState::Loading, _) => UiState::Loading,
        (_, UiEvent::Submitted) => UiState::Loading,
        (_, UiEvent::Rejected) => UiState::ErrorShown,
        (_, UiEvent::Reset) => UiState::Idle,
        (state, UiEvent::Succeeded | UiEvent::Failed) => state,
    }
}

/// The regions the controller writes to, bound once at startup.
pub trait UiSurface: Send + Sync {
    fn set_preview_source(&self, data_url: &str);
    fn show_preview(&self);
    fn show_preview_warning(&self, message: &str);

    fn clear_results(&self);
    fn append_result(&self, row: &ResultRow);
    fn show_results(&self);
    fn hide_results(&self);

    fn show_error(&self, message: &str);
    fn hide_error(&self);

    /// Disables the submit affordance and shows the busy indicator.
    fn set_busy(&self, busy: bool);
}

/// Terminal rendering for the `classify` command.
#[derive(Debug, Default)]
pub struct ConsoleSurface;

impl UiSurface for ConsoleSurface {
    fn set_preview_source(&self, data_url: &str) {
        let header = data_url.split(',').next().unwrap_or_default();
        println!("Preview ready ({header}, {} chars)", data_url.len());
    }

    fn show_preview(&self) {}

    fn show_preview_warning(&self, message: &str) {
        eprintln!("Preview unavailable: {message}");
    }

    fn clear_results(&self) {}

    fn append_result(&self, row: &ResultRow) {
        println!("  {:<40} {:>8}", row.label, row.confidence);
    }

    fn show_results(&self) {}

    fn hide_results(&self) {}

    fn show_error(&self, message: &str) {
        eprintln!("Error: {message}");
    }

    fn hide_error(&self) {}

    fn set_busy(&self, busy: bool) {
        if busy {
            println!("Processing...");
        }
    }
}
