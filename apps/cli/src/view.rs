//! Terminal rendering of the controller's view state.

use std::sync::Mutex;

use client_core::{ResultImage, View};
use shared::domain::{ImageSlot, Readiness, TriggerState};
use tracing::{debug, info};

#[derive(Default)]
pub struct TerminalView {
    last_status: Mutex<Option<Readiness>>,
}

impl View for TerminalView {
    fn set_status(&self, readiness: Readiness) {
        let mut last = self
            .last_status
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // Repeated "loading" polls print once.
        if *last == Some(readiness) {
            return;
        }
        *last = Some(readiness);
        if readiness != Readiness::Unknown {
            println!("[{}] {}", readiness.css_class(), readiness.status_text());
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("! {message}");
    }

    fn show_preview(&self, slot: ImageSlot, data_uri: &str) {
        info!(%slot, encoded_bytes = data_uri.len(), "preview ready");
    }

    fn set_trigger(&self, state: TriggerState) {
        debug!(?state, "trigger state");
    }

    fn set_loading(&self, visible: bool) {
        if visible {
            println!("Swapping faces, this can take a while...");
        }
    }

    fn hide_result(&self) {}

    fn show_result(&self, result: &ResultImage) {
        println!(
            "Result ready ({} bytes encoded), download as {}",
            result.data_uri().len(),
            result.download_filename()
        );
    }
}
