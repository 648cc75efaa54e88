//! Presentation seam driven by the controller.

use shared::domain::{ImageSlot, Readiness, TriggerState};

use crate::types::ResultImage;

/// Everything the controller can change on screen. Calls are synchronous and
/// must not block; implementations use interior mutability.
pub trait View: Send + Sync {
    fn set_status(&self, readiness: Readiness);
    /// Blocking user notification.
    fn alert(&self, message: &str);
    fn show_preview(&self, slot: ImageSlot, data_uri: &str);
    fn set_trigger(&self, state: TriggerState);
    fn set_loading(&self, visible: bool);
    fn hide_result(&self);
    /// Assign the result to the image and the download link, reveal the
    /// result region and bring it into view.
    fn show_result(&self, result: &ResultImage);
}
