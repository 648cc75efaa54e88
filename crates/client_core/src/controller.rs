//! Client controller: owns the selections, the trigger state and the readiness
//! state, and routes user events to the processing service.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use shared::domain::{ImageSlot, Readiness, TriggerState};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::{
    error::ClientError,
    readiness::DEFAULT_POLL_INTERVAL,
    selection::{SelectedImage, SelectionError, Selections, INVALID_IMAGE_ALERT},
    types::ResultImage,
    view::View,
    FaceSwapApi,
};

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("both a source and a target image must be selected")]
    Incomplete,
    #[error("a face swap request is already in flight")]
    Busy,
    #[error(transparent)]
    Client(#[from] ClientError),
}

pub(crate) struct ControllerState {
    pub(crate) selections: Selections,
    pub(crate) trigger: TriggerState,
    pub(crate) readiness: Readiness,
    preview_generation: [u64; 2],
}

impl ControllerState {
    fn new() -> Self {
        Self {
            selections: Selections::default(),
            trigger: TriggerState::DisabledIncomplete,
            readiness: Readiness::Unknown,
            preview_generation: [0; 2],
        }
    }

    fn bump_generation(&mut self, slot: ImageSlot) -> u64 {
        let generation = &mut self.preview_generation[slot_index(slot)];
        *generation += 1;
        *generation
    }

    fn generation(&self, slot: ImageSlot) -> u64 {
        self.preview_generation[slot_index(slot)]
    }
}

fn slot_index(slot: ImageSlot) -> usize {
    match slot {
        ImageSlot::Source => 0,
        ImageSlot::Target => 1,
    }
}

pub struct ClientController {
    api: Arc<dyn FaceSwapApi>,
    pub(crate) view: Arc<dyn View>,
    pub(crate) poll_interval: Duration,
    inner: Mutex<ControllerState>,
}

impl ClientController {
    pub fn new(api: Arc<dyn FaceSwapApi>, view: Arc<dyn View>) -> Self {
        Self {
            api,
            view,
            poll_interval: DEFAULT_POLL_INTERVAL,
            inner: Mutex::new(ControllerState::new()),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub(crate) fn api(&self) -> &dyn FaceSwapApi {
        self.api.as_ref()
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn readiness(&self) -> Readiness {
        self.state().readiness
    }

    pub fn trigger_state(&self) -> TriggerState {
        self.state().trigger
    }

    pub fn selections(&self) -> Selections {
        self.state().selections.clone()
    }

    /// Records a picked file for `slot` and renders its preview in the
    /// background. Files whose declared type is not `image/*` are rejected
    /// with an alert and leave the current selection untouched.
    pub fn handle_file_selection(
        self: &Arc<Self>,
        slot: ImageSlot,
        image: SelectedImage,
    ) -> Result<JoinHandle<()>, SelectionError> {
        if !image.is_image() {
            warn!(
                %slot,
                file = image.file_name(),
                media_type = image.media_type(),
                "rejected non-image selection"
            );
            self.view.alert(INVALID_IMAGE_ALERT);
            return Err(SelectionError::NotAnImage {
                file_name: image.file_name().to_string(),
                media_type: image.media_type().to_string(),
            });
        }

        let image = Arc::new(image);
        let (generation, trigger) = {
            let mut state = self.state();
            state.selections = state.selections.with(slot, Arc::clone(&image));
            if state.trigger != TriggerState::DisabledProcessing {
                state.trigger = TriggerState::idle(state.selections.is_complete());
            }
            (state.bump_generation(slot), state.trigger)
        };
        debug!(%slot, file = image.file_name(), ?trigger, "selection recorded");
        self.view.set_trigger(trigger);

        let controller = Arc::clone(self);
        Ok(tokio::spawn(async move {
            let encoded = tokio::task::spawn_blocking(move || image.to_data_uri()).await;
            let data_uri = match encoded {
                Ok(data_uri) => data_uri,
                Err(err) => {
                    warn!(%slot, error = %err, "preview encoding task failed");
                    return;
                }
            };
            if controller.state().generation(slot) != generation {
                debug!(%slot, generation, "dropping superseded preview");
                return;
            }
            controller.view.show_preview(slot, &data_uri);
        }))
    }

    /// Submits both selections. The loading indicator and the trigger are
    /// restored when this returns, whatever the outcome.
    pub async fn process_face_swap(&self) -> Result<ResultImage, ControllerError> {
        let (source, target) = {
            let mut state = self.state();
            if state.trigger == TriggerState::DisabledProcessing {
                return Err(ControllerError::Busy);
            }
            let (Some(source), Some(target)) = (
                state.selections.get(ImageSlot::Source),
                state.selections.get(ImageSlot::Target),
            ) else {
                return Err(ControllerError::Incomplete);
            };
            state.trigger = TriggerState::DisabledProcessing;
            (source, target)
        };
        let _guard = ProcessingGuard::begin(self);

        match self.api.process(&source, &target).await {
            Ok(result) => {
                info!(bytes = result.data_uri().len(), "face swap succeeded");
                self.view.show_result(&result);
                Ok(result)
            }
            Err(err) => {
                error!(error = %err, "face swap failed");
                self.view.alert(&format!("Error: {}", err.user_message()));
                Err(err.into())
            }
        }
    }
}

/// Holds the "processing" presentation for the lifetime of one request.
struct ProcessingGuard<'a> {
    controller: &'a ClientController,
}

impl<'a> ProcessingGuard<'a> {
    fn begin(controller: &'a ClientController) -> Self {
        controller.view.set_loading(true);
        controller.view.hide_result();
        controller.view.set_trigger(TriggerState::DisabledProcessing);
        Self { controller }
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        let trigger = {
            let mut state = self.controller.state();
            state.trigger = TriggerState::idle(state.selections.is_complete());
            state.trigger
        };
        self.controller.view.set_loading(false);
        self.controller.view.set_trigger(trigger);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
