//! Scripted service and recording view shared by the controller tests.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use shared::{
    domain::{ImageSlot, Readiness, TriggerState},
    error::ServiceException,
    protocol::HealthResponse,
};
use tokio::sync::Notify;

use crate::{
    error::ClientError, selection::SelectedImage, types::ResultImage, view::View, FaceSwapApi,
};

#[derive(Debug, Clone)]
pub(crate) enum HealthReply {
    Loaded(bool),
    Broken,
}

#[derive(Debug, Clone)]
pub(crate) enum ProcessReply {
    Success(String),
    Failure { status: u16, message: String },
}

pub(crate) struct ScriptedApi {
    health: Mutex<VecDeque<HealthReply>>,
    process: ProcessReply,
    gate: Option<Arc<Notify>>,
    pub(crate) health_calls: AtomicUsize,
    pub(crate) process_calls: AtomicUsize,
    pub(crate) submitted: Mutex<Vec<(String, String)>>,
}

impl ScriptedApi {
    pub(crate) fn new(health: impl IntoIterator<Item = HealthReply>) -> Self {
        Self {
            health: Mutex::new(health.into_iter().collect()),
            process: ProcessReply::Success("data:image/jpeg;base64,AAA".to_string()),
            gate: None,
            health_calls: AtomicUsize::new(0),
            process_calls: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_process(mut self, reply: ProcessReply) -> Self {
        self.process = reply;
        self
    }

    /// Holds every processing call until the gate is notified.
    pub(crate) fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub(crate) fn health_calls(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn process_calls(&self) -> usize {
        self.process_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FaceSwapApi for ScriptedApi {
    async fn check_health(&self) -> Result<HealthResponse, ClientError> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .health
            .lock()
            .expect("health script")
            .pop_front()
            .unwrap_or(HealthReply::Loaded(false));
        match reply {
            HealthReply::Loaded(loaded) => Ok(HealthResponse::loaded(loaded)),
            HealthReply::Broken => {
                let source = serde_json::from_str::<HealthResponse>("<html>")
                    .expect_err("not json");
                Err(ClientError::Decode {
                    url: "http://scripted/health".to_string(),
                    source,
                })
            }
        }
    }

    async fn process(
        &self,
        source: &SelectedImage,
        target: &SelectedImage,
    ) -> Result<ResultImage, ClientError> {
        self.process_calls.fetch_add(1, Ordering::SeqCst);
        self.submitted
            .lock()
            .expect("submitted")
            .push((source.file_name().to_string(), target.file_name().to_string()));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.process {
            ProcessReply::Success(image) => Ok(ResultImage::new(image.clone())),
            ProcessReply::Failure { status, message } => {
                Err(ServiceException::new(*status, message.clone()).into())
            }
        }
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ViewLog {
    pub(crate) statuses: Vec<Readiness>,
    pub(crate) alerts: Vec<String>,
    pub(crate) previews: Vec<(ImageSlot, String)>,
    pub(crate) triggers: Vec<TriggerState>,
    pub(crate) loading: bool,
    pub(crate) loading_shown: usize,
    pub(crate) result_visible: bool,
    pub(crate) result_src: Option<String>,
    pub(crate) download_href: Option<String>,
    pub(crate) download_name: Option<String>,
    pub(crate) scrolled_to_result: bool,
}

impl ViewLog {
    pub(crate) fn trigger_enabled(&self) -> bool {
        self.triggers.last().is_some_and(|state| state.is_enabled())
    }
}

#[derive(Default)]
pub(crate) struct RecordingView {
    log: Mutex<ViewLog>,
}

impl RecordingView {
    pub(crate) fn snapshot(&self) -> ViewLog {
        self.log.lock().expect("view log").clone()
    }

    fn with_log(&self, f: impl FnOnce(&mut ViewLog)) {
        f(&mut self.log.lock().expect("view log"));
    }
}

impl View for RecordingView {
    fn set_status(&self, readiness: Readiness) {
        self.with_log(|log| log.statuses.push(readiness));
    }

    fn alert(&self, message: &str) {
        self.with_log(|log| log.alerts.push(message.to_string()));
    }

    fn show_preview(&self, slot: ImageSlot, data_uri: &str) {
        self.with_log(|log| log.previews.push((slot, data_uri.to_string())));
    }

    fn set_trigger(&self, state: TriggerState) {
        self.with_log(|log| log.triggers.push(state));
    }

    fn set_loading(&self, visible: bool) {
        self.with_log(|log| {
            log.loading = visible;
            if visible {
                log.loading_shown += 1;
            }
        });
    }

    fn hide_result(&self) {
        self.with_log(|log| log.result_visible = false);
    }

    fn show_result(&self, result: &ResultImage) {
        self.with_log(|log| {
            log.result_src = Some(result.data_uri().to_string());
            log.download_href = Some(result.data_uri().to_string());
            log.download_name = Some(result.download_filename().to_string());
            log.result_visible = true;
            log.scrolled_to_result = true;
        });
    }
}

pub(crate) fn image(name: &str) -> SelectedImage {
    SelectedImage::new(name, "image/jpeg", name.as_bytes().to_vec())
}

pub(crate) fn not_an_image(name: &str) -> SelectedImage {
    SelectedImage::new(name, "application/pdf", b"%PDF".to_vec())
}
