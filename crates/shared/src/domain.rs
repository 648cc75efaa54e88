use serde::{Deserialize, Serialize};

/// Suggested file name for a downloaded swap result.
pub const RESULT_DOWNLOAD_FILENAME: &str = "faceswap_result.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSlot {
    Source,
    Target,
}

impl ImageSlot {
    /// Multipart field name the processing endpoint expects for this slot.
    pub fn field_name(self) -> &'static str {
        match self {
            ImageSlot::Source => "source",
            ImageSlot::Target => "target",
        }
    }
}

impl std::fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    #[default]
    Unknown,
    Loading,
    Ready,
    Error,
}

impl Readiness {
    /// `Ready` and `Error` are never left once entered.
    pub fn is_terminal(self) -> bool {
        matches!(self, Readiness::Ready | Readiness::Error)
    }

    pub fn advance(self, observed: Readiness) -> Readiness {
        if self.is_terminal() {
            self
        } else {
            observed
        }
    }

    /// Status class a page would attach to the status element.
    pub fn css_class(self) -> &'static str {
        match self {
            Readiness::Unknown => "status",
            Readiness::Loading => "status loading",
            Readiness::Ready => "status ready",
            Readiness::Error => "status error",
        }
    }

    pub fn status_text(self) -> &'static str {
        match self {
            Readiness::Unknown => "Checking server status...",
            Readiness::Loading => "AI models are loading... please wait 2-3 minutes",
            Readiness::Ready => "AI models loaded! Ready to swap.",
            Readiness::Error => "Could not connect to the server",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    DisabledIncomplete,
    EnabledIdle,
    DisabledProcessing,
}

impl TriggerState {
    pub fn is_enabled(self) -> bool {
        self == TriggerState::EnabledIdle
    }

    /// State once no request is in flight, given whether both images are present.
    pub fn idle(selections_complete: bool) -> Self {
        if selections_complete {
            TriggerState::EnabledIdle
        } else {
            TriggerState::DisabledIncomplete
        }
    }
}
