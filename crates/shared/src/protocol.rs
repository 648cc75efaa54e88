use serde::{Deserialize, Serialize};

pub const HEALTH_PATH: &str = "/health";
pub const PROCESS_PATH: &str = "/process";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Healthy,
    Loading,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub models_loaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ServiceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthResponse {
    pub fn loaded(models_loaded: bool) -> Self {
        Self {
            models_loaded,
            status: None,
            message: None,
        }
    }
}

/// Body of a `/process` response. Success carries `success` and `image`,
/// failure carries `error`; all fields are optional so either shape decodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
