use serde_json::Value;
use thiserror::Error;

/// Marker substrings of the transient geo-replication failure
const SYNC_ERROR_STATUS: &str = "500 (InternalServerError)";
const SYNC_ERROR_SOURCE: &str = "GeoRegionServiceClient";

crate::define_id_enum! {
    /// Stage of the linkage sequence that failed
    SourceControlStep {
        FetchMetadata => "fetch-metadata" : "Fetch config metadata",
        UpdateMetadata => "update-metadata" : "Update config metadata",
        PatchSiteConfig => "patch-site-config" : "Patch site config",
    }
}

/// Failure reported by a management API, with the body it returned
#[derive(Debug, Clone, PartialEq, Error)]
#[error("API request failed{}: {}", status_suffix(.status), message(.payload))]
pub struct ApiError {
    pub status: Option<u16>,
    pub payload: Value,
}

impl ApiError {
    pub fn new(status: Option<u16>, payload: Value) -> Self {
        Self { status, payload }
    }

    pub fn message(&self) -> String {
        message(&self.payload)
    }

    pub fn is_sync_error(&self) -> bool {
        is_api_sync_error(&self.payload)
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

fn message(payload: &Value) -> String {
    match payload {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("Message").or_else(|| map.get("message")) {
            Some(Value::String(s)) => s.clone(),
            _ => payload.to_string(),
        },
        _ => payload.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} failed: {error}", step_name(.step))]
pub struct SourceControlError {
    pub step: SourceControlStep,
    #[source]
    pub error: ApiError,
}

fn step_name(step: &SourceControlStep) -> &'static str {
    step.display_name()
}

impl SourceControlError {
    pub fn is_sync_error(&self) -> bool {
        self.error.is_sync_error()
    }
}

/// True for the platform's transient geo/stamp sync failure: a `Message`
/// string naming both the 500 status and the geo region service client.
pub fn is_api_sync_error(error: &Value) -> bool {
    error
        .get("Message")
        .and_then(Value::as_str)
        .map(|m| m.contains(SYNC_ERROR_STATUS) && m.contains(SYNC_ERROR_SOURCE))
        .unwrap_or(false)
}
