// Per-metric outcome wrapper and collector error type

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a single metric collection attempt failed. Converted to a plain
/// string on the wire; failures never escalate past their own metric.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("source unavailable: {0}")]
    Unavailable(String),
    #[error("parse failure: {0}")]
    Parse(String),
    #[error("command failed: {0}")]
    Command(String),
    #[error("timed out after {0}s")]
    Timeout(u64),
}

/// Uniform outcome of one metric collection attempt.
/// `available == true` iff `data` is present; `error` is only set on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricResult<T> {
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> MetricResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            available: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            available: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Transform the payload while preserving availability and error.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MetricResult<U> {
        MetricResult {
            available: self.available,
            data: self.data.map(f),
            error: self.error,
        }
    }
}
