//! Collector configuration

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::VitalsError;

/// Tunables for `VitalsCollector`
///
/// Loadable from JSON; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectorConfig {
    /// First render later than this after mount logs a warning
    pub slow_render_threshold_ms: u64,
    /// Where final records are POSTed, if anywhere
    pub report_endpoint: Option<String>,
    /// Per-request timeout for the reporting sink
    pub report_timeout_ms: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            slow_render_threshold_ms: 100,
            report_endpoint: None,
            report_timeout_ms: 5_000,
        }
    }
}

impl CollectorConfig {
    pub fn slow_render_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_render_threshold_ms)
    }

    pub fn report_timeout(&self) -> Duration {
        Duration::from_millis(self.report_timeout_ms)
    }

    pub fn from_json_str(json: &str) -> Result<Self, VitalsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, VitalsError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }
}
