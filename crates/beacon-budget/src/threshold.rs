//! Metric thresholds
//!
//! Three-tier rating of a metric value against `{good, needsImprovement}`
//! upper bounds, both inclusive.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::BudgetError;

/// Rating tier, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    Good,
    NeedsImprovement,
    Poor,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Good => "good",
            Rating::NeedsImprovement => "needs-improvement",
            Rating::Poor => "poor",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper bounds in the metric's natural unit (ms, or unitless for CLS)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    pub good: f64,
    pub needs_improvement: f64,
}

impl Thresholds {
    pub const fn new(good: f64, needs_improvement: f64) -> Self {
        Self { good, needs_improvement }
    }

    pub fn rate(&self, value: f64) -> Rating {
        if value <= self.good {
            Rating::Good
        } else if value <= self.needs_improvement {
            Rating::NeedsImprovement
        } else {
            Rating::Poor
        }
    }
}

/// Metric name to thresholds; names are case-insensitive
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ThresholdTable {
    metrics: BTreeMap<String, Thresholds>,
}

impl ThresholdTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Core Web Vitals defaults
    pub fn web_vitals() -> Self {
        Self::new()
            .with("fcp", Thresholds::new(1800.0, 3000.0))
            .with("lcp", Thresholds::new(2500.0, 4000.0))
            .with("fid", Thresholds::new(100.0, 300.0))
            .with("cls", Thresholds::new(0.1, 0.25))
            .with("ttfb", Thresholds::new(800.0, 1800.0))
            .with("inp", Thresholds::new(200.0, 500.0))
    }

    pub fn with(mut self, name: &str, thresholds: Thresholds) -> Self {
        self.metrics.insert(name.to_ascii_lowercase(), thresholds);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Thresholds> {
        self.metrics.get(&name.to_ascii_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Thresholds)> {
        self.metrics.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Parse `{ "lcp": { "good": 2500, "needsImprovement": 4000 }, ... }`
    pub fn from_json_str(json: &str) -> Result<Self, BudgetError> {
        let raw: BTreeMap<String, Thresholds> =
            serde_json::from_str(json).map_err(|e| BudgetError::MalformedThresholds(e.to_string()))?;
        let mut table = Self::new();
        for (name, thresholds) in raw {
            if thresholds.good > thresholds.needs_improvement {
                return Err(BudgetError::MalformedThresholds(format!(
                    "{}: good ({}) exceeds needsImprovement ({})",
                    name, thresholds.good, thresholds.needs_improvement
                )));
            }
            table = table.with(&name, thresholds);
        }
        Ok(table)
    }

    pub fn from_file(path: &Path) -> Result<Self, BudgetError> {
        let text = std::fs::read_to_string(path).map_err(|source| BudgetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn classify(&self, name: &str, value: f64) -> Rating {
        classify_metric(name, value, self)
    }
}

/// Rate `value` for metric `name`
///
/// A metric missing from the table rates `Good`, so an unknown metric never
/// fails a build.
pub fn classify_metric(name: &str, value: f64, table: &ThresholdTable) -> Rating {
    match table.get(name) {
        Some(thresholds) => thresholds.rate(value),
        None => {
            tracing::debug!(metric = name, "no thresholds configured, rating good");
            Rating::Good
        }
    }
}
