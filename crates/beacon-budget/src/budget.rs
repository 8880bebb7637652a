//! Budget file
//!
//! Two accepted shapes:
//!
//! ```json
//! [{ "resourceSizes": [{ "resourceType": "script", "budget": 200 }] }]
//! { "resources": [{ "resourceType": "script", "budget": 200 }] }
//! ```
//!
//! Budgets are in KB and converted to bytes (×1024) on load.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::{BudgetError, ResourceType};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceBudget {
    resource_type: String,
    budget: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LighthouseBudget {
    #[serde(default)]
    resource_sizes: Vec<ResourceBudget>,
}

#[derive(Debug, Deserialize)]
struct SimpleBudget {
    resources: Vec<ResourceBudget>,
}

/// Byte ceilings per resource type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetSpec {
    limits: BTreeMap<ResourceType, u64>,
}

impl BudgetSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a budget in KB
    pub fn with_kb(mut self, resource_type: ResourceType, kb: u64) -> Self {
        self.limits.insert(resource_type, kb * 1024);
        self
    }

    /// Budget in bytes, if a nonzero one is configured
    pub fn limit(&self, resource_type: ResourceType) -> Option<u64> {
        self.limits.get(&resource_type).copied().filter(|&b| b > 0)
    }

    pub fn is_empty(&self) -> bool {
        self.limits.values().all(|&b| b == 0)
    }

    pub fn from_json_str(json: &str) -> Result<Self, BudgetError> {
        let value: Value = serde_json::from_str(json).map_err(|e| BudgetError::MalformedBudget(e.to_string()))?;

        let entries = if value.is_array() {
            let budgets: Vec<LighthouseBudget> =
                serde_json::from_value(value).map_err(|e| BudgetError::MalformedBudget(e.to_string()))?;
            let first = budgets
                .into_iter()
                .next()
                .ok_or_else(|| BudgetError::MalformedBudget("budget array is empty".into()))?;
            first.resource_sizes
        } else if value.get("resources").is_some() {
            let simple: SimpleBudget =
                serde_json::from_value(value).map_err(|e| BudgetError::MalformedBudget(e.to_string()))?;
            simple.resources
        } else {
            return Err(BudgetError::MalformedBudget(
                "expected a Lighthouse budget array or an object with a \"resources\" list".into(),
            ));
        };

        let mut spec = Self::new();
        for entry in entries {
            let Some(resource_type) = ResourceType::parse(&entry.resource_type) else {
                tracing::warn!(resource_type = %entry.resource_type, "unsupported resourceType in budget, skipped");
                continue;
            };
            if !entry.budget.is_finite() || entry.budget < 0.0 {
                return Err(BudgetError::MalformedBudget(format!(
                    "{}: budget must be a non-negative number of KB, got {}",
                    resource_type, entry.budget
                )));
            }
            let bytes = (entry.budget * 1024.0).round() as u64;
            spec.limits.insert(resource_type, bytes);
        }
        Ok(spec)
    }

    /// Load a budget file; a missing file is reported before anything else
    pub fn from_file(path: &Path) -> Result<Self, BudgetError> {
        if !path.is_file() {
            return Err(BudgetError::MissingBudgetFile(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| BudgetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text).map_err(|e| match e {
            BudgetError::MalformedBudget(msg) => BudgetError::MalformedBudget(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }
}
