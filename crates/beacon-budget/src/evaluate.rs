//! Budget evaluation
//!
//! Compares a bundle analysis against a budget spec. Only categories with a
//! nonzero budget can fail; the rest are listed for information.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::remediation::advice_for;
use crate::{analyze_bundle, AssetFile, BudgetError, BudgetSpec, BundleAnalysis, Remediation, ResourceType};

/// Number of largest files listed in a report by default
pub const DEFAULT_TOP_FILES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetStatus {
    Within,
    Over,
    Unbudgeted,
}

/// Result for one resource type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryVerdict {
    pub resource_type: ResourceType,
    pub actual_bytes: u64,
    pub budget_bytes: Option<u64>,
    pub status: BudgetStatus,
}

impl CategoryVerdict {
    pub fn passed(&self) -> bool {
        self.status != BudgetStatus::Over
    }
}

/// Full gate result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetReport {
    pub passed: bool,
    pub total_bytes: u64,
    pub verdicts: Vec<CategoryVerdict>,
    pub largest_files: Vec<AssetFile>,
    pub remediation: Vec<Remediation>,
}

impl BudgetReport {
    pub fn verdict(&self, resource_type: ResourceType) -> Option<&CategoryVerdict> {
        self.verdicts.iter().find(|v| v.resource_type == resource_type)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CategoryVerdict> {
        self.verdicts.iter().filter(|v| !v.passed())
    }
}

/// Compare `analysis` against `spec`
pub fn evaluate(analysis: &BundleAnalysis, spec: &BudgetSpec, top_files: usize) -> BudgetReport {
    let verdicts: Vec<CategoryVerdict> = ResourceType::ALL
        .into_iter()
        .map(|resource_type| {
            let actual_bytes = analysis.bytes(resource_type);
            let budget_bytes = spec.limit(resource_type);
            let status = match budget_bytes {
                None => BudgetStatus::Unbudgeted,
                Some(limit) if actual_bytes <= limit => BudgetStatus::Within,
                Some(_) => BudgetStatus::Over,
            };
            CategoryVerdict {
                resource_type,
                actual_bytes,
                budget_bytes,
                status,
            }
        })
        .collect();

    let passed = verdicts.iter().all(CategoryVerdict::passed);
    let remediation = if passed {
        Vec::new()
    } else {
        verdicts
            .iter()
            .filter(|v| !v.passed())
            .map(|v| Remediation {
                resource_type: v.resource_type,
                over_by_bytes: v.actual_bytes - v.budget_bytes.unwrap_or(0),
                advice: advice_for(v.resource_type),
            })
            .collect()
    };

    for v in verdicts.iter().filter(|v| !v.passed()) {
        tracing::info!(
            resource_type = %v.resource_type,
            actual_bytes = v.actual_bytes,
            budget_bytes = v.budget_bytes,
            "over budget"
        );
    }

    BudgetReport {
        passed,
        total_bytes: analysis.total_bytes,
        verdicts,
        largest_files: analysis.largest(top_files).into_iter().cloned().collect(),
        remediation,
    }
}

/// Load the budget, check the bundle exists, walk it and evaluate
///
/// Missing or malformed inputs fail before any directory walk starts.
pub fn evaluate_bundle(bundle_root: impl AsRef<Path>, budget_path: impl AsRef<Path>) -> Result<BudgetReport, BudgetError> {
    evaluate_bundle_with(bundle_root.as_ref(), budget_path.as_ref(), DEFAULT_TOP_FILES)
}

pub fn evaluate_bundle_with(bundle_root: &Path, budget_path: &Path, top_files: usize) -> Result<BudgetReport, BudgetError> {
    let spec = BudgetSpec::from_file(budget_path)?;
    if !bundle_root.exists() {
        return Err(BudgetError::MissingBundle(bundle_root.to_path_buf()));
    }
    if spec.is_empty() {
        tracing::warn!(budget = %budget_path.display(), "budget file defines no nonzero budgets");
    }
    let analysis = analyze_bundle(bundle_root)?;
    Ok(evaluate(&analysis, &spec, top_files))
}

fn kb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0
}

impl fmt::Display for BudgetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Performance budget")?;
        writeln!(f, "{:-<60}", "")?;
        for v in &self.verdicts {
            let budget = match v.budget_bytes {
                Some(b) => format!("{:.1} KB", kb(b)),
                None => "-".to_string(),
            };
            let status = match v.status {
                BudgetStatus::Within => "PASS",
                BudgetStatus::Over => "FAIL",
                BudgetStatus::Unbudgeted => "(no budget)",
            };
            writeln!(
                f,
                "  {:<11} {:>10.1} KB / {:>11}  {}",
                v.resource_type.as_str(),
                kb(v.actual_bytes),
                budget,
                status
            )?;
        }

        if !self.largest_files.is_empty() {
            writeln!(f)?;
            writeln!(f, "Largest files:")?;
            for file in &self.largest_files {
                writeln!(f, "  {:>10.1} KB  {}", kb(file.bytes), file.path.display())?;
            }
        }

        if !self.remediation.is_empty() {
            writeln!(f)?;
            writeln!(f, "Suggestions:")?;
            for r in &self.remediation {
                writeln!(f, "  {} (over by {:.1} KB):", r.resource_type, kb(r.over_by_bytes))?;
                for line in r.advice {
                    writeln!(f, "    - {}", line)?;
                }
            }
        }

        writeln!(f)?;
        write!(f, "Result: {}", if self.passed { "PASS" } else { "FAIL" })
    }
}
