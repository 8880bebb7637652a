//! Beacon Budget
//!
//! Build-time performance gates:
//! - Three-tier rating of Web Vitals values against a threshold table
//! - Bundle size budgets per asset category, with remediation hints

mod analysis;
mod budget;
mod category;
mod evaluate;
pub mod remediation;
mod threshold;

use std::path::PathBuf;

pub use analysis::{analyze_bundle, AssetFile, BundleAnalysis};
pub use budget::BudgetSpec;
pub use category::ResourceType;
pub use evaluate::{
    evaluate, evaluate_bundle, evaluate_bundle_with, BudgetReport, BudgetStatus, CategoryVerdict, DEFAULT_TOP_FILES,
};
pub use remediation::Remediation;
pub use threshold::{classify_metric, Rating, ThresholdTable, Thresholds};

/// Budget evaluation error
#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    #[error("Budget file not found: {}", .0.display())]
    MissingBudgetFile(PathBuf),

    #[error("Bundle directory not found: {} (run the production build first)", .0.display())]
    MissingBundle(PathBuf),

    #[error("Bundle path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Malformed budget file: {0}")]
    MalformedBudget(String),

    #[error("Malformed threshold table: {0}")]
    MalformedThresholds(String),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk bundle: {0}")]
    Walk(#[from] walkdir::Error),
}
