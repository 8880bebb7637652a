//! budget-gate
//!
//! CI gate for bundle size budgets. With no arguments it reads `budget.json`
//! and walks `dist/` in the working directory.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use beacon_budget::{evaluate_bundle_with, BudgetError, Rating, ThresholdTable};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Metrics rated by `rate`, in report order
const RATED_METRICS: [&str; 5] = ["fcp", "lcp", "fid", "cls", "ttfb"];

#[derive(Debug, Parser)]
#[command(name = "budget-gate", version, about = "Check a production bundle against its size budget")]
struct Cli {
    /// Budget file (Lighthouse array or {"resources": [...]})
    #[arg(long, env = "BEACON_BUDGET", default_value = "budget.json")]
    budget: PathBuf,

    /// Build output directory
    #[arg(long, env = "BEACON_BUNDLE_DIR", default_value = "dist")]
    bundle: PathBuf,

    /// Number of largest files to list
    #[arg(long, default_value_t = beacon_budget::DEFAULT_TOP_FILES)]
    top: usize,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rate a reported metrics record against Web Vitals thresholds
    Rate {
        /// Metrics record or mount summary JSON
        #[arg(long)]
        metrics: PathBuf,

        /// Threshold table JSON; Core Web Vitals defaults when omitted
        #[arg(long)]
        thresholds: Option<PathBuf>,

        /// Print ratings as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Some(Command::Rate {
            metrics,
            thresholds,
            json,
        }) => run_rate(metrics, thresholds.as_deref(), *json),
        None => run_gate(&cli),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {:#}", e);
            if let Some(hint) = e.downcast_ref::<BudgetError>().and_then(hint_for) {
                eprintln!("hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn hint_for(err: &BudgetError) -> Option<&'static str> {
    match err {
        BudgetError::MissingBudgetFile(_) => Some("create budget.json or pass --budget <file>"),
        BudgetError::MissingBundle(_) => Some("run the production build or pass --bundle <dir>"),
        BudgetError::MalformedBudget(_) => {
            Some("expected [{\"resourceSizes\": [...]}] or {\"resources\": [{\"resourceType\": \"script\", \"budget\": 200}]}")
        }
        _ => None,
    }
}

fn run_gate(cli: &Cli) -> anyhow::Result<bool> {
    let report = evaluate_bundle_with(&cli.bundle, &cli.budget, cli.top)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }
    Ok(report.passed)
}

fn run_rate(metrics: &Path, thresholds: Option<&Path>, json: bool) -> anyhow::Result<bool> {
    let table = match thresholds {
        Some(path) => ThresholdTable::from_file(path)?,
        None => ThresholdTable::web_vitals(),
    };
    let text = std::fs::read_to_string(metrics).with_context(|| format!("failed to read {}", metrics.display()))?;
    let value: Value = serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", metrics.display()))?;
    // Mount summaries nest the record
    let record = value.get("record").unwrap_or(&value);

    let ratings: Vec<(&str, Option<f64>, Option<Rating>)> = RATED_METRICS
        .into_iter()
        .map(|name| {
            let measured = record.get(name).and_then(Value::as_f64);
            (name, measured, measured.map(|v| table.classify(name, v)))
        })
        .collect();

    if json {
        let out: serde_json::Map<String, Value> = ratings
            .iter()
            .map(|(name, measured, rating)| {
                let entry = serde_json::json!({ "value": measured, "rating": rating });
                (name.to_string(), entry)
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for (name, measured, rating) in &ratings {
            match (measured, rating) {
                (Some(v), Some(r)) => println!("  {:<5} {:>10.3}  {}", name, v, r),
                _ => println!("  {:<5} {:>10}  not measured", name, "-"),
            }
        }
    }

    Ok(ratings.iter().all(|(_, _, rating)| *rating != Some(Rating::Poor)))
}
