//! Beacon Vitals
//!
//! Core Web Vitals collection for mounted subjects (components or pages).
//!
//! Features:
//! - Capability-negotiated signal sources (paint, LCP, layout shift,
//!   first input, navigation, resource, memory)
//! - Shared metrics registry with explicit register/update/finalize
//! - Per-subject mount summaries and optional HTTP reporting
//! - Throttle/debounce helpers for high-frequency handlers

pub mod clock;
pub mod coalesce;
pub mod collector;
pub mod config;
pub mod entry;
pub mod record;
pub mod registry;
pub mod report;
pub mod signal;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use coalesce::{Debounce, Throttle};
pub use collector::{MountSummary, VitalsCollector};
pub use config::CollectorConfig;
pub use entry::{NavigationTiming, PerformanceEntry, SignalKind};
pub use record::MetricsRecord;
pub use registry::MetricsRegistry;
pub use report::{BufferSink, HttpReporter, MetricsSink, ReportError};
pub use signal::{EntrySink, NoopSource, PerformanceTimeline, SignalSource, TimelineSource};

/// Vitals error
#[derive(Debug, thiserror::Error)]
pub enum VitalsError {
    #[error("Subject already mounted: {0}")]
    AlreadyMounted(String),

    #[error("Subject not mounted: {0}")]
    NotMounted(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
