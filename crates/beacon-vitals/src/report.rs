//! Reporting sink
//!
//! Final records can be shipped somewhere once per unmount. Delivery is
//! at-most-once with no retries. `HttpReporter` hands records to a worker
//! thread, so `send` never waits on the network; the worker logs failures.

use std::fmt;
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use url::Url;

use crate::{CollectorConfig, MetricsRecord};

/// Reporting error
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Invalid report endpoint {endpoint}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unsupported endpoint scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Endpoint rejected report: HTTP {0}")]
    Rejected(u16),

    #[error("Failed to start report worker: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Report worker has stopped")]
    WorkerStopped,
}

/// Destination for finalized records
pub trait MetricsSink: Send + fmt::Debug {
    /// Queue or perform one best-effort delivery; must not block on I/O
    fn send(&self, record: &MetricsRecord) -> Result<(), ReportError>;
}

/// POSTs records as JSON from a background worker
#[derive(Debug)]
pub struct HttpReporter {
    endpoint: Url,
    queue: mpsc::Sender<MetricsRecord>,
}

impl HttpReporter {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ReportError> {
        let endpoint = Url::parse(endpoint).map_err(|source| ReportError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            source,
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ReportError::UnsupportedScheme(endpoint.scheme().to_string()));
        }
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("beacon-vitals/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        let (queue, pending) = mpsc::channel();
        let delivery = Delivery {
            endpoint: endpoint.clone(),
            client,
        };
        thread::Builder::new()
            .name("beacon-report".into())
            .spawn(move || delivery.run(pending))
            .map_err(ReportError::Spawn)?;
        Ok(Self { endpoint, queue })
    }

    /// Reporter for `config.report_endpoint`, if one is configured
    pub fn from_config(config: &CollectorConfig) -> Result<Option<Self>, ReportError> {
        config
            .report_endpoint
            .as_deref()
            .map(|endpoint| Self::new(endpoint, config.report_timeout()))
            .transpose()
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl MetricsSink for HttpReporter {
    fn send(&self, record: &MetricsRecord) -> Result<(), ReportError> {
        self.queue
            .send(record.clone())
            .map_err(|_| ReportError::WorkerStopped)
    }
}

/// Worker side of `HttpReporter`; exits once the reporter is dropped and
/// the queue drains
struct Delivery {
    endpoint: Url,
    client: reqwest::blocking::Client,
}

impl Delivery {
    fn run(self, pending: mpsc::Receiver<MetricsRecord>) {
        for record in pending {
            if let Err(e) = self.post(&record) {
                tracing::warn!(subject = %record.subject, endpoint = %self.endpoint, "metrics report failed: {}", e);
            }
        }
        tracing::debug!(endpoint = %self.endpoint, "report worker stopped");
    }

    fn post(&self, record: &MetricsRecord) -> Result<(), ReportError> {
        tracing::debug!(subject = %record.subject, endpoint = %self.endpoint, "reporting metrics");
        let response = self.client.post(self.endpoint.clone()).json(record).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}

/// Keeps records in memory (headless harnesses, tests)
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    records: Arc<Mutex<Vec<MetricsRecord>>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<MetricsRecord> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl MetricsSink for BufferSink {
    fn send(&self, record: &MetricsRecord) -> Result<(), ReportError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}
