//! Vitals Collector
//!
//! Per-subject observer sessions. `mount` registers a record and subscribes
//! one source per signal kind; `unmount` detaches them, removes the record
//! and emits a summary.
//!
//! All timestamps come from the timeline's clock, so `mounted_at` is on the
//! same base as the entries the host emits.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::{
    Clock, CollectorConfig, HttpReporter, MetricsRecord, MetricsRegistry, MetricsSink, PerformanceTimeline,
    ReportError, SignalKind, SignalSource, VitalsError,
};

/// Final report for an unmounted subject
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MountSummary {
    pub subject: String,
    pub duration_ms: f64,
    pub render_count: u32,
    pub update_count: u32,
    pub record: MetricsRecord,
}

#[derive(Debug)]
struct Session {
    sources: Vec<Box<dyn SignalSource>>,
    first_render_seen: bool,
}

/// Collects vitals for any number of mounted subjects
#[derive(Debug)]
pub struct VitalsCollector {
    registry: MetricsRegistry,
    timeline: PerformanceTimeline,
    clock: Arc<dyn Clock>,
    config: CollectorConfig,
    sink: Option<Box<dyn MetricsSink>>,
    sessions: HashMap<String, Session>,
}

impl VitalsCollector {
    pub fn new(registry: MetricsRegistry, timeline: PerformanceTimeline) -> Self {
        Self {
            registry,
            clock: timeline.clock(),
            timeline,
            config: CollectorConfig::default(),
            sink: None,
            sessions: HashMap::new(),
        }
    }

    /// Collector wired to the HTTP reporter named in `config`, if any
    pub fn from_config(
        registry: MetricsRegistry,
        timeline: PerformanceTimeline,
        config: CollectorConfig,
    ) -> Result<Self, ReportError> {
        let reporter = HttpReporter::from_config(&config)?;
        let mut collector = Self::new(registry, timeline).with_config(config);
        if let Some(reporter) = reporter {
            collector.sink = Some(Box::new(reporter));
        }
        Ok(collector)
    }

    pub fn with_config(mut self, config: CollectorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_sink(mut self, sink: Box<dyn MetricsSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn registry(&self) -> &MetricsRegistry {
        &self.registry
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn is_collecting(&self, subject: &str) -> bool {
        self.sessions.contains_key(subject)
    }

    /// Start collecting for `subject`
    pub fn mount(&mut self, subject: &str) -> Result<(), VitalsError> {
        let now = self.clock.now();
        self.registry.register(MetricsRecord::new(subject, now))?;

        let mut sources = Vec::with_capacity(SignalKind::ALL.len());
        for kind in SignalKind::ALL {
            let mut source = self.timeline.negotiate(kind);
            tracing::debug!(
                subject,
                signal = kind.entry_type(),
                supported = source.supported(),
                "observing signal"
            );

            let registry = self.registry.clone();
            let clock = Arc::clone(&self.clock);
            let name = subject.to_string();
            source.subscribe(Box::new(move |entry| {
                let now = clock.now();
                if registry.update(&name, |rec| rec.apply(entry, now)).is_none() {
                    tracing::trace!(subject = %name, "entry for finalized subject dropped");
                }
            }));
            sources.push(source);
        }

        self.sessions.insert(
            subject.to_string(),
            Session {
                sources,
                first_render_seen: false,
            },
        );
        tracing::debug!(subject, "subject mounted");
        Ok(())
    }

    /// Count a render; the first one is checked against the slow threshold
    pub fn record_render(&mut self, subject: &str) -> Result<(), VitalsError> {
        let session = self
            .sessions
            .get_mut(subject)
            .ok_or_else(|| VitalsError::NotMounted(subject.to_string()))?;
        let now = self.clock.now();
        let mounted_at = self
            .registry
            .update(subject, |rec| {
                rec.render_count += 1;
                rec.last_updated = now;
                rec.mounted_at
            })
            .ok_or_else(|| VitalsError::NotMounted(subject.to_string()))?;

        if !session.first_render_seen {
            session.first_render_seen = true;
            let elapsed_ms = now - mounted_at;
            let threshold_ms = self.config.slow_render_threshold().as_secs_f64() * 1000.0;
            if elapsed_ms > threshold_ms {
                tracing::warn!(subject, elapsed_ms, threshold_ms, "slow first render");
            }
        }
        Ok(())
    }

    /// Count a re-render triggered by a state or prop change
    pub fn record_update(&mut self, subject: &str) -> Result<(), VitalsError> {
        if !self.sessions.contains_key(subject) {
            return Err(VitalsError::NotMounted(subject.to_string()));
        }
        let now = self.clock.now();
        self.registry
            .update(subject, |rec| {
                rec.update_count += 1;
                rec.last_updated = now;
            })
            .ok_or_else(|| VitalsError::NotMounted(subject.to_string()))
    }

    /// Page hidden: LCP is final for every mounted subject
    pub fn page_hide(&mut self) {
        for subject in self.sessions.keys() {
            self.registry.update(subject, MetricsRecord::freeze_lcp);
        }
    }

    /// Stop collecting for `subject` and release its record
    ///
    /// Returns `None` if the subject was not mounted.
    pub fn unmount(&mut self, subject: &str) -> Option<MountSummary> {
        let mut session = self.sessions.remove(subject)?;
        for source in session.sources.iter_mut() {
            source.unsubscribe();
        }

        let now = self.clock.now();
        let mut record = self.registry.finalize(subject)?;
        record.freeze_lcp();

        let summary = MountSummary {
            subject: record.subject.clone(),
            duration_ms: now - record.mounted_at,
            render_count: record.render_count,
            update_count: record.update_count,
            record,
        };
        tracing::info!(
            subject = %summary.subject,
            duration_ms = summary.duration_ms,
            renders = summary.render_count,
            updates = summary.update_count,
            "subject finalized"
        );

        // Sinks hand off without waiting on delivery
        if let Some(sink) = &self.sink {
            if let Err(e) = sink.send(&summary.record) {
                tracing::warn!(subject = %summary.subject, "metrics report failed: {}", e);
            }
        }
        Some(summary)
    }

    /// Latest committed values for a mounted subject
    pub fn snapshot(&self, subject: &str) -> Option<MetricsRecord> {
        self.registry.get(subject)
    }
}

impl Drop for VitalsCollector {
    fn drop(&mut self) {
        for (subject, mut session) in self.sessions.drain() {
            for source in session.sources.iter_mut() {
                source.unsubscribe();
            }
            self.registry.finalize(&subject);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BufferSink, ManualClock, PerformanceEntry};
    use std::net::TcpListener;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    fn collector_with_clock() -> (VitalsCollector, PerformanceTimeline, ManualClock) {
        let clock = ManualClock::new(0.0);
        let timeline = PerformanceTimeline::new().with_clock(Arc::new(clock.clone()));
        let collector = VitalsCollector::new(MetricsRegistry::new(), timeline.clone());
        (collector, timeline, clock)
    }

    /// Collects the message of every WARN event
    #[derive(Clone, Default)]
    struct WarnCapture {
        messages: Arc<Mutex<Vec<String>>>,
    }

    struct MessageVisitor(String);

    impl tracing::field::Visit for MessageVisitor {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{:?}", value);
            }
        }
    }

    impl<S: tracing::Subscriber> Layer<S> for WarnCapture {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                let mut visitor = MessageVisitor(String::new());
                event.record(&mut visitor);
                self.messages.lock().unwrap().push(visitor.0);
            }
        }
    }

    fn warnings_during(f: impl FnOnce()) -> Vec<String> {
        let capture = WarnCapture::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        tracing::subscriber::with_default(subscriber, f);
        let messages = capture.messages.lock().unwrap().clone();
        messages
    }

    #[test]
    fn test_mount_twice_rejected() {
        let (mut collector, _, _) = collector_with_clock();
        collector.mount("hero").unwrap();
        assert!(matches!(collector.mount("hero"), Err(VitalsError::AlreadyMounted(_))));
    }

    #[test]
    fn test_render_requires_mount() {
        let (mut collector, _, _) = collector_with_clock();
        assert!(matches!(collector.record_render("ghost"), Err(VitalsError::NotMounted(_))));
        assert!(matches!(collector.record_update("ghost"), Err(VitalsError::NotMounted(_))));
    }

    #[test]
    fn test_counters_and_summary() {
        let (mut collector, _, clock) = collector_with_clock();
        clock.set(10.0);
        collector.mount("contact-form").unwrap();
        clock.set(40.0);
        collector.record_render("contact-form").unwrap();
        collector.record_update("contact-form").unwrap();
        collector.record_update("contact-form").unwrap();
        clock.set(1010.0);

        let summary = collector.unmount("contact-form").unwrap();
        assert_eq!(summary.duration_ms, 1000.0);
        assert_eq!(summary.render_count, 1);
        assert_eq!(summary.update_count, 2);
        assert!(!collector.is_collecting("contact-form"));
    }

    #[test]
    fn test_slow_first_render_warns() {
        let (mut collector, _, clock) = collector_with_clock();
        collector.mount("gallery").unwrap();
        clock.set(250.0);
        let warnings = warnings_during(|| collector.record_render("gallery").unwrap());
        assert_eq!(warnings, vec!["slow first render".to_string()]);

        // Only the first render is checked
        clock.set(900.0);
        let warnings = warnings_during(|| collector.record_render("gallery").unwrap());
        assert!(warnings.is_empty());

        let rec = collector.snapshot("gallery").unwrap();
        assert_eq!(rec.render_count, 2);
        assert_eq!(rec.mounted_at, 0.0);
    }

    #[test]
    fn test_fast_first_render_is_quiet() {
        let (mut collector, _, clock) = collector_with_clock();
        collector.mount("hero").unwrap();
        clock.set(50.0);
        let warnings = warnings_during(|| collector.record_render("hero").unwrap());
        assert!(warnings.is_empty(), "{:?}", warnings);
    }

    #[test]
    fn test_slow_render_threshold_from_config() {
        let (collector, _, clock) = collector_with_clock();
        let config = CollectorConfig {
            slow_render_threshold_ms: 300,
            ..Default::default()
        };
        let mut collector = collector.with_config(config);
        collector.mount("grid").unwrap();
        clock.set(250.0);
        let warnings = warnings_during(|| collector.record_render("grid").unwrap());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_page_hide_freezes_lcp() {
        let (mut collector, timeline, _) = collector_with_clock();
        collector.mount("page").unwrap();
        timeline.emit(PerformanceEntry::lcp(800.0, 1000.0));
        collector.page_hide();
        timeline.emit(PerformanceEntry::lcp(1600.0, 50_000.0));

        assert_eq!(collector.snapshot("page").unwrap().lcp, Some(800.0));
    }

    #[test]
    fn test_mount_time_on_timeline_base() {
        let timeline = PerformanceTimeline::new();
        std::thread::sleep(Duration::from_millis(30));
        let before_mount = timeline.now();
        std::thread::sleep(Duration::from_millis(10));

        let mut collector = VitalsCollector::new(MetricsRegistry::new(), timeline.clone());
        collector.mount("portfolio").unwrap();
        assert!(collector.snapshot("portfolio").unwrap().mounted_at > before_mount);

        timeline.emit(PerformanceEntry::resource("/early.js", before_mount, 4_000));
        assert_eq!(collector.snapshot("portfolio").unwrap().resource_count, None);

        timeline.emit(PerformanceEntry::resource("/grid.webp", timeline.now(), 9_000));
        let rec = collector.snapshot("portfolio").unwrap();
        assert_eq!(rec.resource_count, Some(1));
        assert_eq!(rec.resource_bytes, Some(9_000));
    }

    #[test]
    fn test_unmount_reports_to_sink() {
        let sink = BufferSink::new();
        let (collector, timeline, _) = collector_with_clock();
        let mut collector = collector.with_sink(Box::new(sink.clone()));
        collector.mount("hero").unwrap();
        timeline.emit(PerformanceEntry::first_contentful_paint(300.0));
        collector.unmount("hero").unwrap();

        let reported = sink.records();
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].fcp, Some(300.0));
    }

    #[test]
    fn test_failed_report_is_not_fatal() {
        let config = CollectorConfig {
            report_endpoint: Some("http://127.0.0.1:9/vitals".into()),
            report_timeout_ms: 500,
            ..Default::default()
        };
        let mut collector =
            VitalsCollector::from_config(MetricsRegistry::new(), PerformanceTimeline::new(), config).unwrap();
        collector.mount("hero").unwrap();
        assert!(collector.unmount("hero").is_some());
    }

    #[test]
    fn test_unmount_does_not_wait_for_report() {
        // Accepts connections and never answers
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let mut held = Vec::new();
            for stream in listener.incoming().flatten() {
                held.push(stream);
            }
        });

        let config = CollectorConfig {
            report_endpoint: Some(format!("http://{}/vitals", addr)),
            report_timeout_ms: 5_000,
            ..Default::default()
        };
        let mut collector =
            VitalsCollector::from_config(MetricsRegistry::new(), PerformanceTimeline::new(), config).unwrap();
        collector.mount("hero").unwrap();

        let started = Instant::now();
        assert!(collector.unmount("hero").is_some());
        assert!(started.elapsed() < Duration::from_millis(500), "{:?}", started.elapsed());
    }

    #[test]
    fn test_drop_releases_records() {
        let registry = MetricsRegistry::new();
        let timeline = PerformanceTimeline::new();
        {
            let mut collector = VitalsCollector::new(registry.clone(), timeline.clone());
            collector.mount("a").unwrap();
            collector.mount("b").unwrap();
            assert_eq!(registry.len(), 2);
        }
        assert!(registry.is_empty());
        assert_eq!(timeline.subscriber_count(), 0);
    }
}
