//! Signal sources
//!
//! Capability negotiation for performance observers. A host declares which
//! signal kinds it supports; asking the timeline for an unsupported kind
//! yields a `NoopSource`, so callers subscribe the same way either way.
//!
//! The timeline also owns the time origin. Entry timestamps and anything a
//! collector stamps with `timeline.clock()` share one base.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{Clock, MonotonicClock, PerformanceEntry, SignalKind};

/// Callback receiving entries for one subscription
pub type EntrySink = Box<dyn FnMut(&PerformanceEntry) + Send>;

/// One observable signal class
pub trait SignalSource: Send + fmt::Debug {
    fn kind(&self) -> SignalKind;

    fn supported(&self) -> bool;

    /// Start delivering entries to `sink`, replacing any previous sink
    fn subscribe(&mut self, sink: EntrySink);

    /// Stop delivery. Returns once no further entry can reach the sink.
    fn unsubscribe(&mut self);
}

/// Stand-in for a signal the host does not expose
#[derive(Debug, Clone, Copy)]
pub struct NoopSource {
    kind: SignalKind,
}

impl NoopSource {
    pub fn new(kind: SignalKind) -> Self {
        Self { kind }
    }
}

impl SignalSource for NoopSource {
    fn kind(&self) -> SignalKind {
        self.kind
    }

    fn supported(&self) -> bool {
        false
    }

    fn subscribe(&mut self, _sink: EntrySink) {}

    fn unsubscribe(&mut self) {}
}

struct Subscriber {
    id: u64,
    kind: SignalKind,
    sink: EntrySink,
}

struct TimelineInner {
    supported: HashSet<SignalKind>,
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

/// Host-side entry bus
///
/// Entries are delivered synchronously, in `emit` order, to every current
/// subscriber of the entry's kind. Sinks must not call back into the
/// timeline.
#[derive(Clone)]
pub struct PerformanceTimeline {
    inner: Arc<Mutex<TimelineInner>>,
    clock: Arc<dyn Clock>,
}

impl PerformanceTimeline {
    /// Timeline supporting every signal kind
    pub fn new() -> Self {
        Self::with_support(SignalKind::ALL)
    }

    /// Timeline supporting only `kinds`; its time origin is now
    pub fn with_support(kinds: impl IntoIterator<Item = SignalKind>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TimelineInner {
                supported: kinds.into_iter().collect(),
                subscribers: Vec::new(),
                next_id: 1,
            })),
            clock: Arc::new(MonotonicClock::new()),
        }
    }

    /// Use the host's clock as the time origin
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Milliseconds since the timeline's origin
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    fn lock(&self) -> MutexGuard<'_, TimelineInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn supports(&self, kind: SignalKind) -> bool {
        self.lock().supported.contains(&kind)
    }

    /// Source for `kind`: live when supported, no-op otherwise
    pub fn negotiate(&self, kind: SignalKind) -> Box<dyn SignalSource> {
        if self.supports(kind) {
            Box::new(TimelineSource {
                kind,
                timeline: self.clone(),
                subscription: None,
            })
        } else {
            Box::new(NoopSource::new(kind))
        }
    }

    /// Deliver an entry; returns the number of sinks that received it
    pub fn emit(&self, entry: PerformanceEntry) -> usize {
        let kind = entry.kind();
        let mut inner = self.lock();
        if !inner.supported.contains(&kind) {
            return 0;
        }
        let mut delivered = 0;
        for sub in inner.subscribers.iter_mut().filter(|s| s.kind == kind) {
            (sub.sink)(&entry);
            delivered += 1;
        }
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    fn subscribe(&self, kind: SignalKind, sink: EntrySink) -> u64 {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push(Subscriber { id, kind, sink });
        id
    }

    fn unsubscribe(&self, id: u64) {
        self.lock().subscribers.retain(|s| s.id != id);
    }
}

impl Default for PerformanceTimeline {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PerformanceTimeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("PerformanceTimeline")
            .field("supported", &inner.supported)
            .field("subscribers", &inner.subscribers.len())
            .field("clock", &self.clock)
            .finish()
    }
}

/// Live subscription to one kind on a `PerformanceTimeline`
#[derive(Debug)]
pub struct TimelineSource {
    kind: SignalKind,
    timeline: PerformanceTimeline,
    subscription: Option<u64>,
}

impl SignalSource for TimelineSource {
    fn kind(&self) -> SignalKind {
        self.kind
    }

    fn supported(&self) -> bool {
        true
    }

    fn subscribe(&mut self, sink: EntrySink) {
        self.unsubscribe();
        self.subscription = Some(self.timeline.subscribe(self.kind, sink));
    }

    fn unsubscribe(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.timeline.unsubscribe(id);
        }
    }
}

impl Drop for TimelineSource {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
