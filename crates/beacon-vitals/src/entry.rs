//! Performance entries
//!
//! The shapes a host delivers for each observed signal class.

/// Signal class a source can observe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Paint,
    LargestContentfulPaint,
    LayoutShift,
    FirstInput,
    Navigation,
    Resource,
    Memory,
}

impl SignalKind {
    pub const ALL: [SignalKind; 7] = [
        SignalKind::Paint,
        SignalKind::LargestContentfulPaint,
        SignalKind::LayoutShift,
        SignalKind::FirstInput,
        SignalKind::Navigation,
        SignalKind::Resource,
        SignalKind::Memory,
    ];

    /// PerformanceObserver entry type name
    pub fn entry_type(&self) -> &'static str {
        match self {
            SignalKind::Paint => "paint",
            SignalKind::LargestContentfulPaint => "largest-contentful-paint",
            SignalKind::LayoutShift => "layout-shift",
            SignalKind::FirstInput => "first-input",
            SignalKind::Navigation => "navigation",
            SignalKind::Resource => "resource",
            SignalKind::Memory => "memory",
        }
    }
}

/// Paint entry name that carries FCP
pub const FIRST_CONTENTFUL_PAINT: &str = "first-contentful-paint";

/// Navigation timing markers (ms since time origin, 0 = not reached)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationTiming {
    pub fetch_start: f64,
    pub request_start: f64,
    pub response_start: f64,
    pub dom_content_loaded_event_end: f64,
    pub load_event_end: f64,
}

/// One observed entry
#[derive(Debug, Clone, PartialEq)]
pub enum PerformanceEntry {
    Paint { name: String, start_time: f64 },
    LargestContentfulPaint { start_time: f64, size: f64 },
    LayoutShift { start_time: f64, value: f64, had_recent_input: bool },
    FirstInput { name: String, start_time: f64, processing_start: f64 },
    Navigation(NavigationTiming),
    Resource { name: String, start_time: f64, transfer_size: u64 },
    Memory { used_js_heap_size: u64 },
}

impl PerformanceEntry {
    pub fn kind(&self) -> SignalKind {
        match self {
            PerformanceEntry::Paint { .. } => SignalKind::Paint,
            PerformanceEntry::LargestContentfulPaint { .. } => SignalKind::LargestContentfulPaint,
            PerformanceEntry::LayoutShift { .. } => SignalKind::LayoutShift,
            PerformanceEntry::FirstInput { .. } => SignalKind::FirstInput,
            PerformanceEntry::Navigation(_) => SignalKind::Navigation,
            PerformanceEntry::Resource { .. } => SignalKind::Resource,
            PerformanceEntry::Memory { .. } => SignalKind::Memory,
        }
    }

    pub fn paint(name: &str, start_time: f64) -> Self {
        Self::Paint { name: name.to_string(), start_time }
    }

    pub fn first_contentful_paint(start_time: f64) -> Self {
        Self::paint(FIRST_CONTENTFUL_PAINT, start_time)
    }

    pub fn lcp(start_time: f64, size: f64) -> Self {
        Self::LargestContentfulPaint { start_time, size }
    }

    pub fn layout_shift(start_time: f64, value: f64, had_recent_input: bool) -> Self {
        Self::LayoutShift { start_time, value, had_recent_input }
    }

    pub fn first_input(name: &str, start_time: f64, processing_start: f64) -> Self {
        Self::FirstInput {
            name: name.to_string(),
            start_time,
            processing_start,
        }
    }

    pub fn resource(name: &str, start_time: f64, transfer_size: u64) -> Self {
        Self::Resource {
            name: name.to_string(),
            start_time,
            transfer_size,
        }
    }

    pub fn memory(used_js_heap_size: u64) -> Self {
        Self::Memory { used_js_heap_size }
    }
}
