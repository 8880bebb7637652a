//! Metrics record
//!
//! One record per mounted subject. Optional values stay `None` until their
//! signal has been observed; a measured zero is `Some(0.0)`.

use serde::{Deserialize, Serialize};

use crate::entry::FIRST_CONTENTFUL_PAINT;
use crate::PerformanceEntry;

/// Per-subject metrics, updated in place as entries arrive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRecord {
    pub subject: String,
    pub mounted_at: f64,
    pub last_updated: f64,
    pub render_count: u32,
    pub update_count: u32,
    pub fcp: Option<f64>,
    pub lcp: Option<f64>,
    pub fid: Option<f64>,
    pub cls: Option<f64>,
    pub ttfb: Option<f64>,
    pub dom_load: Option<f64>,
    pub window_load: Option<f64>,
    pub resource_count: Option<u32>,
    pub resource_bytes: Option<u64>,
    pub js_heap_used: Option<u64>,
    #[serde(skip)]
    lcp_size: Option<f64>,
    #[serde(skip)]
    lcp_final: bool,
}

impl MetricsRecord {
    pub fn new(subject: &str, now: f64) -> Self {
        Self {
            subject: subject.to_string(),
            mounted_at: now,
            last_updated: now,
            render_count: 0,
            update_count: 0,
            fcp: None,
            lcp: None,
            fid: None,
            cls: None,
            ttfb: None,
            dom_load: None,
            window_load: None,
            resource_count: None,
            resource_bytes: None,
            js_heap_used: None,
            lcp_size: None,
            lcp_final: false,
        }
    }

    /// Fold one entry into the record
    ///
    /// Returns `true` if any field changed.
    pub fn apply(&mut self, entry: &PerformanceEntry, now: f64) -> bool {
        let changed = match entry {
            PerformanceEntry::Paint { name, start_time } => {
                if name == FIRST_CONTENTFUL_PAINT && self.fcp.is_none() {
                    self.fcp = Some(*start_time);
                    true
                } else {
                    false
                }
            }
            PerformanceEntry::LargestContentfulPaint { start_time, size } => {
                let larger = self.lcp_size.map_or(true, |seen| *size > seen);
                if !self.lcp_final && larger {
                    self.lcp = Some(*start_time);
                    self.lcp_size = Some(*size);
                    true
                } else {
                    false
                }
            }
            PerformanceEntry::LayoutShift { value, had_recent_input, .. } => {
                // Shifts right after user input are expected, not instability
                if *had_recent_input {
                    false
                } else {
                    self.cls = Some(self.cls.unwrap_or(0.0) + value);
                    true
                }
            }
            PerformanceEntry::FirstInput { start_time, processing_start, .. } => {
                if self.fid.is_none() {
                    self.fid = Some((processing_start - start_time).max(0.0));
                    true
                } else {
                    false
                }
            }
            PerformanceEntry::Navigation(nav) => {
                let mut changed = false;
                if nav.response_start > 0.0 {
                    self.ttfb = Some((nav.response_start - nav.request_start).max(0.0));
                    changed = true;
                }
                if nav.dom_content_loaded_event_end > 0.0 {
                    self.dom_load = Some(nav.dom_content_loaded_event_end - nav.fetch_start);
                    changed = true;
                }
                if nav.load_event_end > 0.0 {
                    self.window_load = Some(nav.load_event_end - nav.fetch_start);
                    changed = true;
                }
                changed
            }
            PerformanceEntry::Resource { start_time, transfer_size, .. } => {
                if *start_time >= self.mounted_at {
                    self.resource_count = Some(self.resource_count.unwrap_or(0) + 1);
                    self.resource_bytes = Some(self.resource_bytes.unwrap_or(0) + transfer_size);
                    true
                } else {
                    false
                }
            }
            PerformanceEntry::Memory { used_js_heap_size } => {
                self.js_heap_used = Some(*used_js_heap_size);
                true
            }
        };
        if changed {
            self.last_updated = now;
        }
        changed
    }

    /// Stop accepting LCP candidates (unmount or page hide)
    pub fn freeze_lcp(&mut self) {
        self.lcp_final = true;
    }

    pub fn is_lcp_final(&self) -> bool {
        self.lcp_final
    }

    /// Core vitals keyed by their threshold-table names
    pub fn vitals(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("fcp", self.fcp),
            ("lcp", self.lcp),
            ("fid", self.fid),
            ("cls", self.cls),
            ("ttfb", self.ttfb),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NavigationTiming;

    #[test]
    fn test_new_record_all_unmeasured() {
        let rec = MetricsRecord::new("hero", 0.0);
        assert!(rec.vitals().iter().all(|(_, v)| v.is_none()));
        assert!(rec.resource_count.is_none());
        assert!(rec.js_heap_used.is_none());
    }

    #[test]
    fn test_fcp_first_only() {
        let mut rec = MetricsRecord::new("page", 0.0);
        assert!(rec.apply(&PerformanceEntry::paint("first-paint", 50.0), 1.0));
        assert!(rec.fcp.is_none());
        rec.apply(&PerformanceEntry::first_contentful_paint(120.0), 2.0);
        rec.apply(&PerformanceEntry::first_contentful_paint(300.0), 3.0);
        assert_eq!(rec.fcp, Some(120.0));
    }

    #[test]
    fn test_lcp_keeps_largest() {
        let mut rec = MetricsRecord::new("page", 0.0);
        rec.apply(&PerformanceEntry::lcp(100.0, 500.0), 1.0);
        rec.apply(&PerformanceEntry::lcp(200.0, 2000.0), 2.0);
        rec.apply(&PerformanceEntry::lcp(300.0, 800.0), 3.0);
        assert_eq!(rec.lcp, Some(200.0));

        rec.freeze_lcp();
        rec.apply(&PerformanceEntry::lcp(400.0, 9000.0), 4.0);
        assert_eq!(rec.lcp, Some(200.0));
    }

    #[test]
    fn test_cls_excludes_input_shifts() {
        let mut rec = MetricsRecord::new("page", 0.0);
        assert!(!rec.apply(&PerformanceEntry::layout_shift(10.0, 0.5, true), 1.0));
        assert!(rec.cls.is_none());

        rec.apply(&PerformanceEntry::layout_shift(20.0, 0.05, false), 2.0);
        rec.apply(&PerformanceEntry::layout_shift(30.0, 0.5, true), 3.0);
        rec.apply(&PerformanceEntry::layout_shift(40.0, 0.02, false), 4.0);
        assert!((rec.cls.unwrap() - 0.07).abs() < 1e-9);
    }

    #[test]
    fn test_zero_shift_is_measured() {
        let mut rec = MetricsRecord::new("page", 0.0);
        rec.apply(&PerformanceEntry::layout_shift(20.0, 0.0, false), 2.0);
        assert_eq!(rec.cls, Some(0.0));
    }

    #[test]
    fn test_fid_first_input_only() {
        let mut rec = MetricsRecord::new("page", 0.0);
        rec.apply(&PerformanceEntry::first_input("click", 1000.0, 1012.0), 1.0);
        rec.apply(&PerformanceEntry::first_input("keydown", 2000.0, 2300.0), 2.0);
        assert_eq!(rec.fid, Some(12.0));
    }

    #[test]
    fn test_navigation_partial() {
        let mut rec = MetricsRecord::new("page", 0.0);
        let nav = NavigationTiming {
            fetch_start: 5.0,
            request_start: 20.0,
            response_start: 180.0,
            dom_content_loaded_event_end: 900.0,
            load_event_end: 0.0,
        };
        rec.apply(&PerformanceEntry::Navigation(nav), 1.0);
        assert_eq!(rec.ttfb, Some(160.0));
        assert_eq!(rec.dom_load, Some(895.0));
        assert!(rec.window_load.is_none());
    }

    #[test]
    fn test_navigation_before_response() {
        let mut rec = MetricsRecord::new("page", 0.0);
        let nav = NavigationTiming {
            fetch_start: 5.0,
            request_start: 10.0,
            response_start: 0.0,
            dom_content_loaded_event_end: 0.0,
            load_event_end: 0.0,
        };
        assert!(!rec.apply(&PerformanceEntry::Navigation(nav.clone()), 1.0));
        assert!(rec.ttfb.is_none());
        assert!(rec.dom_load.is_none());
        assert_eq!(rec.last_updated, 0.0);

        let nav = NavigationTiming {
            response_start: 95.0,
            ..nav
        };
        assert!(rec.apply(&PerformanceEntry::Navigation(nav), 2.0));
        assert_eq!(rec.ttfb, Some(85.0));
    }

    #[test]
    fn test_resources_since_mount() {
        let mut rec = MetricsRecord::new("gallery", 100.0);
        rec.apply(&PerformanceEntry::resource("/early.js", 50.0, 4000), 101.0);
        assert!(rec.resource_count.is_none());

        rec.apply(&PerformanceEntry::resource("/a.png", 120.0, 1000), 121.0);
        rec.apply(&PerformanceEntry::resource("/b.png", 130.0, 2500), 131.0);
        assert_eq!(rec.resource_count, Some(2));
        assert_eq!(rec.resource_bytes, Some(3500));
    }

    #[test]
    fn test_memory_overwrites() {
        let mut rec = MetricsRecord::new("page", 0.0);
        rec.apply(&PerformanceEntry::memory(10_000), 1.0);
        rec.apply(&PerformanceEntry::memory(8_000), 2.0);
        assert_eq!(rec.js_heap_used, Some(8_000));
        assert_eq!(rec.last_updated, 2.0);
    }

    #[test]
    fn test_serializes_null_for_unmeasured() {
        let mut rec = MetricsRecord::new("page", 0.0);
        rec.apply(&PerformanceEntry::layout_shift(1.0, 0.0, false), 1.0);
        let json = serde_json::to_value(&rec).unwrap();
        assert!(json["lcp"].is_null());
        assert_eq!(json["cls"], 0.0);
        assert!(json["jsHeapUsed"].is_null());
        assert_eq!(json["renderCount"], 0);
    }
}
