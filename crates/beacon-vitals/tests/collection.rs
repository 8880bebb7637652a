//! End-to-end collection tests
//!
//! Drives a `PerformanceTimeline` the way a browser would and checks what
//! lands in the registry.

use std::sync::Arc;

use beacon_vitals::*;

/// Collector on a timeline whose origin is a manual clock at 0
fn setup(timeline: PerformanceTimeline) -> (VitalsCollector, PerformanceTimeline, MetricsRegistry, ManualClock) {
    let registry = MetricsRegistry::new();
    let clock = ManualClock::new(0.0);
    let timeline = timeline.with_clock(Arc::new(clock.clone()));
    let collector = VitalsCollector::new(registry.clone(), timeline.clone());
    (collector, timeline, registry, clock)
}

fn full_page_load(timeline: &PerformanceTimeline) {
    timeline.emit(PerformanceEntry::Navigation(NavigationTiming {
        fetch_start: 2.0,
        request_start: 10.0,
        response_start: 130.0,
        dom_content_loaded_event_end: 700.0,
        load_event_end: 1200.0,
    }));
    timeline.emit(PerformanceEntry::first_contentful_paint(450.0));
    timeline.emit(PerformanceEntry::lcp(450.0, 1200.0));
    timeline.emit(PerformanceEntry::lcp(900.0, 64_000.0));
    timeline.emit(PerformanceEntry::resource("/app.js", 20.0, 120_000));
    timeline.emit(PerformanceEntry::resource("/hero.webp", 30.0, 80_000));
    timeline.emit(PerformanceEntry::layout_shift(1000.0, 0.04, false));
    timeline.emit(PerformanceEntry::first_input("click", 2000.0, 2035.0));
    timeline.emit(PerformanceEntry::memory(12_000_000));
}

// ============================================================================
// NULL UNTIL OBSERVED
// ============================================================================

#[test]
fn test_fields_null_until_signal_fires() {
    let (mut collector, timeline, _, _) = setup(PerformanceTimeline::new());
    collector.mount("page").unwrap();

    let rec = collector.snapshot("page").unwrap();
    assert_eq!(rec.fcp, None);
    assert_eq!(rec.lcp, None);
    assert_eq!(rec.fid, None);
    assert_eq!(rec.cls, None);
    assert_eq!(rec.ttfb, None);
    assert_eq!(rec.dom_load, None);
    assert_eq!(rec.window_load, None);
    assert_eq!(rec.resource_count, None);
    assert_eq!(rec.resource_bytes, None);
    assert_eq!(rec.js_heap_used, None);

    timeline.emit(PerformanceEntry::first_contentful_paint(0.0));
    let rec = collector.snapshot("page").unwrap();
    assert_eq!(rec.fcp, Some(0.0));
    assert_eq!(rec.lcp, None);
}

#[test]
fn test_full_page_load() {
    let (mut collector, timeline, _, _) = setup(PerformanceTimeline::new());
    collector.mount("page").unwrap();
    full_page_load(&timeline);

    let rec = collector.snapshot("page").unwrap();
    assert_eq!(rec.ttfb, Some(120.0));
    assert_eq!(rec.dom_load, Some(698.0));
    assert_eq!(rec.window_load, Some(1198.0));
    assert_eq!(rec.fcp, Some(450.0));
    assert_eq!(rec.lcp, Some(900.0));
    assert_eq!(rec.resource_count, Some(2));
    assert_eq!(rec.resource_bytes, Some(200_000));
    assert_eq!(rec.cls, Some(0.04));
    assert_eq!(rec.fid, Some(35.0));
    assert_eq!(rec.js_heap_used, Some(12_000_000));
}

// ============================================================================
// CAPABILITY NEGOTIATION
// ============================================================================

#[test]
fn test_missing_signals_do_not_block_others() {
    let supported = [SignalKind::Paint, SignalKind::Resource];
    let (mut collector, timeline, _, _) = setup(PerformanceTimeline::with_support(supported));
    collector.mount("page").unwrap();
    full_page_load(&timeline);

    let rec = collector.snapshot("page").unwrap();
    assert_eq!(rec.fcp, Some(450.0));
    assert_eq!(rec.resource_count, Some(2));
    assert_eq!(rec.lcp, None);
    assert_eq!(rec.cls, None);
    assert_eq!(rec.js_heap_used, None);
}

#[test]
fn test_no_support_at_all() {
    let (mut collector, timeline, _, _) = setup(PerformanceTimeline::with_support(Vec::<SignalKind>::new()));
    collector.mount("page").unwrap();
    full_page_load(&timeline);

    assert_eq!(timeline.subscriber_count(), 0);
    let summary = collector.unmount("page").unwrap();
    assert!(summary.record.vitals().iter().all(|(_, v)| v.is_none()));
}

// ============================================================================
// UNMOUNT / FINALIZATION
// ============================================================================

#[test]
fn test_unmount_removes_record_and_detaches() {
    let (mut collector, timeline, registry, _) = setup(PerformanceTimeline::new());
    collector.mount("hero").unwrap();
    assert_eq!(timeline.subscriber_count(), SignalKind::ALL.len());

    let summary = collector.unmount("hero").unwrap();
    assert!(!registry.contains("hero"));
    assert_eq!(timeline.subscriber_count(), 0);

    // Late deliveries reach nobody and never resurrect the record
    assert_eq!(timeline.emit(PerformanceEntry::memory(1)), 0);
    assert!(collector.snapshot("hero").is_none());
    assert_eq!(summary.record.js_heap_used, None);
    assert!(collector.unmount("hero").is_none());
}

#[test]
fn test_remount_starts_fresh() {
    let (mut collector, timeline, registry, _) = setup(PerformanceTimeline::new());
    collector.mount("modal").unwrap();
    timeline.emit(PerformanceEntry::memory(500));
    collector.unmount("modal").unwrap();

    collector.mount("modal").unwrap();
    assert_eq!(collector.snapshot("modal").unwrap().js_heap_used, None);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_subjects_isolated() {
    let (mut collector, timeline, registry, clock) = setup(PerformanceTimeline::new());
    collector.mount("header").unwrap();
    clock.set(500.0);
    collector.mount("portfolio").unwrap();

    // Starts before "portfolio" mounted: counted only for "header"
    timeline.emit(PerformanceEntry::resource("/logo.svg", 100.0, 900));
    timeline.emit(PerformanceEntry::resource("/grid.webp", 600.0, 40_000));

    assert_eq!(registry.get("header").unwrap().resource_count, Some(2));
    assert_eq!(registry.get("portfolio").unwrap().resource_count, Some(1));

    collector.unmount("header").unwrap();
    assert!(registry.contains("portfolio"));
    assert_eq!(timeline.subscriber_count(), SignalKind::ALL.len());
}

#[test]
fn test_summary_serializes() {
    let (mut collector, timeline, _, clock) = setup(PerformanceTimeline::new());
    collector.mount("page").unwrap();
    clock.set(20.0);
    collector.record_render("page").unwrap();
    clock.set(3000.0);

    let summary = collector.unmount("page").unwrap();
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["subject"], "page");
    assert_eq!(json["durationMs"], 3000.0);
    assert_eq!(json["renderCount"], 1);
    assert!(json["record"]["fcp"].is_null());
}
