//! End-to-end frame-protocol scenarios against a simulated host.

use viewslice_engine::{EngineConfig, ViewportInset};
use viewslice_harness::SimulatedHost;
use web_time::{Duration, Instant};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn host(assumed: f64, viewport_extent: f64) -> SimulatedHost {
    init_tracing();
    let config = EngineConfig::default()
        .with_assumed_item_height(assumed)
        .with_offscreen_ratio(0.0)
        .with_scroll_throttle(Duration::ZERO);
    SimulatedHost::new(config, viewport_extent)
}

#[test]
fn scroll_to_index_lands_on_the_item_top() {
    let mut host = host(50.0, 200.0);
    host.load_items(100);
    host.run_until_quiet(4);

    host.user_scrolls_to(120.0);
    host.run_until_quiet(4);

    host.engine_mut().scroll_to(10);
    host.run_until_quiet(4);

    // Correction is the distance from the old viewport top to item 10's top.
    assert_eq!(host.scroller().deltas(), &[10.0 * 50.0 - 120.0]);
    assert_eq!(host.scroll_top(), 500.0);
    assert!(host.engine().slice().unwrap().contains(10));
}

#[test]
fn scroll_session_keeps_blank_space_honest() {
    let mut host = host(50.0, 400.0);
    host.load_items(200);
    host.run_until_quiet(4);

    for top in [0.0, 250.0, 1337.5, 4000.0, 9600.0] {
        host.user_scrolls_to(top);
        for snapshot in host.run_until_quiet(4) {
            let sum =
                snapshot.blank_above + snapshot.rendered_extent() + snapshot.blank_below;
            assert!((sum - snapshot.total_extent).abs() < 1e-9);
            assert!(!snapshot.slice.is_empty());
        }
    }
}

#[test]
fn appending_items_does_not_move_the_viewport() {
    let mut host = host(50.0, 400.0);
    host.load_items(100);
    host.run_until_quiet(4);

    host.user_scrolls_to(2000.0);
    host.run_until_quiet(4);
    let before = host.engine().slice().unwrap();

    // New items arrive below the fold, as in an infinite feed.
    host.engine_mut().set_items(0..130);
    host.run_until_quiet(4);

    assert!(host.scroller().deltas().is_empty());
    assert_eq!(host.scroll_top(), 2000.0);
    assert_eq!(host.engine().slice().unwrap().start, before.start);
}

#[test]
fn late_measurements_above_keep_the_anchor_item_fixed() {
    let mut host = host(100.0, 400.0);
    host.load_items(50);
    host.run_until_quiet(4);

    host.user_scrolls_to(2000.0);
    host.run_until_quiet(4);
    let anchor = host.engine().slice().unwrap().start;
    let gap_before = host.engine().insets().anchor_offset(anchor) - host.scroll_top();

    // Items far above the window turn out much taller than assumed.
    host.measure([(0, 250.0), (1, 400.0), (2, 180.0)]);
    host.run_until_quiet(4);

    let gap_after = host.engine().insets().anchor_offset(anchor) - host.scroll_top();
    assert!((gap_before - gap_after).abs() < 1e-9);
    assert_eq!(host.scroller().total(), 150.0 + 300.0 + 80.0);
}

#[test]
fn measurements_below_the_window_issue_no_correction() {
    let mut host = host(100.0, 400.0);
    host.load_items(50);
    host.run_until_quiet(4);

    host.measure([(40, 900.0), (45, 12.5)]);
    host.run_until_quiet(4);

    assert!(host.scroller().deltas().is_empty());
    assert_eq!(host.scroll_top(), 0.0);
}

#[test]
fn scroll_bursts_coalesce_under_the_throttle() {
    init_tracing();
    let config = EngineConfig::default()
        .with_assumed_item_height(50.0)
        .with_offscreen_ratio(0.0)
        .with_scroll_throttle(Duration::from_millis(100));
    let mut host = SimulatedHost::new(config, 400.0);
    host.load_items(500);
    host.run_until_quiet(4);

    // A burst of wheel events inside one throttle window.
    for step in 1..=10 {
        host.user_scrolls_to(step as f64 * 30.0);
        host.advance(Duration::from_millis(5));
    }
    host.run_until_quiet(4);
    let stats = host.engine().stats();
    assert!(stats.coalesced_scroll_events >= 8);

    // The trailing recompute fires once the interval elapses, over the
    // latest scroll position.
    host.advance(Duration::from_millis(100));
    let snapshots = host.run_until_quiet(4);
    assert!(!snapshots.is_empty());
    let slice = host.engine().slice().unwrap();
    assert!(slice.contains(6)); // item at top 300
}

#[test]
fn replacing_the_feed_rebuilds_from_the_initial_index() {
    init_tracing();
    let config = EngineConfig::default()
        .with_assumed_item_height(50.0)
        .with_offscreen_ratio(0.0)
        .with_scroll_throttle(Duration::ZERO)
        .with_initial_item_index(5);
    let mut host = SimulatedHost::new(config, 200.0);
    host.load_items(100);
    host.run_until_quiet(4);
    assert_eq!(host.engine().slice().unwrap().start, 5);

    host.user_scrolls_to(3000.0);
    host.run_until_quiet(4);

    // Entirely different ids: the old window is meaningless.
    host.engine_mut().set_items(1000..1100);
    host.run_until_quiet(4);
    assert_eq!(host.engine().slice().unwrap().start, 5);
}

#[test]
fn disposed_engine_goes_quiet_forever() {
    let mut host = host(50.0, 200.0);
    host.load_items(100);
    host.run_until_quiet(4);

    host.engine_mut().dispose();
    host.user_scrolls_to(700.0);
    host.measure([(0, 999.0)]);
    host.engine_mut().scroll_to(42);

    assert!(host.run_frame().is_none());
    assert!(host.engine().is_disposed());
    assert!(!host.engine().needs_frame(Instant::now()));
}

#[test]
fn offscreen_buffer_widens_the_materialized_window() {
    init_tracing();
    let config = EngineConfig::default()
        .with_assumed_item_height(100.0)
        .with_offscreen_ratio(1.0)
        .with_scroll_throttle(Duration::ZERO);
    let mut host = SimulatedHost::new(config, 800.0);
    host.load_items(50);
    host.run_until_quiet(4);

    host.user_scrolls_to(1000.0);
    host.run_until_quiet(4);

    // Viewport [1000, 1800) widened by 800 each side -> [200, 2600).
    let slice = host.engine().slice().unwrap();
    assert_eq!(slice.start, 2);
    assert_eq!(slice.end, 26);
    let snapshot_viewport = ViewportInset::new(1000.0, 1800.0);
    assert_eq!(host.viewport(), snapshot_viewport);
}
