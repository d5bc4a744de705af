// Degradation detector: dual predicate, boundaries, skip behavior

mod common;

use common::{record, snapshot};
use ifdrift::detector::find_degraded_interfaces;

#[test]
fn counter_increase_above_threshold_is_degraded() {
    let old = snapshot("LAB", "d1", vec![("SW1", vec![("Eth1", record("", 10, 0, 0))])]);
    let new = snapshot("LAB", "d2", vec![("SW1", vec![("Eth1", record("", 600, 0, 0))])]);

    let degraded = find_degraded_interfaces(&old, &new, 500);
    let stats = &degraded["SW1"]["Eth1"];
    assert_eq!(stats["in_errors"].old, 10);
    assert_eq!(stats["in_errors"].new, 600);
}

#[test]
fn equal_counters_are_never_degraded() {
    let old = snapshot("LAB", "d1", vec![("SW1", vec![("Eth1", record("", 600, 0, 0))])]);
    let new = snapshot("LAB", "d2", vec![("SW1", vec![("Eth1", record("", 600, 0, 0))])]);
    assert!(find_degraded_interfaces(&old, &new, 0).is_empty());
}

#[test]
fn counter_equal_to_threshold_is_not_degraded() {
    // Strict inequality: new == threshold never qualifies.
    let old = snapshot("LAB", "d1", vec![("SW1", vec![("Eth1", record("", 10, 0, 0))])]);
    let new = snapshot("LAB", "d2", vec![("SW1", vec![("Eth1", record("", 500, 0, 0))])]);
    assert!(find_degraded_interfaces(&old, &new, 500).is_empty());
}

#[test]
fn large_but_stable_counter_is_not_degraded() {
    // Above threshold but not increased: the historical-noise case the dual
    // predicate exists for.
    let old = snapshot("LAB", "d1", vec![("SW1", vec![("Eth1", record("", 9000, 0, 0))])]);
    let new = snapshot("LAB", "d2", vec![("SW1", vec![("Eth1", record("", 9000, 0, 0))])]);
    assert!(find_degraded_interfaces(&old, &new, 500).is_empty());
}

#[test]
fn increase_below_threshold_is_not_degraded() {
    let old = snapshot("LAB", "d1", vec![("SW1", vec![("Eth1", record("", 1, 0, 0))])]);
    let new = snapshot("LAB", "d2", vec![("SW1", vec![("Eth1", record("", 400, 0, 0))])]);
    assert!(find_degraded_interfaces(&old, &new, 500).is_empty());
}

#[test]
fn one_bad_counter_promotes_all_tracked_counters() {
    let old = snapshot("LAB", "d1", vec![("SW1", vec![("Eth1", record("", 10, 7, 3))])]);
    let new = snapshot("LAB", "d2", vec![("SW1", vec![("Eth1", record("", 600, 7, 3))])]);

    let degraded = find_degraded_interfaces(&old, &new, 500);
    let stats = &degraded["SW1"]["Eth1"];
    assert_eq!(stats.len(), 3);
    assert_eq!(stats["in_errors"].new, 600);
    // Untouched counters still carry their old/new pairs.
    assert_eq!(stats["in_crc_errors"].old, 7);
    assert_eq!(stats["in_crc_errors"].new, 7);
    assert_eq!(stats["out_errors"].old, 3);
    assert_eq!(stats["out_errors"].new, 3);
}

#[test]
fn device_missing_from_old_snapshot_is_skipped() {
    let old = snapshot("LAB", "d1", vec![("SW1", vec![("Eth1", record("", 0, 0, 0))])]);
    let new = snapshot(
        "LAB",
        "d2",
        vec![
            ("SW1", vec![("Eth1", record("", 600, 0, 0))]),
            ("SW9", vec![("Eth1", record("", 600, 0, 0))]),
        ],
    );

    let degraded = find_degraded_interfaces(&old, &new, 500);
    assert!(degraded.contains_key("SW1"));
    assert!(!degraded.contains_key("SW9"));
}

#[test]
fn device_missing_from_new_snapshot_is_skipped() {
    let old = snapshot(
        "LAB",
        "d1",
        vec![
            ("SW1", vec![("Eth1", record("", 0, 0, 0))]),
            ("SW9", vec![("Eth1", record("", 0, 0, 0))]),
        ],
    );
    let new = snapshot("LAB", "d2", vec![("SW1", vec![("Eth1", record("", 600, 0, 0))])]);

    let degraded = find_degraded_interfaces(&old, &new, 500);
    assert_eq!(degraded.len(), 1);
    assert!(degraded.contains_key("SW1"));
}

#[test]
fn interface_missing_from_old_snapshot_is_skipped() {
    let old = snapshot("LAB", "d1", vec![("SW1", vec![("Eth1", record("", 0, 0, 0))])]);
    let new = snapshot(
        "LAB",
        "d2",
        vec![(
            "SW1",
            vec![
                ("Eth1", record("", 600, 0, 0)),
                ("Eth2", record("", 600, 0, 0)),
            ],
        )],
    );

    let degraded = find_degraded_interfaces(&old, &new, 500);
    assert!(degraded["SW1"].contains_key("Eth1"));
    assert!(!degraded["SW1"].contains_key("Eth2"));
}

#[test]
fn healthy_fleet_yields_empty_output() {
    let old = snapshot("LAB", "d1", vec![("SW1", vec![("Eth1", record("", 2, 1, 0))])]);
    let new = snapshot("LAB", "d2", vec![("SW1", vec![("Eth1", record("", 2, 1, 0))])]);
    assert!(find_degraded_interfaces(&old, &new, 0).is_empty());
}

#[test]
fn threshold_zero_flags_any_increase() {
    let old = snapshot("LAB", "d1", vec![("SW1", vec![("Eth1", record("", 0, 0, 0))])]);
    let new = snapshot("LAB", "d2", vec![("SW1", vec![("Eth1", record("", 1, 0, 0))])]);
    let degraded = find_degraded_interfaces(&old, &new, 0);
    assert_eq!(degraded["SW1"]["Eth1"]["in_errors"].new, 1);
}
