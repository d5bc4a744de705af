// Degradation detection between two snapshots of the same site.
//
// A counter is degraded iff it both increased and exceeds the absolute
// threshold (strict inequalities). The dual predicate filters out devices
// with large but stable historical error counts; a jump that stays at or
// below the threshold is deliberately not reported.

use crate::models::{CounterPair, DegradedInterfaces, DegradedStats, Snapshot, TRACKED_COUNTERS};

/// Compare `old` and `new` and return every interface with at least one
/// degraded tracked counter. Once an interface qualifies, all tracked
/// counters are recorded with their old/new pairs so downstream columns stay
/// consistent. Devices missing from either side are skipped (fleet churn);
/// interfaces missing from the old side are skipped per interface.
pub fn find_degraded_interfaces(
    old: &Snapshot,
    new: &Snapshot,
    threshold: u64,
) -> DegradedInterfaces {
    let mut degraded = DegradedInterfaces::new();

    for (device, interfaces) in &new.devices {
        let Some(old_interfaces) = old.device(device) else {
            tracing::debug!(device = %device, "device absent from old snapshot, skipping");
            continue;
        };

        let mut bad_interfaces = std::collections::BTreeMap::new();
        for (interface, record) in interfaces {
            let Some(old_record) = old_interfaces.get(interface) else {
                tracing::debug!(
                    device = %device,
                    interface = %interface,
                    "interface absent from old snapshot, skipping"
                );
                continue;
            };

            let any_bad = TRACKED_COUNTERS.iter().any(|name| {
                let new_value = record.counter(name);
                new_value > old_record.counter(name) && new_value > threshold
            });
            if !any_bad {
                continue;
            }

            let stats: DegradedStats = TRACKED_COUNTERS
                .iter()
                .map(|name| {
                    (
                        name.to_string(),
                        CounterPair {
                            old: old_record.counter(name),
                            new: record.counter(name),
                        },
                    )
                })
                .collect();
            bad_interfaces.insert(interface.clone(), stats);
        }

        if !bad_interfaces.is_empty() {
            degraded.insert(device.clone(), bad_interfaces);
        }
    }

    degraded
}
