// Link correlation over the detector's output.
//
// Raw per-interface data has no knowledge of the far end of a cable. The
// fleet's convention is to embed it in the interface description:
// "DEV-A<>DEV-B uplink" on DEV-A means the interface connects to DEV-B.
// Peer resolution sits behind a trait so the convention can be swapped for a
// structured topology source without touching the correlation logic.

use crate::models::{
    DegradedInterfaces, DegradedStats, InterfaceRecord, Link, LinkEnd, Snapshot,
};

/// Far-end identity inferred for a local interface. The interface hint is
/// optional: the description convention only names the peer device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerHint {
    pub peer_device: String,
    pub peer_interface: Option<String>,
}

/// Peer-resolution oracle: infer the far-end device from local interface
/// metadata.
pub trait PeerResolver {
    fn resolve_peer(
        &self,
        device: &str,
        interface: &str,
        record: &InterfaceRecord,
    ) -> Option<PeerHint>;
}

/// The `{local}<>{peer}` free-text description convention.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptionConvention;

impl PeerResolver for DescriptionConvention {
    fn resolve_peer(
        &self,
        device: &str,
        _interface: &str,
        record: &InterfaceRecord,
    ) -> Option<PeerHint> {
        let description = record.description.as_deref()?;
        let rest = description.strip_prefix(device).unwrap_or(description);
        let peer = rest
            .trim_matches([' ', '<', '>'])
            .split_whitespace()
            .next()?;
        if peer.is_empty() {
            return None;
        }
        Some(PeerHint {
            peer_device: peer.to_string(),
            peer_interface: None,
        })
    }
}

/// Correlate degraded interfaces into links. Consumes the detector's output;
/// every interface in it ends up in exactly one link: paired ends become
/// `Network Link - {device}<>{peer}` entries (parallel cabling gets a
/// `- 2nd Link` suffix), everything left over becomes a host link.
pub fn match_links(
    new: &Snapshot,
    degraded: DegradedInterfaces,
    resolver: &dyn PeerResolver,
) -> Vec<Link> {
    let (mut links, leftovers) = pair_network_links(new, degraded, resolver);

    for (device, interfaces) in leftovers {
        for (interface, stats) in interfaces {
            let Some(record) = lookup_record(new, &device, &interface) else {
                tracing::warn!(
                    device = %device,
                    interface = %interface,
                    "degraded interface missing from new snapshot, dropping from report"
                );
                continue;
            };
            let key = format!(
                "Device connected to {interface} - {}",
                record.description_or_empty()
            );
            links.push(Link::Host {
                key,
                end: LinkEnd {
                    device: device.clone(),
                    interface,
                    record: record.clone(),
                    stats,
                },
            });
        }
    }

    links
}

/// Pair up degraded interfaces that name each other through the resolver.
/// Operates on an owned working set, removing both ends of every pair, and
/// returns the network links plus whatever could not be paired. First match
/// in iteration order wins; an interface whose peer is not itself degraded
/// is never paired, since only the degraded population is searched.
pub fn pair_network_links(
    new: &Snapshot,
    mut working: DegradedInterfaces,
    resolver: &dyn PeerResolver,
) -> (Vec<Link>, DegradedInterfaces) {
    let mut links: Vec<Link> = Vec::new();

    // Fixed visiting order, decoupled from the removals below.
    let order: Vec<(String, String)> = working
        .iter()
        .flat_map(|(device, interfaces)| {
            interfaces
                .keys()
                .map(move |interface| (device.clone(), interface.clone()))
        })
        .collect();

    for (device, interface) in order {
        if !contains(&working, &device, &interface) {
            continue;
        }
        let Some(record) = lookup_record(new, &device, &interface) else {
            continue;
        };
        let Some(hint) = resolver.resolve_peer(&device, &interface, record) else {
            continue;
        };

        // What the far end's description should contain, and how this link
        // is labelled from the local perspective.
        let expected = format!("{}<>{}", hint.peer_device, device);
        let sanitized = format!("{}<>{}", device, hint.peer_device);

        let Some((peer_device, peer_interface)) =
            find_peer(&working, new, &device, &hint, &expected)
        else {
            continue;
        };
        let peer_record = lookup_record(new, &peer_device, &peer_interface)
            .cloned()
            .unwrap_or_default();

        let primary_key = format!("Network Link - {sanitized}");
        let key = if links.iter().any(|l| l.key() == primary_key) {
            // Parallel cabling between the same device pair.
            format!("Network Link - {expected} - 2nd Link")
        } else {
            primary_key
        };

        let local_stats = remove_entry(&mut working, &device, &interface);
        let peer_stats = remove_entry(&mut working, &peer_device, &peer_interface);
        tracing::debug!(key = %key, "paired degraded interfaces");

        links.push(Link::Network {
            key,
            ends: Box::new([
                LinkEnd {
                    device,
                    interface,
                    record: record.clone(),
                    stats: local_stats,
                },
                LinkEnd {
                    device: peer_device,
                    interface: peer_interface,
                    record: peer_record,
                    stats: peer_stats,
                },
            ]),
        });
    }

    (links, working)
}

/// First remaining degraded interface on another device whose description
/// contains `expected`. A resolver that knows the far-end interface (e.g. a
/// structured topology source) short-circuits the description scan.
fn find_peer(
    working: &DegradedInterfaces,
    new: &Snapshot,
    local_device: &str,
    hint: &PeerHint,
    expected: &str,
) -> Option<(String, String)> {
    if let Some(hinted) = &hint.peer_interface {
        if contains(working, &hint.peer_device, hinted) {
            return Some((hint.peer_device.clone(), hinted.clone()));
        }
        return None;
    }

    for (device, interfaces) in working {
        if device == local_device {
            continue;
        }
        for interface in interfaces.keys() {
            let matches = lookup_record(new, device, interface)
                .map(|r| r.description_or_empty().trim().contains(expected))
                .unwrap_or(false);
            if matches {
                return Some((device.clone(), interface.clone()));
            }
        }
    }
    None
}

fn lookup_record<'a>(
    snapshot: &'a Snapshot,
    device: &str,
    interface: &str,
) -> Option<&'a InterfaceRecord> {
    snapshot.device(device).and_then(|ifs| ifs.get(interface))
}

fn contains(working: &DegradedInterfaces, device: &str, interface: &str) -> bool {
    working
        .get(device)
        .is_some_and(|ifs| ifs.contains_key(interface))
}

/// Remove one interface from the working set, dropping the device entry once
/// it empties out.
fn remove_entry(working: &mut DegradedInterfaces, device: &str, interface: &str) -> DegradedStats {
    let stats = working
        .get_mut(device)
        .and_then(|ifs| ifs.remove(interface))
        .unwrap_or_default();
    if working.get(device).is_some_and(|ifs| ifs.is_empty()) {
        working.remove(device);
    }
    stats
}
