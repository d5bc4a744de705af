// CSV comparison report.
//
// Comma-padded plain text for spreadsheet import: network links render as
// two side-by-side columns (one per end), host links as a single column.
// Counter deltas are computed here at render time, not stored.

use crate::models::{CounterPair, Link, LinkEnd, TRACKED_COUNTERS};

/// Spreadsheet column label for a tracked counter.
fn counter_label(name: &str) -> &str {
    match name {
        "in_errors" => "Input Errors",
        "in_crc_errors" => "Input CRC Errors",
        "out_errors" => "Output Errors",
        _ => name,
    }
}

/// Render the matched links into one CSV text buffer, blank separator row
/// between records, in the order the matcher produced them.
pub fn render_report(links: &[Link]) -> String {
    let mut out = String::new();
    for link in links {
        match link {
            Link::Network { key, ends } => {
                out.push_str(&format!("{key},,,\n"));
                let left = end_cells(&ends[0]);
                let right = end_cells(&ends[1]);
                for (l, r) in left.iter().zip(right.iter()) {
                    out.push_str(&format!("{l},,{r}\n"));
                }
            }
            Link::Host { key, end } => {
                out.push_str(&format!("{key},,,\n"));
                for cell in end_cells(end) {
                    out.push_str(&format!("{cell},,,\n"));
                }
            }
        }
        out.push_str(",,,,\n");
    }
    out
}

/// One column of cells for a link end: identity, descriptive attributes,
/// packet counts, then new/old/difference per tracked counter.
fn end_cells(end: &LinkEnd) -> Vec<String> {
    let r = &end.record;
    let mut cells = vec![
        end.label(),
        format!(
            "Operational Status: {}",
            r.oper_status.as_deref().unwrap_or("").to_uppercase()
        ),
        format!("Description: {}", r.description_or_empty()),
        format!(
            "MTU: {}",
            r.mtu.map(|m| m.to_string()).unwrap_or_default()
        ),
        format!("IPv4 Address: {}", r.ipv4.as_deref().unwrap_or("")),
        format!("MAC Address: {}", r.mac_address.as_deref().unwrap_or("")),
        format!("Input Packets: {}", r.in_pkts),
        format!("Output Packets: {}", r.out_pkts),
    ];

    for name in TRACKED_COUNTERS {
        // The pair recorded by the detector; a counter promoted without a
        // recorded pair (should not happen) falls back to the new value.
        let pair = end.stats.get(name).copied().unwrap_or(CounterPair {
            old: r.counter(name),
            new: r.counter(name),
        });
        let label = counter_label(name);
        cells.push(format!("{label}: {}", pair.new));
        cells.push(format!("{label} (Old): {}", pair.old));
        cells.push(format!("{label} Difference: {}", pair.delta()));
    }

    cells
}
