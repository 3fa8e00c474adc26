//! Report formatting — pure text assembly of snapshot + probe results.

use std::collections::HashMap;
use std::fmt::Write;

use super::probe::ProbeResult;
use super::snapshot::SystemSnapshot;

/// Probe keys in their fixed display order.
const PROBE_LINES: &[(&str, &str)] = &[
    ("patch_status", "Patch Status"),
    ("arp_check", "ARP Table"),
    ("malware_check", "Malware Indicators"),
    ("speedtest", "Speed Test"),
    ("traceroute", "Traceroute"),
    ("ping", "Ping"),
    ("firewall", "Firewall"),
];

/// Render the combined report. Deterministic given identical inputs.
pub fn format_report(
    snapshot: &SystemSnapshot,
    results: &HashMap<String, ProbeResult>,
) -> String {
    let mut out = String::new();

    writeln!(out, "System Snapshot:").unwrap();
    writeln!(out, "Host: {}", snapshot.hostname).unwrap();
    writeln!(
        out,
        "OS: {} {} ({})",
        snapshot.os.name, snapshot.os.version, snapshot.os.architecture
    )
    .unwrap();
    writeln!(
        out,
        "CPU: {:.1}% usage, {} cores, {} threads",
        snapshot.cpu.usage_percent, snapshot.cpu.physical_cores, snapshot.cpu.logical_cores
    )
    .unwrap();
    writeln!(
        out,
        "Memory: {:.1}% used ({:.2}GB available out of {:.2}GB)",
        snapshot.memory.used_percent,
        gb(snapshot.memory.available_bytes),
        gb(snapshot.memory.total_bytes)
    )
    .unwrap();
    writeln!(
        out,
        "Disk: {:.1}% used ({:.2}GB free out of {:.2}GB)",
        snapshot.disk.used_percent,
        gb(snapshot.disk.free_bytes),
        gb(snapshot.disk.total_bytes)
    )
    .unwrap();
    writeln!(
        out,
        "Network Interfaces: {}",
        snapshot.network.interface_count
    )
    .unwrap();

    writeln!(out).unwrap();
    writeln!(out, "Test Results:").unwrap();
    out.push_str(&format_probe_section(results));

    out
}

/// Just the probe lines, one per battery entry in fixed order.
pub fn format_probe_section(results: &HashMap<String, ProbeResult>) -> String {
    let mut out = String::new();
    for (key, label) in PROBE_LINES {
        writeln!(out, "- {}: {}", label, entry(results, key)).unwrap();
    }
    out
}

fn gb(bytes: u64) -> f64 {
    bytes as f64 / 1e9
}

fn entry(results: &HashMap<String, ProbeResult>, key: &str) -> String {
    // The orchestrator guarantees every key; this fallback keeps the
    // formatter total anyway.
    results
        .get(key)
        .map(|r| r.to_string())
        .unwrap_or_else(|| "unavailable".to_string())
}
