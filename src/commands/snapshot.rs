//! `pulsecheck snapshot` — collect and print the machine snapshot only.

use anyhow::Result;
use colored::Colorize;

use crate::domain::snapshot::SnapshotCollector;

pub fn run(format: &str) -> Result<()> {
    let snapshot = SnapshotCollector::default().collect();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        _ => {
            println!("{}", "═══ System Snapshot ═══".cyan().bold());
            println!("  Hostname:     {}", snapshot.hostname.bold());
            println!(
                "  OS:           {} {} ({})",
                snapshot.os.name, snapshot.os.version, snapshot.os.architecture
            );
            println!(
                "  CPU:          {:.1}% usage, {} cores, {} threads",
                snapshot.cpu.usage_percent,
                snapshot.cpu.physical_cores,
                snapshot.cpu.logical_cores
            );
            println!(
                "  Memory:       {:.1}% used ({:.2} GB available of {:.2} GB)",
                snapshot.memory.used_percent,
                snapshot.memory.available_bytes as f64 / 1e9,
                snapshot.memory.total_bytes as f64 / 1e9
            );
            println!(
                "  Disk:         {:.1}% used ({:.2} GB free of {:.2} GB)",
                snapshot.disk.used_percent,
                snapshot.disk.free_bytes as f64 / 1e9,
                snapshot.disk.total_bytes as f64 / 1e9
            );
            println!("  Interfaces:   {}", snapshot.network.interface_count);
        }
    }

    Ok(())
}
