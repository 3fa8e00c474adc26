//! Snapshot collector — point-in-time read of local machine counters.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sysinfo::{Disks, Networks, System};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsInfo {
    pub name: String,
    pub version: String,
    pub architecture: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuInfo {
    pub usage_percent: f32,
    pub physical_cores: usize,
    pub logical_cores: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub total_bytes: u64,
    pub available_bytes: u64,
    pub used_percent: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskInfo {
    pub total_bytes: u64,
    pub free_bytes: u64,
    pub used_percent: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub interface_count: usize,
}

/// Immutable machine snapshot, created once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub hostname: String,
    pub os: OsInfo,
    pub cpu: CpuInfo,
    pub memory: MemoryInfo,
    pub disk: DiskInfo,
    pub network: NetworkInfo,
}

pub struct SnapshotCollector {
    sample_interval: Duration,
}

impl Default for SnapshotCollector {
    fn default() -> Self {
        Self {
            sample_interval: Duration::from_secs(1),
        }
    }
}

impl SnapshotCollector {
    pub fn new(sample_interval: Duration) -> Self {
        Self { sample_interval }
    }

    /// Collect a snapshot. Blocks for the CPU sampling interval — callers on
    /// an async runtime should put this on a blocking thread.
    pub fn collect(&self) -> SystemSnapshot {
        let mut sys = System::new();

        // CPU usage needs two refreshes separated by the sampling interval.
        sys.refresh_cpu();
        std::thread::sleep(self.sample_interval);
        sys.refresh_cpu();
        sys.refresh_memory();

        let usage_percent = sys.global_cpu_info().cpu_usage();
        let logical_cores = sys.cpus().len();
        let physical_cores = sys.physical_core_count().unwrap_or(logical_cores);

        let total_bytes = sys.total_memory();
        let available_bytes = sys.available_memory();
        let mem_used_percent = if total_bytes > 0 {
            (sys.used_memory() as f64 / total_bytes as f64 * 100.0) as f32
        } else {
            0.0
        };

        let snapshot = SystemSnapshot {
            hostname: gethostname(),
            os: OsInfo {
                name: System::name().unwrap_or_else(|| "unknown".into()),
                version: System::os_version().unwrap_or_else(|| "unknown".into()),
                architecture: System::cpu_arch().unwrap_or_else(|| "unknown".into()),
            },
            cpu: CpuInfo {
                usage_percent,
                physical_cores,
                logical_cores,
            },
            memory: MemoryInfo {
                total_bytes,
                available_bytes,
                used_percent: mem_used_percent,
            },
            disk: root_disk(),
            network: NetworkInfo {
                interface_count: Networks::new_with_refreshed_list().iter().count(),
            },
        };

        debug!(
            cpu = snapshot.cpu.usage_percent,
            mem = snapshot.memory.used_percent,
            "snapshot collected"
        );
        snapshot
    }
}

/// Usage of the disk mounted at `/`, falling back to the largest mount when
/// no root mount is listed (e.g. Windows).
fn root_disk() -> DiskInfo {
    let disks = Disks::new_with_refreshed_list();
    let disk = disks
        .iter()
        .find(|d| d.mount_point() == std::path::Path::new("/"))
        .or_else(|| disks.iter().max_by_key(|d| d.total_space()));

    match disk {
        Some(d) => {
            let total = d.total_space();
            let free = d.available_space();
            let used_percent = if total > 0 {
                ((total - free) as f64 / total as f64 * 100.0) as f32
            } else {
                0.0
            };
            DiskInfo {
                total_bytes: total,
                free_bytes: free,
                used_percent,
            }
        }
        None => DiskInfo {
            total_bytes: 0,
            free_bytes: 0,
            used_percent: 0.0,
        },
    }
}

fn gethostname() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_fills_every_field() {
        let collector = SnapshotCollector::new(Duration::from_millis(200));
        let snapshot = collector.collect();

        assert!(!snapshot.hostname.is_empty());
        assert!(!snapshot.os.name.is_empty());
        assert!(snapshot.cpu.logical_cores > 0);
        assert!(snapshot.cpu.physical_cores > 0);
        assert!(snapshot.memory.total_bytes > 0);
        assert!(snapshot.memory.used_percent >= 0.0);
        assert!(snapshot.memory.used_percent <= 100.0);
    }
}
