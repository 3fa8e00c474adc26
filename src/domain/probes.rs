//! The seven diagnostic probes.
//!
//! Each probe invokes exactly one external command or collaborator and
//! converts every failure into a descriptive result string. The spoofing and
//! suspicious-file checks are placeholder substring matches kept for
//! behavioral compatibility — they are not real detection and must not be
//! treated as authoritative.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ProbeConfig;
use crate::exec::CommandRunner;
use crate::speed::SpeedMeter;

use super::probe::{Probe, ProbeResult, ProbeSet};

/// Build the standard battery in its reference order.
pub fn standard_probe_set(
    runner: Arc<dyn CommandRunner>,
    meter: Arc<dyn SpeedMeter>,
    config: &ProbeConfig,
) -> ProbeSet {
    let mut set = ProbeSet::new();
    set.register(Arc::new(PatchStatusProbe {
        runner: runner.clone(),
    }));
    set.register(Arc::new(ArpTableProbe {
        runner: runner.clone(),
    }));
    set.register(Arc::new(MalwareScanProbe {
        runner: runner.clone(),
        dirs: config.scan_dirs.clone(),
    }));
    set.register(Arc::new(SpeedTestProbe { meter }));
    set.register(Arc::new(TracerouteProbe {
        runner: runner.clone(),
        target: config.traceroute_target.clone(),
    }));
    set.register(Arc::new(PingProbe {
        runner: runner.clone(),
        target: config.ping_target.clone(),
    }));
    set.register(Arc::new(FirewallProbe { runner }));
    set
}

// ── Patch status ───────────────────────────────────────────

pub struct PatchStatusProbe {
    pub runner: Arc<dyn CommandRunner>,
}

#[async_trait]
impl Probe for PatchStatusProbe {
    fn name(&self) -> &'static str {
        "patch_status"
    }

    async fn execute(&self) -> ProbeResult {
        match self.runner.run("apt", &["list", "--upgradable"]).await {
            Ok(out) => {
                if out.stdout.contains("upgradable") {
                    let pending = out.stdout.matches('\n').count();
                    ProbeResult::text(format!(
                        "Patches available: {pending} patches pending."
                    ))
                } else {
                    ProbeResult::text("System is fully patched.")
                }
            }
            Err(e) => ProbeResult::text(format!("Error checking patch status: {e}")),
        }
    }
}

// ── ARP table ──────────────────────────────────────────────

pub struct ArpTableProbe {
    pub runner: Arc<dyn CommandRunner>,
}

#[async_trait]
impl Probe for ArpTableProbe {
    fn name(&self) -> &'static str {
        "arp_check"
    }

    async fn execute(&self) -> ProbeResult {
        match self.runner.run("arp", &["-a"]).await {
            Ok(out) => {
                let entries = out.stdout.matches('\n').count();
                // Placeholder heuristic; real detection would compare MAC/IP pairs.
                if out.stdout.contains("inconsistent") {
                    ProbeResult::text(format!(
                        "Potential DNS spoofing detected across {entries} ARP entries."
                    ))
                } else {
                    ProbeResult::text(format!(
                        "No DNS spoofing detected across {entries} ARP entries."
                    ))
                }
            }
            Err(e) => ProbeResult::text(format!("Error checking ARP table: {e}")),
        }
    }
}

// ── Suspicious files ───────────────────────────────────────

pub struct MalwareScanProbe {
    pub runner: Arc<dyn CommandRunner>,
    pub dirs: Vec<String>,
}

#[async_trait]
impl Probe for MalwareScanProbe {
    fn name(&self) -> &'static str {
        "malware_check"
    }

    async fn execute(&self) -> ProbeResult {
        let mut flagged = Vec::new();
        for dir in &self.dirs {
            match self.runner.run("ls", &[dir]).await {
                Ok(out) => {
                    // Placeholder marker match, not a scanner.
                    if out.stdout.contains("suspicious_file") {
                        flagged.push(format!("Suspicious file found in {dir}"));
                    }
                }
                Err(e) => {
                    return ProbeResult::text(format!("Error scanning for malware: {e}"))
                }
            }
        }

        if flagged.is_empty() {
            ProbeResult::text(format!(
                "No suspicious files found across {} directories.",
                self.dirs.len()
            ))
        } else {
            ProbeResult::Text(flagged.join(" | "))
        }
    }
}

// ── Speed test ─────────────────────────────────────────────

pub struct SpeedTestProbe {
    pub meter: Arc<dyn SpeedMeter>,
}

#[async_trait]
impl Probe for SpeedTestProbe {
    fn name(&self) -> &'static str {
        "speedtest"
    }

    async fn execute(&self) -> ProbeResult {
        // Directions measured sequentially so they don't contend for the link.
        let measured = async {
            let download = self.meter.measure_download().await?;
            let upload = self.meter.measure_upload().await?;
            anyhow::Ok((download, upload))
        }
        .await;

        match measured {
            Ok((download_bps, upload_bps)) => ProbeResult::Bandwidth {
                download_mbps: download_bps / 1e6,
                upload_mbps: upload_bps / 1e6,
            },
            Err(e) => ProbeResult::text(format!("Error measuring bandwidth: {e}")),
        }
    }
}

// ── Traceroute ─────────────────────────────────────────────

pub struct TracerouteProbe {
    pub runner: Arc<dyn CommandRunner>,
    pub target: String,
}

#[async_trait]
impl Probe for TracerouteProbe {
    fn name(&self) -> &'static str {
        "traceroute"
    }

    async fn execute(&self) -> ProbeResult {
        match self.runner.run("traceroute", &[&self.target]).await {
            Ok(out) => ProbeResult::text(out.stdout.trim()),
            Err(e) => ProbeResult::text(format!("Error running traceroute: {e}")),
        }
    }
}

// ── Ping ───────────────────────────────────────────────────

pub struct PingProbe {
    pub runner: Arc<dyn CommandRunner>,
    pub target: String,
}

#[async_trait]
impl Probe for PingProbe {
    fn name(&self) -> &'static str {
        "ping"
    }

    async fn execute(&self) -> ProbeResult {
        match self.runner.run("ping", &["-c", "4", &self.target]).await {
            Ok(out) => ProbeResult::text(out.stdout.trim()),
            Err(e) => ProbeResult::text(format!("Error running ping: {e}")),
        }
    }
}

// ── Firewall ───────────────────────────────────────────────

pub struct FirewallProbe {
    pub runner: Arc<dyn CommandRunner>,
}

#[async_trait]
impl Probe for FirewallProbe {
    fn name(&self) -> &'static str {
        "firewall"
    }

    async fn execute(&self) -> ProbeResult {
        match self.runner.run("sudo", &["ufw", "status"]).await {
            Ok(out) => ProbeResult::text(out.stdout.trim()),
            Err(e) => ProbeResult::text(format!("Error retrieving firewall status: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::testing::FakeRunner;
    use crate::speed::testing::FakeMeter;

    #[tokio::test]
    async fn patch_status_counts_newlines_when_upgradable() {
        let runner = FakeRunner::new().with_stdout(
            "apt",
            "Listing...\nvim/stable 2:9.0 amd64 [upgradable from: 2:8.2]\ncurl/stable 8.5 amd64 [upgradable from: 8.0]\n",
        );
        let probe = PatchStatusProbe {
            runner: Arc::new(runner),
        };
        assert_eq!(
            probe.execute().await,
            ProbeResult::text("Patches available: 3 patches pending.")
        );
    }

    #[tokio::test]
    async fn patch_status_reports_fully_patched_without_marker() {
        let runner = FakeRunner::new().with_stdout("apt", "Listing... Done\n");
        let probe = PatchStatusProbe {
            runner: Arc::new(runner),
        };
        assert_eq!(
            probe.execute().await,
            ProbeResult::text("System is fully patched.")
        );
    }

    #[tokio::test]
    async fn patch_status_absorbs_spawn_failure() {
        let probe = PatchStatusProbe {
            runner: Arc::new(FakeRunner::new()),
        };
        let ProbeResult::Text(text) = probe.execute().await else {
            panic!("expected text result");
        };
        assert!(text.starts_with("Error checking patch status:"), "{text}");
    }

    #[tokio::test]
    async fn arp_reports_spoofing_on_marker() {
        let runner = FakeRunner::new()
            .with_stdout("arp", "host1 (10.0.0.1) at aa:bb inconsistent\nhost2 (10.0.0.2) at cc:dd\n");
        let probe = ArpTableProbe {
            runner: Arc::new(runner),
        };
        assert_eq!(
            probe.execute().await,
            ProbeResult::text("Potential DNS spoofing detected across 2 ARP entries.")
        );
    }

    #[tokio::test]
    async fn arp_reports_clean_table_with_entry_count() {
        let runner = FakeRunner::new()
            .with_stdout("arp", "host1 (10.0.0.1) at aa:bb\nhost2 (10.0.0.2) at cc:dd\nhost3 (10.0.0.3) at ee:ff\n");
        let probe = ArpTableProbe {
            runner: Arc::new(runner),
        };
        assert_eq!(
            probe.execute().await,
            ProbeResult::text("No DNS spoofing detected across 3 ARP entries.")
        );
    }

    #[tokio::test]
    async fn malware_scan_flags_marked_directory() {
        let runner = FakeRunner::new().with_stdout("ls", "notes.txt\nsuspicious_file\n");
        let probe = MalwareScanProbe {
            runner: Arc::new(runner),
            dirs: vec!["/tmp".into(), "/var/tmp".into()],
        };
        // Same listing served for both dirs, so both get flagged.
        assert_eq!(
            probe.execute().await,
            ProbeResult::text(
                "Suspicious file found in /tmp | Suspicious file found in /var/tmp"
            )
        );
    }

    #[tokio::test]
    async fn malware_scan_reports_clean_directories() {
        let runner = FakeRunner::new().with_stdout("ls", "notes.txt\ncache\n");
        let probe = MalwareScanProbe {
            runner: Arc::new(runner),
            dirs: vec!["/tmp".into(), "/var/tmp".into()],
        };
        assert_eq!(
            probe.execute().await,
            ProbeResult::text("No suspicious files found across 2 directories.")
        );
    }

    #[tokio::test]
    async fn speed_test_converts_bits_to_mbps() {
        let probe = SpeedTestProbe {
            meter: Arc::new(FakeMeter {
                download_bps: Ok(93_500_000.0),
                upload_bps: Ok(11_200_000.0),
            }),
        };
        assert_eq!(
            probe.execute().await,
            ProbeResult::Bandwidth {
                download_mbps: 93.5,
                upload_mbps: 11.2,
            }
        );
    }

    #[tokio::test]
    async fn speed_test_falls_back_to_error_text() {
        let probe = SpeedTestProbe {
            meter: Arc::new(FakeMeter {
                download_bps: Err("connection reset".into()),
                upload_bps: Ok(0.0),
            }),
        };
        let ProbeResult::Text(text) = probe.execute().await else {
            panic!("expected text result");
        };
        assert!(text.starts_with("Error measuring bandwidth:"), "{text}");
    }

    #[tokio::test]
    async fn traceroute_trims_stdout() {
        let runner = FakeRunner::new()
            .with_stdout("traceroute", "traceroute to google.com\n 1  gateway  0.4 ms\n");
        let probe = TracerouteProbe {
            runner: Arc::new(runner),
            target: "google.com".into(),
        };
        assert_eq!(
            probe.execute().await,
            ProbeResult::text("traceroute to google.com\n 1  gateway  0.4 ms")
        );
    }

    #[tokio::test]
    async fn ping_absorbs_spawn_failure_with_reference_wording() {
        let probe = PingProbe {
            runner: Arc::new(FakeRunner::new()),
            target: "google.com".into(),
        };
        let ProbeResult::Text(text) = probe.execute().await else {
            panic!("expected text result");
        };
        assert!(text.starts_with("Error running ping:"), "{text}");
    }

    #[tokio::test]
    async fn firewall_passes_through_status_output() {
        let runner = FakeRunner::new().with_exit("sudo", "Status: inactive\n", 0);
        let probe = FirewallProbe {
            runner: Arc::new(runner),
        };
        assert_eq!(probe.execute().await, ProbeResult::text("Status: inactive"));
    }

    #[tokio::test]
    async fn standard_set_registers_seven_probes() {
        let set = standard_probe_set(
            Arc::new(FakeRunner::new()),
            Arc::new(FakeMeter {
                download_bps: Ok(0.0),
                upload_bps: Ok(0.0),
            }),
            &ProbeConfig::default(),
        );
        assert_eq!(set.len(), 7);
        let names: Vec<_> = set.iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            vec![
                "patch_status",
                "arp_check",
                "malware_check",
                "speedtest",
                "traceroute",
                "ping",
                "firewall"
            ]
        );
    }
}
