//! `pulsecheck check` — full diagnostic run: snapshot + probe battery +
//! formatted report + AI health analysis.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::analyzer::HealthAnalyzer;
use crate::domain::orchestrator::ProbeRunner;
use crate::domain::probe::ProbeResult;
use crate::domain::probes::standard_probe_set;
use crate::domain::report::format_report;
use crate::domain::snapshot::{SnapshotCollector, SystemSnapshot};
use crate::exec::SystemRunner;
use crate::speed::HttpSpeedMeter;

#[derive(Serialize)]
struct CheckOutput {
    generated_at: DateTime<Utc>,
    snapshot: SystemSnapshot,
    probes: HashMap<String, ProbeResult>,
    analysis: Option<String>,
}

pub fn run(format: &str, no_analyze: bool, config_path: Option<&str>) -> Result<()> {
    let cfg = super::load_config(config_path)?;

    // Resolve the credential before spending a minute probing.
    let api_key = if no_analyze {
        None
    } else {
        Some(cfg.analyzer.resolve_api_key()?)
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_async(cfg, format, api_key))
}

async fn run_async(
    cfg: crate::config::Config,
    format: &str,
    api_key: Option<String>,
) -> Result<()> {
    let runner = Arc::new(SystemRunner);
    let meter = Arc::new(HttpSpeedMeter::new()?);
    let probes = standard_probe_set(runner, meter, &cfg.probes);
    let orchestrator = ProbeRunner::new(Duration::from_secs(cfg.probes.timeout_secs));

    // Snapshot collection blocks for its CPU sampling interval, so it runs on
    // a blocking thread concurrently with the probe battery.
    let collector = SnapshotCollector::default();
    let (snapshot, results) = tokio::join!(
        tokio::task::spawn_blocking(move || collector.collect()),
        orchestrator.run_all(&probes),
    );
    let snapshot = snapshot.context("snapshot collection task failed")?;

    let report = format_report(&snapshot, &results);

    let analysis = match api_key {
        Some(key) => {
            let analyzer = HealthAnalyzer::new(cfg.analyzer.clone(), key)?;
            Some(analyzer.analyze(&report).await)
        }
        None => None,
    };

    match format {
        "json" => {
            let output = CheckOutput {
                generated_at: Utc::now(),
                snapshot,
                probes: results,
                analysis,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            println!();
            println!("{}", "SYSTEM SNAPSHOT".cyan().bold());
            println!("{}", "=".repeat(50));
            println!("{}", report);

            if let Some(analysis) = analysis {
                println!();
                println!("{}", "AI Health Analysis".cyan().bold());
                println!("{}", "-".repeat(50));
                println!("{}", analysis);
            }
        }
    }

    Ok(())
}
