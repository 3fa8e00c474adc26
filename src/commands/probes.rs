//! `pulsecheck probes` — run the probe battery without snapshot or analysis.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;

use crate::domain::orchestrator::ProbeRunner;
use crate::domain::probes::standard_probe_set;
use crate::domain::report;
use crate::exec::SystemRunner;
use crate::speed::HttpSpeedMeter;

pub fn run(format: &str, config_path: Option<&str>) -> Result<()> {
    let cfg = super::load_config(config_path)?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_async(cfg, format))
}

async fn run_async(cfg: crate::config::Config, format: &str) -> Result<()> {
    let runner = Arc::new(SystemRunner);
    let meter = Arc::new(HttpSpeedMeter::new()?);
    let probes = standard_probe_set(runner, meter, &cfg.probes);
    let orchestrator = ProbeRunner::new(Duration::from_secs(cfg.probes.timeout_secs));

    let results = orchestrator.run_all(&probes).await;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&results)?),
        _ => {
            println!("{}", "Test Results".cyan().bold());
            println!("{}", "-".repeat(50));
            print!("{}", report::format_probe_section(&results));
        }
    }

    Ok(())
}
