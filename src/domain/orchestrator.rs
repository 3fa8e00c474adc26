//! Probe orchestration — fan-out every probe to its own task, barrier-wait
//! for all of them, aggregate by name.
//!
//! The orchestrator adds no error recovery of its own: probes already absorb
//! their failures into result text. Its job is to guarantee that every
//! registered probe contributes exactly one entry, even if a probe task
//! panics or overruns its budget.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::probe::{ProbeResult, ProbeSet};

pub struct ProbeRunner {
    timeout: Duration,
}

impl ProbeRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Run every registered probe concurrently and wait for all of them.
    ///
    /// The returned map holds exactly one entry per registered probe. A probe
    /// that times out or panics contributes an error-describing string under
    /// its own name; siblings are unaffected.
    pub async fn run_all(&self, probes: &ProbeSet) -> HashMap<String, ProbeResult> {
        let mut handles = Vec::with_capacity(probes.len());

        // Dispatch everything before awaiting anything.
        for probe in probes.iter() {
            let probe = Arc::clone(probe);
            let budget = self.timeout;
            let name = probe.name();
            handles.push((
                name,
                tokio::spawn(async move {
                    match tokio::time::timeout(budget, probe.execute()).await {
                        Ok(result) => result,
                        Err(_) => ProbeResult::text(format!(
                            "Error running {name}: timed out after {}s",
                            budget.as_secs()
                        )),
                    }
                }),
            ));
        }

        let mut results = HashMap::with_capacity(handles.len());
        for (name, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                // A panicking probe must not take the run down with it.
                Err(e) => {
                    warn!(probe = name, error = %e, "probe task failed");
                    ProbeResult::text(format!("Error running {name}: {e}"))
                }
            };
            debug!(probe = name, "probe finished");
            results.insert(name.to_string(), result);
        }
        results
    }
}
