//! Probe abstraction — one named diagnostic producing exactly one result.
//!
//! `execute` is infallible at the type level: every probe absorbs its own
//! failures (spawn errors, bad exit codes, unparseable output) into a
//! descriptive result string. A probe that fails still reports.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outcome of a single probe run.
///
/// The speed test is the one probe with a structured result; everything else
/// reports free text, including every error path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProbeResult {
    Bandwidth {
        download_mbps: f64,
        upload_mbps: f64,
    },
    Text(String),
}

impl ProbeResult {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Bandwidth {
                download_mbps,
                upload_mbps,
            } => write!(
                f,
                "Download {:.2} Mbps, Upload {:.2} Mbps",
                download_mbps, upload_mbps
            ),
        }
    }
}

#[async_trait]
pub trait Probe: Send + Sync {
    /// Stable name, used as the key in the aggregated result map.
    fn name(&self) -> &'static str;

    async fn execute(&self) -> ProbeResult;
}

/// Ordered registry of probes. Registration order is cosmetic — the
/// orchestrator keys results by name, not position.
#[derive(Default)]
pub struct ProbeSet {
    probes: Vec<Arc<dyn Probe>>,
}

impl ProbeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, probe: Arc<dyn Probe>) {
        debug_assert!(
            !self.probes.iter().any(|p| p.name() == probe.name()),
            "duplicate probe name: {}",
            probe.name()
        );
        self.probes.push(probe);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Probe>> {
        self.probes.iter()
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bandwidth_renders_with_two_decimals() {
        let result = ProbeResult::Bandwidth {
            download_mbps: 93.456,
            upload_mbps: 11.2,
        };
        assert_eq!(
            result.to_string(),
            "Download 93.46 Mbps, Upload 11.20 Mbps"
        );
    }

    #[test]
    fn text_renders_verbatim() {
        let result = ProbeResult::text("System is fully patched.");
        assert_eq!(result.to_string(), "System is fully patched.");
    }

    #[test]
    fn bandwidth_serializes_as_structured_object() {
        let result = ProbeResult::Bandwidth {
            download_mbps: 100.0,
            upload_mbps: 20.0,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["download_mbps"], 100.0);
        assert_eq!(json["upload_mbps"], 20.0);
    }
}
