use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub probes: ProbeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Fallback credential; the OPENAI_API_KEY env var takes precedence.
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_target")]
    pub ping_target: String,
    #[serde(default = "default_target")]
    pub traceroute_target: String,
    #[serde(default = "default_scan_dirs")]
    pub scan_dirs: Vec<String>,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_target() -> String {
    "google.com".to_string()
}

fn default_scan_dirs() -> Vec<String> {
    vec!["/tmp".to_string(), "/var/tmp".to_string()]
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            ping_target: default_target(),
            traceroute_target: default_target(),
            scan_dirs: default_scan_dirs(),
        }
    }
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("could not determine config directory")?;
        Ok(config_dir.join("pulsecheck").join("config.toml"))
    }
}

impl AnalyzerConfig {
    /// Resolve the completion-service credential: env var first, then the
    /// config file. A missing credential is the one top-level fatal.
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.is_empty() {
                return Ok(key);
            }
        }
        match &self.api_key {
            Some(key) if !key.is_empty() => Ok(key.clone()),
            _ => bail!(
                "no API key configured: set OPENAI_API_KEY or analyzer.api_key in {}",
                Config::path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| "the config file".to_string())
            ),
        }
    }
}

pub fn load() -> Result<Config> {
    let path = Config::path()?;
    if !path.exists() {
        return Ok(Config::default());
    }
    load_from(&path)
}

pub fn load_from(path: &std::path::Path) -> Result<Config> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}
