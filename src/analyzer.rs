//! Health analyzer — thin client for the external completion service.
//!
//! Failures here never abort the run: the analysis text is substituted with
//! a descriptive error string and the report is printed regardless.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::Deserialize;

use crate::config::AnalyzerConfig;

const SYSTEM_PROMPT: &str = "You are a sarcastic network and system security expert. \
    Analyze the following system snapshot for potential security issues.";

pub struct HealthAnalyzer {
    http: Client,
    config: AnalyzerConfig,
    api_key: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

impl HealthAnalyzer {
    pub fn new(config: AnalyzerConfig, api_key: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            http,
            config,
            api_key,
        })
    }

    /// Send the formatted report for analysis. Any transport, status, or
    /// parse failure comes back as a descriptive string, not an error.
    pub async fn analyze(&self, report: &str) -> String {
        match self.complete(report).await {
            Ok(text) => text,
            Err(e) => format!("Error analyzing system health: {e:#}"),
        }
    }

    async fn complete(&self, report: &str) -> Result<String> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": report},
            ],
        });

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("POST {}", url))?;

        if !resp.status().is_success() {
            bail!("{} returned {}", url, resp.status());
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .with_context(|| format!("parsing response from {}", url))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .context("completion response contained no choices")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn service_failure_becomes_error_text() {
        let config = AnalyzerConfig {
            base_url: "http://127.0.0.1:9".into(),
            ..Default::default()
        };
        let analyzer = HealthAnalyzer::new(config, "sk-test".into()).unwrap();

        let analysis = analyzer.analyze("System Snapshot: ...").await;
        assert!(
            analysis.starts_with("Error analyzing system health:"),
            "{analysis}"
        );
    }
}
