//! Bandwidth-measurement collaborator.
//!
//! Measures throughput by timing a fixed-size HTTP transfer against a
//! speed-test endpoint. Both directions report raw bits per second; the
//! speed-test probe converts to Mbps.

use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;

const DEFAULT_DOWNLOAD_URL: &str = "https://speed.cloudflare.com/__down?bytes=25000000";
const DEFAULT_UPLOAD_URL: &str = "https://speed.cloudflare.com/__up";
const UPLOAD_PAYLOAD_BYTES: usize = 10_000_000;

#[async_trait]
pub trait SpeedMeter: Send + Sync {
    /// Measured download throughput in bits per second.
    async fn measure_download(&self) -> Result<f64>;

    /// Measured upload throughput in bits per second.
    async fn measure_upload(&self) -> Result<f64>;
}

pub struct HttpSpeedMeter {
    http: Client,
    download_url: String,
    upload_url: String,
}

impl HttpSpeedMeter {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            http,
            download_url: DEFAULT_DOWNLOAD_URL.to_string(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
        })
    }
}

#[async_trait]
impl SpeedMeter for HttpSpeedMeter {
    async fn measure_download(&self) -> Result<f64> {
        let started = Instant::now();
        let resp = self
            .http
            .get(&self.download_url)
            .send()
            .await
            .with_context(|| format!("GET {}", self.download_url))?;

        if !resp.status().is_success() {
            bail!("{} returned {}", self.download_url, resp.status());
        }

        let body = resp
            .bytes()
            .await
            .context("reading speed test payload")?;
        let elapsed = started.elapsed().as_secs_f64();
        if elapsed == 0.0 {
            bail!("download completed too fast to measure");
        }
        Ok(body.len() as f64 * 8.0 / elapsed)
    }

    async fn measure_upload(&self) -> Result<f64> {
        let payload = vec![0u8; UPLOAD_PAYLOAD_BYTES];
        let started = Instant::now();
        let resp = self
            .http
            .post(&self.upload_url)
            .body(payload)
            .send()
            .await
            .with_context(|| format!("POST {}", self.upload_url))?;

        if !resp.status().is_success() {
            bail!("{} returned {}", self.upload_url, resp.status());
        }

        let elapsed = started.elapsed().as_secs_f64();
        if elapsed == 0.0 {
            bail!("upload completed too fast to measure");
        }
        Ok(UPLOAD_PAYLOAD_BYTES as f64 * 8.0 / elapsed)
    }
}
