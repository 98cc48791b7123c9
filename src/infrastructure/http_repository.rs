// HTTP repository for the monitoring backend's REST API
use crate::application::ping_repository::{PingRepository, RemoteDashboardConfig};
use crate::domain::target::Target;
use crate::domain::telemetry::{Sample, TargetStatus};
use crate::domain::time_window::TimeWindow;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpPingRepository {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ConfigResponse {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TargetResponse {
    id: String,
    description: String,
    #[serde(default)]
    addr: Option<String>,
    #[serde(default)]
    hide_addr: bool,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    target_id: Option<String>,
    description: String,
    success: bool,
    #[serde(default)]
    latency: Option<f64>,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    addr: Option<String>,
    #[serde(default)]
    hide_addr: bool,
}

#[derive(Debug, Deserialize)]
struct SampleResponse {
    timestamp: DateTime<Utc>,
    success: bool,
    #[serde(default)]
    latency: Option<f64>,
}

impl HttpPingRepository {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn ping_data_url(&self, target_id: &str, window: &TimeWindow) -> String {
        let mut url = format!(
            "{}/api/ping-data?target_id={}",
            self.base_url,
            urlencoding::encode(target_id)
        );

        match window.lookback_hours {
            Some(hours) => url.push_str(&format!("&hours={}", hours)),
            None => {
                let start = window.start.to_rfc3339_opts(SecondsFormat::Millis, true);
                let end = window.end.to_rfc3339_opts(SecondsFormat::Millis, true);
                url.push_str(&format!(
                    "&start_time={}&end_time={}",
                    urlencoding::encode(&start),
                    urlencoding::encode(&end)
                ));
            }
        }

        url
    }

    /// GET a JSON list. The backend encodes an empty list as `null`.
    async fn get_list<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let items: Option<Vec<T>> = self.get_json(url).await?;
        Ok(items.unwrap_or_default())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Backend request {} failed with status {}: {}", url, status, body);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }
}

#[async_trait]
impl PingRepository for HttpPingRepository {
    async fn dashboard_config(&self) -> Result<RemoteDashboardConfig> {
        let url = format!("{}/api/config", self.base_url);
        let config: ConfigResponse = self.get_json(&url).await?;

        Ok(RemoteDashboardConfig {
            title: config.title,
            description: config.description,
        })
    }

    async fn list_targets(&self) -> Result<Vec<Target>> {
        let url = format!("{}/api/targets", self.base_url);
        let targets: Vec<TargetResponse> = self.get_list(&url).await?;

        Ok(targets
            .into_iter()
            .map(|t| Target::new(t.id, t.description, t.addr, t.hide_addr))
            .collect())
    }

    async fn latest_status(&self) -> Result<Vec<TargetStatus>> {
        let url = format!("{}/api/status", self.base_url);
        let statuses: Vec<StatusResponse> = self.get_list(&url).await?;

        Ok(statuses
            .into_iter()
            .map(|s| {
                TargetStatus::new(
                    s.target_id,
                    s.description,
                    s.success,
                    s.latency,
                    s.timestamp,
                    s.addr,
                    s.hide_addr,
                )
            })
            .collect())
    }

    async fn ping_samples(&self, target_id: &str, window: &TimeWindow) -> Result<Vec<Sample>> {
        let url = self.ping_data_url(target_id, window);
        let samples: Vec<SampleResponse> = self.get_list(&url).await?;

        Ok(samples
            .into_iter()
            .map(|s| Sample::new(s.timestamp, s.success, s.latency))
            .collect())
    }
}
