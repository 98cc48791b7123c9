use crate::application::chart_projector::DisplayLocale;
use crate::application::dashboard_service::DashboardSettings;
use chrono::FixedOffset;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub dashboard: DashboardSection,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSection {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_hours")]
    pub default_hours: u32,
    #[serde(default = "default_selection")]
    pub default_selection: usize,
    #[serde(default = "default_status_interval_secs")]
    pub status_interval_secs: u64,
    /// Offset applied to axis labels, in minutes east of UTC
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8081".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_title() -> String {
    "Ping Dashboard".to_string()
}

fn default_hours() -> u32 {
    1
}

fn default_selection() -> usize {
    3
}

fn default_status_interval_secs() -> u64 {
    10
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self {
            title: default_title(),
            default_hours: default_hours(),
            default_selection: default_selection(),
            status_interval_secs: default_status_interval_secs(),
            utc_offset_minutes: 0,
        }
    }
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl DashboardSection {
    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval_secs.max(1))
    }

    pub fn settings(&self) -> anyhow::Result<DashboardSettings> {
        let offset = self
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| anyhow::anyhow!("utc_offset_minutes out of range: {}", self.utc_offset_minutes))?;
        if self.default_hours == 0 {
            anyhow::bail!("default_hours must be positive");
        }

        Ok(DashboardSettings {
            fallback_title: self.title.clone(),
            default_selection: self.default_selection,
            default_hours: self.default_hours,
            locale: DisplayLocale::new(offset),
        })
    }
}

/// Load `config/dashboard.*` (optional) overlaid with `DASHBOARD__*` variables
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
