// Repository trait for the monitoring backend
use crate::domain::target::Target;
use crate::domain::telemetry::{Sample, TargetStatus};
use crate::domain::time_window::TimeWindow;
use async_trait::async_trait;

/// Dashboard settings published by the backend
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteDashboardConfig {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[async_trait]
pub trait PingRepository: Send + Sync {
    /// Title and description configured on the backend
    async fn dashboard_config(&self) -> anyhow::Result<RemoteDashboardConfig>;

    /// All monitored targets, in backend order
    async fn list_targets(&self) -> anyhow::Result<Vec<Target>>;

    /// Latest probe result per target
    async fn latest_status(&self) -> anyhow::Result<Vec<TargetStatus>>;

    /// Raw samples of one target within a window, in arrival order
    async fn ping_samples(&self, target_id: &str, window: &TimeWindow) -> anyhow::Result<Vec<Sample>>;
}
