// Status monitor - polls the latest probe result per target
use crate::application::ping_repository::PingRepository;
use crate::domain::telemetry::TargetStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

#[derive(Clone)]
pub struct StatusMonitor {
    repository: Arc<dyn PingRepository>,
    interval: Duration,
    snapshot: Arc<watch::Sender<Vec<TargetStatus>>>,
}

impl StatusMonitor {
    pub fn new(repository: Arc<dyn PingRepository>, interval: Duration) -> Self {
        let (snapshot, _) = watch::channel(Vec::new());
        Self {
            repository,
            interval,
            snapshot: Arc::new(snapshot),
        }
    }

    pub fn latest(&self) -> Vec<TargetStatus> {
        self.snapshot.borrow().clone()
    }

    /// Fetch once and replace the snapshot. The previous snapshot stays on error.
    pub async fn poll_once(&self) -> anyhow::Result<usize> {
        let statuses = self.repository.latest_status().await?;
        let count = statuses.len();
        self.snapshot.send_replace(statuses);
        Ok(count)
    }

    /// Poll forever on a fixed interval, independent of chart refreshes.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                match self.poll_once().await {
                    Ok(count) => tracing::debug!("Status refreshed for {} targets", count),
                    Err(e) => tracing::warn!("Failed to refresh status: {:#}", e),
                }
            }
        })
    }
}
