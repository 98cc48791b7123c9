// In-memory repository for service tests
use crate::application::ping_repository::{PingRepository, RemoteDashboardConfig};
use crate::domain::target::Target;
use crate::domain::telemetry::{Sample, TargetStatus};
use crate::domain::time_window::TimeWindow;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct StubRepository {
    pub config: RemoteDashboardConfig,
    pub targets: Mutex<Vec<Target>>,
    pub samples: HashMap<String, Vec<Sample>>,
    pub failing: HashSet<String>,
    /// Popped once per `ping_samples` call
    pub delays: Mutex<VecDeque<Duration>>,
    pub calls: Mutex<Vec<(String, TimeWindow)>>,
    /// `None` makes `latest_status` fail
    pub status: Mutex<Option<Vec<TargetStatus>>>,
}

impl StubRepository {
    pub fn with_targets(targets: Vec<Target>) -> Self {
        Self {
            targets: Mutex::new(targets),
            ..Default::default()
        }
    }

    pub fn target(id: &str) -> Target {
        Target::new(
            id.to_string(),
            format!("Target {}", id),
            Some(format!("{}.example.net", id)),
            false,
        )
    }

    pub fn calls(&self) -> Vec<(String, TimeWindow)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PingRepository for StubRepository {
    async fn dashboard_config(&self) -> anyhow::Result<RemoteDashboardConfig> {
        Ok(self.config.clone())
    }

    async fn list_targets(&self) -> anyhow::Result<Vec<Target>> {
        Ok(self.targets.lock().unwrap().clone())
    }

    async fn latest_status(&self) -> anyhow::Result<Vec<TargetStatus>> {
        match self.status.lock().unwrap().clone() {
            Some(status) => Ok(status),
            None => anyhow::bail!("status endpoint unavailable"),
        }
    }

    async fn ping_samples(&self, target_id: &str, window: &TimeWindow) -> anyhow::Result<Vec<Sample>> {
        let delay = self.delays.lock().unwrap().pop_front();
        self.calls
            .lock()
            .unwrap()
            .push((target_id.to_string(), *window));

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(target_id) {
            anyhow::bail!("connection refused for {}", target_id);
        }

        Ok(self.samples.get(target_id).cloned().unwrap_or_default())
    }
}
