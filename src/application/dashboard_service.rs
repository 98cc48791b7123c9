// Dashboard service - Session lifecycle and the chart refresh pipeline
use crate::application::alignment::align;
use crate::application::chart_projector::{project, DisplayLocale};
use crate::application::ping_repository::PingRepository;
use crate::application::selection::{SelectionCommand, SelectionError, SelectionState};
use crate::application::series_fetcher::fetch_all;
use crate::domain::chart::ChartState;
use crate::domain::target::TargetRegistry;
use crate::domain::telemetry::DashboardInfo;
use crate::domain::time_window::{resolve, WindowError};
use anyhow::Context;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub fallback_title: String,
    pub default_selection: usize,
    pub default_hours: u32,
    pub locale: DisplayLocale,
}

/// Everything one browser session works against. Replaced as a whole on reload.
#[derive(Debug, Clone)]
pub struct Session {
    pub info: DashboardInfo,
    pub registry: Arc<TargetRegistry>,
    pub selection: SelectionState,
}

impl Session {
    fn new(info: DashboardInfo, registry: TargetRegistry, settings: &DashboardSettings) -> Self {
        let selection =
            SelectionState::initial(&registry, settings.default_selection, settings.default_hours);
        Self {
            info,
            registry: Arc::new(registry),
            selection,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Published { round: u64 },
    /// A newer round already published; this round's chart was dropped.
    Discarded { round: u64, current: u64 },
    InvalidWindow { round: u64, error: WindowError },
}

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn PingRepository>,
    settings: DashboardSettings,
    session: Arc<RwLock<Session>>,
    rounds: Arc<AtomicU64>,
    chart: Arc<watch::Sender<ChartState>>,
}

impl DashboardService {
    pub fn new(repository: Arc<dyn PingRepository>, settings: DashboardSettings) -> Self {
        let info = DashboardInfo::new(None, None, &settings.fallback_title);
        let session = Session::new(info, TargetRegistry::default(), &settings);
        let (chart, _) = watch::channel(ChartState::empty());

        Self {
            repository,
            settings,
            session: Arc::new(RwLock::new(session)),
            rounds: Arc::new(AtomicU64::new(0)),
            chart: Arc::new(chart),
        }
    }

    /// Fetch dashboard info and targets, start a fresh session and chart it.
    pub async fn reload(&self) -> anyhow::Result<RefreshOutcome> {
        let remote = match self.repository.dashboard_config().await {
            Ok(remote) => remote,
            Err(e) => {
                tracing::warn!("Failed to load dashboard config, using defaults: {:#}", e);
                Default::default()
            }
        };
        let info = DashboardInfo::new(remote.title, remote.description, &self.settings.fallback_title);

        let targets = self
            .repository
            .list_targets()
            .await
            .context("Failed to load monitored targets")?;
        let registry = TargetRegistry::new(targets);
        if registry.is_empty() {
            tracing::warn!("Backend reported no monitored targets");
        }

        tracing::info!("Loaded {} targets for dashboard \"{}\"", registry.len(), info.title);

        *self.session.write().await = Session::new(info, registry, &self.settings);
        Ok(self.refresh().await)
    }

    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    pub fn chart(&self) -> ChartState {
        self.chart.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ChartState> {
        self.chart.subscribe()
    }

    /// Apply a selection command and schedule a refresh when it asks for one.
    ///
    /// A rejected command leaves the session untouched.
    pub async fn execute(&self, command: SelectionCommand) -> Result<Session, SelectionError> {
        let (session, needs_refresh) = {
            let mut session = self.session.write().await;
            let transition = session
                .selection
                .apply(command, &session.registry, Utc::now())?;
            session.selection = transition.next;
            (session.clone(), transition.needs_refresh)
        };

        if needs_refresh {
            self.spawn_refresh();
        }
        Ok(session)
    }

    pub fn spawn_refresh(&self) {
        let service = self.clone();
        tokio::spawn(async move {
            service.refresh().await;
        });
    }

    /// Run one fetch, align and project round.
    ///
    /// Rounds are numbered when they read the session. A round only publishes
    /// if no newer round has published yet, so overlapping refreshes can
    /// complete in any order.
    pub async fn refresh(&self) -> RefreshOutcome {
        let (round, registry, selection) = {
            let session = self.session.read().await;
            let round = self.rounds.fetch_add(1, Ordering::SeqCst) + 1;
            (round, session.registry.clone(), session.selection.clone())
        };

        let window = match resolve(selection.window().into(), Utc::now()) {
            Ok(window) => window,
            Err(error) => {
                tracing::warn!("Refresh round {} skipped: {}", round, error);
                return RefreshOutcome::InvalidWindow { round, error };
            }
        };

        let target_ids = selection.selected_ids(&registry);
        tracing::debug!(
            "Refresh round {}: {} targets from {} to {}",
            round,
            target_ids.len(),
            window.start,
            window.end
        );

        let raw = fetch_all(self.repository.as_ref(), &target_ids, &window).await;
        let alignment = align(&raw);
        let chart = project(round, &alignment, &registry, window.granularity(), &self.settings.locale);

        let mut current = 0;
        let published = self.chart.send_if_modified(|state| {
            current = state.round;
            if round > state.round {
                *state = chart;
                true
            } else {
                false
            }
        });

        if published {
            tracing::debug!("Published chart round {} with {} points", round, alignment.axis.len());
            RefreshOutcome::Published { round }
        } else {
            tracing::debug!("Discarded stale chart round {} (current {})", round, current);
            RefreshOutcome::Discarded { round, current }
        }
    }
}
