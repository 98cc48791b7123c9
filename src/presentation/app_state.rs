// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::status_monitor::StatusMonitor;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: DashboardService,
    pub status: StatusMonitor,
}
