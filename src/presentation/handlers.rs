// HTTP request handlers
use crate::application::dashboard_service::Session;
use crate::application::selection::{SelectionCommand, SelectionError};
use crate::domain::chart::ChartState;
use crate::domain::target::color_for_ordinal;
use crate::domain::telemetry::TargetStatus;
use crate::domain::time_window::WindowMode;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct PresetWindowBody {
    pub hours: u32,
}

#[derive(Deserialize)]
pub struct CustomWindowBody {
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct TargetView {
    pub id: String,
    pub label: String,
    pub description: String,
    pub address: Option<String>,
    pub address_hidden: bool,
    pub color: String,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub description: Option<String>,
    pub window: WindowMode,
    pub targets: Vec<TargetView>,
}

impl From<Session> for DashboardView {
    fn from(session: Session) -> Self {
        let targets = session
            .registry
            .targets()
            .iter()
            .enumerate()
            .map(|(ordinal, target)| TargetView {
                id: target.id.clone(),
                label: target.display_label(),
                description: target.description.clone(),
                address: target.address.clone().filter(|_| !target.address_hidden),
                address_hidden: target.address_hidden,
                color: color_for_ordinal(ordinal).to_string(),
                selected: session.selection.is_selected(&target.id),
            })
            .collect();

        Self {
            title: session.info.title,
            description: session.info.description,
            window: session.selection.window(),
            targets,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

fn selection_error_response(error: SelectionError) -> Response {
    let (status, kind) = match &error {
        SelectionError::Window(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.kind()),
        SelectionError::UnknownTarget(_) => (StatusCode::NOT_FOUND, "unknown_target"),
    };
    let body = ErrorBody {
        error: kind,
        message: error.to_string(),
    };
    (status, Json(body)).into_response()
}

async fn run_command(state: &AppState, command: SelectionCommand) -> Response {
    match state.dashboard.execute(command).await {
        Ok(session) => Json(DashboardView::from(session)).into_response(),
        Err(e) => {
            tracing::info!("Rejected selection command: {}", e);
            selection_error_response(e)
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/chart", get(get_chart))
        .route("/api/chart/stream", get(stream_chart))
        .route("/api/status", get(get_status))
        .route("/api/selection/targets/:id/toggle", post(toggle_target))
        .route("/api/selection/all", post(select_all).delete(deselect_all))
        .route("/api/window/preset", put(set_preset_window))
        .route("/api/window/custom", put(set_custom_window))
        .route("/api/refresh", post(refresh))
        .route("/api/reload", post(reload))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    Json(state.dashboard.session().await.into())
}

pub async fn get_chart(State(state): State<Arc<AppState>>) -> Json<ChartState> {
    Json(state.dashboard.chart())
}

/// Push every published chart state, starting with the current one
pub async fn stream_chart(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = WatchStream::new(state.dashboard.subscribe())
        .map(|chart| Event::default().event("chart").json_data(&chart));

    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<Vec<TargetStatus>> {
    Json(state.status.latest())
}

pub async fn toggle_target(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    run_command(&state, SelectionCommand::ToggleTarget(id)).await
}

pub async fn select_all(State(state): State<Arc<AppState>>) -> Response {
    run_command(&state, SelectionCommand::SelectAll).await
}

pub async fn deselect_all(State(state): State<Arc<AppState>>) -> Response {
    run_command(&state, SelectionCommand::DeselectAll).await
}

pub async fn set_preset_window(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PresetWindowBody>,
) -> Response {
    run_command(&state, SelectionCommand::SetPresetWindow(body.hours)).await
}

pub async fn set_custom_window(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CustomWindowBody>,
) -> Response {
    let command = SelectionCommand::SetCustomWindow {
        start: body.start,
        end: body.end,
    };
    run_command(&state, command).await
}

/// Run a refresh round now and return the chart that is current afterwards
pub async fn refresh(State(state): State<Arc<AppState>>) -> Json<ChartState> {
    state.dashboard.refresh().await;
    Json(state.dashboard.chart())
}

/// Refetch targets and start a new session
pub async fn reload(State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard.reload().await {
        Ok(_) => Json(DashboardView::from(state.dashboard.session().await)).into_response(),
        Err(e) => {
            tracing::error!("Reload failed: {:#}", e);
            let body = ErrorBody {
                error: "backend_unavailable",
                message: format!("{:#}", e),
            };
            (StatusCode::BAD_GATEWAY, Json(body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::chart_projector::DisplayLocale;
    use crate::application::dashboard_service::{DashboardService, DashboardSettings};
    use crate::application::status_monitor::StatusMonitor;
    use crate::application::stub_repository::StubRepository;
    use crate::domain::telemetry::Sample;
    use chrono::TimeZone;
    use serde_json::{json, Value};
    use std::time::Duration;

    async fn serve() -> String {
        let mut repo = StubRepository::with_targets(vec![
            StubRepository::target("a"),
            StubRepository::target("b"),
        ]);
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        repo.samples.insert("a".to_string(), vec![Sample::new(ts, true, Some(7.5))]);
        let repo = Arc::new(repo);

        let settings = DashboardSettings {
            fallback_title: "Ping Dashboard".to_string(),
            default_selection: 1,
            default_hours: 1,
            locale: DisplayLocale::utc(),
        };
        let dashboard = DashboardService::new(repo.clone(), settings);
        dashboard.reload().await.unwrap();
        let state = Arc::new(AppState {
            dashboard,
            status: StatusMonitor::new(repo, Duration::from_secs(10)),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_dashboard_view() {
        let base = serve().await;

        let view: Value = reqwest::get(format!("{}/api/dashboard", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(view["title"], "Ping Dashboard");
        assert_eq!(view["window"], json!({ "kind": "preset", "hours": 1 }));
        assert_eq!(view["targets"][0]["selected"], true);
        assert_eq!(view["targets"][1]["selected"], false);
        assert_eq!(view["targets"][1]["color"], "#ef4444");
    }

    #[tokio::test]
    async fn test_chart_endpoint() {
        let base = serve().await;

        let chart: Value = reqwest::get(format!("{}/api/chart", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(chart["labels"], json!(["00:00"]));
        assert_eq!(chart["series"][0]["label"], "Target a (a.example.net)");
        assert_eq!(chart["series"][0]["data"], json!([7.5]));
        assert_eq!(chart["series"][0]["span_gaps"], true);
    }

    #[tokio::test]
    async fn test_toggle_and_unknown_target() {
        let base = serve().await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{}/api/selection/targets/b/toggle", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let view: Value = response.json().await.unwrap();
        assert_eq!(view["targets"][1]["selected"], true);

        let response = client
            .post(format!("{}/api/selection/targets/zzz/toggle", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_custom_window_rejected() {
        let base = serve().await;
        let client = reqwest::Client::new();

        let response = client
            .put(format!("{}/api/window/custom", base))
            .json(&json!({ "start": "2024-01-02T00:00:00Z", "end": "2024-01-01T00:00:00Z" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "inverted_range");

        let response = client
            .put(format!("{}/api/window/custom", base))
            .json(&json!({ "start": "2024-01-01T00:00:00Z" }))
            .send()
            .await
            .unwrap();
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "incomplete_range");

        let view: Value = reqwest::get(format!("{}/api/dashboard", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(view["window"]["kind"], "preset");
    }

    #[tokio::test]
    async fn test_preset_window_and_refresh() {
        let base = serve().await;
        let client = reqwest::Client::new();

        let view: Value = client
            .put(format!("{}/api/window/preset", base))
            .json(&json!({ "hours": 168 }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(view["window"], json!({ "kind": "preset", "hours": 168 }));

        let chart: Value = client
            .post(format!("{}/api/refresh", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(chart["granularity"], "month_day_hour");
        assert_eq!(chart["labels"], json!(["01/01 00:00"]));
    }

    #[tokio::test]
    async fn test_out_of_range_preset_rejected() {
        let base = serve().await;
        let client = reqwest::Client::new();

        let response = client
            .put(format!("{}/api/window/preset", base))
            .json(&json!({ "hours": u32::MAX }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "hours_out_of_range");

        let response = client.post(format!("{}/api/refresh", base)).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_deselect_all_clears_chart() {
        let base = serve().await;
        let client = reqwest::Client::new();

        client
            .delete(format!("{}/api/selection/all", base))
            .send()
            .await
            .unwrap();
        let chart: Value = client
            .post(format!("{}/api/refresh", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(chart["labels"], json!([]));
        assert_eq!(chart["series"], json!([]));
    }
}
