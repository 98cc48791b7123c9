// Ping telemetry domain models
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub latency: Option<f64>,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, success: bool, latency: Option<f64>) -> Self {
        Self {
            timestamp,
            success,
            latency,
        }
    }

    /// Latency only counts for successful probes, whatever the transport sent.
    pub fn effective_latency(&self) -> Option<f64> {
        if self.success { self.latency } else { None }
    }
}

/// Samples of one target for one window, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeries {
    pub target_id: String,
    pub samples: Vec<Sample>,
}

impl RawSeries {
    pub fn new(target_id: String, samples: Vec<Sample>) -> Self {
        Self { target_id, samples }
    }

    pub fn empty(target_id: String) -> Self {
        Self::new(target_id, Vec::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LatencyGrade {
    Excellent,
    Good,
    Fair,
    Poor,
    Offline,
}

impl LatencyGrade {
    pub fn classify(success: bool, latency: Option<f64>) -> Self {
        match (success, latency) {
            (true, Some(ms)) if ms < 50.0 => LatencyGrade::Excellent,
            (true, Some(ms)) if ms < 100.0 => LatencyGrade::Good,
            (true, Some(ms)) if ms < 200.0 => LatencyGrade::Fair,
            (true, Some(_)) => LatencyGrade::Poor,
            _ => LatencyGrade::Offline,
        }
    }
}

/// Most recent probe result of one target, as shown on the status cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetStatus {
    pub target_id: Option<String>,
    pub description: String,
    pub success: bool,
    pub latency: Option<f64>,
    pub timestamp: DateTime<Utc>,
    pub address: Option<String>,
    pub address_hidden: bool,
    pub grade: LatencyGrade,
}

impl TargetStatus {
    pub fn new(
        target_id: Option<String>,
        description: String,
        success: bool,
        latency: Option<f64>,
        timestamp: DateTime<Utc>,
        address: Option<String>,
        address_hidden: bool,
    ) -> Self {
        let latency = if success { latency } else { None };
        let address = if address_hidden {
            None
        } else {
            address.filter(|a| !a.is_empty())
        };
        Self {
            target_id,
            description,
            success,
            latency,
            timestamp,
            address,
            address_hidden,
            grade: LatencyGrade::classify(success, latency),
        }
    }
}

/// Title and description shown above the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardInfo {
    pub title: String,
    pub description: Option<String>,
}

impl DashboardInfo {
    pub fn new(title: Option<String>, description: Option<String>, fallback_title: &str) -> Self {
        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| fallback_title.to_string());
        let description = description.filter(|d| !d.trim().is_empty());
        Self { title, description }
    }
}
