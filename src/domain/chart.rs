// Chart state handed to the renderer
use super::time_window::Granularity;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub target_id: String,
    pub label: String,
    pub color: String,
    pub background_color: String,
    pub span_gaps: bool,
    pub data: Vec<Option<f64>>,
}

/// A complete chart: ordered labels plus equal-length series.
///
/// `round` identifies the refresh round that produced the state; round 0 is
/// the empty chart a session starts with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartState {
    pub round: u64,
    pub granularity: Granularity,
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
}

impl ChartState {
    pub fn empty() -> Self {
        Self {
            round: 0,
            granularity: Granularity::HourMinute,
            labels: Vec::new(),
            series: Vec::new(),
        }
    }
}
