// Chart projector - turns an alignment into the renderer's named series
use crate::application::alignment::Alignment;
use crate::domain::chart::{ChartSeries, ChartState};
use crate::domain::target::TargetRegistry;
use crate::domain::time_window::Granularity;
use chrono::{FixedOffset, Offset, Utc};

/// Suffix appended to a line color to get its translucent fill.
const FILL_ALPHA: &str = "20";

/// Timezone the axis labels are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayLocale {
    pub offset: FixedOffset,
}

impl DisplayLocale {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }
}

pub fn project(
    round: u64,
    alignment: &Alignment,
    registry: &TargetRegistry,
    granularity: Granularity,
    locale: &DisplayLocale,
) -> ChartState {
    let format = granularity.label_format();
    let labels = alignment
        .axis
        .iter()
        .map(|ts| ts.with_timezone(&locale.offset).format(format).to_string())
        .collect();

    let mut ordered: Vec<_> = alignment
        .series
        .iter()
        .filter_map(|aligned| {
            let ordinal = registry.ordinal(&aligned.target_id);
            if ordinal.is_none() {
                tracing::warn!("Dropping series for unknown target {}", aligned.target_id);
            }
            ordinal.map(|ordinal| (ordinal, aligned))
        })
        .collect();
    ordered.sort_by_key(|(ordinal, _)| *ordinal);

    let series = ordered
        .into_iter()
        .filter_map(|(_, aligned)| {
            let target = registry.get(&aligned.target_id)?;
            let color = registry.color_of(&target.id)?;
            Some(ChartSeries {
                target_id: target.id.clone(),
                label: target.display_label(),
                color: color.to_string(),
                background_color: format!("{}{}", color, FILL_ALPHA),
                span_gaps: true,
                data: aligned.values.clone(),
            })
        })
        .collect();

    ChartState {
        round,
        granularity,
        labels,
        series,
    }
}
