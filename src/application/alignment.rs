// Alignment engine - merges independently sampled series onto one time axis
use crate::domain::telemetry::RawSeries;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    pub target_id: String,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Alignment {
    pub axis: Vec<DateTime<Utc>>,
    pub series: Vec<AlignedSeries>,
}

/// Align raw series onto the sorted union of their timestamps.
///
/// A value is `Some` only where the target has a successful sample at exactly
/// that instant; everything else stays a gap. Duplicate timestamps within one
/// series resolve to the last sample received. Output series keep input order.
pub fn align(raw: &[RawSeries]) -> Alignment {
    let axis: Vec<DateTime<Utc>> = raw
        .iter()
        .flat_map(|series| series.samples.iter().map(|s| s.timestamp))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let series = raw
        .iter()
        .map(|series| {
            let mut by_time: HashMap<DateTime<Utc>, Option<f64>> =
                HashMap::with_capacity(series.samples.len());
            for sample in &series.samples {
                by_time.insert(sample.timestamp, sample.effective_latency());
            }

            let values = axis
                .iter()
                .map(|ts| by_time.get(ts).copied().flatten())
                .collect();

            AlignedSeries {
                target_id: series.target_id.clone(),
                values,
            }
        })
        .collect();

    Alignment { axis, series }
}
