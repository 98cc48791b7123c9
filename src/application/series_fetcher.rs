// Series fetcher - one concurrent backend request per selected target
use crate::application::ping_repository::PingRepository;
use crate::domain::telemetry::RawSeries;
use crate::domain::time_window::TimeWindow;
use futures::future::join_all;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch samples for target {target_id}: {cause:#}")]
    Failure { target_id: String, cause: anyhow::Error },
}

pub async fn fetch(
    repository: &dyn PingRepository,
    target_id: &str,
    window: &TimeWindow,
) -> Result<RawSeries, FetchError> {
    repository
        .ping_samples(target_id, window)
        .await
        .map(|samples| RawSeries::new(target_id.to_string(), samples))
        .map_err(|cause| FetchError::Failure {
            target_id: target_id.to_string(),
            cause,
        })
}

/// Fetch every target concurrently and wait for all of them to settle.
///
/// A failed target contributes an empty series so the other targets still
/// align. Results follow the order of `target_ids`.
pub async fn fetch_all(
    repository: &dyn PingRepository,
    target_ids: &[String],
    window: &TimeWindow,
) -> Vec<RawSeries> {
    let requests = target_ids.iter().map(|id| fetch(repository, id, window));

    join_all(requests)
        .await
        .into_iter()
        .zip(target_ids)
        .map(|(result, id)| match result {
            Ok(series) => {
                tracing::debug!("Fetched {} samples for target {}", series.samples.len(), id);
                series
            }
            Err(e) => {
                tracing::warn!("{}", e);
                RawSeries::empty(id.clone())
            }
        })
        .collect()
}
