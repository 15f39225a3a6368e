use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};

use crate::kpis::Kpi;

use super::{BackendId, CollectError, CollectionResult, Collector};

type Unit = JoinHandle<Result<Vec<Kpi>, CollectError>>;

/// Runs one pass over all collectors.
///
/// This function is responsible for:
/// - Spawning one task per collector, all at once
/// - Waiting for every task (join barrier) or the pass deadline
/// - Merging successful KPIs and recording failures per backend
///
/// DESIGN:
/// - Scatter-gather: collectors run independently of each other
/// - The caller is the single merging owner, tasks share nothing
/// - Failures are isolated per collector and never fail the pass
///
/// With `pass_timeout` set, collectors still running when it expires
/// are aborted and recorded as `CollectError::DeadlineExceeded`.
pub async fn run_pass(
    collectors: &[Arc<dyn Collector>],
    pass_timeout: Option<Duration>,
) -> CollectionResult {
    let deadline = pass_timeout.map(|t| (Instant::now() + t, t));

    let units: Vec<(BackendId, Unit)> = collectors
        .iter()
        .map(|collector| {
            let collector = collector.clone();
            let id = collector.id().clone();
            let unit = tokio::spawn(async move { collector.collect().await });
            (id, unit)
        })
        .collect();

    let mut result = CollectionResult::default();

    for (id, unit) in units {
        match join_unit(unit, deadline).await {
            Ok(kpis) => {
                log::debug!("collector {} returned {} kpis", id, kpis.len());
                result.kpis.extend(kpis);
                result.succeeded.push(id);
            }
            Err(e) => {
                log::error!("collector {} failed: {}", id, e);
                result.failures.push((id, e));
            }
        }
    }

    result
}

/// Waits for one unit, honoring the shared pass deadline.
///
/// Units keep running while earlier ones are awaited, so waiting in
/// order costs nothing; a unit that already finished is returned even
/// once the deadline has passed.
async fn join_unit(
    mut unit: Unit,
    deadline: Option<(Instant, Duration)>,
) -> Result<Vec<Kpi>, CollectError> {
    let joined = match deadline {
        None => unit.await,
        Some((at, limit)) => match timeout_at(at, &mut unit).await {
            Ok(joined) => joined,
            Err(_) => {
                unit.abort();
                return Err(CollectError::DeadlineExceeded(limit));
            }
        },
    };

    joined.map_err(|e| CollectError::Aborted(e.to_string()))?
}
