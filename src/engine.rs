// Collection episode: one task per collector, unordered gather, then aggregation.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::instrument;

use crate::aggregator;
use crate::collectors::{self, CollectPlan, CollectorOutput, Domain};
use crate::error::ReportError;
use crate::host::Host;
use crate::models::Snapshot;

/// Runs all seven collectors concurrently and returns their outputs in completion order.
#[instrument(skip_all, fields(operation = "run_collectors", fast = plan.policy.is_enabled()))]
pub async fn run_collectors<H: Host>(host: Arc<H>, plan: CollectPlan) -> Vec<CollectorOutput> {
    let mut tasks = JoinSet::new();
    for domain in Domain::ALL {
        let host = host.clone();
        tasks.spawn(async move { collectors::collect(domain, host.as_ref(), &plan).await });
    }

    let mut outputs = Vec::with_capacity(Domain::ALL.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(output) => {
                tracing::debug!(domain = ?output.domain(), "collector finished");
                outputs.push(output);
            }
            // Its domain stays empty; the report still renders.
            Err(e) => tracing::warn!(error = %e, operation = "run_collectors", "collector task failed"),
        }
    }
    outputs
}

/// One full episode. Fails only when the OS identity could not be determined.
pub async fn collect_snapshot<H: Host>(
    host: Arc<H>,
    plan: CollectPlan,
) -> Result<Snapshot, ReportError> {
    let outputs = run_collectors(host, plan).await;
    let snapshot = aggregator::aggregate(outputs);
    if snapshot.os.name.is_none() {
        return Err(ReportError::OsIdentity);
    }
    Ok(snapshot)
}
