//! Retry-failed orchestrator: re-run only the records that failed in a
//! prior sync run.

use std::collections::HashSet;

use tracing::info;

use freightsync_connector::ids::RecordId;
use freightsync_connector::retry::{RetryPolicy, TokenRefresher};
use freightsync_connector::traits::{RecordPush, SyncRecord};

use crate::batch::{process_batch, RecordSyncResult};
use crate::context::SyncContext;
use crate::log::SyncLog;
use crate::mapping::{ExternalIdMapping, SyncMapping};
use crate::types::SyncType;

/// Result of one retry-failed run.
#[derive(Debug)]
pub struct RetryFailedOutcome {
    /// Accumulated counters and errors, ready to finalize.
    pub context: SyncContext,
    /// Per-record results for the retried records, in record order.
    pub results: Vec<RecordSyncResult>,
}

/// Re-run the batch processor over exactly the previously-failed records.
///
/// `failed_ids` is the explicit failure list from the prior run
/// (typically [`SyncLog::failed_record_ids`]); the record set is
/// filtered down to those ids, so records that succeeded in the original
/// run are never reprocessed.
pub async fn execute_retry_failed_sync(
    prior: &SyncLog,
    mapping: &SyncMapping,
    records: &[SyncRecord],
    failed_ids: &[RecordId],
    existing: &[ExternalIdMapping],
    adapter: &dyn RecordPush,
    policy: &RetryPolicy,
    refresher: Option<&TokenRefresher>,
) -> RetryFailedOutcome {
    let failed: HashSet<RecordId> = failed_ids.iter().copied().collect();
    let retryable: Vec<SyncRecord> = records
        .iter()
        .filter(|record| failed.contains(&record.id))
        .map(|record| SyncRecord::new(record.id, mapping.project(&record.data)))
        .collect();

    info!(
        prior_log_id = %prior.id,
        mapping_id = %mapping.id,
        failed_in_prior_run = failed_ids.len(),
        retrying = retryable.len(),
        "Retrying failed records"
    );

    let context = SyncContext::new(mapping.connection_id, Some(mapping.id), SyncType::RetryFailed);
    let lookup = ExternalIdMapping::lookup_for_table(existing, &mapping.local_table);

    let results = process_batch(&retryable, &lookup, adapter, policy, refresher).await;
    let context = context.apply_results(&results);

    RetryFailedOutcome { context, results }
}
