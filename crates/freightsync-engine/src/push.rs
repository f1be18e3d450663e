//! Push orchestrator: send local records to an external system.

use tracing::info;

use freightsync_connector::retry::{RetryPolicy, TokenRefresher};
use freightsync_connector::traits::{RecordPush, SyncRecord};

use crate::batch::{process_batch, RecordSyncResult};
use crate::context::SyncContext;
use crate::mapping::{ExternalIdMapping, SyncMapping};
use crate::types::SyncType;

/// Result of one push sync run.
#[derive(Debug)]
pub struct PushSyncOutcome {
    /// Accumulated counters and errors, ready to finalize.
    pub context: SyncContext,
    /// Per-record results, in record order.
    pub results: Vec<RecordSyncResult>,
}

/// Push every record of a mapping to the external system.
///
/// Builds the local-id → external-id lookup from the existing id
/// mappings of this mapping's local table, projects each payload through
/// the mapping's field rules, and delegates the batch to the processor.
/// Adapter failures are captured per record; this function never
/// propagates them.
pub async fn execute_push_sync(
    mapping: &SyncMapping,
    records: &[SyncRecord],
    existing: &[ExternalIdMapping],
    adapter: &dyn RecordPush,
    policy: &RetryPolicy,
    refresher: Option<&TokenRefresher>,
) -> PushSyncOutcome {
    let context = SyncContext::new(mapping.connection_id, Some(mapping.id), SyncType::Push);
    let lookup = ExternalIdMapping::lookup_for_table(existing, &mapping.local_table);

    let prepared: Vec<SyncRecord> = records
        .iter()
        .map(|record| SyncRecord::new(record.id, mapping.project(&record.data)))
        .collect();

    let results = process_batch(&prepared, &lookup, adapter, policy, refresher).await;
    let context = context.apply_results(&results);

    info!(
        mapping_id = %mapping.id,
        local_table = %mapping.local_table,
        processed = context.records_processed,
        created = context.records_created,
        updated = context.records_updated,
        failed = context.records_failed,
        "Push sync finished"
    );

    PushSyncOutcome { context, results }
}
