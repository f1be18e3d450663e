//! Full-sync orchestrator: run every active mapping of a connection.

use async_trait::async_trait;
use tracing::{info, warn};

use freightsync_connector::ids::{ConnectionId, MappingId};
use freightsync_connector::retry::{RetryPolicy, TokenRefresher};
use freightsync_connector::traits::{RecordPush, SyncRecord};

use crate::batch::{process_batch, RecordSyncResult};
use crate::context::SyncContext;
use crate::error::{SyncError, MAPPING_ERROR};
use crate::mapping::{ExternalIdMapping, SyncMapping};
use crate::types::SyncType;

/// Injected data access for full syncs.
///
/// Implemented by the orchestration layer on top of its storage; the
/// engine never queries storage directly.
#[async_trait]
pub trait SyncDataLoader: Send + Sync {
    /// Load the records to sync for a mapping.
    async fn load_records(&self, mapping: &SyncMapping) -> Result<Vec<SyncRecord>, SyncError>;

    /// Load the existing external-id mappings for a mapping.
    async fn load_id_mappings(
        &self,
        mapping: &SyncMapping,
    ) -> Result<Vec<ExternalIdMapping>, SyncError>;
}

/// Outcome of one mapping inside a full sync.
#[derive(Debug)]
pub struct MappingSyncOutcome {
    /// Mapping this outcome belongs to.
    pub mapping_id: MappingId,
    /// Per-record results; empty when the mapping failed before batching.
    pub results: Vec<RecordSyncResult>,
    /// Captured loader error, when the mapping failed as a whole.
    pub error: Option<String>,
}

/// Result of a full sync across all active mappings.
#[derive(Debug)]
pub struct FullSyncReport {
    /// Shared context accumulated across every mapping.
    pub context: SyncContext,
    /// Per-mapping outcomes, in mapping order.
    pub mappings: Vec<MappingSyncOutcome>,
}

/// Select the mappings a full sync will run: the active subset, in the
/// original order.
#[must_use]
pub fn prepare_full_sync(mappings: &[SyncMapping]) -> Vec<SyncMapping> {
    mappings.iter().filter(|m| m.is_active).cloned().collect()
}

/// Run every active mapping of a connection in one pass.
///
/// One shared `full_sync` context spans all mappings. A mapping whose
/// loader fails is recorded as a mapping-level failure (one synthetic
/// context error with code [`MAPPING_ERROR`]) and its siblings keep
/// running — failure isolation is per-mapping, mirroring the per-record
/// isolation inside each batch.
pub async fn execute_full_sync(
    connection_id: ConnectionId,
    mappings: &[SyncMapping],
    loader: &dyn SyncDataLoader,
    adapter: &dyn RecordPush,
    policy: &RetryPolicy,
    refresher: Option<&TokenRefresher>,
) -> FullSyncReport {
    let active = prepare_full_sync(mappings);
    let mut context = SyncContext::new(connection_id, None, SyncType::FullSync);
    let mut outcomes = Vec::with_capacity(active.len());

    info!(
        connection_id = %connection_id,
        mappings = active.len(),
        "Starting full sync"
    );

    for mapping in &active {
        let loaded = match loader.load_records(mapping).await {
            Ok(records) => match loader.load_id_mappings(mapping).await {
                Ok(id_mappings) => Ok((records, id_mappings)),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        match loaded {
            Ok((records, id_mappings)) => {
                let lookup =
                    ExternalIdMapping::lookup_for_table(&id_mappings, &mapping.local_table);
                let prepared: Vec<SyncRecord> = records
                    .iter()
                    .map(|record| SyncRecord::new(record.id, mapping.project(&record.data)))
                    .collect();

                let results = process_batch(&prepared, &lookup, adapter, policy, refresher).await;
                context = context.apply_results(&results);
                outcomes.push(MappingSyncOutcome {
                    mapping_id: mapping.id,
                    results,
                    error: None,
                });
            }
            Err(error) => {
                let message = error.to_string();
                warn!(
                    mapping_id = %mapping.id,
                    local_table = %mapping.local_table,
                    error = %message,
                    "Mapping failed during full sync"
                );
                context = context.record_failure(None, MAPPING_ERROR, message.clone());
                outcomes.push(MappingSyncOutcome {
                    mapping_id: mapping.id,
                    results: Vec::new(),
                    error: Some(message),
                });
            }
        }
    }

    info!(
        connection_id = %connection_id,
        processed = context.records_processed,
        created = context.records_created,
        updated = context.records_updated,
        failed = context.records_failed,
        "Full sync finished"
    );

    FullSyncReport {
        context,
        mappings: outcomes,
    }
}
