//! The sync-log artifact produced at the end of a run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use freightsync_connector::ids::{ConnectionId, MappingId, RecordId, SyncLogId};

use crate::context::SyncErrorDetail;
use crate::types::{SyncStatus, SyncType};

/// Persisted summary of one sync run.
///
/// Produced by [`crate::context::SyncContext::finalize`]; persistence is
/// the caller's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncLog {
    /// Log entry id.
    pub id: SyncLogId,
    /// Connection the run belonged to.
    pub connection_id: ConnectionId,
    /// Mapping the run covered; `None` for full-sync runs.
    pub mapping_id: Option<MappingId>,
    /// Kind of run.
    pub sync_type: SyncType,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub completed_at: DateTime<Utc>,
    /// Total records processed.
    pub records_processed: u32,
    /// Records created in the external system.
    pub records_created: u32,
    /// Records updated in the external system.
    pub records_updated: u32,
    /// Records that failed.
    pub records_failed: u32,
    /// Terminal status.
    pub status: SyncStatus,
    /// Per-record errors, in processing order.
    pub error_details: Vec<SyncErrorDetail>,
}

impl SyncLog {
    /// Ids of the records that failed in this run, in error order.
    ///
    /// Run-level failures without a record id are skipped; the result
    /// feeds [`crate::retry_failed::execute_retry_failed_sync`].
    #[must_use]
    pub fn failed_record_ids(&self) -> Vec<RecordId> {
        self.error_details
            .iter()
            .filter_map(|detail| detail.record_id)
            .collect()
    }
}
