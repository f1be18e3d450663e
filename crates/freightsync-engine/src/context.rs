//! Immutable sync-run accumulator.
//!
//! A [`SyncContext`] is a pure value threaded through one sync
//! invocation: every update consumes the old context and returns a new
//! one, so the additive invariants are trivially testable and nothing
//! aliases across concurrent runs.
//!
//! Invariants (after every transformation):
//! - `records_processed == records_created + records_updated + records_failed`
//! - `errors.len() == records_failed`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use freightsync_connector::ids::{ConnectionId, MappingId, RecordId, SyncLogId};

use crate::batch::RecordSyncResult;
use crate::log::SyncLog;
use crate::types::{SyncOperation, SyncStatus, SyncType};

/// One per-record (or synthetic run-level) error captured during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncErrorDetail {
    /// Failed record id; `None` for run-level failures (unsupported
    /// pull, mapping loader errors).
    pub record_id: Option<RecordId>,
    /// Machine-readable error code.
    pub error_code: String,
    /// Human-readable error message.
    pub error_message: String,
    /// When the failure was recorded.
    pub timestamp: DateTime<Utc>,
}

/// Counters and errors for one sync run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncContext {
    /// Connection being synced.
    pub connection_id: ConnectionId,
    /// Mapping being synced; `None` for full-sync runs spanning many.
    pub mapping_id: Option<MappingId>,
    /// Kind of run.
    pub sync_type: SyncType,
    /// Total records processed so far.
    pub records_processed: u32,
    /// Records created in the external system.
    pub records_created: u32,
    /// Records updated in the external system.
    pub records_updated: u32,
    /// Records that failed.
    pub records_failed: u32,
    /// Per-record errors, in processing order.
    pub errors: Vec<SyncErrorDetail>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
}

impl SyncContext {
    /// Create a fresh context with zero counts.
    #[must_use]
    pub fn new(
        connection_id: ConnectionId,
        mapping_id: Option<MappingId>,
        sync_type: SyncType,
    ) -> Self {
        Self {
            connection_id,
            mapping_id,
            sync_type,
            records_processed: 0,
            records_created: 0,
            records_updated: 0,
            records_failed: 0,
            errors: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Record one successful create.
    #[must_use]
    pub fn record_create(mut self) -> Self {
        self.records_processed += 1;
        self.records_created += 1;
        self
    }

    /// Record one successful update.
    #[must_use]
    pub fn record_update(mut self) -> Self {
        self.records_processed += 1;
        self.records_updated += 1;
        self
    }

    /// Record one failure.
    ///
    /// `record_id` is `None` for run-level failures that are not tied to
    /// a specific record.
    #[must_use]
    pub fn record_failure(
        mut self,
        record_id: Option<RecordId>,
        error_code: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        self.records_processed += 1;
        self.records_failed += 1;
        self.errors.push(SyncErrorDetail {
            record_id,
            error_code: error_code.into(),
            error_message: error_message.into(),
            timestamp: Utc::now(),
        });
        self
    }

    /// Fold a batch of record results into the context, in order.
    #[must_use]
    pub fn apply_results(self, results: &[RecordSyncResult]) -> Self {
        results.iter().fold(self, |ctx, result| {
            if result.success {
                match result.operation {
                    SyncOperation::Create => ctx.record_create(),
                    SyncOperation::Update => ctx.record_update(),
                }
            } else {
                ctx.record_failure(
                    Some(result.record_id),
                    result
                        .error_code
                        .clone()
                        .unwrap_or_else(|| crate::error::UNKNOWN_ERROR.to_string()),
                    result.error_message.clone().unwrap_or_default(),
                )
            }
        })
    }

    /// Terminal status this run would finalize with.
    ///
    /// `Completed` when nothing failed (zero-record runs included);
    /// `Failed` when records were processed and none succeeded;
    /// `Partial` otherwise.
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        if self.records_failed == 0 {
            SyncStatus::Completed
        } else if self.records_processed > 0
            && self.records_created + self.records_updated == 0
        {
            SyncStatus::Failed
        } else {
            SyncStatus::Partial
        }
    }

    /// Finalize the run into a sync-log entry for the caller to persist.
    #[must_use]
    pub fn finalize(self, log_id: SyncLogId) -> SyncLog {
        let status = self.status();
        SyncLog {
            id: log_id,
            connection_id: self.connection_id,
            mapping_id: self.mapping_id,
            sync_type: self.sync_type,
            started_at: self.started_at,
            completed_at: Utc::now(),
            records_processed: self.records_processed,
            records_created: self.records_created,
            records_updated: self.records_updated,
            records_failed: self.records_failed,
            status,
            error_details: self.errors,
        }
    }

    #[cfg(test)]
    fn assert_invariants(&self) {
        assert_eq!(
            self.records_processed,
            self.records_created + self.records_updated + self.records_failed
        );
        assert_eq!(self.errors.len() as u32, self.records_failed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn context() -> SyncContext {
        SyncContext::new(ConnectionId::new(), Some(MappingId::new()), SyncType::Push)
    }

    #[test]
    fn test_new_context_is_empty() {
        let ctx = context();
        assert_eq!(ctx.records_processed, 0);
        assert_eq!(ctx.records_created, 0);
        assert_eq!(ctx.records_updated, 0);
        assert_eq!(ctx.records_failed, 0);
        assert!(ctx.errors.is_empty());
        ctx.assert_invariants();
    }

    #[test]
    fn test_record_create_and_update() {
        let ctx = context().record_create().record_update().record_create();
        assert_eq!(ctx.records_processed, 3);
        assert_eq!(ctx.records_created, 2);
        assert_eq!(ctx.records_updated, 1);
        ctx.assert_invariants();
    }

    #[test]
    fn test_record_failure_appends_error() {
        let id = RecordId::new();
        let ctx = context().record_failure(Some(id), "TIMEOUT", "deadline exceeded");
        assert_eq!(ctx.records_processed, 1);
        assert_eq!(ctx.records_failed, 1);
        assert_eq!(ctx.errors.len(), 1);
        assert_eq!(ctx.errors[0].record_id, Some(id));
        assert_eq!(ctx.errors[0].error_code, "TIMEOUT");
        ctx.assert_invariants();
    }

    #[test]
    fn test_status_completed_when_empty() {
        assert_eq!(context().status(), SyncStatus::Completed);
    }

    #[test]
    fn test_status_completed_all_success() {
        let ctx = context().record_create().record_update();
        assert_eq!(ctx.status(), SyncStatus::Completed);
    }

    #[test]
    fn test_status_failed_all_failures() {
        let ctx = context()
            .record_failure(Some(RecordId::new()), "500", "boom")
            .record_failure(Some(RecordId::new()), "500", "boom");
        assert_eq!(ctx.status(), SyncStatus::Failed);
    }

    #[test]
    fn test_status_partial_mixed() {
        let ctx = context()
            .record_create()
            .record_failure(Some(RecordId::new()), "500", "boom");
        assert_eq!(ctx.status(), SyncStatus::Partial);
    }

    #[test]
    fn test_finalize_carries_counts_and_errors() {
        let log_id = SyncLogId::new();
        let ctx = context()
            .record_create()
            .record_failure(Some(RecordId::new()), "TIMEOUT", "deadline exceeded");
        let started_at = ctx.started_at;

        let log = ctx.finalize(log_id);

        assert_eq!(log.id, log_id);
        assert_eq!(log.started_at, started_at);
        assert!(log.completed_at >= started_at);
        assert_eq!(log.records_processed, 2);
        assert_eq!(log.records_failed, 1);
        assert_eq!(log.status, SyncStatus::Partial);
        assert_eq!(log.error_details.len(), 1);
    }

    #[test]
    fn test_apply_results_matches_individual_updates() {
        let results = vec![
            RecordSyncResult::created(RecordId::new(), "ext-1"),
            RecordSyncResult::updated(RecordId::new()),
            RecordSyncResult::failed(
                RecordId::new(),
                SyncOperation::Create,
                "NETWORK_ERROR",
                "unreachable",
            ),
        ];

        let ctx = context().apply_results(&results);

        assert_eq!(ctx.records_processed, 3);
        assert_eq!(ctx.records_created, 1);
        assert_eq!(ctx.records_updated, 1);
        assert_eq!(ctx.records_failed, 1);
        assert_eq!(ctx.errors[0].error_code, "NETWORK_ERROR");
        ctx.assert_invariants();
    }

    proptest! {
        #[test]
        fn prop_apply_results_preserves_invariants(outcomes in proptest::collection::vec(0u8..3, 0..64)) {
            let results: Vec<RecordSyncResult> = outcomes
                .iter()
                .map(|kind| match kind {
                    0 => RecordSyncResult::created(RecordId::new(), "ext"),
                    1 => RecordSyncResult::updated(RecordId::new()),
                    _ => RecordSyncResult::failed(
                        RecordId::new(),
                        SyncOperation::Create,
                        "TIMEOUT",
                        "deadline exceeded",
                    ),
                })
                .collect();

            let ctx = context().apply_results(&results);

            let created = outcomes.iter().filter(|k| **k == 0).count() as u32;
            let updated = outcomes.iter().filter(|k| **k == 1).count() as u32;
            let failed = outcomes.iter().filter(|k| **k >= 2).count() as u32;

            prop_assert_eq!(ctx.records_processed, results.len() as u32);
            prop_assert_eq!(ctx.records_created, created);
            prop_assert_eq!(ctx.records_updated, updated);
            prop_assert_eq!(ctx.records_failed, failed);
            prop_assert_eq!(ctx.errors.len() as u32, failed);
            prop_assert_eq!(
                ctx.records_processed,
                ctx.records_created + ctx.records_updated + ctx.records_failed
            );
        }
    }
}
