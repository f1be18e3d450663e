//! Per-record batch processing.
//!
//! Each record is processed independently: the external-id lookup
//! decides create vs. update, the adapter call runs under the retry
//! policy, and the outcome is captured as a [`RecordSyncResult`]. One
//! record's failure never aborts the rest of the batch.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use freightsync_connector::ids::RecordId;
use freightsync_connector::retry::{retry_with_backoff, RetryPolicy, TokenRefresher};
use freightsync_connector::traits::{RecordPush, SyncRecord};

use crate::types::SyncOperation;

/// Outcome of processing one sync record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSyncResult {
    /// Local record id.
    pub record_id: RecordId,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Operation performed (or attempted).
    pub operation: SyncOperation,
    /// External id assigned on create success.
    pub external_id: Option<String>,
    /// Error code on failure.
    pub error_code: Option<String>,
    /// Error message on failure.
    pub error_message: Option<String>,
    /// Backoff retries consumed for this record.
    pub retry_count: u32,
}

impl RecordSyncResult {
    /// Successful create, with the external system's new id.
    pub fn created(record_id: RecordId, external_id: impl Into<String>) -> Self {
        Self {
            record_id,
            success: true,
            operation: SyncOperation::Create,
            external_id: Some(external_id.into()),
            error_code: None,
            error_message: None,
            retry_count: 0,
        }
    }

    /// Successful update.
    #[must_use]
    pub fn updated(record_id: RecordId) -> Self {
        Self {
            record_id,
            success: true,
            operation: SyncOperation::Update,
            external_id: None,
            error_code: None,
            error_message: None,
            retry_count: 0,
        }
    }

    /// Failed operation.
    pub fn failed(
        record_id: RecordId,
        operation: SyncOperation,
        error_code: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            record_id,
            success: false,
            operation,
            external_id: None,
            error_code: Some(error_code.into()),
            error_message: Some(error_message.into()),
            retry_count: 0,
        }
    }

    /// Set the number of retries consumed.
    #[must_use]
    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }
}

/// Process a batch of records against an adapter.
///
/// The lookup decides the operation per record: a hit means update, a
/// miss means create. Results come back in record order; failures are
/// captured per record and never abort the remaining records.
pub async fn process_batch(
    records: &[SyncRecord],
    lookup: &HashMap<RecordId, String>,
    adapter: &dyn RecordPush,
    policy: &RetryPolicy,
    refresher: Option<&TokenRefresher>,
) -> Vec<RecordSyncResult> {
    let mut results = Vec::with_capacity(records.len());

    for record in records {
        let result = match lookup.get(&record.id) {
            Some(external_id) => {
                debug!(record_id = %record.id, external_id = %external_id, "Updating record");
                let outcome = retry_with_backoff(
                    policy,
                    || adapter.update_record(external_id, &record.data),
                    refresher,
                )
                .await;
                match outcome.result {
                    Ok(()) => {
                        RecordSyncResult::updated(record.id).with_retry_count(outcome.retry_count)
                    }
                    Err(error) => {
                        warn!(record_id = %record.id, error = %error, "Record update failed");
                        RecordSyncResult::failed(
                            record.id,
                            SyncOperation::Update,
                            error.code,
                            error.message,
                        )
                        .with_retry_count(outcome.retry_count)
                    }
                }
            }
            None => {
                debug!(record_id = %record.id, "Creating record");
                let outcome = retry_with_backoff(
                    policy,
                    || adapter.create_record(&record.data),
                    refresher,
                )
                .await;
                match outcome.result {
                    Ok(external_id) => RecordSyncResult::created(record.id, external_id)
                        .with_retry_count(outcome.retry_count),
                    Err(error) => {
                        warn!(record_id = %record.id, error = %error, "Record create failed");
                        RecordSyncResult::failed(
                            record.id,
                            SyncOperation::Create,
                            error.code,
                            error.message,
                        )
                        .with_retry_count(outcome.retry_count)
                    }
                }
            }
        };
        results.push(result);
    }

    results
}
