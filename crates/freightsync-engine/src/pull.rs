//! Pull orchestrator: fetch remote records for local ingestion.

use tracing::{info, warn};

use freightsync_connector::error::codes;
use freightsync_connector::retry::{retry_with_backoff, RetryPolicy, TokenRefresher};
use freightsync_connector::traits::{FetchParams, SyncAdapter, SyncRecord};

use crate::context::SyncContext;
use crate::mapping::SyncMapping;
use crate::types::SyncType;

/// Result of one pull sync run.
#[derive(Debug)]
pub struct PullSyncOutcome {
    /// Accumulated counters and errors, ready to finalize.
    pub context: SyncContext,
    /// Fetched records for the caller to ingest; `None` on failure.
    pub records: Option<Vec<SyncRecord>>,
    /// Final error code when the fetch failed or is unsupported.
    pub error_code: Option<String>,
}

/// Fetch records from the external system for one mapping.
///
/// Fails fast with `NOT_SUPPORTED` (no network attempted) when the
/// adapter has no fetch capability. Otherwise the fetch runs under the
/// retry policy; on success every fetched record is counted as a create
/// — this layer performs no dedup against local state, the caller
/// ingests the records as fresh snapshots.
pub async fn execute_pull_sync(
    mapping: &SyncMapping,
    adapter: &dyn SyncAdapter,
    params: &FetchParams,
    policy: &RetryPolicy,
    refresher: Option<&TokenRefresher>,
) -> PullSyncOutcome {
    let context = SyncContext::new(mapping.connection_id, Some(mapping.id), SyncType::Pull);

    let Some(source) = adapter.fetch_support() else {
        warn!(
            mapping_id = %mapping.id,
            external_entity = %mapping.external_entity,
            "Pull sync requested but adapter cannot fetch records"
        );
        let context = context.record_failure(
            None,
            codes::NOT_SUPPORTED,
            "adapter does not support fetching records",
        );
        return PullSyncOutcome {
            context,
            records: None,
            error_code: Some(codes::NOT_SUPPORTED.to_string()),
        };
    };

    let outcome = retry_with_backoff(policy, || source.fetch_records(params), refresher).await;

    match outcome.result {
        Ok(fetched) => {
            let context = fetched
                .iter()
                .fold(context, |ctx, _record| ctx.record_create());
            info!(
                mapping_id = %mapping.id,
                external_entity = %mapping.external_entity,
                fetched = context.records_created,
                retries = outcome.retry_count,
                "Pull sync finished"
            );
            PullSyncOutcome {
                context,
                records: Some(fetched),
                error_code: None,
            }
        }
        Err(error) => {
            warn!(
                mapping_id = %mapping.id,
                external_entity = %mapping.external_entity,
                retries = outcome.retry_count,
                error = %error,
                "Pull sync failed"
            );
            let code = error.code.clone();
            let context = context.record_failure(None, error.code, error.message);
            PullSyncOutcome {
                context,
                records: None,
                error_code: Some(code),
            }
        }
    }
}
