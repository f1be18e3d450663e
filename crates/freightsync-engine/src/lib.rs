//! # Freightsync Engine
//!
//! Batch synchronization engine for external integrations.
//!
//! This crate drives the four synchronization modes of the ERP's
//! integration layer:
//! - **Push** - send local records to an external system
//! - **Pull** - fetch remote records for local ingestion
//! - **Full sync** - run every active mapping of a connection in one pass
//! - **Retry-failed** - re-run only the records that failed in a prior run
//!
//! ## Architecture
//!
//! An orchestrator prepares a [`context::SyncContext`] and a record
//! list, then delegates each record to the [`batch`] processor, which
//! wraps the adapter call in the connector crate's retry policy. Results
//! fold back into the context, which finalizes into a [`log::SyncLog`]
//! the caller persists.
//!
//! ## Key Invariants
//!
//! - `records_processed == records_created + records_updated + records_failed`
//! - `errors.len() == records_failed`
//! - One record's failure never aborts its siblings; in full sync, one
//!   mapping's failure never aborts the remaining mappings.
//! - Failures are captured as data (results, context errors, log
//!   status); orchestrators do not propagate adapter errors as `Err`.
//!
//! The context is a pure value: every update returns a new context, so
//! nothing is shared between concurrent sync runs.
//!
//! All I/O is injected: adapters implement the connector crate's
//! capability traits, and data access goes through [`full::SyncDataLoader`].

pub mod batch;
pub mod context;
pub mod error;
pub mod full;
pub mod log;
pub mod mapping;
pub mod pull;
pub mod push;
pub mod retry_failed;
pub mod types;

/// Prelude module for convenient imports.
///
/// ```
/// use freightsync_engine::prelude::*;
/// ```
pub mod prelude {
    pub use crate::batch::{process_batch, RecordSyncResult};
    pub use crate::context::{SyncContext, SyncErrorDetail};
    pub use crate::error::{SyncError, MAPPING_ERROR, UNKNOWN_ERROR};
    pub use crate::full::{
        execute_full_sync, prepare_full_sync, FullSyncReport, MappingSyncOutcome, SyncDataLoader,
    };
    pub use crate::log::SyncLog;
    pub use crate::mapping::{ExternalIdMapping, FieldMapping, SyncDirection, SyncMapping};
    pub use crate::pull::{execute_pull_sync, PullSyncOutcome};
    pub use crate::push::{execute_push_sync, PushSyncOutcome};
    pub use crate::retry_failed::{execute_retry_failed_sync, RetryFailedOutcome};
    pub use crate::types::{SyncOperation, SyncStatus, SyncType};

    pub use freightsync_connector::prelude::*;
}
