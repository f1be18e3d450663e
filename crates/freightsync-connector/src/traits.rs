//! Adapter capability traits.
//!
//! Each external system integration implements the capabilities it
//! actually supports. Every accounting/tracking adapter can push
//! records; only some can fetch, so the fetch capability is surfaced as
//! an optional sub-trait the pull orchestrator checks for before use.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AdapterResult;
use crate::ids::RecordId;
use crate::types::Provider;

/// A unit of work for one sync invocation: a local record id plus its
/// opaque payload. Exists only for the duration of the invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRecord {
    /// Local record id.
    pub id: RecordId,
    /// Opaque record payload.
    pub data: serde_json::Value,
}

impl SyncRecord {
    /// Create a sync record.
    #[must_use]
    pub fn new(id: RecordId, data: serde_json::Value) -> Self {
        Self { id, data }
    }
}

/// Parameters for fetching records from an external system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchParams {
    /// Only fetch records changed since this instant, when supported.
    pub updated_since: Option<DateTime<Utc>>,
    /// Maximum number of records to return.
    pub limit: Option<u32>,
    /// Provider-specific cursor from a previous fetch.
    pub cursor: Option<String>,
}

/// Base trait for all integration adapters.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Family of external system this adapter talks to.
    fn provider(&self) -> Provider;

    /// Display name for this adapter instance.
    fn display_name(&self) -> &str;

    /// Test the connection to the external system.
    async fn test_connection(&self) -> AdapterResult<()>;
}

/// Capability for pushing records into the external system.
#[async_trait]
pub trait RecordPush: Adapter {
    /// Create a record in the external system.
    ///
    /// # Arguments
    /// * `payload` - The mapped record payload
    ///
    /// # Returns
    /// The external system's id for the created record.
    async fn create_record(&self, payload: &serde_json::Value) -> AdapterResult<String>;

    /// Update an existing record in the external system.
    ///
    /// # Arguments
    /// * `external_id` - The external system's id for the record
    /// * `payload` - The mapped record payload
    async fn update_record(
        &self,
        external_id: &str,
        payload: &serde_json::Value,
    ) -> AdapterResult<()>;
}

/// Capability for fetching records from the external system.
///
/// Optional: providers without a change feed simply don't implement it,
/// and pull syncs against them fail fast with `NOT_SUPPORTED`.
#[async_trait]
pub trait RecordFetch: Adapter {
    /// Fetch records from the external system.
    async fn fetch_records(&self, params: &FetchParams) -> AdapterResult<Vec<SyncRecord>>;
}

/// Composite adapter surface consumed by the sync engine.
///
/// `fetch_support` is the presence check the pull orchestrator performs
/// before attempting any network call.
pub trait SyncAdapter: RecordPush {
    /// The fetch capability, when this adapter supports pull syncs.
    fn fetch_support(&self) -> Option<&dyn RecordFetch> {
        None
    }
}
