//! Programmable mock adapter and loader.
//!
//! Push calls fail with the code given in the payload's `fail_code`
//! field, or with `TOKEN_EXPIRED` while the shared token flag is false —
//! which lets tests drive the refresh-then-replay path end to end.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use freightsync_connector::error::{AdapterError, AdapterResult};
use freightsync_connector::traits::{
    Adapter, FetchParams, RecordFetch, RecordPush, SyncAdapter, SyncRecord,
};
use freightsync_connector::types::Provider;
use freightsync_engine::error::SyncError;
use freightsync_engine::full::SyncDataLoader;
use freightsync_engine::mapping::{ExternalIdMapping, SyncMapping};

/// Mock adapter for integration tests.
pub struct MockAdapter {
    /// Number of create calls observed.
    pub create_calls: AtomicU32,
    /// Number of update calls observed.
    pub update_calls: AtomicU32,
    /// Number of fetch calls observed.
    pub fetch_calls: AtomicU32,
    /// Payloads passed to create, in call order.
    pub created_payloads: Mutex<Vec<Value>>,
    /// While false, push calls fail with `TOKEN_EXPIRED`.
    pub token_valid: Arc<AtomicBool>,
    /// Records returned by the fetch capability; `None` disables it.
    pub fetchable: Option<Vec<SyncRecord>>,
}

impl MockAdapter {
    /// Adapter with a valid token and no fetch capability.
    pub fn new() -> Self {
        Self {
            create_calls: AtomicU32::new(0),
            update_calls: AtomicU32::new(0),
            fetch_calls: AtomicU32::new(0),
            created_payloads: Mutex::new(Vec::new()),
            token_valid: Arc::new(AtomicBool::new(true)),
            fetchable: None,
        }
    }

    /// Adapter whose fetch capability returns the given records.
    pub fn with_fetch(records: Vec<SyncRecord>) -> Self {
        Self {
            fetchable: Some(records),
            ..Self::new()
        }
    }

    /// Adapter whose push calls fail with `TOKEN_EXPIRED` until the
    /// returned flag is set to true.
    pub fn with_expired_token() -> (Self, Arc<AtomicBool>) {
        let adapter = Self {
            token_valid: Arc::new(AtomicBool::new(false)),
            ..Self::new()
        };
        let flag = adapter.token_valid.clone();
        (adapter, flag)
    }

    fn scripted_failure(payload: &Value) -> Option<AdapterError> {
        payload["fail_code"]
            .as_str()
            .map(|code| AdapterError::new(code, "scripted failure"))
    }

    fn check_token(&self) -> AdapterResult<()> {
        if self.token_valid.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AdapterError::token_expired("access token expired"))
        }
    }
}

#[async_trait]
impl Adapter for MockAdapter {
    fn provider(&self) -> Provider {
        Provider::Accounting
    }

    fn display_name(&self) -> &str {
        "mock"
    }

    async fn test_connection(&self) -> AdapterResult<()> {
        self.check_token()
    }
}

#[async_trait]
impl RecordPush for MockAdapter {
    async fn create_record(&self, payload: &Value) -> AdapterResult<String> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_token()?;
        if let Some(error) = Self::scripted_failure(payload) {
            return Err(error);
        }
        self.created_payloads.lock().unwrap().push(payload.clone());
        Ok(format!("ext-{n}"))
    }

    async fn update_record(&self, _external_id: &str, payload: &Value) -> AdapterResult<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check_token()?;
        if let Some(error) = Self::scripted_failure(payload) {
            return Err(error);
        }
        Ok(())
    }
}

#[async_trait]
impl RecordFetch for MockAdapter {
    async fn fetch_records(&self, _params: &FetchParams) -> AdapterResult<Vec<SyncRecord>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.check_token()?;
        Ok(self.fetchable.clone().unwrap_or_default())
    }
}

impl SyncAdapter for MockAdapter {
    fn fetch_support(&self) -> Option<&dyn RecordFetch> {
        self.fetchable.as_ref().map(|_| self as &dyn RecordFetch)
    }
}

/// Loader serving fixed record sets per mapping, with one optionally
/// failing table.
pub struct MockLoader {
    /// Records handed out for every mapping.
    pub records: Vec<SyncRecord>,
    /// Existing external-id mappings handed out for every mapping.
    pub id_mappings: Vec<ExternalIdMapping>,
    /// Table whose loads fail, when set.
    pub failing_table: Option<String>,
}

impl MockLoader {
    /// Loader returning the given records for every mapping.
    pub fn new(records: Vec<SyncRecord>) -> Self {
        Self {
            records,
            id_mappings: Vec::new(),
            failing_table: None,
        }
    }
}

#[async_trait]
impl SyncDataLoader for MockLoader {
    async fn load_records(&self, mapping: &SyncMapping) -> Result<Vec<SyncRecord>, SyncError> {
        if self.failing_table.as_deref() == Some(mapping.local_table.as_str()) {
            return Err(SyncError::loader(format!(
                "{} query failed",
                mapping.local_table
            )));
        }
        Ok(self.records.clone())
    }

    async fn load_id_mappings(
        &self,
        _mapping: &SyncMapping,
    ) -> Result<Vec<ExternalIdMapping>, SyncError> {
        Ok(self.id_mappings.clone())
    }
}
