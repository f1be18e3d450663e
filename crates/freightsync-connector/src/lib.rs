//! # Integration Adapter Framework
//!
//! Core abstractions for connecting the ERP to external systems.
//!
//! This crate provides the foundation for synchronizing ERP records
//! (invoices, shipments, customs documents) with external accounting
//! systems and shipment tracking providers.
//!
//! ## Architecture
//!
//! The framework uses a capability-based trait system:
//!
//! - [`traits::Adapter`] - Base trait all adapters implement
//! - [`traits::RecordPush`] - Create/update records in the external system
//! - [`traits::RecordFetch`] - Fetch remote records (optional capability)
//!
//! Around the adapter sit two concerns the sync engine relies on:
//!
//! - [`retry`] - Exponential-backoff retry with token-refresh-on-expiry.
//!   External failures are classified by string error code, so adapters
//!   for very different systems share one retry policy.
//! - [`token`] - Connection token lifecycle: is the access token valid,
//!   expired-but-recoverable, or in need of re-authentication.
//!
//! ## Example
//!
//! ```ignore
//! use freightsync_connector::prelude::*;
//!
//! let policy = RetryPolicy::default();
//! let outcome = retry_with_backoff(
//!     &policy,
//!     || adapter.create_record(&payload),
//!     refresher.as_ref(),
//! )
//! .await;
//!
//! if let Ok(external_id) = outcome.result {
//!     println!("created {external_id} after {} retries", outcome.retry_count);
//! }
//! ```
//!
//! ## Crate Organization
//!
//! - [`ids`] - Type-safe identifiers (`ConnectionId`, `MappingId`, ...)
//! - [`types`] - Provider enum and shared status types
//! - [`error`] - Adapter error type with code-based classification
//! - [`retry`] - Retry policy and backoff loop
//! - [`token`] - Connection model and token lifecycle checks
//! - [`traits`] - Adapter capability traits

pub mod error;
pub mod ids;
pub mod retry;
pub mod token;
pub mod traits;
pub mod types;

/// Prelude module for convenient imports.
///
/// ```
/// use freightsync_connector::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{codes, AdapterError, AdapterResult};
    pub use crate::ids::{ConnectionId, MappingId, RecordId, SyncLogId};
    pub use crate::retry::{
        is_retryable_code, is_token_expired_code, retry_with_backoff, RetryOutcome, RetryPolicy,
        TokenRefresher,
    };
    pub use crate::token::{check_token_status, token_refresh_fn, Connection, TokenStatus};
    pub use crate::traits::{
        Adapter, FetchParams, RecordFetch, RecordPush, SyncAdapter, SyncRecord,
    };
    pub use crate::types::Provider;
}

// Re-export async_trait for adapter implementors
pub use async_trait::async_trait;
