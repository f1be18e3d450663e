//! Enumerations shared across the sync engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of sync run being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncType {
    /// Send local records to the external system.
    Push,
    /// Fetch records from the external system.
    Pull,
    /// Run all active mappings of a connection in one pass.
    FullSync,
    /// Re-run only the records that failed in a prior run.
    RetryFailed,
}

impl SyncType {
    /// String representation used in persisted sync logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncType::Push => "push",
            SyncType::Pull => "pull",
            SyncType::FullSync => "full_sync",
            SyncType::RetryFailed => "retry_failed",
        }
    }
}

impl fmt::Display for SyncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SyncType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "push" => Ok(SyncType::Push),
            "pull" => Ok(SyncType::Pull),
            "full_sync" => Ok(SyncType::FullSync),
            "retry_failed" => Ok(SyncType::RetryFailed),
            _ => Err(format!("Unknown sync type: {s}")),
        }
    }
}

/// Terminal status of a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Every record succeeded (including the zero-record run).
    Completed,
    /// Some records succeeded, some failed.
    Partial,
    /// Records were processed and none succeeded.
    Failed,
}

impl SyncStatus {
    /// String representation used in persisted sync logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Completed => "completed",
            SyncStatus::Partial => "partial",
            SyncStatus::Failed => "failed",
        }
    }

    /// Whether the run left failed records behind.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !matches!(self, SyncStatus::Completed)
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SyncStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "completed" => Ok(SyncStatus::Completed),
            "partial" => Ok(SyncStatus::Partial),
            "failed" => Ok(SyncStatus::Failed),
            _ => Err(format!("Unknown sync status: {s}")),
        }
    }
}

/// Operation the batch processor performed (or attempted) for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOperation {
    /// The record had no external-id mapping; a create was issued.
    Create,
    /// An existing external-id mapping was found; an update was issued.
    Update,
}

impl SyncOperation {
    /// String representation used in persisted sync logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncOperation::Create => "create",
            SyncOperation::Update => "update",
        }
    }
}

impl fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SyncOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create" => Ok(SyncOperation::Create),
            "update" => Ok(SyncOperation::Update),
            _ => Err(format!("Unknown sync operation: {s}")),
        }
    }
}
