//! Sync mapping and external-id mapping models.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use freightsync_connector::ids::{ConnectionId, MappingId, RecordId};

/// Direction a mapping synchronizes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncDirection {
    /// Local records are sent to the external system.
    Push,
    /// Remote records are fetched into local storage.
    Pull,
}

impl SyncDirection {
    /// String representation used in persisted mappings.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncDirection::Push => "push",
            SyncDirection::Pull => "pull",
        }
    }
}

impl fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SyncDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "push" => Ok(SyncDirection::Push),
            "pull" => Ok(SyncDirection::Pull),
            _ => Err(format!("Unknown sync direction: {s}")),
        }
    }
}

/// One local-field → external-field rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Field name in the local record payload.
    pub local_field: String,
    /// Field name expected by the external system.
    pub external_field: String,
}

impl FieldMapping {
    /// Create a field mapping.
    pub fn new(local_field: impl Into<String>, external_field: impl Into<String>) -> Self {
        Self {
            local_field: local_field.into(),
            external_field: external_field.into(),
        }
    }
}

/// One local-table ↔ external-entity pairing.
///
/// Immutable during a sync run; many mappings may belong to one
/// connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncMapping {
    /// Mapping id.
    pub id: MappingId,
    /// Connection this mapping belongs to.
    pub connection_id: ConnectionId,
    /// Local table the mapping reads from (push) or writes to (pull).
    pub local_table: String,
    /// Entity name in the external system (e.g. "Invoice").
    pub external_entity: String,
    /// Direction this mapping synchronizes in.
    pub direction: SyncDirection,
    /// Field renames applied to payloads before pushing.
    pub field_mappings: Vec<FieldMapping>,
    /// Whether this mapping participates in syncs.
    pub is_active: bool,
}

impl SyncMapping {
    /// Apply the field renames to a record payload.
    ///
    /// A mapping with no field rules passes the payload through
    /// unchanged. Local fields absent from the payload are skipped.
    #[must_use]
    pub fn project(&self, payload: &serde_json::Value) -> serde_json::Value {
        if self.field_mappings.is_empty() {
            return payload.clone();
        }
        let Some(source) = payload.as_object() else {
            return payload.clone();
        };

        let mut mapped = serde_json::Map::new();
        for rule in &self.field_mappings {
            if let Some(value) = source.get(&rule.local_field) {
                mapped.insert(rule.external_field.clone(), value.clone());
            }
        }
        serde_json::Value::Object(mapped)
    }
}

/// Association between a local record and its counterpart in the
/// external system.
///
/// Looked up before every push to decide create vs. update;
/// created/refreshed by the caller after every successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIdMapping {
    /// Local table the record lives in.
    pub local_table: String,
    /// Local record id.
    pub record_id: RecordId,
    /// The external system's id for the record.
    pub external_id: String,
}

impl ExternalIdMapping {
    /// Create an external-id mapping.
    pub fn new(
        local_table: impl Into<String>,
        record_id: RecordId,
        external_id: impl Into<String>,
    ) -> Self {
        Self {
            local_table: local_table.into(),
            record_id,
            external_id: external_id.into(),
        }
    }

    /// Build a local-id → external-id lookup from the mappings belonging
    /// to the given table.
    #[must_use]
    pub fn lookup_for_table(
        mappings: &[ExternalIdMapping],
        local_table: &str,
    ) -> HashMap<RecordId, String> {
        mappings
            .iter()
            .filter(|m| m.local_table == local_table)
            .map(|m| (m.record_id, m.external_id.clone()))
            .collect()
    }
}
