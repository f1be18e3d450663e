//! Builders for connections, mappings, and records used across tests.

use chrono::{Duration, Utc};
use serde_json::json;

use freightsync_connector::ids::{ConnectionId, MappingId, RecordId};
use freightsync_connector::token::Connection;
use freightsync_connector::traits::SyncRecord;
use freightsync_connector::types::Provider;
use freightsync_engine::mapping::{FieldMapping, SyncDirection, SyncMapping};

/// Connection with an expired access token and a refresh token on file.
pub fn expired_connection_with_refresh() -> Connection {
    Connection {
        id: ConnectionId::new(),
        provider: Provider::Accounting,
        display_name: "ledger".to_string(),
        access_token: Some("stale-token".to_string()),
        refresh_token: Some("refresh-abc".to_string()),
        token_expires_at: Some(Utc::now() - Duration::minutes(5)),
        is_active: true,
    }
}

/// Push mapping over the invoices table with no field rules.
pub fn invoice_mapping(connection_id: ConnectionId) -> SyncMapping {
    SyncMapping {
        id: MappingId::new(),
        connection_id,
        local_table: "invoices".to_string(),
        external_entity: "Invoice".to_string(),
        direction: SyncDirection::Push,
        field_mappings: Vec::new(),
        is_active: true,
    }
}

/// Push mapping that renames `invoice_number` to `InvoiceNumber`.
pub fn invoice_mapping_with_rules(connection_id: ConnectionId) -> SyncMapping {
    SyncMapping {
        field_mappings: vec![
            FieldMapping::new("invoice_number", "InvoiceNumber"),
            FieldMapping::new("amount", "Total"),
        ],
        ..invoice_mapping(connection_id)
    }
}

/// `count` invoice records with sequential numbers.
pub fn invoice_records(count: usize) -> Vec<SyncRecord> {
    (0..count)
        .map(|n| {
            SyncRecord::new(
                RecordId::new(),
                json!({"invoice_number": format!("INV-{:03}", n + 1), "amount": 100 * (n + 1)}),
            )
        })
        .collect()
}

/// Record whose push fails with the given error code.
pub fn failing_record(code: &str) -> SyncRecord {
    SyncRecord::new(RecordId::new(), json!({"fail_code": code}))
}
