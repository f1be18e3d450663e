//! Shared type definitions for integration connections.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Family of external system a connection points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Accounting system (general ledger, invoices, payments).
    Accounting,
    /// Shipment tracking provider (container/vessel status feeds).
    Tracking,
}

impl Provider {
    /// Get all available provider families.
    #[must_use]
    pub fn all() -> &'static [Provider] {
        &[Provider::Accounting, Provider::Tracking]
    }

    /// Get the string representation used in persisted records.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Accounting => "accounting",
            Provider::Tracking => "tracking",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ParseProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accounting" => Ok(Provider::Accounting),
            "tracking" => Ok(Provider::Tracking),
            _ => Err(ParseProviderError(s.to_string())),
        }
    }
}

/// Error parsing a provider family from string.
#[derive(Debug, Clone)]
pub struct ParseProviderError(String);

impl fmt::Display for ParseProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid provider '{}', expected one of: accounting, tracking",
            self.0
        )
    }
}

impl std::error::Error for ParseProviderError {}
