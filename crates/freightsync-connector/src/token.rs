//! Connection model and access-token lifecycle checks.
//!
//! The sync engine never mutates a connection's credentials; it only
//! classifies their state. An expired connection with a refresh token is
//! recoverable in-band (the retry loop exchanges the refresh token); an
//! expired connection without one needs the user to re-authenticate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::error::AdapterResult;
use crate::ids::ConnectionId;
use crate::retry::TokenRefresher;
use crate::types::Provider;

/// An external integration endpoint.
///
/// Owned by the surrounding application; re-authentication mutates it
/// outside this crate when [`TokenStatus::requires_reauth`] is signaled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Connection id.
    pub id: ConnectionId,
    /// Family of external system this connection points at.
    pub provider: Provider,
    /// Display name shown in integration settings.
    pub display_name: String,
    /// Current OAuth access token, if one has been issued.
    pub access_token: Option<String>,
    /// Refresh token, when the provider issued one.
    pub refresh_token: Option<String>,
    /// Expiry instant of the access token; `None` means non-expiring.
    pub token_expires_at: Option<DateTime<Utc>>,
    /// Whether the connection is enabled for syncing.
    pub is_active: bool,
}

impl Connection {
    /// Whether a refresh token is available for automatic recovery.
    #[must_use]
    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token.is_some()
    }
}

/// Classified token state of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStatus {
    /// An access token is present and not expired.
    pub valid: bool,
    /// The access token is absent or past its expiry.
    pub expired: bool,
    /// Expired with no refresh token: the user must re-authenticate.
    pub requires_reauth: bool,
}

/// Classify the token state of a connection.
///
/// A connection with an expired token but a refresh token on file is
/// expired-but-recoverable (`requires_reauth` stays false); the caller
/// is expected to attempt an automatic refresh rather than prompt for
/// re-authentication.
#[must_use]
pub fn check_token_status(connection: &Connection) -> TokenStatus {
    let token_missing = connection.access_token.is_none();
    let expired = token_missing
        || connection
            .token_expires_at
            .is_some_and(|expires_at| expires_at <= Utc::now());

    TokenStatus {
        valid: !expired,
        expired,
        requires_reauth: expired && !connection.has_refresh_token(),
    }
}

/// Build a [`TokenRefresher`] bound to this connection's refresh token.
///
/// Returns `None` when the connection has no refresh token (nothing to
/// refresh with). The callback receives the refresh token and is
/// expected to exchange it and persist the new credentials.
pub fn token_refresh_fn<F, Fut>(connection: &Connection, callback: F) -> Option<TokenRefresher>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = AdapterResult<()>> + Send + 'static,
{
    let refresh_token = connection.refresh_token.clone()?;
    Some(Box::new(move || {
        Box::pin(callback(refresh_token.clone()))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn connection(
        access_token: Option<&str>,
        refresh_token: Option<&str>,
        expires_in_minutes: Option<i64>,
    ) -> Connection {
        Connection {
            id: ConnectionId::new(),
            provider: Provider::Accounting,
            display_name: "ledger".to_string(),
            access_token: access_token.map(String::from),
            refresh_token: refresh_token.map(String::from),
            token_expires_at: expires_in_minutes.map(|m| Utc::now() + Duration::minutes(m)),
            is_active: true,
        }
    }

    #[test]
    fn test_valid_token() {
        let status = check_token_status(&connection(Some("tok"), Some("ref"), Some(30)));
        assert!(status.valid);
        assert!(!status.expired);
        assert!(!status.requires_reauth);
    }

    #[test]
    fn test_non_expiring_token_is_valid() {
        let status = check_token_status(&connection(Some("tok"), None, None));
        assert!(status.valid);
        assert!(!status.expired);
    }

    #[test]
    fn test_expired_with_refresh_token_is_recoverable() {
        let status = check_token_status(&connection(Some("tok"), Some("ref"), Some(-5)));
        assert!(!status.valid);
        assert!(status.expired);
        assert!(!status.requires_reauth);
    }

    #[test]
    fn test_expired_without_refresh_token_requires_reauth() {
        let status = check_token_status(&connection(Some("tok"), None, Some(-5)));
        assert!(status.expired);
        assert!(status.requires_reauth);
    }

    #[test]
    fn test_missing_access_token_counts_as_expired() {
        let status = check_token_status(&connection(None, None, None));
        assert!(!status.valid);
        assert!(status.expired);
        assert!(status.requires_reauth);
    }

    #[test]
    fn test_refresh_fn_absent_without_refresh_token() {
        let conn = connection(Some("tok"), None, Some(-5));
        let refresher = token_refresh_fn(&conn, |_token| async { Ok(()) });
        assert!(refresher.is_none());
    }

    #[tokio::test]
    async fn test_refresh_fn_binds_refresh_token() {
        let conn = connection(Some("tok"), Some("refresh-abc"), Some(-5));
        let refresher = token_refresh_fn(&conn, |token| async move {
            assert_eq!(token, "refresh-abc");
            Ok(())
        })
        .unwrap();

        refresher().await.unwrap();
    }
}
