use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Application credentials registered with an Azure AD tenant.
///
/// # Examples
///
/// ```
/// use core_auth::ClientCredentials;
///
/// let credentials = ClientCredentials::new("app-id", "app-secret", "contoso.onmicrosoft.com");
/// assert_eq!(credentials.tenant_id, "contoso.onmicrosoft.com");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
}

impl ClientCredentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        tenant_id: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            tenant_id: tenant_id.into(),
        }
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

/// Bearer token obtained from the token endpoint.
///
/// The expiry is recorded for callers that want to know when to build a new
/// adapter; it is never acted on automatically.
///
/// # Security
///
/// The `Debug` implementation redacts the token value.
///
/// # Examples
///
/// ```
/// use core_auth::AccessToken;
///
/// let token = AccessToken::new("eyJ0eXAi...", Some(3599));
/// assert_eq!(token.secret(), "eyJ0eXAi...");
/// assert!(!token.is_expired());
/// ```
#[derive(Clone)]
pub struct AccessToken {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Create a token, `expires_in` being seconds from now
    ///
    /// A lifetime too large to represent is treated as unreported.
    pub fn new(value: impl Into<String>, expires_in: Option<i64>) -> Self {
        let expires_at = expires_in
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime));

        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Raw bearer value for the `Authorization` header
    pub fn secret(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// `false` when the endpoint did not report a lifetime
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() >= at)
    }
}

impl From<&str> for AccessToken {
    fn from(value: &str) -> Self {
        Self::new(value, None)
    }
}

impl From<String> for AccessToken {
    fn from(value: String) -> Self {
        Self::new(value, None)
    }
}

// Custom Debug implementation to avoid logging tokens
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let credentials = ClientCredentials::new("id", "super-secret", "tenant");
        let token = AccessToken::new("bearer-value", Some(60));

        let creds_debug = format!("{:?}", credentials);
        let token_debug = format!("{:?}", token);

        assert!(!creds_debug.contains("super-secret"));
        assert!(creds_debug.contains("tenant"));
        assert!(!token_debug.contains("bearer-value"));
        assert!(token_debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_expiry() {
        assert!(!AccessToken::new("t", Some(3600)).is_expired());
        assert!(AccessToken::new("t", Some(-1)).is_expired());

        let no_lifetime = AccessToken::from("t");
        assert!(no_lifetime.expires_at().is_none());
        assert!(!no_lifetime.is_expired());
    }

    #[test]
    fn test_unrepresentable_lifetime_is_dropped() {
        for lifetime in [i64::MAX, i64::MIN, 9_000_000_000_000_000] {
            let token = AccessToken::new("t", Some(lifetime));
            assert!(token.expires_at().is_none(), "lifetime {}", lifetime);
            assert!(!token.is_expired());
        }
    }
}
