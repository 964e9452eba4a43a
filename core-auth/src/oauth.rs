//! OAuth 2.0 Client Credentials Grant
//!
//! Implements the app-only token request of RFC 6749 section 4.4 against the
//! Microsoft identity platform v2.0 endpoint.
//!
//! # Overview
//!
//! One POST to `{authority}/{tenant}/oauth2/v2.0/token` with a form body
//! carrying the client id, client secret and the Graph `.default` scope. No
//! retry is attempted: a failed exchange is reported to the caller as-is.
//!
//! # Security
//!
//! - The client secret only ever travels in the request body
//! - Never logs sensitive values (secrets, tokens)
//!
//! # Example
//!
//! ```no_run
//! use core_auth::{ClientCredentials, ClientCredentialsFlow};
//! use std::sync::Arc;
//!
//! # async fn example() -> core_auth::Result<()> {
//! # use bridge_traits::http::HttpClient;
//! # let http_client: Arc<dyn HttpClient> = todo!();
//! let credentials = ClientCredentials::new("client-id", "client-secret", "tenant-id");
//! let flow = ClientCredentialsFlow::new(http_client);
//! let token = flow.acquire_token(&credentials).await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::{AccessToken, ClientCredentials};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use bytes::Bytes;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{instrument, warn};

/// Microsoft identity platform host
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Scope granting every application permission consented for Graph
pub const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Client-credentials token flow.
pub struct ClientCredentialsFlow {
    http_client: Arc<dyn HttpClient>,
    authority: String,
    scope: String,
}

impl ClientCredentialsFlow {
    /// Flow against the public Microsoft identity platform
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            authority: DEFAULT_AUTHORITY.to_string(),
            scope: GRAPH_DEFAULT_SCOPE.to_string(),
        }
    }

    /// Override the authority host (national clouds, tests)
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into().trim_end_matches('/').to_string();
        self
    }

    /// Token endpoint for a tenant
    pub fn token_url(&self, tenant_id: &str) -> String {
        format!("{}/{}/oauth2/v2.0/token", self.authority, tenant_id)
    }

    /// Exchange client credentials for an access token.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidCredentials`] if any credential field is empty
    /// - [`AuthError::Network`] if the request never got a response
    /// - [`AuthError::AuthenticationFailed`] on a non-2xx response
    /// - [`AuthError::InvalidResponse`] if the body has no `access_token`
    #[instrument(skip(self, credentials), fields(tenant = %credentials.tenant_id))]
    pub async fn acquire_token(&self, credentials: &ClientCredentials) -> Result<AccessToken> {
        for (name, value) in [
            ("client_id", &credentials.client_id),
            ("client_secret", &credentials.client_secret),
            ("tenant_id", &credentials.tenant_id),
        ] {
            if value.trim().is_empty() {
                return Err(AuthError::InvalidCredentials(format!("{} is empty", name)));
            }
        }

        let params = [
            ("client_id", credentials.client_id.as_str()),
            ("scope", self.scope.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let encoded_body = serde_urlencoded::to_string(&params).map_err(|e| {
            AuthError::InvalidCredentials(format!("Failed to encode token request: {}", e))
        })?;

        tracing::debug!("Requesting client-credentials token");

        let request = HttpRequest::new(HttpMethod::Post, self.token_url(&credentials.tenant_id))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Bytes::from(encoded_body));

        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            let status = response.status;
            let error_body = response
                .text()
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            warn!(
                status = status,
                error = %error_body,
                "Token endpoint rejected client credentials"
            );

            return Err(AuthError::AuthenticationFailed {
                status,
                reason: error_body,
            });
        }

        let token_response: TokenResponse = response
            .json()
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        tracing::info!(
            expires_in = ?token_response.expires_in,
            "Acquired access token"
        );

        Ok(AccessToken::new(
            token_response.access_token,
            token_response.expires_in,
        ))
    }
}

/// Token response from the identity platform.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}
