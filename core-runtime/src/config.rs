//! # Drive Configuration
//!
//! Builder-style configuration for the Graph drive adapter with fail-fast
//! validation.
//!
//! ## Required Settings
//!
//! - `client_id`, `client_secret`, `tenant_id` - app registration used for the
//!   client-credentials token exchange
//!
//! ## Optional Settings (with defaults)
//!
//! - `root_prefix` - Graph path prefix every item path is resolved under,
//!   e.g. `users/{user-id}/drive` or `sites/{site-id}/drive` (default: none)
//! - `graph_base_url` - `https://graph.microsoft.com/v1.0`
//! - `authority_url` - `https://login.microsoftonline.com`
//! - `http_client` - injected automatically as `ReqwestHttpClient` when the
//!   `desktop-shims` feature is enabled
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::DriveConfig;
//!
//! let config = DriveConfig::builder()
//!     .client_id("11111111-2222-3333-4444-555555555555")
//!     .client_secret("app-secret")
//!     .tenant_id("contoso.onmicrosoft.com")
//!     .root_prefix("sites/contoso.sharepoint.com,abc,def/drive")
//!     .build()?;
//! ```
//!
//! Or from the environment (`GRAPH_CLIENT_ID`, `GRAPH_CLIENT_SECRET`,
//! `GRAPH_TENANT_ID`, optional `GRAPH_ROOT_PREFIX`, `GRAPH_BASE_URL`,
//! `GRAPH_AUTHORITY_URL`):
//!
//! ```ignore
//! let config = DriveConfig::from_env()?;
//! ```

use crate::error::{Error, Result};
use crate::logging::redact_if_sensitive;
use bridge_traits::HttpClient;
use std::sync::Arc;

/// Microsoft Graph v1.0 endpoint
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Microsoft identity platform host
pub const DEFAULT_AUTHORITY_URL: &str = "https://login.microsoftonline.com";

pub const ENV_CLIENT_ID: &str = "GRAPH_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "GRAPH_CLIENT_SECRET";
pub const ENV_TENANT_ID: &str = "GRAPH_TENANT_ID";
pub const ENV_ROOT_PREFIX: &str = "GRAPH_ROOT_PREFIX";
pub const ENV_BASE_URL: &str = "GRAPH_BASE_URL";
pub const ENV_AUTHORITY_URL: &str = "GRAPH_AUTHORITY_URL";

/// Configuration for a Graph drive adapter.
///
/// Use [`DriveConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct DriveConfig {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,

    /// Graph path prefix, as given (normalization happens in the adapter)
    pub root_prefix: String,

    pub graph_base_url: String,

    pub authority_url: String,

    pub http_client: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for DriveConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveConfig")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &redact_if_sensitive("client_secret", &self.client_secret),
            )
            .field("tenant_id", &self.tenant_id)
            .field("root_prefix", &self.root_prefix)
            .field("graph_base_url", &self.graph_base_url)
            .field("authority_url", &self.authority_url)
            .field("http_client", &"HttpClient { ... }")
            .finish()
    }
}

impl DriveConfig {
    pub fn builder() -> DriveConfigBuilder {
        DriveConfigBuilder::default()
    }

    /// Build a configuration from `GRAPH_*` environment variables.
    pub fn from_env() -> Result<Self> {
        DriveConfigBuilder::from_lookup(|key| std::env::var(key).ok()).build()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("Client id", &self.client_id),
            ("Client secret", &self.client_secret),
            ("Tenant id", &self.tenant_id),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{} cannot be empty", name)));
            }
        }

        for (name, value) in [
            ("Graph base URL", &self.graph_base_url),
            ("Authority URL", &self.authority_url),
        ] {
            if !(value.starts_with("https://") || value.starts_with("http://")) {
                return Err(Error::Config(format!(
                    "{} must be an absolute http(s) URL, got '{}'",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "No HTTP client implementation provided. \
                 Enable the 'desktop-shims' feature to use the default ReqwestHttpClient \
                 or inject one with DriveConfigBuilder::http_client."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

/// Builder for constructing [`DriveConfig`] instances.
#[derive(Default)]
pub struct DriveConfigBuilder {
    client_id: Option<String>,
    client_secret: Option<String>,
    tenant_id: Option<String>,
    root_prefix: Option<String>,
    graph_base_url: Option<String>,
    authority_url: Option<String>,
    http_client: Option<Arc<dyn HttpClient>>,
}

impl DriveConfigBuilder {
    /// Seed a builder from a key lookup; unset keys stay unset.
    ///
    /// ```
    /// use core_runtime::config::DriveConfigBuilder;
    /// use std::collections::HashMap;
    ///
    /// let vars = HashMap::from([("GRAPH_TENANT_ID", "contoso")]);
    /// let builder = DriveConfigBuilder::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            client_id: lookup(ENV_CLIENT_ID),
            client_secret: lookup(ENV_CLIENT_SECRET),
            tenant_id: lookup(ENV_TENANT_ID),
            root_prefix: lookup(ENV_ROOT_PREFIX),
            graph_base_url: lookup(ENV_BASE_URL),
            authority_url: lookup(ENV_AUTHORITY_URL),
            http_client: None,
        }
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    pub fn tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Graph path prefix item paths are resolved under
    pub fn root_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.root_prefix = Some(prefix.into());
        self
    }

    pub fn graph_base_url(mut self, url: impl Into<String>) -> Self {
        self.graph_base_url = Some(url.into());
        self
    }

    pub fn authority_url(mut self, url: impl Into<String>) -> Self {
        self.authority_url = Some(url.into());
        self
    }

    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] when a required setting is missing or invalid
    /// - [`Error::CapabilityMissing`] when no `HttpClient` was injected and
    ///   the `desktop-shims` feature is off
    pub fn build(self) -> Result<DriveConfig> {
        let client_id = self
            .client_id
            .ok_or_else(|| Error::Config(format!("Client id is required ({})", ENV_CLIENT_ID)))?;
        let client_secret = self.client_secret.ok_or_else(|| {
            Error::Config(format!("Client secret is required ({})", ENV_CLIENT_SECRET))
        })?;
        let tenant_id = self
            .tenant_id
            .ok_or_else(|| Error::Config(format!("Tenant id is required ({})", ENV_TENANT_ID)))?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client()?,
        };

        let config = DriveConfig {
            client_id,
            client_secret,
            tenant_id,
            root_prefix: self.root_prefix.unwrap_or_default(),
            graph_base_url: self
                .graph_base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GRAPH_BASE_URL.to_string()),
            authority_url: self
                .authority_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_AUTHORITY_URL.to_string()),
            http_client,
        };

        config.validate()?;
        Ok(config)
    }
}
