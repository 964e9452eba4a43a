//! Error types for the Graph drive provider

use bridge_traits::error::BridgeError;
use core_auth::AuthError;
use thiserror::Error;

/// Graph drive provider errors
#[derive(Error, Debug)]
pub enum GraphError {
    /// The service answered 404 for the addressed resource
    #[error("Item not found: {resource}")]
    NotFound { resource: String },

    /// Any other non-2xx answer
    #[error("Graph API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Token acquisition failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Transport error, carried unchanged
    #[error(transparent)]
    BridgeError(#[from] BridgeError),
}

/// Result type for Graph drive operations
pub type Result<T> = std::result::Result<T, GraphError>;

impl GraphError {
    /// HTTP status behind the error, if the service produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            GraphError::NotFound { .. } => Some(404),
            GraphError::ApiError { status_code, .. } => Some(*status_code),
            GraphError::Auth(AuthError::AuthenticationFailed { status, .. }) => Some(*status),
            GraphError::Auth(AuthError::Network(e)) | GraphError::BridgeError(e) => e.status(),
            _ => None,
        }
    }
}

/// Turns a not-found failure into an absent value.
///
/// ```
/// use provider_onedrive::{GraphError, NotFoundExt};
///
/// let missing: Result<u32, GraphError> = Err(GraphError::NotFound {
///     resource: "root:/a.txt".to_string(),
/// });
/// assert_eq!(missing.found().unwrap(), None);
/// ```
pub trait NotFoundExt<T> {
    fn found(self) -> Result<Option<T>>;
}

impl<T> NotFoundExt<T> for Result<T> {
    fn found(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(GraphError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl From<GraphError> for BridgeError {
    fn from(error: GraphError) -> Self {
        match error {
            GraphError::NotFound { resource } => BridgeError::Http {
                status: 404,
                message: format!("Item not found: {}", resource),
            },
            GraphError::ApiError {
                status_code,
                message,
            } => BridgeError::Http {
                status: status_code,
                message,
            },
            GraphError::ParseError(msg) => {
                BridgeError::OperationFailed(format!("Parse error: {}", msg))
            }
            GraphError::Unsupported(msg) => BridgeError::Unsupported(msg),
            GraphError::Auth(e) => e.into(),
            GraphError::BridgeError(e) => e,
        }
    }
}
