use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token endpoint rejected client credentials (status {status}): {reason}")]
    AuthenticationFailed { status: u16, reason: String },

    #[error("Invalid token response: {0}")]
    InvalidResponse(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error(transparent)]
    Network(#[from] bridge_traits::error::BridgeError),
}

impl From<AuthError> for bridge_traits::error::BridgeError {
    fn from(error: AuthError) -> Self {
        use bridge_traits::error::BridgeError;

        match error {
            AuthError::Network(inner) => inner,
            AuthError::AuthenticationFailed { status, reason } => BridgeError::Http {
                status,
                message: reason,
            },
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
