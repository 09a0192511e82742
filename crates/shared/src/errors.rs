//! Failure taxonomy shared by the gateway and the surfaces.

use crate::strings;

/// Outcome of a failed gateway operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// No provider session was ever established
    #[error("model gateway is not initialized")]
    Unavailable,

    /// The provider answered with an error or could not be reached
    #[error("upstream provider error: {0}")]
    Upstream(String),

    /// A structured response did not match the requested schema
    #[error("malformed structured response: {0}")]
    MalformedGeneration(String),
}

/// Missing or unusable credential, detected once at startup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct CredentialFault {
    pub reason: String,
}

impl CredentialFault {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Localized text shown in place of every surface's input controls
    pub fn user_message(&self) -> &'static str {
        strings::API_KEY_FAULT
    }
}
