use thiserror::Error;

/// Unified error type for the ZoneGate connector.
///
/// This error type centralizes all failures the connector can surface to its
/// callers. Authorization denials and unknown users are fatal to the calling
/// request; directory lookup failures never appear here — they are audited at
/// the directory adapter boundary and folded into the eventual decision.
#[derive(Debug, Error)]
pub enum ZoneGateError {
    /// No resolvable account exists for the supplied user identity.
    #[error("unknown user: {user_id}")]
    UnknownUser { user_id: String },

    /// The user is not authorized to perform the requested action.
    #[error("user {user_id} is not authorized to {action}")]
    Unauthorized { user_id: String, action: String },

    /// The connector configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

pub type ZoneGateResult<T> = Result<T, ZoneGateError>;

impl ZoneGateError {
    pub fn unknown_user(user_id: impl Into<String>) -> Self {
        Self::UnknownUser {
            user_id: user_id.into(),
        }
    }

    pub fn unauthorized(user_id: impl Into<String>, action: impl Into<String>) -> Self {
        Self::Unauthorized {
            user_id: user_id.into(),
            action: action.into(),
        }
    }
}
