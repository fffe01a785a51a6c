// masked-email/src/error.rs
use crate::masked_email::MaskedEmailState;
use jmap_client::{HttpError, JmapError};
use thiserror::Error;

/// Failures of masked email operations against the remote service
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Jmap(#[from] JmapError),

    #[error("alias not found: {email}")]
    AliasNotFound { email: String },

    #[error("'{email}' is already '{state}'")]
    AlreadyInState {
        email: String,
        state: MaskedEmailState,
    },

    #[error("alias '{email}' has no id and cannot be updated")]
    MissingIdentifier { email: String },

    #[error("server did not confirm the update of '{id}'")]
    UpdateNotConfirmed { id: String },

    #[error("server rejected the change to '{id}': {reason}")]
    Rejected { id: String, reason: String },

    #[error("no created alias in response")]
    MissingCreated,

    #[error("no account in session")]
    NoAccount,
}

impl From<HttpError> for ClientError {
    fn from(err: HttpError) -> Self {
        Self::Jmap(JmapError::Http(err))
    }
}

impl ClientError {
    /// Retryable transport failures; protocol and client errors are permanent
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Jmap(err) if err.is_retryable())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AliasNotFound { .. })
    }
}
