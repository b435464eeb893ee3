use shared::domain::{Field, FormKind, UnknownField};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("field `{field}` is not part of the {} form", .kind.as_str())]
    NotInForm { field: Field, kind: FormKind },
    #[error(transparent)]
    UnknownField(#[from] UnknownField),
}

/// Failures that never produced a usable answer from the auth service.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("invalid auth service url: {0}")]
    InvalidUrl(String),
    #[error("failed to reach auth service: {0}")]
    Unreachable(String),
    #[error("malformed response body: {0}")]
    MalformedBody(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() || value.is_body() {
            TransportError::MalformedBody(value.to_string())
        } else {
            TransportError::Unreachable(value.to_string())
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(value: serde_json::Error) -> Self {
        TransportError::MalformedBody(value.to_string())
    }
}

/// Terminal failure of one submission attempt. The user can always retry.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("failed to persist session: {0:#}")]
    Session(anyhow::Error),
}
