use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Structured failure codes for remote store operations.
///
/// Classification happens once, here, against the store's error contract;
/// presentation code matches on variants and never inspects wire text.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("operation rejected by row-level security policy")]
    PermissionDenied,

    #[error("unique constraint violated")]
    UniqueViolation,

    #[error("no authenticated session")]
    Unauthenticated,

    #[error("remote store error: {0}")]
    Remote(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("invalid store URL")]
    InvalidStoreUrl,
}

/// Error body returned by the store's REST layer. `code` carries the
/// underlying SQLSTATE when the failure originated in the database.
#[derive(Debug, Default, Deserialize)]
pub struct RestErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

const SQLSTATE_INSUFFICIENT_PRIVILEGE: &str = "42501";
const SQLSTATE_UNIQUE_VIOLATION: &str = "23505";

/// Maps a non-success REST response to a structured error.
///
/// The SQLSTATE code is preferred; the message substrings are a fallback for
/// proxy paths that drop the code field.
pub(crate) fn classify_rest_failure(status: StatusCode, body: RestErrorBody) -> StoreError {
    let message = body.message.unwrap_or_default();

    if body.code.as_deref() == Some(SQLSTATE_INSUFFICIENT_PRIVILEGE)
        || message.contains("row-level security")
    {
        return StoreError::PermissionDenied;
    }
    if body.code.as_deref() == Some(SQLSTATE_UNIQUE_VIOLATION) || message.contains("duplicate key")
    {
        return StoreError::UniqueViolation;
    }
    if status == StatusCode::UNAUTHORIZED {
        return StoreError::Unauthenticated;
    }

    if message.is_empty() {
        StoreError::Remote(format!("unexpected status {status}"))
    } else {
        StoreError::Remote(message)
    }
}
