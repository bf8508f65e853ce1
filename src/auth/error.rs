use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Structured failure codes for the remote authentication service.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid login credentials")]
    InvalidCredentials,

    #[error("email already registered")]
    EmailAlreadyRegistered,

    #[error("no authenticated session")]
    Unauthenticated,

    #[error("auth service error: {0}")]
    Remote(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Error body shapes the auth service has used across versions; all the
/// fields are optional and the first populated message wins.
#[derive(Debug, Default, Deserialize)]
pub struct AuthErrorBody {
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AuthErrorBody {
    fn message(self) -> String {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .unwrap_or_default()
    }
}

pub(crate) fn classify_auth_failure(status: StatusCode, body: AuthErrorBody) -> AuthError {
    let code = body.error_code.clone();
    let message = body.message();

    if code.as_deref() == Some("invalid_credentials") || message.contains("Invalid login credentials")
    {
        return AuthError::InvalidCredentials;
    }
    if matches!(code.as_deref(), Some("user_already_exists") | Some("email_exists"))
        || message.contains("already registered")
    {
        return AuthError::EmailAlreadyRegistered;
    }
    if status == StatusCode::UNAUTHORIZED {
        return AuthError::Unauthenticated;
    }

    if message.is_empty() {
        AuthError::Remote(format!("unexpected status {status}"))
    } else {
        AuthError::Remote(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_credentials_by_message() {
        let body = AuthErrorBody {
            error_description: Some("Invalid login credentials".into()),
            ..Default::default()
        };
        let err = classify_auth_failure(StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn invalid_credentials_by_code() {
        let body = AuthErrorBody {
            error_code: Some("invalid_credentials".into()),
            msg: Some("wrong email or password".into()),
            ..Default::default()
        };
        let err = classify_auth_failure(StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn already_registered_by_message() {
        let body = AuthErrorBody {
            msg: Some("User already registered".into()),
            ..Default::default()
        };
        let err = classify_auth_failure(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert!(matches!(err, AuthError::EmailAlreadyRegistered));
    }

    #[test]
    fn unknown_failures_keep_the_message() {
        let body = AuthErrorBody {
            message: Some("signups disabled".into()),
            ..Default::default()
        };
        match classify_auth_failure(StatusCode::BAD_REQUEST, body) {
            AuthError::Remote(message) => assert_eq!(message, "signups disabled"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
