pub mod error;
pub mod events;

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{Method, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::client::StoreClient;
use error::{classify_auth_failure, AuthError, AuthErrorBody};
use events::{AuthEvent, SessionWatch, Subscription};

/// Authenticated principal as reported by the remote auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Opaque session issued by the remote auth service. The token is never
/// inspected locally; expiry is the only field acted on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }
}

/// Read side of the session state. Controllers depend on this seam instead
/// of the concrete client so they can be exercised with fakes.
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// The current live session, or `None` when signed out or expired.
    async fn current_session(&self) -> Option<Session>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .or_else(|| self.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            user: self.user,
            expires_at,
        }
    }
}

/// Client for the remote authentication service. Owns the current session
/// and the observer registry for session-change notifications.
pub struct AuthClient {
    client: Arc<StoreClient>,
    session: Mutex<Option<Session>>,
    watch: SessionWatch,
}

impl AuthClient {
    pub fn new(client: Arc<StoreClient>) -> Self {
        Self {
            client,
            session: Mutex::new(None),
            watch: SessionWatch::new(),
        }
    }

    /// Registers an observer for session-change events.
    pub fn subscribe(
        &self,
        callback: impl Fn(&AuthEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.watch.subscribe(callback)
    }

    pub fn watch(&self) -> &SessionWatch {
        &self.watch
    }

    /// Adopts a previously persisted session, emitting `SessionRestored`.
    /// Expired sessions are discarded without an event.
    pub fn restore(&self, session: Session) {
        if session.is_expired(Utc::now()) {
            tracing::debug!("stored session has expired, ignoring it");
            return;
        }
        *self.slot() = Some(session.clone());
        self.watch.emit(&AuthEvent::SessionRestored(session));
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let response = self
            .client
            .auth(Method::POST, "token?grant_type=password", None)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::read_failure(response).await);
        }

        let session = response.json::<TokenResponse>().await?.into_session();
        *self.slot() = Some(session.clone());
        self.watch.emit(&AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    /// Creates an account. No session is established; the user signs in
    /// afterwards.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<(), AuthError> {
        let response = self
            .client
            .auth(Method::POST, "signup", None)
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "username": username },
            }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::read_failure(response).await);
        }
        Ok(())
    }

    /// Clears the local session and emits `SignedOut`, then revokes the
    /// token remotely. Remote revocation is best-effort: the local sign-out
    /// already happened and a failure is only logged.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let previous = self.slot().take();
        self.watch.emit(&AuthEvent::SignedOut);

        if let Some(session) = previous {
            let result = self
                .client
                .auth(Method::POST, "logout", Some(&session.access_token))
                .send()
                .await;
            match result {
                Ok(response) if !response.status().is_success() => {
                    tracing::warn!(status = %response.status(), "remote sign-out was rejected");
                }
                Err(err) => tracing::warn!("remote sign-out failed: {err}"),
                Ok(_) => {}
            }
        }
        Ok(())
    }

    async fn read_failure(response: Response) -> AuthError {
        let status = response.status();
        let body = response.json::<AuthErrorBody>().await.unwrap_or_default();
        classify_auth_failure(status, body)
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SessionSource for AuthClient {
    async fn current_session(&self) -> Option<Session> {
        self.slot()
            .clone()
            .filter(|session| !session.is_expired(Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_expiring_at(expires_at: Option<DateTime<Utc>>) -> Session {
        Session {
            access_token: "token".into(),
            refresh_token: None,
            user: AuthUser {
                id: Uuid::new_v4(),
                email: Some("a@b.com".into()),
            },
            expires_at,
        }
    }

    #[test]
    fn session_without_expiry_never_expires() {
        let session = session_expiring_at(None);
        assert!(!session.is_expired(Utc::now()));
    }

    #[test]
    fn session_past_expiry_is_expired() {
        let session = session_expiring_at(Some(Utc::now() - Duration::minutes(1)));
        assert!(session.is_expired(Utc::now()));
    }

    #[test]
    fn token_response_prefers_absolute_expiry() {
        let token = TokenResponse {
            access_token: "t".into(),
            refresh_token: None,
            expires_in: Some(3600),
            expires_at: Some(1_700_000_000),
            user: AuthUser {
                id: Uuid::new_v4(),
                email: None,
            },
        };
        let session = token.into_session();
        assert_eq!(
            session.expires_at,
            DateTime::from_timestamp(1_700_000_000, 0)
        );
    }
}
