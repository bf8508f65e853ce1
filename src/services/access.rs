use std::sync::Arc;

use uuid::Uuid;

use crate::auth::SessionSource;
use crate::models::identity::ADMIN_ROLE;
use crate::repository::DirectoryStore;

/// Outcome of resolving the current session and its privileges.
#[derive(Debug, Clone)]
pub enum Access {
    /// No live session; the caller redirects to the login view.
    Unauthenticated,
    Resolved(AccessResolution),
}

#[derive(Debug, Clone)]
pub struct AccessResolution {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub is_admin: bool,
}

/// Resolves session and role once per view activation. Results are never
/// cached across views.
pub struct AccessService {
    sessions: Arc<dyn SessionSource>,
    directory: Arc<dyn DirectoryStore>,
}

impl AccessService {
    pub fn new(sessions: Arc<dyn SessionSource>, directory: Arc<dyn DirectoryStore>) -> Self {
        Self {
            sessions,
            directory,
        }
    }

    pub async fn resolve(&self) -> Access {
        let Some(session) = self.sessions.current_session().await else {
            return Access::Unauthenticated;
        };
        let user_id = session.user.id;

        // Display name is best-effort; a missing or unreadable profile is
        // not a reason to block the view.
        let display_name = match self.directory.fetch_profile(user_id).await {
            Ok(Some(profile)) => Some(profile.username),
            Ok(None) => None,
            Err(err) => {
                tracing::debug!("profile lookup failed: {err}");
                None
            }
        };

        // Roles that fail to load deny admin access. Never fail open.
        let is_admin = match self.directory.fetch_roles(user_id).await {
            Ok(roles) => roles.iter().any(|role| role == ADMIN_ROLE),
            Err(err) => {
                tracing::warn!("role lookup failed, treating session as non-admin: {err}");
                false
            }
        };

        Access::Resolved(AccessResolution {
            user_id,
            display_name,
            is_admin,
        })
    }
}
