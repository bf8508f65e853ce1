use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role label that grants access to the management view.
pub const ADMIN_ROLE: &str = "admin";

/// Row shape of the remote `profiles` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
}

/// Row shape of the remote `user_roles` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub user_id: Uuid,
    pub role: String,
}
