//! Repository client for the remote store's REST surface.
//!
//! Every operation is a single attempt with no local retry and no optimistic
//! mutation; callers re-read state after a successful change. Authorization
//! is enforced remotely by row-level policies, so each request carries the
//! caller's bearer token and the client only translates the outcome.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use uuid::Uuid;

use crate::auth::SessionSource;
use crate::client::error::StoreError;
use crate::client::StoreClient;
use crate::models::identity::{Profile, RoleAssignment};
use crate::models::student::{NewStudent, Student, StudentUpdate, ValidStudent};

pub const STUDENTS_TABLE: &str = "alunos";
pub const PROFILES_TABLE: &str = "profiles";
pub const ROLES_TABLE: &str = "user_roles";

/// Student record operations, as the controllers see them.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// All records visible under the caller's authorization, ordered by name.
    async fn list(&self) -> Result<Vec<Student>, StoreError>;

    /// Creates a record stamped with the creator's identity.
    async fn insert(&self, record: ValidStudent, owner: Uuid) -> Result<(), StoreError>;

    /// Mutates an existing record. Identifier and matricula never change;
    /// the payload's matricula is the record's original value.
    async fn update(&self, id: Uuid, changes: StudentUpdate) -> Result<(), StoreError>;

    /// Deletes by identifier.
    async fn remove(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Identity lookups backing the role gate and the header display name.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError>;
    async fn fetch_roles(&self, user_id: Uuid) -> Result<Vec<String>, StoreError>;
}

/// REST-backed implementation of both store seams.
pub struct RemoteRepository {
    client: Arc<StoreClient>,
    sessions: Arc<dyn SessionSource>,
}

impl RemoteRepository {
    pub fn new(client: Arc<StoreClient>, sessions: Arc<dyn SessionSource>) -> Self {
        Self { client, sessions }
    }

    async fn bearer(&self) -> Option<String> {
        self.sessions
            .current_session()
            .await
            .map(|session| session.access_token)
    }
}

#[async_trait]
impl StudentStore for RemoteRepository {
    async fn list(&self) -> Result<Vec<Student>, StoreError> {
        let token = self.bearer().await;
        let response = self
            .client
            .rest(Method::GET, STUDENTS_TABLE, token.as_deref())
            .query(&[("select", "*"), ("order", "nome.asc")])
            .send()
            .await?;
        let response = StoreClient::expect_success(response).await?;
        Ok(response.json::<Vec<Student>>().await?)
    }

    async fn insert(&self, record: ValidStudent, owner: Uuid) -> Result<(), StoreError> {
        let token = self.bearer().await;
        let body = NewStudent::from_valid(record, owner);
        let response = self
            .client
            .rest(Method::POST, STUDENTS_TABLE, token.as_deref())
            .header("Prefer", "return=minimal")
            .json(&body)
            .send()
            .await?;
        StoreClient::expect_success(response).await?;
        Ok(())
    }

    async fn update(&self, id: Uuid, changes: StudentUpdate) -> Result<(), StoreError> {
        let token = self.bearer().await;
        let filter = format!("eq.{id}");
        let response = self
            .client
            .rest(Method::PATCH, STUDENTS_TABLE, token.as_deref())
            .query(&[("id", filter.as_str())])
            .header("Prefer", "return=minimal")
            .json(&changes)
            .send()
            .await?;
        StoreClient::expect_success(response).await?;
        Ok(())
    }

    async fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        let token = self.bearer().await;
        let filter = format!("eq.{id}");
        let response = self
            .client
            .rest(Method::DELETE, STUDENTS_TABLE, token.as_deref())
            .query(&[("id", filter.as_str())])
            .send()
            .await?;
        StoreClient::expect_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl DirectoryStore for RemoteRepository {
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let token = self.bearer().await;
        let filter = format!("eq.{user_id}");
        let response = self
            .client
            .rest(Method::GET, PROFILES_TABLE, token.as_deref())
            .query(&[("select", "id,username"), ("id", filter.as_str())])
            .send()
            .await?;
        let response = StoreClient::expect_success(response).await?;
        let mut rows = response.json::<Vec<Profile>>().await?;
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.remove(0)))
        }
    }

    async fn fetch_roles(&self, user_id: Uuid) -> Result<Vec<String>, StoreError> {
        let token = self.bearer().await;
        let filter = format!("eq.{user_id}");
        let response = self
            .client
            .rest(Method::GET, ROLES_TABLE, token.as_deref())
            .query(&[("select", "user_id,role"), ("user_id", filter.as_str())])
            .send()
            .await?;
        let response = StoreClient::expect_success(response).await?;
        let rows = response.json::<Vec<RoleAssignment>>().await?;
        Ok(rows.into_iter().map(|row| row.role).collect())
    }
}
