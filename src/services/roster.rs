use std::sync::Arc;

use uuid::Uuid;

use crate::client::error::StoreError;
use crate::models::student::{Student, StudentStatus};
use crate::repository::StudentStore;
use crate::services::access::AccessResolution;
use crate::services::Notification;

const LOAD_ERROR_TITLE: &str = "Erro ao carregar alunos";
const DELETE_ERROR_TITLE: &str = "Erro ao excluir aluno";
const DELETE_SUCCESS_TITLE: &str = "Aluno excluído com sucesso";
const DELETE_PERMISSION_MESSAGE: &str =
    "Você não tem permissão para excluir alunos. Entre em contato com um administrador.";

/// Where the list view is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterPhase {
    Loading,
    /// Resolved role is non-admin; the store is never queried.
    Denied,
    Ready,
    /// A fetch failed; the last-known roster is retained.
    Error,
}

/// Roster counts shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterStats {
    pub total: usize,
    pub ativos: usize,
    pub formados: usize,
}

/// Owns the authoritative in-memory roster and the derived filtered view.
/// The roster is only ever replaced by a fresh fetch, never edited in place.
pub struct RosterService {
    store: Arc<dyn StudentStore>,
    phase: RosterPhase,
    students: Vec<Student>,
    search: String,
    last_error: Option<String>,
}

impl RosterService {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self {
            store,
            phase: RosterPhase::Loading,
            students: Vec::new(),
            search: String::new(),
            last_error: None,
        }
    }

    pub fn phase(&self) -> RosterPhase {
        self.phase
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Enters the view with an already-resolved access decision. Privileged
    /// data is never requested for a non-privileged session.
    pub async fn activate(&mut self, access: &AccessResolution) -> Result<(), Notification> {
        if !access.is_admin {
            self.phase = RosterPhase::Denied;
            return Ok(());
        }
        self.reload().await
    }

    /// Replaces the roster with a fresh snapshot from the source of truth.
    pub async fn reload(&mut self) -> Result<(), Notification> {
        if self.phase == RosterPhase::Denied {
            return Ok(());
        }
        match self.store.list().await {
            Ok(students) => {
                self.students = students;
                self.phase = RosterPhase::Ready;
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                self.last_error = Some(message.clone());
                self.phase = RosterPhase::Error;
                Err(Notification::with_description(LOAD_ERROR_TITLE, message))
            }
        }
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Derived view: case-insensitive substring match on name or matricula,
    /// preserving roster order. An empty term matches everything.
    pub fn filtered(&self) -> Vec<&Student> {
        let needle = self.search.to_lowercase();
        self.students
            .iter()
            .filter(|student| {
                student.nome.to_lowercase().contains(&needle)
                    || student.matricula.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn stats(&self) -> RosterStats {
        RosterStats {
            total: self.students.len(),
            ativos: self.count_status(StudentStatus::Ativo),
            formados: self.count_status(StudentStatus::Formado),
        }
    }

    fn count_status(&self, status: StudentStatus) -> usize {
        self.students
            .iter()
            .filter(|student| student.status == status)
            .count()
    }

    /// Deletes a record and re-reads the roster. Deletion is confirmed by
    /// the fresh snapshot, not by the empty response. A reload failure after
    /// a successful delete rides along in the confirmation's description so
    /// the success is never misreported.
    pub async fn remove(&mut self, id: Uuid) -> Result<Notification, Notification> {
        if let Err(err) = self.store.remove(id).await {
            return Err(match err {
                StoreError::PermissionDenied => {
                    Notification::with_description(DELETE_ERROR_TITLE, DELETE_PERMISSION_MESSAGE)
                }
                other => Notification::with_description(DELETE_ERROR_TITLE, other.to_string()),
            });
        }

        match self.reload().await {
            Ok(()) => Ok(Notification::new(DELETE_SUCCESS_TITLE)),
            Err(reload) => Ok(Notification::with_description(
                DELETE_SUCCESS_TITLE,
                format!("A lista não pôde ser recarregada: {reload}"),
            )),
        }
    }
}
