use std::sync::Arc;

use crate::auth::SessionSource;
use crate::client::error::StoreError;
use crate::models::student::{Student, StudentDraft, StudentUpdate};
use crate::repository::StudentStore;
use crate::services::Notification;
use crate::validate::{self, FormMode};

const VALIDATION_ERROR_TITLE: &str = "Erro de validação";
const NOT_AUTHENTICATED: &str = "Usuário não autenticado";
const CREATE_ERROR_TITLE: &str = "Erro ao cadastrar aluno";
const UPDATE_ERROR_TITLE: &str = "Erro ao atualizar aluno";
const SAVE_ERROR_TITLE: &str = "Erro ao salvar aluno";
const CREATE_SUCCESS: &str = "Aluno cadastrado com sucesso";
const UPDATE_SUCCESS: &str = "Aluno atualizado com sucesso";
const CREATE_PERMISSION_MESSAGE: &str =
    "Você não tem permissão para adicionar alunos. Entre em contato com um administrador.";
const UPDATE_PERMISSION_MESSAGE: &str =
    "Você não tem permissão para atualizar alunos. Entre em contato com um administrador.";
const MATRICULA_TAKEN: &str = "Matrícula já cadastrada";
const SUBMIT_IN_FLIGHT: &str = "Já existe um envio em andamento";

/// Submit progress as an explicit state machine rather than a flag, so a
/// second in-flight submission can never start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Submitting,
}

/// One edit/create transaction. A `None` target means create; a populated
/// target means edit, with the matricula locked to the target's value.
pub struct StudentEditor {
    store: Arc<dyn StudentStore>,
    sessions: Arc<dyn SessionSource>,
    target: Option<Student>,
    pub draft: StudentDraft,
    phase: SubmitPhase,
    open: bool,
}

impl StudentEditor {
    pub fn new(store: Arc<dyn StudentStore>, sessions: Arc<dyn SessionSource>) -> Self {
        Self {
            store,
            sessions,
            target: None,
            draft: StudentDraft::default(),
            phase: SubmitPhase::Idle,
            open: false,
        }
    }

    /// Opens the dialog for a new record. Status is seeded `Ativo`.
    pub fn open_create(&mut self) {
        self.target = None;
        self.draft = StudentDraft::blank();
        self.open = true;
    }

    /// Opens the dialog seeded from an existing record.
    pub fn open_edit(&mut self, student: Student) {
        self.draft = StudentDraft::from(&student);
        self.target = Some(student);
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.target = None;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn target(&self) -> Option<&Student> {
        self.target.as_ref()
    }

    /// Whether the matricula field accepts input. It is locked as soon as a
    /// target is set.
    pub fn matricula_editable(&self) -> bool {
        self.target.is_none()
    }

    /// Runs the whole submit transaction: validation gate, session
    /// precondition, repository dispatch, error translation. On success the
    /// dialog closes and the caller reloads the roster; on any failure the
    /// dialog stays open.
    pub async fn submit(&mut self) -> Result<Notification, Notification> {
        if self.phase == SubmitPhase::Submitting {
            return Err(Notification::new(SUBMIT_IN_FLIGHT));
        }

        let mode = if self.target.is_some() {
            FormMode::Edit
        } else {
            FormMode::Create
        };
        let record = validate::student(&self.draft, mode).map_err(|violation| {
            Notification::with_description(VALIDATION_ERROR_TITLE, violation.message)
        })?;

        // The view is already gated, but an absent session is still a hard
        // precondition failure here, not an assumption.
        let Some(session) = self.sessions.current_session().await else {
            return Err(Notification::new(NOT_AUTHENTICATED));
        };

        self.phase = SubmitPhase::Submitting;
        let outcome = match self.target.clone() {
            Some(target) => {
                let changes = StudentUpdate::from_valid(record, &target.matricula);
                self.store
                    .update(target.id, changes)
                    .await
                    .map(|_| Notification::new(UPDATE_SUCCESS))
                    .map_err(translate_update_failure)
            }
            None => self
                .store
                .insert(record, session.user.id)
                .await
                .map(|_| Notification::new(CREATE_SUCCESS))
                .map_err(translate_insert_failure),
        };
        self.phase = SubmitPhase::Idle;

        if outcome.is_ok() {
            self.close();
        }
        outcome
    }
}

fn translate_insert_failure(err: StoreError) -> Notification {
    match err {
        StoreError::PermissionDenied => {
            Notification::with_description(CREATE_ERROR_TITLE, CREATE_PERMISSION_MESSAGE)
        }
        StoreError::UniqueViolation => {
            Notification::with_description(CREATE_ERROR_TITLE, MATRICULA_TAKEN)
        }
        other => Notification::with_description(SAVE_ERROR_TITLE, other.to_string()),
    }
}

fn translate_update_failure(err: StoreError) -> Notification {
    match err {
        StoreError::PermissionDenied => {
            Notification::with_description(UPDATE_ERROR_TITLE, UPDATE_PERMISSION_MESSAGE)
        }
        other => Notification::with_description(SAVE_ERROR_TITLE, other.to_string()),
    }
}
