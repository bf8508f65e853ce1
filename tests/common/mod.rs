#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use gestao_alunos_rust::auth::{AuthUser, Session, SessionSource};
use gestao_alunos_rust::client::error::StoreError;
use gestao_alunos_rust::models::identity::Profile;
use gestao_alunos_rust::models::student::{Student, StudentStatus, StudentUpdate, ValidStudent};
use gestao_alunos_rust::repository::{DirectoryStore, StudentStore};

/// Failure the fake store should produce on its next call.
#[derive(Debug, Clone, Copy)]
pub enum FailKind {
    PermissionDenied,
    UniqueViolation,
    Remote,
}

impl FailKind {
    fn to_error(self) -> StoreError {
        match self {
            FailKind::PermissionDenied => StoreError::PermissionDenied,
            FailKind::UniqueViolation => StoreError::UniqueViolation,
            FailKind::Remote => StoreError::Remote("falha remota simulada".to_string()),
        }
    }
}

/// In-process student store that records every call it receives.
#[derive(Default)]
pub struct FakeStudentStore {
    pub students: Mutex<Vec<Student>>,
    pub list_calls: AtomicUsize,
    pub inserts: Mutex<Vec<(ValidStudent, Uuid)>>,
    pub updates: Mutex<Vec<(Uuid, StudentUpdate)>>,
    pub removals: Mutex<Vec<Uuid>>,
    fail_next_mutation: Mutex<Option<FailKind>>,
    fail_next_list: Mutex<Option<FailKind>>,
}

impl FakeStudentStore {
    pub fn seeded(students: Vec<Student>) -> Self {
        let store = Self::default();
        *store.students.lock().unwrap() = students;
        store
    }

    /// Makes the next insert/update/remove fail.
    pub fn fail_next_mutation(&self, kind: FailKind) {
        *self.fail_next_mutation.lock().unwrap() = Some(kind);
    }

    /// Makes the next list fail.
    pub fn fail_next_list(&self, kind: FailKind) {
        *self.fail_next_list.lock().unwrap() = Some(kind);
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn take_mutation_failure(&self) -> Option<StoreError> {
        self.fail_next_mutation
            .lock()
            .unwrap()
            .take()
            .map(FailKind::to_error)
    }
}

#[async_trait]
impl StudentStore for FakeStudentStore {
    async fn list(&self) -> Result<Vec<Student>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(kind) = self.fail_next_list.lock().unwrap().take() {
            return Err(kind.to_error());
        }
        let mut students = self.students.lock().unwrap().clone();
        students.sort_by(|a, b| a.nome.cmp(&b.nome));
        Ok(students)
    }

    async fn insert(&self, record: ValidStudent, owner: Uuid) -> Result<(), StoreError> {
        if let Some(err) = self.take_mutation_failure() {
            return Err(err);
        }
        self.inserts.lock().unwrap().push((record.clone(), owner));
        self.students.lock().unwrap().push(Student {
            id: Uuid::new_v4(),
            nome: record.nome,
            matricula: record.matricula,
            email: record.email,
            data_nascimento: record.data_nascimento,
            curso: record.curso,
            status: record.status,
            created_by: Some(owner),
        });
        Ok(())
    }

    async fn update(&self, id: Uuid, changes: StudentUpdate) -> Result<(), StoreError> {
        if let Some(err) = self.take_mutation_failure() {
            return Err(err);
        }
        self.updates.lock().unwrap().push((id, changes.clone()));
        if let Some(student) = self
            .students
            .lock()
            .unwrap()
            .iter_mut()
            .find(|student| student.id == id)
        {
            student.nome = changes.nome;
            student.matricula = changes.matricula;
            student.email = changes.email;
            student.data_nascimento = changes.data_nascimento;
            student.curso = changes.curso;
            student.status = changes.status;
        }
        Ok(())
    }

    async fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        if let Some(err) = self.take_mutation_failure() {
            return Err(err);
        }
        self.removals.lock().unwrap().push(id);
        self.students.lock().unwrap().retain(|student| student.id != id);
        Ok(())
    }
}

/// In-process identity directory.
#[derive(Default)]
pub struct FakeDirectory {
    pub profile: Mutex<Option<Profile>>,
    pub roles: Mutex<Vec<String>>,
    pub fail_profile: Mutex<bool>,
    pub fail_roles: Mutex<bool>,
}

impl FakeDirectory {
    pub fn with_roles(roles: &[&str]) -> Self {
        let directory = Self::default();
        *directory.roles.lock().unwrap() = roles.iter().map(|role| role.to_string()).collect();
        directory
    }
}

#[async_trait]
impl DirectoryStore for FakeDirectory {
    async fn fetch_profile(&self, _user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        if *self.fail_profile.lock().unwrap() {
            return Err(StoreError::Remote("perfil indisponível".to_string()));
        }
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn fetch_roles(&self, _user_id: Uuid) -> Result<Vec<String>, StoreError> {
        if *self.fail_roles.lock().unwrap() {
            return Err(StoreError::Remote("papéis indisponíveis".to_string()));
        }
        Ok(self.roles.lock().unwrap().clone())
    }
}

/// Session source with a fixed answer.
#[derive(Default)]
pub struct FakeSessions {
    pub session: Mutex<Option<Session>>,
}

impl FakeSessions {
    pub fn signed_in(user_id: Uuid) -> Self {
        let sessions = Self::default();
        *sessions.session.lock().unwrap() = Some(session_for(user_id));
        sessions
    }
}

#[async_trait]
impl SessionSource for FakeSessions {
    async fn current_session(&self) -> Option<Session> {
        self.session.lock().unwrap().clone()
    }
}

pub fn session_for(user_id: Uuid) -> Session {
    Session {
        access_token: "fake-token".to_string(),
        refresh_token: None,
        user: AuthUser {
            id: user_id,
            email: Some("admin@exemplo.com".to_string()),
        },
        expires_at: None,
    }
}

pub fn student(nome: &str, matricula: &str) -> Student {
    Student {
        id: Uuid::new_v4(),
        nome: nome.to_string(),
        matricula: matricula.to_string(),
        email: format!("{matricula}@exemplo.com"),
        data_nascimento: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        curso: "Engenharia de Software".to_string(),
        status: StudentStatus::Ativo,
        created_by: None,
    }
}
