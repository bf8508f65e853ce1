//! Pure form validation. Rules run in a fixed order and the first violated
//! constraint wins, so the reported message is deterministic. A passing
//! student check returns the parsed record; nothing here touches the remote
//! store.

use chrono::NaiveDate;

use crate::models::student::{StudentDraft, StudentStatus, ValidStudent};

pub const NOME_MIN: &str = "Nome deve ter no mínimo 3 caracteres";
pub const NOME_MAX: &str = "Nome deve ter no máximo 100 caracteres";
pub const MATRICULA_OBRIGATORIA: &str = "Matrícula é obrigatória";
pub const MATRICULA_MAX: &str = "Matrícula deve ter no máximo 50 caracteres";
pub const EMAIL_INVALIDO: &str = "Email inválido";
pub const EMAIL_MAX: &str = "Email deve ter no máximo 255 caracteres";
pub const NASCIMENTO_OBRIGATORIO: &str = "Data de nascimento é obrigatória";
pub const NASCIMENTO_INVALIDO: &str = "Data de nascimento inválida";
pub const CURSO_MIN: &str = "Curso deve ter no mínimo 3 caracteres";
pub const CURSO_MAX: &str = "Curso deve ter no máximo 100 caracteres";
pub const STATUS_INVALIDO: &str = "Status inválido";
pub const SENHA_MIN: &str = "Senha deve ter no mínimo 6 caracteres";
pub const SENHAS_NAO_COINCIDEM: &str = "As senhas não coincidem";
pub const USUARIO_MIN: &str = "Nome de usuário deve ter no mínimo 3 caracteres";

/// First constraint a candidate record violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub message: &'static str,
}

impl Violation {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Whether the form edits an existing record or creates a new one.
/// Matricula is immutable after creation, so it is only checked on create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Checks a student draft and parses it on success.
///
/// Lengths are counted in characters, not bytes, so accented names measure
/// the way users expect.
pub fn student(draft: &StudentDraft, mode: FormMode) -> Result<ValidStudent, Violation> {
    let nome_len = draft.nome.chars().count();
    if nome_len < 3 {
        return Err(Violation::new("nome", NOME_MIN));
    }
    if nome_len > 100 {
        return Err(Violation::new("nome", NOME_MAX));
    }

    if mode == FormMode::Create {
        if draft.matricula.is_empty() {
            return Err(Violation::new("matricula", MATRICULA_OBRIGATORIA));
        }
        if draft.matricula.chars().count() > 50 {
            return Err(Violation::new("matricula", MATRICULA_MAX));
        }
    }

    if !email_is_wellformed(&draft.email) {
        return Err(Violation::new("email", EMAIL_INVALIDO));
    }
    if draft.email.chars().count() > 255 {
        return Err(Violation::new("email", EMAIL_MAX));
    }

    if draft.data_nascimento.is_empty() {
        return Err(Violation::new("data_nascimento", NASCIMENTO_OBRIGATORIO));
    }
    let data_nascimento = NaiveDate::parse_from_str(&draft.data_nascimento, "%Y-%m-%d")
        .map_err(|_| Violation::new("data_nascimento", NASCIMENTO_INVALIDO))?;

    let curso_len = draft.curso.chars().count();
    if curso_len < 3 {
        return Err(Violation::new("curso", CURSO_MIN));
    }
    if curso_len > 100 {
        return Err(Violation::new("curso", CURSO_MAX));
    }

    let status: StudentStatus = draft
        .status
        .parse()
        .map_err(|_| Violation::new("status", STATUS_INVALIDO))?;

    Ok(ValidStudent {
        nome: draft.nome.clone(),
        matricula: draft.matricula.clone(),
        email: draft.email.clone(),
        data_nascimento,
        curso: draft.curso.clone(),
        status,
    })
}

/// Account creation form, as typed.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub username: String,
}

/// Login form, as typed.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

pub fn signup(form: &SignupForm) -> Result<(), Violation> {
    if !email_is_wellformed(&form.email) {
        return Err(Violation::new("email", EMAIL_INVALIDO));
    }
    if form.password.chars().count() < 6 {
        return Err(Violation::new("password", SENHA_MIN));
    }
    if form.confirm_password != form.password {
        return Err(Violation::new("confirm_password", SENHAS_NAO_COINCIDEM));
    }
    if form.username.chars().count() < 3 {
        return Err(Violation::new("username", USUARIO_MIN));
    }
    Ok(())
}

pub fn login(form: &LoginForm) -> Result<(), Violation> {
    if !email_is_wellformed(&form.email) {
        return Err(Violation::new("email", EMAIL_INVALIDO));
    }
    if form.password.chars().count() < 6 {
        return Err(Violation::new("password", SENHA_MIN));
    }
    Ok(())
}

fn email_is_wellformed(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
