use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row shape of the remote `alunos` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    pub nome: String,
    pub matricula: String,
    pub email: String,
    pub data_nascimento: NaiveDate,
    pub curso: String,
    pub status: StudentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
}

/// Enrollment status as stored in the `status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudentStatus {
    Ativo,
    Trancado,
    Formado,
}

impl StudentStatus {
    pub const ALL: [StudentStatus; 3] = [
        StudentStatus::Ativo,
        StudentStatus::Trancado,
        StudentStatus::Formado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StudentStatus::Ativo => "Ativo",
            StudentStatus::Trancado => "Trancado",
            StudentStatus::Formado => "Formado",
        }
    }
}

impl std::fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StudentStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        StudentStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| format!("unknown status: {value}"))
    }
}

/// Form state exactly as typed; everything is a string until validation
/// parses it into a [`ValidStudent`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentDraft {
    pub nome: String,
    pub matricula: String,
    pub email: String,
    pub data_nascimento: String,
    pub curso: String,
    pub status: String,
}

impl StudentDraft {
    /// Empty draft for the create dialog. Status starts as `Ativo`.
    pub fn blank() -> Self {
        Self {
            status: StudentStatus::Ativo.to_string(),
            ..Self::default()
        }
    }
}

impl From<&Student> for StudentDraft {
    fn from(student: &Student) -> Self {
        Self {
            nome: student.nome.clone(),
            matricula: student.matricula.clone(),
            email: student.email.clone(),
            data_nascimento: student.data_nascimento.to_string(),
            curso: student.curso.clone(),
            status: student.status.to_string(),
        }
    }
}

/// A draft that passed validation, with date and status already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidStudent {
    pub nome: String,
    pub matricula: String,
    pub email: String,
    pub data_nascimento: NaiveDate,
    pub curso: String,
    pub status: StudentStatus,
}

/// Insert payload, stamped with the creator's identity.
#[derive(Debug, Clone, Serialize)]
pub struct NewStudent {
    pub nome: String,
    pub matricula: String,
    pub email: String,
    pub data_nascimento: NaiveDate,
    pub curso: String,
    pub status: StudentStatus,
    pub created_by: Uuid,
}

impl NewStudent {
    pub fn from_valid(record: ValidStudent, owner: Uuid) -> Self {
        Self {
            nome: record.nome,
            matricula: record.matricula,
            email: record.email,
            data_nascimento: record.data_nascimento,
            curso: record.curso,
            status: record.status,
            created_by: owner,
        }
    }
}

/// Update payload. The `matricula` sent here always comes from the record
/// being edited, never from the form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentUpdate {
    pub nome: String,
    pub matricula: String,
    pub email: String,
    pub data_nascimento: NaiveDate,
    pub curso: String,
    pub status: StudentStatus,
}

impl StudentUpdate {
    pub fn from_valid(record: ValidStudent, original_matricula: &str) -> Self {
        Self {
            nome: record.nome,
            matricula: original_matricula.to_string(),
            email: record.email,
            data_nascimento: record.data_nascimento,
            curso: record.curso,
            status: record.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_column_text() {
        for status in StudentStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            let back: StudentStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("ativo".parse::<StudentStatus>().unwrap(), StudentStatus::Ativo);
        assert_eq!("FORMADO".parse::<StudentStatus>().unwrap(), StudentStatus::Formado);
        assert!("Matriculado".parse::<StudentStatus>().is_err());
    }

    #[test]
    fn blank_draft_defaults_to_ativo() {
        let draft = StudentDraft::blank();
        assert_eq!(draft.status, "Ativo");
        assert!(draft.nome.is_empty());
    }

    #[test]
    fn update_payload_pins_the_original_matricula() {
        let valid = ValidStudent {
            nome: "Maria Souza".into(),
            matricula: "9999".into(),
            email: "maria@exemplo.com".into(),
            data_nascimento: NaiveDate::from_ymd_opt(2001, 5, 20).unwrap(),
            curso: "Direito".into(),
            status: StudentStatus::Ativo,
        };
        let update = StudentUpdate::from_valid(valid, "2024001");
        assert_eq!(update.matricula, "2024001");
    }
}
