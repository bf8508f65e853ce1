use std::io::{self, Write};
use std::sync::Arc;

use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{AuthClient, SessionSource};
use crate::cli::{utils, OutputFormat};
use crate::client::StoreClient;
use crate::models::student::Student;
use crate::repository::RemoteRepository;
use crate::services::{
    Access, AccessService, RosterPhase, RosterService, StudentEditor,
};

#[derive(Subcommand)]
pub enum StudentCommands {
    #[command(about = "List students visible to the current session")]
    List {
        #[arg(long, help = "Filtro por nome ou matrícula")]
        search: Option<String>,
    },

    #[command(about = "Register a new student")]
    Create {
        #[arg(long, help = "Nome completo")]
        nome: String,
        #[arg(long, help = "Matrícula (única, imutável)")]
        matricula: String,
        #[arg(long, help = "Email")]
        email: String,
        #[arg(long = "data-nascimento", help = "Data de nascimento (AAAA-MM-DD)")]
        data_nascimento: String,
        #[arg(long, help = "Curso")]
        curso: String,
        #[arg(long, default_value = "Ativo", help = "Status: Ativo, Trancado ou Formado")]
        status: String,
    },

    #[command(about = "Update an existing student (matricula is immutable)")]
    Update {
        #[arg(help = "Record identifier")]
        id: Uuid,
        #[arg(long)]
        nome: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long = "data-nascimento")]
        data_nascimento: Option<String>,
        #[arg(long)]
        curso: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },

    #[command(about = "Delete a student")]
    Delete {
        #[arg(help = "Record identifier")]
        id: Uuid,
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

pub async fn handle(
    cmd: StudentCommands,
    client: &Arc<StoreClient>,
    auth: &Arc<AuthClient>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let sessions: Arc<dyn SessionSource> = auth.clone();
    let repository = Arc::new(RemoteRepository::new(client.clone(), sessions.clone()));

    // Entry is gated: resolve the session and role before anything loads.
    let access = AccessService::new(sessions.clone(), repository.clone())
        .resolve()
        .await;
    let resolution = match access {
        Access::Unauthenticated => {
            anyhow::bail!("Sessão não encontrada. Faça login com `gestao auth login`")
        }
        Access::Resolved(resolution) => resolution,
    };

    let mut roster = RosterService::new(repository.clone());
    let load_result = roster.activate(&resolution).await;
    if roster.phase() == RosterPhase::Denied {
        return output_restricted(&output_format);
    }
    if let Err(notification) = load_result {
        anyhow::bail!("{notification}");
    }

    match cmd {
        StudentCommands::List { search } => {
            if let Some(term) = search {
                roster.set_search(term);
            }
            output_roster(&output_format, &roster)
        }

        StudentCommands::Create {
            nome,
            matricula,
            email,
            data_nascimento,
            curso,
            status,
        } => {
            let mut editor = StudentEditor::new(repository.clone(), sessions.clone());
            editor.open_create();
            editor.draft.nome = nome;
            editor.draft.matricula = matricula;
            editor.draft.email = email;
            editor.draft.data_nascimento = data_nascimento;
            editor.draft.curso = curso;
            editor.draft.status = status;
            submit_and_reload(&output_format, &mut editor, &mut roster).await
        }

        StudentCommands::Update {
            id,
            nome,
            email,
            data_nascimento,
            curso,
            status,
        } => {
            let target = find_student(&roster, id)?;
            let mut editor = StudentEditor::new(repository.clone(), sessions.clone());
            editor.open_edit(target);
            if let Some(value) = nome {
                editor.draft.nome = value;
            }
            if let Some(value) = email {
                editor.draft.email = value;
            }
            if let Some(value) = data_nascimento {
                editor.draft.data_nascimento = value;
            }
            if let Some(value) = curso {
                editor.draft.curso = value;
            }
            if let Some(value) = status {
                editor.draft.status = value;
            }
            submit_and_reload(&output_format, &mut editor, &mut roster).await
        }

        StudentCommands::Delete { id, yes } => {
            let target = find_student(&roster, id)?;
            if !yes && !confirm_delete(&target)? {
                println!("Exclusão cancelada");
                return Ok(());
            }
            match roster.remove(id).await {
                Err(notification) => anyhow::bail!("{notification}"),
                Ok(notification) => {
                    let stats = roster.stats();
                    utils::output_success(
                        &output_format,
                        &notification.to_string(),
                        Some(json!({ "removed": id, "total": stats.total })),
                    )
                }
            }
        }
    }
}

async fn submit_and_reload(
    output_format: &OutputFormat,
    editor: &mut StudentEditor,
    roster: &mut RosterService,
) -> anyhow::Result<()> {
    match editor.submit().await {
        Err(notification) => anyhow::bail!("{notification}"),
        Ok(notification) => {
            // The roster is always re-read after a successful mutation.
            let reload = roster.reload().await;
            let stats = roster.stats();
            utils::output_success(
                output_format,
                &notification.to_string(),
                Some(json!({ "total": stats.total })),
            )?;
            if let Err(failure) = reload {
                eprintln!("Aviso: {failure}");
            }
            Ok(())
        }
    }
}

fn find_student(roster: &RosterService, id: Uuid) -> anyhow::Result<Student> {
    roster
        .students()
        .iter()
        .find(|student| student.id == id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Aluno não encontrado"))
}

fn confirm_delete(target: &Student) -> anyhow::Result<bool> {
    print!(
        "Tem certeza que deseja excluir o aluno {}? Esta ação não pode ser desfeita. [s/N] ",
        target.nome
    );
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "s" || answer == "sim")
}

fn output_roster(output_format: &OutputFormat, roster: &RosterService) -> anyhow::Result<()> {
    let filtered = roster.filtered();
    let stats = roster.stats();

    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "students": filtered,
                    "stats": {
                        "total": stats.total,
                        "ativos": stats.ativos,
                        "formados": stats.formados,
                    },
                }))?
            );
        }
        OutputFormat::Text => {
            if filtered.is_empty() {
                if roster.search().is_empty() {
                    println!("Nenhum aluno cadastrado");
                } else {
                    println!("Nenhum aluno encontrado");
                }
            } else {
                println!(
                    "{:<36} {:<30} {:<12} {:<30} {:<25} {:<12} {}",
                    "Id", "Nome", "Matrícula", "Email", "Curso", "Nascimento", "Status"
                );
                for student in &filtered {
                    println!(
                        "{:<36} {:<30} {:<12} {:<30} {:<25} {:<12} {}",
                        student.id,
                        student.nome,
                        student.matricula,
                        student.email,
                        student.curso,
                        student.data_nascimento,
                        student.status
                    );
                }
            }
            println!();
            println!("Total de alunos: {}", stats.total);
            println!("Alunos ativos: {}", stats.ativos);
            println!("Alunos formados: {}", stats.formados);
        }
    }
    Ok(())
}

fn output_restricted(output_format: &OutputFormat) -> anyhow::Result<()> {
    utils::output_notice(
        output_format,
        "Acesso Restrito",
        &[
            "Você não tem permissão de administrador para acessar o sistema de gerenciamento de alunos.",
            "Entre em contato com um administrador para solicitar acesso.",
        ],
    )
}
