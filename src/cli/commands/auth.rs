use std::sync::Arc;

use clap::Subcommand;
use serde_json::json;

use crate::auth::error::AuthError;
use crate::auth::{AuthClient, SessionSource};
use crate::cli::{config as cli_config, utils, OutputFormat};
use crate::client::StoreClient;
use crate::repository::RemoteRepository;
use crate::services::{Access, AccessService, Route, SessionLifecycle};
use crate::validate::{self, LoginForm, SignupForm};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Sign in with email and password")]
    Login {
        #[arg(long, help = "Email address")]
        email: String,
        #[arg(long, help = "Password")]
        password: String,
    },

    #[command(about = "Create a new account")]
    Signup {
        #[arg(long, help = "Email address")]
        email: String,
        #[arg(long, help = "Password (at least 6 characters)")]
        password: String,
        #[arg(long = "confirm-password", help = "Password confirmation")]
        confirm_password: String,
        #[arg(long, help = "Display name (at least 3 characters)")]
        username: String,
    },

    #[command(about = "Sign out and clear the stored session")]
    Logout,

    #[command(about = "Show the current session and its privileges")]
    Whoami,
}

pub async fn handle(
    cmd: AuthCommands,
    client: &Arc<StoreClient>,
    auth: &Arc<AuthClient>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { email, password } => {
            login(auth, &output_format, email, password).await
        }
        AuthCommands::Signup {
            email,
            password,
            confirm_password,
            username,
        } => signup(auth, &output_format, email, password, confirm_password, username).await,
        AuthCommands::Logout => logout(auth, &output_format).await,
        AuthCommands::Whoami => whoami(client, auth, &output_format).await,
    }
}

async fn login(
    auth: &Arc<AuthClient>,
    output_format: &OutputFormat,
    email: String,
    password: String,
) -> anyhow::Result<()> {
    let form = LoginForm {
        email: email.clone(),
        password: password.clone(),
    };
    if let Err(violation) = validate::login(&form) {
        anyhow::bail!("Erro de validação: {violation}");
    }

    // The login surface watches session events for as long as it is alive
    // and routes on any event carrying a live session.
    let mut lifecycle = SessionLifecycle::attach(auth.watch(), Route::Login, |route| {
        if route == Route::Dashboard {
            tracing::info!("sessão ativa, redirecionando para o painel");
        }
    });

    let result = auth.sign_in(&email, &password).await;
    lifecycle.teardown();

    match result {
        Ok(session) => {
            cli_config::save_session(&session)?;
            utils::output_success(
                output_format,
                "Login realizado com sucesso!",
                Some(json!({ "user_id": session.user.id })),
            )
        }
        Err(AuthError::InvalidCredentials) => {
            anyhow::bail!("Erro ao fazer login: Email ou senha incorretos")
        }
        Err(err) => anyhow::bail!("Erro ao fazer login: {err}"),
    }
}

async fn signup(
    auth: &Arc<AuthClient>,
    output_format: &OutputFormat,
    email: String,
    password: String,
    confirm_password: String,
    username: String,
) -> anyhow::Result<()> {
    let form = SignupForm {
        email: email.clone(),
        password: password.clone(),
        confirm_password,
        username: username.clone(),
    };
    if let Err(violation) = validate::signup(&form) {
        anyhow::bail!("Erro de validação: {violation}");
    }

    match auth.sign_up(&email, &password, &username).await {
        Ok(()) => utils::output_success(
            output_format,
            "Conta criada com sucesso! Você já pode fazer login",
            None,
        ),
        Err(AuthError::EmailAlreadyRegistered) => {
            anyhow::bail!("Erro ao criar conta: Este email já está cadastrado")
        }
        Err(err) => anyhow::bail!("Erro ao criar conta: {err}"),
    }
}

async fn logout(auth: &Arc<AuthClient>, output_format: &OutputFormat) -> anyhow::Result<()> {
    auth.sign_out().await?;
    cli_config::clear_session()?;
    utils::output_success(output_format, "Logout realizado com sucesso", None)
}

async fn whoami(
    client: &Arc<StoreClient>,
    auth: &Arc<AuthClient>,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let sessions: Arc<dyn SessionSource> = auth.clone();
    let repository = Arc::new(RemoteRepository::new(client.clone(), sessions.clone()));
    let access = AccessService::new(sessions, repository).resolve().await;

    match access {
        Access::Unauthenticated => {
            anyhow::bail!("Sessão não encontrada. Faça login com `gestao auth login`")
        }
        Access::Resolved(resolution) => match output_format {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "user_id": resolution.user_id,
                        "display_name": resolution.display_name,
                        "is_admin": resolution.is_admin,
                    }))?
                );
                Ok(())
            }
            OutputFormat::Text => {
                println!(
                    "Usuário: {}",
                    resolution.display_name.as_deref().unwrap_or("(sem perfil)")
                );
                println!(
                    "Perfil: {}",
                    if resolution.is_admin {
                        "administrador"
                    } else {
                        "padrão"
                    }
                );
                Ok(())
            }
        },
    }
}
