pub mod commands;
pub mod config;
pub mod utils;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::auth::AuthClient;
use crate::client::StoreClient;

#[derive(Parser)]
#[command(name = "gestao")]
#[command(about = "Gestão de Alunos - student records admin client")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Student roster management")]
    Students {
        #[command(subcommand)]
        cmd: commands::students::StudentCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    let app_config = crate::config::config();
    let client = Arc::new(StoreClient::from_config(&app_config.store)?);
    let auth = Arc::new(AuthClient::new(client.clone()));

    // Restore the persisted session, if any, before any command runs.
    if let Some(session) = config::load_session()? {
        auth.restore(session);
    }

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &client, &auth, output_format).await,
        Commands::Students { cmd } => {
            commands::students::handle(cmd, &client, &auth, output_format).await
        }
    }
}
