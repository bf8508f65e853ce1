use std::fs;
use std::path::PathBuf;

use crate::auth::Session;

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("GESTAO_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("gestao").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

fn session_file() -> anyhow::Result<PathBuf> {
    Ok(get_config_dir()?.join("session.json"))
}

/// Loads the persisted session. A missing or unreadable file is treated as
/// signed out rather than an error.
pub fn load_session() -> anyhow::Result<Option<Session>> {
    let session_file = session_file()?;
    if !session_file.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(session_file)?;
    match serde_json::from_str::<Session>(&content) {
        Ok(session) => Ok(Some(session)),
        Err(err) => {
            tracing::debug!("stored session is unreadable, ignoring it: {err}");
            Ok(None)
        }
    }
}

pub fn save_session(session: &Session) -> anyhow::Result<()> {
    let session_file = session_file()?;
    let content = serde_json::to_string_pretty(session)?;
    fs::write(session_file, content)?;
    Ok(())
}

pub fn clear_session() -> anyhow::Result<()> {
    let session_file = session_file()?;
    if session_file.exists() {
        fs::remove_file(session_file)?;
    }
    Ok(())
}
