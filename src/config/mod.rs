use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Connection settings for the remote managed store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub url: String,
    pub anon_key: String,
    pub http_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Defaults per environment, then specific env vars override.
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("GESTAO_STORE_URL") {
            self.store.url = v;
        }
        if let Ok(v) = env::var("GESTAO_STORE_ANON_KEY") {
            self.store.anon_key = v;
        }
        if let Ok(v) = env::var("GESTAO_HTTP_TIMEOUT_SECS") {
            self.store.http_timeout_secs = v.parse().unwrap_or(self.store.http_timeout_secs);
        }
        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            store: StoreConfig {
                // Local store stack default port
                url: "http://127.0.0.1:54321".to_string(),
                anon_key: String::new(),
                http_timeout_secs: 10,
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            store: StoreConfig {
                url: String::new(),
                anon_key: String::new(),
                http_timeout_secs: 30,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            store: StoreConfig {
                url: String::new(),
                anon_key: String::new(),
                http_timeout_secs: 30,
            },
        }
    }
}

pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

/// Global configuration accessor. The store client itself is never global;
/// it is built from this once and handed to consumers explicitly.
pub fn config() -> &'static AppConfig {
    &CONFIG
}
