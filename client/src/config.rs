//! Runtime configuration for the frontend-facing client.
//!
//! The API base URL is taken from `API_BASE`, falling back to
//! [`DEFAULT_API_BASE`]. `ApiClient::from_config` reads it from here, so the
//! environment is the single source of truth for where requests go.

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

pub const API_BASE_ENV: &str = "API_BASE";

const DEFAULT_MODULES: &[&str] = &["@nuxtjs/tailwindcss"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    /// Development tooling toggle.
    pub devtools: bool,
    /// Strict type checking in the build tool.
    pub strict_typing: bool,
    /// Enabled framework extensions.
    pub modules: Vec<String>,
    /// Values visible to client-side code.
    pub public: PublicConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfig {
    pub api_base: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            devtools: true,
            strict_typing: true,
            modules: DEFAULT_MODULES.iter().map(|m| m.to_string()).collect(),
            public: PublicConfig {
                api_base: DEFAULT_API_BASE.to_string(),
            },
        }
    }
}

impl RuntimeConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn load() -> Self {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. An unset or empty
    /// `API_BASE` falls back to [`DEFAULT_API_BASE`].
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(api_base) = lookup(API_BASE_ENV).filter(|v| !v.is_empty()) {
            config.public.api_base = api_base;
        }
        config
    }
}

fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("loaded environment from {}", path.display()),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("failed to load .env file: {}", e),
    }
}
