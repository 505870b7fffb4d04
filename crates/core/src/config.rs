//! Where the database and the bundled prompt file live
//!
//! Paths come from `PROMPT_VAULT_DB` / `PROMPT_VAULT_BUILTIN` when set,
//! otherwise from the platform data directory
//! (e.g. `~/.local/share/prompt-vault/` on Linux).

use std::path::PathBuf;

use crate::errors::{Result, VaultError};

pub const DB_ENV: &str = "PROMPT_VAULT_DB";
pub const BUILTIN_ENV: &str = "PROMPT_VAULT_BUILTIN";

const APP_DIR: &str = "prompt-vault";
const DB_FILE: &str = "prompts.db";
const BUILTIN_FILE: &str = "builtin_prompts.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub builtin_path: PathBuf,
}

impl Config {
    pub fn new(database_path: impl Into<PathBuf>, builtin_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            builtin_path: builtin_path.into(),
        }
    }

    /// Resolve paths from the environment, falling back to the data directory
    pub fn from_env() -> Result<Self> {
        let env_path = |key: &str| {
            std::env::var_os(key)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };

        let database_path = match env_path(DB_ENV) {
            Some(p) => p,
            None => app_dir()?.join(DB_FILE),
        };
        let builtin_path = match env_path(BUILTIN_ENV) {
            Some(p) => p,
            None => app_dir()?.join(BUILTIN_FILE),
        };

        Ok(Self {
            database_path,
            builtin_path,
        })
    }
}

/// Get the application data directory
///
/// Prefers the platform data dir, then `~/.local/share`.
pub fn app_dir() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
        .ok_or_else(|| VaultError::ConfigError("Could not determine a data directory".into()))?;
    Ok(base.join(APP_DIR))
}
