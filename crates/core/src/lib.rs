//! prompt-vault: a local library of reusable text prompts
//!
//! Prompts live in a single SQLite table. Each record has a surrogate numeric
//! key and a stable uuid; the uuid is the merge key used by save, import and
//! startup reconciliation.
//!
//! ## Architecture
//!
//! - **db**: the record store (save/get/update/delete/search/filter)
//! - **reconcile**: rebuilds the built-in prompt set from the bundled JSON file
//! - **transfer**: JSON import and export
//! - **listing**: maps displayed rows back to numeric keys
//! - **commands**: JSON command registry used by presentation clients

pub mod commands;
pub mod config;
pub mod db;
pub mod errors;
pub mod listing;
pub mod reconcile;
pub mod transfer;

pub use config::Config;
pub use db::{Db, Prompt, PromptFilter, SaveOutcome};
pub use errors::{Result, VaultError};
pub use reconcile::{ReconcileReport, Reconciler};

/// Open the database described by `config` and reconcile built-in prompts.
///
/// This is the startup entry point: call it once, keep the returned [`Db`]
/// for the life of the session, and [`Db::close`] it on the way out.
pub fn open(config: &Config) -> Result<Db> {
    let db = Db::open(&config.database_path)?;
    let report = Reconciler::new(&config.builtin_path).reconcile_builtin(&db)?;
    tracing::debug!(?report, "startup reconciliation finished");
    Ok(db)
}
