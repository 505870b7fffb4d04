//! Command registry and dispatch system
//!
//! This is the surface a presentation client talks to. Commands are
//! registered as "category.action" (e.g. "prompts.list", "prompts.save"),
//! take JSON arguments plus the open [`Db`], and return JSON.
//!
//! ## Adding a new command
//!
//! 1. Create handler function: `pub fn my_command(db: &Db, args: Value) -> Result<Value>`
//! 2. Register in `REGISTRY`: `("category.action", my_command as CommandHandler)`
//! 3. Add tests for the command

use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;

use crate::db::Db;
use crate::errors::{Result, VaultError};

pub mod prompts;

/// Type alias for command handler functions
pub type CommandHandler = fn(&Db, Value) -> Result<Value>;

/// Static command registry
///
/// Maps command names to handler functions. Initialized lazily on first access.
static REGISTRY: Lazy<HashMap<&'static str, CommandHandler>> = Lazy::new(|| {
    let mut map = HashMap::new();

    map.insert("prompts.list", prompts::list as CommandHandler);
    map.insert("prompts.get", prompts::get as CommandHandler);
    map.insert("prompts.save", prompts::save as CommandHandler);
    map.insert("prompts.update", prompts::update as CommandHandler);
    map.insert("prompts.delete", prompts::delete as CommandHandler);
    map.insert("prompts.search", prompts::search as CommandHandler);
    map.insert("prompts.export", prompts::export as CommandHandler);
    map.insert("prompts.import", prompts::import as CommandHandler);
    map.insert("prompts.reconcile", prompts::reconcile as CommandHandler);

    map
});

/// Dispatch a command by name
///
/// # Arguments
/// * `db` - Open prompt database
/// * `command` - Command name (e.g., "prompts.list")
/// * `args` - Command arguments as JSON Value
///
/// # Returns
/// Command result as JSON Value, or error if command not found
pub fn dispatch(db: &Db, command: &str, args: Value) -> Result<Value> {
    match REGISTRY.get(command) {
        Some(handler) => {
            tracing::debug!(command, "dispatching command");
            handler(db, args)
        },
        None => Err(VaultError::CommandNotFound(command.to_string())),
    }
}

/// List all available commands
///
/// Returns a sorted list of all registered command names.
pub fn list_commands() -> Vec<String> {
    let mut commands: Vec<String> = REGISTRY.keys().map(|&k| k.to_string()).collect();
    commands.sort();
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_db() -> Db {
        Db::open_in_memory().unwrap()
    }

    #[test]
    fn test_dispatch_list() {
        let db = test_db();
        let value = dispatch(&db, "prompts.list", json!({})).unwrap();
        assert_eq!(value["filter"], json!("all"));
        assert_eq!(value["prompts"], json!([]));
    }

    #[test]
    fn test_dispatch_unknown_command() {
        let db = test_db();
        match dispatch(&db, "unknown.command", json!({})) {
            Err(VaultError::CommandNotFound(cmd)) => assert_eq!(cmd, "unknown.command"),
            other => panic!("Expected CommandNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_dispatch_passes_handler_errors_through() {
        let db = test_db();
        let err = dispatch(&db, "prompts.get", json!(42)).unwrap_err();
        assert_eq!(err.category(), "arguments");
    }

    #[test]
    fn test_list_commands_is_sorted() {
        let commands = list_commands();
        let mut sorted = commands.clone();
        sorted.sort();
        assert_eq!(commands, sorted);
    }

    #[test]
    fn test_list_commands_includes_prompt_api() {
        let commands = list_commands();
        for name in [
            "prompts.list",
            "prompts.get",
            "prompts.save",
            "prompts.update",
            "prompts.delete",
            "prompts.search",
            "prompts.export",
            "prompts.import",
            "prompts.reconcile",
        ] {
            assert!(commands.contains(&name.to_string()), "missing {name}");
        }
    }
}
