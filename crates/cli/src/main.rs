//! prompt-vault command line client
//!
//! Every subcommand is translated into a registry call and its JSON result is
//! printed to stdout. Logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use prompt_vault_core::{commands, Config, Db, VaultError};
use serde_json::{json, Value};

#[derive(Parser, Debug)]
#[command(name = "prompt-vault")]
#[command(version)]
#[command(about = "Manage a local library of reusable prompts")]
struct Cli {
    /// Database file (overrides PROMPT_VAULT_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Bundled built-in prompt file (overrides PROMPT_VAULT_BUILTIN)
    #[arg(long, global = true)]
    builtin: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List prompts
    List {
        /// all, builtin or user
        #[arg(long, default_value = "all")]
        filter: String,
    },
    /// Show one prompt by id, or by its row in a filtered list
    Show {
        #[arg(required_unless_present = "row")]
        id: Option<i64>,
        #[arg(long, conflicts_with = "id")]
        row: Option<usize>,
        #[arg(long, default_value = "all")]
        filter: String,
    },
    /// Create a prompt (or overwrite the one with the same --uuid)
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        uuid: Option<String>,
    },
    /// Edit an existing prompt
    Edit {
        id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a user prompt
    Delete { id: i64 },
    /// Search titles and contents
    Search {
        #[arg(default_value = "")]
        keyword: String,
    },
    /// Import prompts from a JSON file
    Import { path: PathBuf },
    /// Export prompts to a JSON file
    Export {
        path: PathBuf,
        #[arg(long, default_value = "all")]
        filter: String,
    },
    /// Re-run built-in reconciliation
    Reconcile,
    /// List registry commands
    Commands,
}

impl Command {
    /// Registry command name and arguments for this subcommand, or `None`
    /// for subcommands that don't go through the registry
    fn to_call(&self, config: &Config) -> Option<(&'static str, Value)> {
        let call = match self {
            Command::List { filter } => ("prompts.list", json!({ "filter": filter })),
            Command::Show { id, row, filter } => match row {
                Some(row) => ("prompts.get", json!({ "row": row, "filter": filter })),
                None => ("prompts.get", json!({ "id": id })),
            },
            Command::Add {
                title,
                content,
                category,
                uuid,
            } => (
                "prompts.save",
                json!({ "title": title, "content": content, "category": category, "uuid": uuid }),
            ),
            Command::Edit {
                id,
                title,
                content,
                category,
            } => (
                "prompts.update",
                json!({ "id": id, "title": title, "content": content, "category": category }),
            ),
            Command::Delete { id } => ("prompts.delete", json!({ "id": id })),
            Command::Search { keyword } => ("prompts.search", json!({ "keyword": keyword })),
            Command::Import { path } => ("prompts.import", json!({ "path": path })),
            Command::Export { path, filter } => {
                ("prompts.export", json!({ "path": path, "filter": filter }))
            },
            Command::Reconcile => (
                "prompts.reconcile",
                json!({ "path": config.builtin_path }),
            ),
            Command::Commands => return None,
        };
        Some(call)
    }

    /// Whether the store should be reconciled as it is opened. An explicit
    /// `reconcile` replaces the startup pass so its report describes the
    /// state the user actually had.
    fn reconciles_on_open(&self) -> bool {
        !matches!(self, Command::Reconcile)
    }
}

fn configure_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::from_env()?;
    if let Some(db) = &cli.db {
        config.database_path = db.clone();
    }
    if let Some(builtin) = &cli.builtin {
        config.builtin_path = builtin.clone();
    }
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    let Some((name, args)) = cli.command.to_call(&config) else {
        println!("{}", serde_json::to_string_pretty(&commands::list_commands())?);
        return Ok(());
    };

    let db = if cli.command.reconciles_on_open() {
        prompt_vault_core::open(&config)?
    } else {
        Db::open(&config.database_path)?
    };

    let result = commands::dispatch(&db, name, args);
    db.close()?;

    println!("{}", serde_json::to_string_pretty(&result?)?);
    Ok(())
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    configure_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = match err.downcast_ref::<VaultError>() {
                Some(vault) => vault.user_message(),
                None => format!("{:#}", err),
            };
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        },
    }
}
