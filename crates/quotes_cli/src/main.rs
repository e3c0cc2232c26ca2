//! `quotes` command line entry point.
//!
//! # Responsibility
//! - Resolve configuration from flags, environment and `.env`.
//! - Dispatch one subcommand to `QuoteService` and print JSON results.
//! - Translate error kinds into exit codes without inspecting messages.

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use log::info;
use quotes_core::config::{DATABASE_VAR, LOG_DIR_VAR, LOG_LEVEL_VAR};
use quotes_core::{
    init_logging, open_store, AppConfig, QuoteId, QuoteService, SqliteQuoteRepository,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "quotes", version, about = "Store and retrieve quotes")]
struct Cli {
    /// Store path, or `:memory:` for a throwaway store. Overrides APP_DATABASE.
    #[arg(long, global = true, value_name = "PATH")]
    database: Option<String>,

    /// trace|debug|info|warn|error. Overrides APP_LOG_LEVEL.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files. Overrides APP_LOG_DIR.
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Store a new quote.
    Add {
        author: String,
        /// Quote text; remaining words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// List stored quotes, optionally by exact author.
    List {
        #[arg(long)]
        author: Option<String>,
    },
    /// Print one random quote.
    Random,
    /// Delete a quote by id.
    Delete { id: QuoteId },
    /// Print the live quote counter.
    Count,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct Deleted {
    deleted: QuoteId,
}

#[derive(Debug, Serialize)]
struct LiveCount {
    count: Option<i64>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_exit module=cli status=error error={err}");
            let body = ErrorBody {
                error: err.public_message(),
            };
            match serde_json::to_string(&body) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("{}", body.error),
            }
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = resolve_config(&cli)?;
    init_logging(config.log_level, config.log_dir.as_deref()).map_err(CliError::Logging)?;
    info!(
        "event=cli_start module=cli status=ok version={}",
        quotes_core::core_version()
    );

    let store = open_store(&config.database)?;
    let service = QuoteService::new(SqliteQuoteRepository::try_new(&store)?);

    match cli.command {
        Command::Add { author, text } => {
            print_json(&service.add_quote(&author, &text.join(" "))?)
        }
        Command::List { author } => print_json(&service.list_quotes(author.as_deref())?),
        Command::Random => print_json(&service.random_quote()?),
        Command::Delete { id } => {
            service.delete_quote(id)?;
            print_json(&Deleted { deleted: id })
        }
        Command::Count => print_json(&LiveCount {
            count: store
                .live_count()
                .map_err(|err| CliError::Repo(err.into()))?,
        }),
    }
}

fn resolve_config(cli: &Cli) -> Result<AppConfig, CliError> {
    let config = AppConfig::from_env(|key| match key {
        DATABASE_VAR => cli.database.clone(),
        LOG_LEVEL_VAR => cli.log_level.clone(),
        LOG_DIR_VAR => cli
            .log_dir
            .as_ref()
            .map(|dir| dir.to_string_lossy().into_owned()),
        _ => None,
    })?;
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{resolve_config, Cli, Command};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_joins_remaining_words() {
        let cli = Cli::parse_from(["quotes", "add", "Confucius", "Life", "is", "simple."]);
        match cli.command {
            Command::Add { author, text } => {
                assert_eq!(author, "Confucius");
                assert_eq!(text.join(" "), "Life is simple.");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_are_accepted_after_subcommand() {
        let cli = Cli::parse_from(["quotes", "list", "--author", "Seneca", "--database", ":memory:"]);
        assert_eq!(cli.database.as_deref(), Some(":memory:"));
        assert!(matches!(cli.command, Command::List { author: Some(ref a) } if a == "Seneca"));
    }

    #[test]
    fn flags_resolve_into_config() {
        let cli = Cli::parse_from([
            "quotes",
            "--database",
            ":memory:",
            "--log-level",
            "WARN",
            "random",
        ]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.database, ":memory:");
        assert_eq!(config.log_level, "warn");
    }
}
