//! Ledger CLI - the Investigator's Ledger from the command line
//!
//! Propose sessions, cast votes, and keep the case log without opening the
//! desktop app.

mod cli;
mod commands;
mod error;
#[cfg(test)]
mod tests;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, IdentityCommands, LogCommands};
use crate::commands::common::{open_identity, open_service, resolve_storage_path};
use crate::commands::completions::run_completions;
use crate::commands::delete::run_delete;
use crate::commands::export::run_export;
use crate::commands::identity::{run_identity_reset, run_identity_set, run_whoami};
use crate::commands::list::run_list;
use crate::commands::log::{run_log_edit, run_log_set, run_log_show};
use crate::commands::note::run_note;
use crate::commands::propose::{run_propose, ProposeArgs};
use crate::commands::vote::run_vote;
use crate::commands::watch::run_watch;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "ledger=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let storage_path = resolve_storage_path(cli.storage_path);

    match cli.command {
        Some(Commands::Whoami) => run_whoami(&open_identity(&storage_path)?),
        Some(Commands::Identity { command }) => {
            let mut identity = open_identity(&storage_path)?;
            match command {
                IdentityCommands::Set { name } => run_identity_set(&mut identity, &name)?,
                IdentityCommands::Reset => run_identity_reset(&mut identity)?,
            }
        }
        Some(Commands::List { json, notes }) => {
            run_list(&open_service()?, json, notes).await?;
        }
        Some(Commands::Propose {
            date,
            title,
            location,
            image,
        }) => {
            let identity = open_identity(&storage_path)?;
            let args = ProposeArgs {
                date,
                title,
                location,
                image,
            };
            run_propose(&open_service()?, &identity, &args).await?;
        }
        Some(Commands::Vote { id, choice }) => {
            let identity = open_identity(&storage_path)?;
            run_vote(&open_service()?, &identity, &id, choice.into()).await?;
        }
        Some(Commands::Note { id, text }) => {
            let identity = open_identity(&storage_path)?;
            run_note(&open_service()?, &identity, &id, &text).await?;
        }
        Some(Commands::Delete { id, yes }) => run_delete(&open_service()?, &id, yes).await?,
        Some(Commands::Log { command }) => match command {
            LogCommands::Show => run_log_show(&open_service()?).await?,
            LogCommands::Edit => {
                let identity = open_identity(&storage_path)?;
                run_log_edit(&open_service()?, &identity).await?;
            }
            LogCommands::Set { text } => {
                let identity = open_identity(&storage_path)?;
                run_log_set(&open_service()?, &identity, &text).await?;
            }
        },
        Some(Commands::Export { id, output }) => {
            run_export(&open_service()?, &id, output.as_deref()).await?;
        }
        Some(Commands::Watch) => run_watch(&open_service()?).await?,
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        None => {
            Cli::command().print_help().map_err(CliError::Io)?;
            println!();
        }
    }

    Ok(())
}
