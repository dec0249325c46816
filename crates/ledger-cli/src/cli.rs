use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use ledger_core::VoteStatus;

#[derive(Parser)]
#[command(name = "ledger")]
#[command(about = "Schedule sessions and cast your sign from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to the local identity file
    #[arg(long, global = true, value_name = "PATH")]
    pub storage_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the local investigator
    Whoami,
    /// Manage the local display name
    Identity {
        #[command(subcommand)]
        command: IdentityCommands,
    },
    /// List pending sessions, soonest first
    #[command(alias = "ls")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Include field notes
        #[arg(long)]
        notes: bool,
    },
    /// Propose a new session
    Propose {
        /// RFC 3339 timestamp or local `YYYY-MM-DDTHH:MM`
        #[arg(long, value_name = "DATETIME")]
        date: String,
        /// Scenario / title
        #[arg(long)]
        title: Option<String>,
        /// Where the group meets
        #[arg(long)]
        location: Option<String>,
        /// Image to attach as evidence
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
    },
    /// Cast your availability for a session
    Vote {
        /// Session ID
        id: String,
        /// Your availability
        #[arg(value_enum)]
        choice: VoteChoice,
    },
    /// Add a field note to a session
    Note {
        /// Session ID
        id: String,
        /// Note text
        text: Vec<String>,
    },
    /// Delete a session
    #[command(alias = "burn")]
    Delete {
        /// Session ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Read or replace the shared case log
    Log {
        #[command(subcommand)]
        command: LogCommands,
    },
    /// Export a session as an iCalendar file
    Export {
        /// Session ID
        id: String,
        /// Optional output path (named after the title when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Stream live changes until interrupted
    Watch,
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum IdentityCommands {
    /// Sign the book under a display name
    Set {
        /// Display name
        name: Vec<String>,
    },
    /// Forget the display name (the local ID is kept)
    Reset,
}

#[derive(Subcommand)]
pub enum LogCommands {
    /// Print the case log
    Show,
    /// Edit the case log in $VISUAL / $EDITOR
    Edit,
    /// Replace the case log with the given text (or piped stdin)
    Set {
        /// New case log text
        text: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum VoteChoice {
    /// Available
    Yes,
    /// Uncertain
    Maybe,
    /// Insane
    No,
}

impl From<VoteChoice> for VoteStatus {
    fn from(choice: VoteChoice) -> Self {
        match choice {
            VoteChoice::Yes => Self::Yes,
            VoteChoice::Maybe => Self::Maybe,
            VoteChoice::No => Self::No,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
