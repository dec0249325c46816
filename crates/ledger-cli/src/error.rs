use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] ledger_core::Error),
    #[error(transparent)]
    CreateSession(#[from] ledger_core::service::CreateSessionError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No content provided")]
    EmptyContent,
    #[error("Session ID cannot be empty")]
    EmptySessionId,
    #[error("Session not found: {0}")]
    SessionNotFound(String),
    #[error("No investigator name set. Run `ledger identity set <NAME>` first.")]
    NoIdentity,
    #[error("Refusing to delete without confirmation; pass --yes when not running interactively")]
    ConfirmationRequired,
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error(
        "No backend configured. Set SUPABASE_URL and SUPABASE_ANON_KEY (a .env file works too)."
    )]
    BackendNotConfigured,
}
