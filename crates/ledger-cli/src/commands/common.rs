use std::env;
use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Local;
use ledger_core::config::LedgerConfig;
use ledger_core::identity::{default_storage_path, FileLocalStorage, IdentityManager, LocalStorage};
use ledger_core::models::Participant;
use ledger_core::service::LedgerService;
use ledger_core::{Session, SessionId};
use serde::Serialize;

use crate::error::CliError;

/// Environment override for the identity file
pub const STORAGE_PATH_ENV: &str = "LEDGER_STORAGE_PATH";

pub type CliIdentity = IdentityManager<FileLocalStorage>;

#[derive(Debug, Serialize)]
pub struct NoteItem {
    pub author: String,
    pub text: String,
    pub timestamp: i64,
}

#[derive(Debug, Serialize)]
pub struct SessionListItem {
    pub id: String,
    pub title: String,
    pub date: String,
    pub location: String,
    pub proposer: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image_url: String,
    pub yes: usize,
    pub maybe: usize,
    pub no: usize,
    pub stars_aligned: bool,
    pub votes: Vec<VoteItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<NoteItem>>,
}

#[derive(Debug, Serialize)]
pub struct VoteItem {
    pub name: String,
    pub status: String,
}

pub fn resolve_storage_path(cli_storage_path: Option<PathBuf>) -> PathBuf {
    cli_storage_path
        .or_else(|| env::var_os(STORAGE_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(default_storage_path)
}

pub fn open_identity(path: &Path) -> Result<CliIdentity, CliError> {
    Ok(IdentityManager::load(FileLocalStorage::new(path))?)
}

pub fn require_participant<S: LocalStorage>(
    identity: &IdentityManager<S>,
) -> Result<Participant, CliError> {
    identity.participant().ok_or(CliError::NoIdentity)
}

/// Service over the configured Supabase project. The CLI has no local-only
/// mode: an in-memory ledger would vanish when the command exits.
pub fn open_service() -> Result<LedgerService, CliError> {
    open_service_with(&LedgerConfig::from_env())
}

pub fn open_service_with(config: &LedgerConfig) -> Result<LedgerService, CliError> {
    if config.supabase()?.is_none() {
        return Err(CliError::BackendNotConfigured);
    }
    Ok(LedgerService::from_config(config)?)
}

pub fn normalize_session_id(id: &str) -> Result<SessionId, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptySessionId)
    } else {
        Ok(SessionId::new(trimmed))
    }
}

pub async fn find_session(service: &LedgerService, id: &str) -> Result<Session, CliError> {
    let id = normalize_session_id(id)?;
    service
        .load_sessions()
        .await?
        .into_iter()
        .find(|session| session.id == id)
        .ok_or_else(|| CliError::SessionNotFound(id.to_string()))
}

pub fn format_session_date(session: &Session) -> String {
    session
        .date
        .with_timezone(&Local)
        .format("%a %b %-d, %H:%M")
        .to_string()
}

pub fn format_session_lines(sessions: &[Session], with_notes: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for session in sessions {
        let tally = session.votes.tally();
        let marker = if session.votes.consensus_reached() {
            "  * Stars Aligned"
        } else {
            ""
        };
        lines.push(format!(
            "{:<8}  {:<20}  {:<28}  {}  yes={} maybe={} no={}{marker}",
            session.id,
            format_session_date(session),
            session.title,
            session.location,
            tally.yes,
            tally.maybe,
            tally.no,
        ));
        if with_notes {
            for note in &session.notes {
                lines.push(format!("          - {}: {}", note.author, note.text));
            }
        }
    }
    lines
}

pub fn session_to_list_item(session: &Session, with_notes: bool) -> SessionListItem {
    let tally = session.votes.tally();
    SessionListItem {
        id: session.id.to_string(),
        title: session.title.clone(),
        date: session.date.to_rfc3339(),
        location: session.location.clone(),
        proposer: session.proposer.clone(),
        image_url: session.image_url.clone(),
        yes: tally.yes,
        maybe: tally.maybe,
        no: tally.no,
        stars_aligned: session.votes.consensus_reached(),
        votes: session
            .votes
            .iter()
            .map(|vote| VoteItem {
                name: vote.name.clone(),
                status: vote.status.to_string(),
            })
            .collect(),
        notes: with_notes.then(|| {
            session
                .notes
                .iter()
                .map(|note| NoteItem {
                    author: note.author.clone(),
                    text: note.text.clone(),
                    timestamp: note.timestamp,
                })
                .collect()
        }),
    }
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Text from the arguments, else from piped stdin.
pub fn resolve_text(parts: &[String]) -> Result<String, CliError> {
    if let Some(content) = normalize_content(&parts.join(" ")) {
        return Ok(content);
    }
    read_piped_stdin()?.ok_or(CliError::EmptyContent)
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

/// Ask a yes/no question on the terminal. Non-interactive stdin is an error.
pub fn confirm(prompt: &str) -> Result<bool, CliError> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Err(CliError::ConfirmationRequired);
    }
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    stdin.lock().read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Open the editor on `initial_content` and return the saved text.
///
/// An emptied file yields an empty string rather than `None`: clearing the
/// case log is a legitimate edit.
pub fn capture_editor_input_with_initial(initial_content: &str) -> Result<String, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_file_path();
    std::fs::write(&temp_file, initial_content)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let content = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(content.trim_end().to_string())
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) => {
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let mut command = Command::new(program);
            command.args(parts).arg(file_path);

            let status = command.status()?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::Io(err)),
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

pub fn create_temp_file_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("ledger-case-log-{}-{now}.md", std::process::id()))
}
