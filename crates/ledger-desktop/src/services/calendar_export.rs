//! Save a session as an `.ics` file.

use std::path::PathBuf;

use chrono::Utc;
use ledger_core::calendar::{calendar_file_name, render_calendar_event};
use ledger_core::Session;
use rfd::AsyncFileDialog;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalendarExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Ask where to save, then write the event. `Ok(None)` if cancelled.
pub async fn save_calendar_file(
    session: &Session,
) -> Result<Option<PathBuf>, CalendarExportError> {
    let Some(file) = AsyncFileDialog::new()
        .set_file_name(calendar_file_name(&session.title))
        .add_filter("iCalendar", &["ics"])
        .save_file()
        .await
    else {
        return Ok(None);
    };

    let path = file.path().to_path_buf();
    std::fs::write(&path, render_calendar_event(session, Utc::now()))?;
    tracing::info!("Exported session {} to {}", session.id, path.display());
    Ok(Some(path))
}
