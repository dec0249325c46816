use std::path::{Path, PathBuf};

use chrono::Utc;
use ledger_core::calendar::{calendar_file_name, render_calendar_event};
use ledger_core::service::LedgerService;

use crate::commands::common::find_session;
use crate::error::CliError;

pub async fn run_export(
    service: &LedgerService,
    id: &str,
    output_path: Option<&Path>,
) -> Result<PathBuf, CliError> {
    let session = find_session(service, id).await?;
    let rendered = render_calendar_event(&session, Utc::now());
    let path = output_path.map_or_else(
        || PathBuf::from(calendar_file_name(&session.title)),
        Path::to_path_buf,
    );

    std::fs::write(&path, rendered)?;
    println!("{}", path.display());
    Ok(path)
}
