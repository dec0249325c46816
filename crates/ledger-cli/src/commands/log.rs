use ledger_core::identity::{IdentityManager, LocalStorage};
use ledger_core::service::LedgerService;
use ledger_core::CaseLog;

use crate::commands::common::{capture_editor_input_with_initial, require_participant, resolve_text};
use crate::error::CliError;

pub fn format_case_log(log: &CaseLog) -> String {
    let mut rendered = if log.text.trim().is_empty() {
        "No entries found.".to_string()
    } else {
        log.text.clone()
    };
    if !log.last_edited_by.is_empty() {
        rendered.push_str("\n\n-- ");
        rendered.push_str(&log.last_edited_by);
        if let Some(updated_at) = log.updated_at {
            rendered.push_str(&updated_at.format(", %Y-%m-%d %H:%M UTC").to_string());
        }
    }
    rendered
}

pub async fn run_log_show(service: &LedgerService) -> Result<(), CliError> {
    let log = service.load_case_log().await?.unwrap_or_default();
    println!("{}", format_case_log(&log));
    Ok(())
}

pub async fn run_log_edit<S: LocalStorage>(
    service: &LedgerService,
    identity: &IdentityManager<S>,
) -> Result<(), CliError> {
    let editor = require_participant(identity)?;
    let current = service.load_case_log().await?.unwrap_or_default();
    let edited = capture_editor_input_with_initial(&current.text)?;

    if edited == current.text {
        println!("Case log unchanged");
        return Ok(());
    }
    service.save_case_log(&edited, &editor.name).await?;
    println!("Case log saved");
    Ok(())
}

pub async fn run_log_set<S: LocalStorage>(
    service: &LedgerService,
    identity: &IdentityManager<S>,
    text_parts: &[String],
) -> Result<CaseLog, CliError> {
    let editor = require_participant(identity)?;
    let text = resolve_text(text_parts)?;
    let saved = service.save_case_log(&text, &editor.name).await?;
    println!("Case log saved");
    Ok(saved)
}
