use ledger_core::identity::{IdentityManager, LocalStorage};
use ledger_core::models::now_millis;
use ledger_core::service::LedgerService;
use ledger_core::state::LedgerState;
use ledger_core::FieldNote;

use crate::commands::common::{find_session, require_participant, resolve_text};
use crate::error::CliError;

pub async fn run_note<S: LocalStorage>(
    service: &LedgerService,
    identity: &IdentityManager<S>,
    id: &str,
    text_parts: &[String],
) -> Result<Vec<FieldNote>, CliError> {
    let participant = require_participant(identity)?;
    let text = resolve_text(text_parts)?;
    let session = find_session(service, id).await?;
    let session_id = session.id.clone();

    let mut ledger = LedgerState::new();
    ledger.merge_session(session);
    let notes = ledger
        .append_note(&session_id, &participant, &text, now_millis())
        .ok_or(CliError::EmptyContent)?;
    service.update_notes(&session_id, &notes).await?;

    println!("Note inscribed on {} ({} total)", session_id, notes.len());
    Ok(notes)
}
