use ledger_core::service::LedgerService;

use crate::commands::common::{format_session_lines, session_to_list_item, SessionListItem};
use crate::error::CliError;

pub async fn run_list(
    service: &LedgerService,
    as_json: bool,
    with_notes: bool,
) -> Result<(), CliError> {
    let sessions = service.load_sessions().await?;

    if as_json {
        let json_items = sessions
            .iter()
            .map(|session| session_to_list_item(session, with_notes))
            .collect::<Vec<SessionListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if sessions.is_empty() {
        println!("No dates have been inscribed yet. The void is silent.");
    } else {
        for line in format_session_lines(&sessions, with_notes) {
            println!("{line}");
        }
    }

    Ok(())
}
