use ledger_core::service::LedgerService;

use crate::commands::common::{confirm, find_session, format_session_date};
use crate::error::CliError;

pub async fn run_delete(service: &LedgerService, id: &str, assume_yes: bool) -> Result<(), CliError> {
    let session = find_session(service, id).await?;

    if !assume_yes {
        let prompt = format!(
            "Burn \"{}\" ({})? What is lost can never be recovered.",
            session.title,
            format_session_date(&session)
        );
        if !confirm(&prompt)? {
            println!("Spared.");
            return Ok(());
        }
    }

    service.delete_session(&session.id).await?;
    println!("{}", session.id);
    Ok(())
}
