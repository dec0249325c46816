use ledger_core::identity::{IdentityManager, LocalStorage};
use ledger_core::models::now_millis;
use ledger_core::service::LedgerService;
use ledger_core::state::LedgerState;
use ledger_core::{VoteStatus, Votes};

use crate::commands::common::{find_session, require_participant};
use crate::error::CliError;

pub async fn run_vote<S: LocalStorage>(
    service: &LedgerService,
    identity: &IdentityManager<S>,
    id: &str,
    status: VoteStatus,
) -> Result<Votes, CliError> {
    let participant = require_participant(identity)?;
    let session = find_session(service, id).await?;
    let session_id = session.id.clone();

    let mut ledger = LedgerState::new();
    ledger.merge_session(session);
    let votes = ledger
        .record_vote(&session_id, &participant, status, now_millis())
        .ok_or_else(|| CliError::SessionNotFound(session_id.to_string()))?;
    service.update_votes(&session_id, &votes).await?;

    let tally = votes.tally();
    println!(
        "{} cast {} on {} (yes={} maybe={} no={})",
        participant.name, status, session_id, tally.yes, tally.maybe, tally.no
    );
    if votes.consensus_reached() {
        println!("The stars are aligned.");
    }
    Ok(votes)
}
