use ledger_core::backend::{ChangeEvent, LiveFeed};
use ledger_core::service::LedgerService;

use crate::commands::common::format_session_date;
use crate::error::CliError;

pub fn describe_change(event: &ChangeEvent) -> String {
    match event {
        ChangeEvent::SessionInserted(session) => format!(
            "+ {}  {}  {} (proposed by {})",
            session.id,
            format_session_date(session),
            session.title,
            session.proposer
        ),
        ChangeEvent::SessionUpdated(session) => {
            let tally = session.votes.tally();
            let marker = if session.votes.consensus_reached() {
                "  * Stars Aligned"
            } else {
                ""
            };
            format!(
                "~ {}  {}  yes={} maybe={} no={} notes={}{marker}",
                session.id,
                session.title,
                tally.yes,
                tally.maybe,
                tally.no,
                session.notes.len()
            )
        }
        ChangeEvent::SessionDeleted(id) => format!("- {id}"),
        ChangeEvent::CaseLogChanged { key, log } => {
            let editor = if log.last_edited_by.is_empty() {
                "someone"
            } else {
                log.last_edited_by.as_str()
            };
            format!("# {key} rewritten by {editor}")
        }
    }
}

/// Print events until Ctrl-C or the feed ends, then close the feed.
pub async fn run_watch(service: &LedgerService) -> Result<(), CliError> {
    let feed = service.subscribe_to_changes().await?;
    eprintln!("Watching the ledger ({}); Ctrl-C to stop", service.describe());
    watch_until(feed, tokio::signal::ctrl_c()).await
}

async fn watch_until(
    mut feed: LiveFeed,
    stop: impl std::future::Future<Output = std::io::Result<()>>,
) -> Result<(), CliError> {
    tokio::pin!(stop);
    loop {
        tokio::select! {
            result = &mut stop => {
                result?;
                break;
            }
            event = feed.next() => {
                let Some(event) = event else {
                    tracing::warn!("Live feed ended");
                    break;
                };
                println!("{}", describe_change(&event));
            }
        }
    }
    feed.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ledger_core::backend::MemoryBackend;
    use ledger_core::models::SessionDraft;
    use ledger_core::models::{Participant, ParticipantId};
    use tokio::sync::oneshot;

    use super::*;

    #[tokio::test]
    async fn watch_stops_on_signal_and_closes_feed() {
        let service = LedgerService::with_backend(Arc::new(MemoryBackend::new()));
        let feed = service.subscribe_to_changes().await.unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let watcher = tokio::spawn(watch_until(feed, async move {
            let _ = stop_rx.await;
            Ok(())
        }));

        let proposer = Participant {
            id: ParticipantId::from_stored("uid-1"),
            name: "Armitage".to_string(),
        };
        let draft = SessionDraft {
            date: chrono::Utc::now(),
            title: "The Dunwich Horror".to_string(),
            location: String::new(),
        };
        service.create_session(&draft, &proposer, None).await.unwrap();
        stop_tx.send(()).unwrap();

        watcher.await.unwrap().unwrap();
    }
}
