//! Live change feed handle.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::models::{CaseLog, Session, SessionId};

/// A remote mutation delivered by the live feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    SessionInserted(Session),
    SessionUpdated(Session),
    SessionDeleted(SessionId),
    /// A row of the `general` table changed; `key` is its id
    CaseLogChanged { key: String, log: CaseLog },
}

/// Receiving end of a change-feed subscription.
///
/// The feed owns a background task. [`LiveFeed::close`] stops it and waits
/// for it; dropping the feed only signals the stop. Either way the stop is
/// sent exactly once.
#[derive(Debug)]
pub struct LiveFeed {
    events: mpsc::UnboundedReceiver<ChangeEvent>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl LiveFeed {
    #[must_use]
    pub fn new(
        events: mpsc::UnboundedReceiver<ChangeEvent>,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            events,
            shutdown: Some(shutdown),
            task: Some(task),
        }
    }

    /// Next event, or `None` once the feed has ended
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        self.events.recv().await
    }

    /// Whether `close` has not yet been requested
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.shutdown.is_some()
    }

    /// Stop the background task and wait for it to leave its channels.
    pub async fn close(mut self) {
        self.signal_shutdown();
        if let Some(task) = self.task.take() {
            if let Err(error) = task.await {
                tracing::warn!("Live feed task ended abnormally: {}", error);
            }
        }
    }

    fn signal_shutdown(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            tracing::debug!("Closing live feed");
            let _ = shutdown.send(());
        }
        self.events.close();
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        self.signal_shutdown();
    }
}
