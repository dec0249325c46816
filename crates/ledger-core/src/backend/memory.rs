//! In-process backend for local-only mode.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc, oneshot};

use super::{ChangeEvent, LedgerBackend, LiveFeed};
use crate::media::ImageAttachment;
use crate::models::{CaseLog, FieldNote, NewSession, Session, SessionId, Votes, CASE_LOG_KEY};
use crate::{Error, Result};

const FEED_CAPACITY: usize = 64;

/// Operations that tests can make fail once
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MemoryOperation {
    ListSessions,
    FetchCaseLog,
    Insert,
    UpdateVotes,
    UpdateNotes,
    Delete,
    UpsertCaseLog,
    Upload,
}

#[derive(Debug, Default)]
struct MemoryStore {
    sessions: Vec<Session>,
    next_id: u64,
    case_log: Option<CaseLog>,
    images: BTreeMap<String, Vec<u8>>,
    #[cfg(test)]
    failures: Vec<MemoryOperation>,
}

/// Backend that keeps everything in memory and echoes every write on its
/// live feed, the way the managed backend does.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    store: Arc<Mutex<MemoryStore>>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            store: Arc::new(Mutex::new(MemoryStore::default())),
            changes,
        }
    }

    /// Number of uploaded images
    pub fn image_count(&self) -> Result<usize> {
        Ok(self.lock()?.images.len())
    }

    #[cfg(test)]
    pub(crate) fn fail_next(&self, operation: MemoryOperation) {
        if let Ok(mut store) = self.store.lock() {
            store.failures.push(operation);
        }
    }

    /// Live feeds still holding a receiver
    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.changes.receiver_count()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryStore>> {
        self.store
            .lock()
            .map_err(|_| Error::Io(std::io::Error::other("memory backend lock poisoned")))
    }

    fn publish(&self, event: ChangeEvent) {
        // No receivers simply means nobody is subscribed.
        let _ = self.changes.send(event);
    }

    #[cfg(test)]
    fn take_failure(store: &mut MemoryStore, operation: MemoryOperation) -> Result<()> {
        if let Some(index) = store.failures.iter().position(|op| *op == operation) {
            store.failures.remove(index);
            return Err(Error::Api(format!("injected {operation:?} failure")));
        }
        Ok(())
    }
}

#[cfg(test)]
macro_rules! fail_point {
    ($store:expr, $operation:ident) => {
        MemoryBackend::take_failure(&mut $store, MemoryOperation::$operation)?
    };
}

#[cfg(not(test))]
macro_rules! fail_point {
    ($store:expr, $operation:ident) => {
        let _ = &mut $store;
    };
}

#[async_trait]
impl LedgerBackend for MemoryBackend {
    fn describe(&self) -> String {
        "local-only (in-memory)".to_string()
    }

    async fn list_sessions(&self) -> Result<Vec<Session>> {
        let mut store = self.lock()?;
        fail_point!(store, ListSessions);
        let mut sessions = store.sessions.clone();
        sessions.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(sessions)
    }

    async fn fetch_case_log(&self) -> Result<Option<CaseLog>> {
        let mut store = self.lock()?;
        fail_point!(store, FetchCaseLog);
        Ok(store.case_log.clone())
    }

    async fn insert_session(&self, session: &NewSession) -> Result<Session> {
        let inserted = {
            let mut store = self.lock()?;
            fail_point!(store, Insert);
            store.next_id += 1;
            let inserted = Session {
                id: SessionId::new(store.next_id.to_string()),
                title: session.title.clone(),
                date: session.date,
                location: session.location.clone(),
                image_url: session.image_url.clone(),
                proposer: session.proposer.clone(),
                proposer_id: session.proposer_id.clone(),
                votes: session.votes.clone(),
                notes: session.notes.clone(),
            };
            store.sessions.push(inserted.clone());
            inserted
        };
        self.publish(ChangeEvent::SessionInserted(inserted.clone()));
        Ok(inserted)
    }

    async fn update_votes(&self, id: &SessionId, votes: &Votes) -> Result<()> {
        let updated = {
            let mut store = self.lock()?;
            fail_point!(store, UpdateVotes);
            store
                .sessions
                .iter_mut()
                .find(|session| &session.id == id)
                .map(|session| {
                    session.votes = votes.clone();
                    session.clone()
                })
        };
        if let Some(session) = updated {
            self.publish(ChangeEvent::SessionUpdated(session));
        }
        Ok(())
    }

    async fn update_notes(&self, id: &SessionId, notes: &[FieldNote]) -> Result<()> {
        let updated = {
            let mut store = self.lock()?;
            fail_point!(store, UpdateNotes);
            store
                .sessions
                .iter_mut()
                .find(|session| &session.id == id)
                .map(|session| {
                    session.notes = notes.to_vec();
                    session.clone()
                })
        };
        if let Some(session) = updated {
            self.publish(ChangeEvent::SessionUpdated(session));
        }
        Ok(())
    }

    async fn delete_session(&self, id: &SessionId) -> Result<()> {
        let removed = {
            let mut store = self.lock()?;
            fail_point!(store, Delete);
            let before = store.sessions.len();
            store.sessions.retain(|session| &session.id != id);
            store.sessions.len() != before
        };
        if removed {
            self.publish(ChangeEvent::SessionDeleted(id.clone()));
        }
        Ok(())
    }

    async fn upsert_case_log(&self, log: &CaseLog) -> Result<()> {
        {
            let mut store = self.lock()?;
            fail_point!(store, UpsertCaseLog);
            store.case_log = Some(log.clone());
        }
        self.publish(ChangeEvent::CaseLogChanged {
            key: CASE_LOG_KEY.to_string(),
            log: log.clone(),
        });
        Ok(())
    }

    async fn upload_image(&self, object_path: &str, image: &ImageAttachment) -> Result<String> {
        let mut store = self.lock()?;
        fail_point!(store, Upload);
        store
            .images
            .insert(object_path.to_string(), image.bytes.clone());
        Ok(format!("memory://{object_path}"))
    }

    async fn subscribe(&self) -> Result<LiveFeed> {
        let mut source = self.changes.subscribe();
        let (sender, receiver) = mpsc::unbounded_channel();
        let (shutdown, mut shutdown_signal) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_signal => break,
                    received = source.recv() => match received {
                        Ok(event) => {
                            if sender.send(event).is_err() {
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!("Local live feed skipped {} events", skipped);
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
        });

        Ok(LiveFeed::new(receiver, shutdown, task))
    }
}
