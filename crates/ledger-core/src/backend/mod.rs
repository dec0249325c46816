//! Remote persistence boundary.
//!
//! `LedgerBackend` is the only way the application talks to the store that
//! holds sessions, the case log, and uploaded images. Implementations:
//! [`crate::supabase::SupabaseBackend`] for the managed backend and
//! [`MemoryBackend`] for local-only runs.

mod feed;
mod memory;

pub use feed::{ChangeEvent, LiveFeed};
pub use memory::MemoryBackend;
#[cfg(test)]
pub(crate) use memory::MemoryOperation;

use async_trait::async_trait;

use crate::media::ImageAttachment;
use crate::models::{CaseLog, FieldNote, NewSession, Session, SessionId, Votes};
use crate::Result;

/// Operations the ledger needs from its backend
#[async_trait]
pub trait LedgerBackend: Send + Sync {
    /// Short human-readable description for logs
    fn describe(&self) -> String;

    /// All sessions ordered by date ascending
    async fn list_sessions(&self) -> Result<Vec<Session>>;

    /// The singleton case log, `None` if it was never saved
    async fn fetch_case_log(&self) -> Result<Option<CaseLog>>;

    /// Insert a session and return the stored row
    async fn insert_session(&self, session: &NewSession) -> Result<Session>;

    /// Overwrite the whole `votes` column of one row
    async fn update_votes(&self, id: &SessionId, votes: &Votes) -> Result<()>;

    /// Overwrite the whole `notes` column of one row
    async fn update_notes(&self, id: &SessionId, notes: &[FieldNote]) -> Result<()>;

    async fn delete_session(&self, id: &SessionId) -> Result<()>;

    /// Create or replace the case log row
    async fn upsert_case_log(&self, log: &CaseLog) -> Result<()>;

    /// Upload an image at `object_path` and return its public URL
    async fn upload_image(&self, object_path: &str, image: &ImageAttachment) -> Result<String>;

    /// Open the change feed for sessions and the case log
    async fn subscribe(&self) -> Result<LiveFeed>;
}
