//! Ledger operations over a backend
//!
//! `LedgerService` is what the clients hold. It picks the backend from
//! configuration and wraps the write paths that need more than one backend
//! call, such as uploading an image before inserting its session.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::backend::{LedgerBackend, LiveFeed, MemoryBackend};
use crate::config::LedgerConfig;
use crate::media::{session_image_path, ImageAttachment};
use crate::models::{
    now_millis, CaseLog, FieldNote, NewSession, Participant, Session, SessionDraft, SessionId,
    Votes,
};
use crate::supabase::SupabaseBackend;
use crate::{Error, Result};

/// Toast shown when the case log could not be saved
pub const CASE_LOG_SAVE_FAILED: &str = "Failed to save case log.";

/// Why a session could not be created
#[derive(Debug, Error)]
pub enum CreateSessionError {
    /// The attached image was not stored; nothing was inserted
    #[error("image upload failed: {0}")]
    ImageUpload(#[source] Error),
    /// The row insert failed
    #[error("session insert failed: {0}")]
    Insert(#[source] Error),
}

impl CreateSessionError {
    /// Message shown to the user
    #[must_use]
    pub const fn toast_message(&self) -> &'static str {
        match self {
            Self::ImageUpload(_) => "The sigils rejected the image.",
            Self::Insert(_) => "The ink refused to dry.",
        }
    }
}

/// Shared handle to the configured backend
#[derive(Clone)]
pub struct LedgerService {
    backend: Arc<dyn LedgerBackend>,
    local_only: bool,
}

impl std::fmt::Debug for LedgerService {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("LedgerService")
            .field("backend", &self.backend.describe())
            .field("local_only", &self.local_only)
            .finish()
    }
}

impl LedgerService {
    /// Build the service from configuration.
    ///
    /// A configured Supabase project selects the managed backend; no
    /// project at all falls back to the in-memory backend.
    pub fn from_config(config: &LedgerConfig) -> Result<Self> {
        match config.supabase()? {
            Some(supabase) => {
                let backend = SupabaseBackend::new(supabase)?;
                tracing::info!("Using backend: {}", backend.describe());
                Ok(Self {
                    backend: Arc::new(backend),
                    local_only: false,
                })
            }
            None => {
                tracing::info!(
                    "Running in local-only mode (no SUPABASE_URL/SUPABASE_ANON_KEY)"
                );
                Ok(Self::local_only())
            }
        }
    }

    /// Service over a fresh in-memory backend
    #[must_use]
    pub fn local_only() -> Self {
        Self {
            backend: Arc::new(MemoryBackend::new()),
            local_only: true,
        }
    }

    #[must_use]
    pub fn with_backend(backend: Arc<dyn LedgerBackend>) -> Self {
        Self {
            backend,
            local_only: false,
        }
    }

    #[must_use]
    pub const fn is_local_only(&self) -> bool {
        self.local_only
    }

    #[must_use]
    pub fn describe(&self) -> String {
        self.backend.describe()
    }

    pub async fn load_sessions(&self) -> Result<Vec<Session>> {
        self.backend.list_sessions().await
    }

    pub async fn load_case_log(&self) -> Result<Option<CaseLog>> {
        self.backend.fetch_case_log().await
    }

    pub async fn subscribe_to_changes(&self) -> Result<LiveFeed> {
        let feed = self.backend.subscribe().await?;
        tracing::info!("Subscribed to live changes");
        Ok(feed)
    }

    /// Upload the optional image, then insert the session.
    pub async fn create_session(
        &self,
        draft: &SessionDraft,
        proposer: &Participant,
        image: Option<&ImageAttachment>,
    ) -> std::result::Result<Session, CreateSessionError> {
        let image_url = match image {
            Some(image) => {
                let path = session_image_path(&proposer.id, now_millis(), image);
                let url = self
                    .backend
                    .upload_image(&path, image)
                    .await
                    .map_err(|error| {
                        tracing::error!("Image upload to {} failed: {}", path, error);
                        CreateSessionError::ImageUpload(error)
                    })?;
                Some(url)
            }
            None => None,
        };

        let payload = NewSession::new(draft, proposer, image_url);
        let session = self
            .backend
            .insert_session(&payload)
            .await
            .map_err(|error| {
                tracing::error!("Session insert failed: {}", error);
                CreateSessionError::Insert(error)
            })?;
        tracing::info!("Created session {} ({})", session.id, session.title);
        Ok(session)
    }

    pub async fn update_votes(&self, id: &SessionId, votes: &Votes) -> Result<()> {
        self.backend.update_votes(id, votes).await
    }

    pub async fn update_notes(&self, id: &SessionId, notes: &[FieldNote]) -> Result<()> {
        self.backend.update_notes(id, notes).await
    }

    pub async fn delete_session(&self, id: &SessionId) -> Result<()> {
        self.backend.delete_session(id).await
    }

    /// Replace the case log, stamped with the current time.
    pub async fn save_case_log(&self, text: &str, editor: &str) -> Result<CaseLog> {
        let log = CaseLog::new(text, editor, Utc::now());
        self.backend.upsert_case_log(&log).await?;
        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ChangeEvent, MemoryOperation};
    use crate::models::{ParticipantId, DEFAULT_LOCATION, DEFAULT_TITLE};
    use crate::state::LedgerState;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn service() -> (LedgerService, MemoryBackend) {
        let backend = MemoryBackend::new();
        (
            LedgerService::with_backend(Arc::new(backend.clone())),
            backend,
        )
    }

    fn proposer() -> Participant {
        Participant {
            id: ParticipantId::from_stored("uid-w"),
            name: "Wilmarth".to_string(),
        }
    }

    fn draft() -> SessionDraft {
        SessionDraft {
            date: Utc.with_ymd_and_hms(2025, 11, 7, 18, 0, 0).unwrap(),
            title: String::new(),
            location: String::new(),
        }
    }

    fn image() -> ImageAttachment {
        ImageAttachment {
            file_name: "vermont.PNG".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![0x89, 0x50],
        }
    }

    #[test]
    fn empty_config_selects_local_only_mode() {
        let service = LedgerService::from_config(&LedgerConfig::default()).unwrap();
        assert!(service.is_local_only());
    }

    #[test]
    fn partial_config_is_rejected() {
        let config = LedgerConfig {
            supabase_url: Some("https://demo.supabase.co".to_string()),
            ..LedgerConfig::default()
        };
        assert!(LedgerService::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn create_session_with_only_date_uses_placeholders() {
        let (service, _) = service();
        let session = service.create_session(&draft(), &proposer(), None).await.unwrap();

        assert_eq!(session.title, DEFAULT_TITLE);
        assert_eq!(session.location, DEFAULT_LOCATION);
        assert_eq!(session.image_url, "");
        assert_eq!(session.proposer, "Wilmarth");
        assert_eq!(session.proposer_id, "uid-w");
    }

    #[tokio::test]
    async fn create_session_uploads_image_under_participant_prefix() {
        let (service, backend) = service();
        let session = service
            .create_session(&draft(), &proposer(), Some(&image()))
            .await
            .unwrap();

        assert!(session.image_url.starts_with("memory://sessions/uid-w-"));
        assert!(session.image_url.ends_with(".png"));
        assert_eq!(backend.image_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn upload_failure_aborts_before_insert() {
        let (service, backend) = service();
        backend.fail_next(MemoryOperation::Upload);

        let error = service
            .create_session(&draft(), &proposer(), Some(&image()))
            .await
            .unwrap_err();

        assert!(matches!(error, CreateSessionError::ImageUpload(_)));
        assert_eq!(error.toast_message(), "The sigils rejected the image.");
        assert!(service.load_sessions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_failure_reports_ink_toast() {
        let (service, backend) = service();
        backend.fail_next(MemoryOperation::Insert);

        let error = service
            .create_session(&draft(), &proposer(), None)
            .await
            .unwrap_err();
        assert!(matches!(error, CreateSessionError::Insert(_)));
        assert_eq!(error.toast_message(), "The ink refused to dry.");
    }

    #[tokio::test]
    async fn failed_load_leaves_cached_state() {
        let (service, backend) = service();
        service.create_session(&draft(), &proposer(), None).await.unwrap();

        let mut state = LedgerState::new();
        state.absorb_sessions(service.load_sessions().await);
        assert_eq!(state.sessions().len(), 1);

        backend.fail_next(MemoryOperation::ListSessions);
        assert!(!state.absorb_sessions(service.load_sessions().await));
        assert_eq!(state.sessions().len(), 1);
    }

    #[tokio::test]
    async fn optimistic_vote_survives_write_failure() {
        let (service, backend) = service();
        let session = service.create_session(&draft(), &proposer(), None).await.unwrap();
        let mut state = LedgerState::new();
        state.merge_session(session.clone());

        let votes = state
            .record_vote(&session.id, &proposer(), crate::VoteStatus::Yes, 1)
            .unwrap();
        backend.fail_next(MemoryOperation::UpdateVotes);
        assert!(service.update_votes(&session.id, &votes).await.is_err());

        assert_eq!(state.session(&session.id).unwrap().votes.len(), 1);
    }

    #[tokio::test]
    async fn confirmed_delete_removes_row() {
        let (service, _) = service();
        let session = service.create_session(&draft(), &proposer(), None).await.unwrap();
        let mut state = LedgerState::new();
        state.merge_session(session.clone());

        assert!(state.remove_session(&session.id));
        service.delete_session(&session.id).await.unwrap();
        assert!(service.load_sessions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn optimistic_note_survives_write_failure() {
        let (service, backend) = service();
        let session = service.create_session(&draft(), &proposer(), None).await.unwrap();
        let mut state = LedgerState::new();
        state.merge_session(session.clone());

        let notes = state
            .append_note(&session.id, &proposer(), "Bring the lantern", 2)
            .unwrap();
        backend.fail_next(MemoryOperation::UpdateNotes);
        assert!(service.update_notes(&session.id, &notes).await.is_err());

        let cached = state.session(&session.id).unwrap();
        assert_eq!(cached.notes.len(), 1);
        assert_eq!(cached.notes[0].text, "Bring the lantern");
    }

    #[tokio::test]
    async fn failed_delete_keeps_row_removed_locally() {
        let (service, backend) = service();
        let session = service.create_session(&draft(), &proposer(), None).await.unwrap();
        let mut state = LedgerState::new();
        state.merge_session(session.clone());

        assert!(state.remove_session(&session.id));
        backend.fail_next(MemoryOperation::Delete);
        assert!(service.delete_session(&session.id).await.is_err());

        assert!(state.session(&session.id).is_none());
        assert_eq!(service.load_sessions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn save_case_log_is_echoed_to_subscribers() {
        let (service, _) = service();
        let mut feed = service.subscribe_to_changes().await.unwrap();

        let saved = service.save_case_log("Gilman House", "Olmstead").await.unwrap();
        assert_eq!(saved.last_edited_by, "Olmstead");
        assert!(saved.updated_at.is_some());

        let mut state = LedgerState::new();
        let event = feed.next().await.unwrap();
        assert!(matches!(event, ChangeEvent::CaseLogChanged { .. }));
        state.apply_change(event);
        assert_eq!(state.case_log(), &saved);
        feed.close().await;
    }

    #[tokio::test]
    async fn save_case_log_failure_is_reported() {
        let (service, backend) = service();
        backend.fail_next(MemoryOperation::UpsertCaseLog);
        assert!(service.save_case_log("text", "editor").await.is_err());
        assert_eq!(service.load_case_log().await.unwrap(), None);
    }
}
