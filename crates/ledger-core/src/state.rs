//! Local cache of the remote collections.
//!
//! `LedgerState` is eventually consistent with the backend: it is filled by
//! explicit loads, patched by live-feed events, and mutated optimistically
//! before writes are issued.

use crate::backend::ChangeEvent;
use crate::models::{
    CaseLog, FieldNote, Participant, Session, SessionId, Vote, VoteStatus, Votes, CASE_LOG_KEY,
};
use crate::Result;

/// Sessions ordered by date plus the shared case log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerState {
    sessions: Vec<Session>,
    case_log: CaseLog,
}

impl LedgerState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    #[must_use]
    pub fn session(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.iter().find(|session| &session.id == id)
    }

    #[must_use]
    pub const fn case_log(&self) -> &CaseLog {
        &self.case_log
    }

    pub fn replace_sessions(&mut self, sessions: Vec<Session>) {
        self.sessions = sessions;
        self.sort();
    }

    pub fn set_case_log(&mut self, log: CaseLog) {
        self.case_log = log;
    }

    /// Apply a session load. On failure the cached list is kept.
    pub fn absorb_sessions(&mut self, loaded: Result<Vec<Session>>) -> bool {
        match loaded {
            Ok(sessions) => {
                tracing::debug!("Loaded {} sessions", sessions.len());
                self.replace_sessions(sessions);
                true
            }
            Err(error) => {
                tracing::warn!("Failed to load sessions: {}", error);
                false
            }
        }
    }

    /// Apply a case log load. A missing row or a failure keeps the cached log.
    pub fn absorb_case_log(&mut self, loaded: Result<Option<CaseLog>>) -> bool {
        match loaded {
            Ok(Some(log)) => {
                self.case_log = log;
                true
            }
            Ok(None) => false,
            Err(error) => {
                tracing::warn!("Failed to load case log: {}", error);
                false
            }
        }
    }

    /// Merge one live-feed event. Returns whether anything changed.
    pub fn apply_change(&mut self, event: ChangeEvent) -> bool {
        match event {
            ChangeEvent::SessionInserted(session) => {
                self.merge_session(session);
                true
            }
            ChangeEvent::SessionUpdated(session) => {
                let Some(slot) = self.sessions.iter_mut().find(|row| row.id == session.id)
                else {
                    tracing::debug!("Ignoring update for unknown session {}", session.id);
                    return false;
                };
                *slot = session;
                self.sort();
                true
            }
            ChangeEvent::SessionDeleted(id) => self.remove_session(&id),
            ChangeEvent::CaseLogChanged { key, log } => {
                if key != CASE_LOG_KEY {
                    return false;
                }
                self.case_log = log;
                true
            }
        }
    }

    /// Insert `session`, replacing a cached row with the same id.
    pub fn merge_session(&mut self, session: Session) {
        if let Some(slot) = self.sessions.iter_mut().find(|row| row.id == session.id) {
            *slot = session;
        } else {
            self.sessions.push(session);
        }
        self.sort();
    }

    pub fn remove_session(&mut self, id: &SessionId) -> bool {
        let before = self.sessions.len();
        self.sessions.retain(|session| &session.id != id);
        self.sessions.len() != before
    }

    /// Cast `participant`'s vote locally and return the full vote map to
    /// write back. `None` when the session is not cached.
    pub fn record_vote(
        &mut self,
        id: &SessionId,
        participant: &Participant,
        status: VoteStatus,
        timestamp: i64,
    ) -> Option<Votes> {
        let session = self.sessions.iter_mut().find(|session| &session.id == id)?;
        session.votes.cast(Vote {
            name: participant.name.clone(),
            status,
            timestamp,
            participant_id: participant.id.to_string(),
        });
        Some(session.votes.clone())
    }

    /// Append a note locally and return the full note list to write back.
    /// `None` when the session is not cached or the text is blank.
    pub fn append_note(
        &mut self,
        id: &SessionId,
        participant: &Participant,
        text: &str,
        timestamp: i64,
    ) -> Option<Vec<FieldNote>> {
        let note = FieldNote::new(text, participant.name.clone(), timestamp)?;
        let session = self.sessions.iter_mut().find(|session| &session.id == id)?;
        session.notes.push(note);
        Some(session.notes.clone())
    }

    fn sort(&mut self) {
        self.sessions.sort_by_key(|session| session.date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParticipantId;
    use crate::Error;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn session(id: &str, day: u32) -> Session {
        Session {
            id: SessionId::new(id),
            title: format!("Session {id}"),
            date: Utc.with_ymd_and_hms(2025, 6, day, 19, 0, 0).unwrap(),
            location: "Discord".to_string(),
            image_url: String::new(),
            proposer: "Malone".to_string(),
            proposer_id: "uid-m".to_string(),
            votes: Votes::new(),
            notes: Vec::new(),
        }
    }

    fn ids(state: &LedgerState) -> Vec<&str> {
        state.sessions().iter().map(|session| session.id.as_str()).collect()
    }

    fn participant(name: &str) -> Participant {
        Participant {
            id: ParticipantId::from_stored("uid-1"),
            name: name.to_string(),
        }
    }

    fn seeded() -> LedgerState {
        let mut state = LedgerState::new();
        state.replace_sessions(vec![session("b", 10), session("a", 2)]);
        state
    }

    #[test]
    fn replace_sessions_sorts_by_date() {
        assert_eq!(ids(&seeded()), vec!["a", "b"]);
    }

    #[test]
    fn failed_load_keeps_previous_sessions() {
        let mut state = seeded();
        let applied = state.absorb_sessions(Err(Error::Api("offline".to_string())));
        assert!(!applied);
        assert_eq!(ids(&state), vec!["a", "b"]);
    }

    #[test]
    fn failed_or_missing_case_log_keeps_previous_log() {
        let mut state = LedgerState::new();
        let log = CaseLog::new("Clue", "Malone", Utc::now());
        assert!(state.absorb_case_log(Ok(Some(log.clone()))));
        assert!(!state.absorb_case_log(Ok(None)));
        assert!(!state.absorb_case_log(Err(Error::Api("offline".to_string()))));
        assert_eq!(state.case_log(), &log);
    }

    #[test]
    fn feed_insert_of_unknown_session_keeps_order() {
        let mut state = seeded();
        assert!(state.apply_change(ChangeEvent::SessionInserted(session("c", 5))));
        assert_eq!(ids(&state), vec!["a", "c", "b"]);
    }

    #[test]
    fn feed_insert_of_cached_session_replaces_it() {
        let mut state = seeded();
        let mut echoed = session("a", 2);
        echoed.title = "Renamed".to_string();
        state.apply_change(ChangeEvent::SessionInserted(echoed));
        assert_eq!(state.sessions().len(), 2);
        assert_eq!(state.session(&SessionId::new("a")).unwrap().title, "Renamed");
    }

    #[test]
    fn feed_update_replaces_row_and_resorts() {
        let mut state = seeded();
        assert!(state.apply_change(ChangeEvent::SessionUpdated(session("a", 20))));
        assert_eq!(ids(&state), vec!["b", "a"]);
    }

    #[test]
    fn feed_update_and_delete_of_unknown_id_are_noops() {
        let mut state = seeded();
        let before = state.clone();
        assert!(!state.apply_change(ChangeEvent::SessionUpdated(session("zz", 1))));
        assert!(!state.apply_change(ChangeEvent::SessionDeleted(SessionId::new("zz"))));
        assert_eq!(state, before);
    }

    #[test]
    fn feed_delete_removes_row() {
        let mut state = seeded();
        assert!(state.apply_change(ChangeEvent::SessionDeleted(SessionId::new("a"))));
        assert_eq!(ids(&state), vec!["b"]);
    }

    #[test]
    fn case_log_event_applies_only_for_case_log_key() {
        let mut state = LedgerState::new();
        let log = CaseLog::new("Dagon stirs", "Armitage", Utc::now());
        assert!(!state.apply_change(ChangeEvent::CaseLogChanged {
            key: "motd".to_string(),
            log: log.clone(),
        }));
        assert_eq!(state.case_log(), &CaseLog::default());

        assert!(state.apply_change(ChangeEvent::CaseLogChanged {
            key: CASE_LOG_KEY.to_string(),
            log: log.clone(),
        }));
        assert_eq!(state.case_log(), &log);
    }

    #[test]
    fn record_vote_overwrites_same_name() {
        let mut state = seeded();
        let id = SessionId::new("a");
        state.record_vote(&id, &participant("Malone"), VoteStatus::Maybe, 1);
        let votes = state
            .record_vote(&id, &participant("Malone"), VoteStatus::Yes, 2)
            .unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes.get("Malone").unwrap().status, VoteStatus::Yes);
        assert_eq!(votes.get("Malone").unwrap().participant_id, "uid-1");
    }

    #[test]
    fn renamed_participant_leaves_old_vote_in_place() {
        let mut state = seeded();
        let id = SessionId::new("a");
        state.record_vote(&id, &participant("Malone"), VoteStatus::No, 1);
        let votes = state
            .record_vote(&id, &participant("Legrasse"), VoteStatus::Yes, 2)
            .unwrap();

        assert_eq!(votes.len(), 2);
        assert_eq!(votes.get("Malone").unwrap().status, VoteStatus::No);
        assert_eq!(votes.get("Legrasse").unwrap().status, VoteStatus::Yes);
    }

    #[test]
    fn record_vote_on_unknown_session_is_none() {
        let mut state = seeded();
        assert!(state
            .record_vote(&SessionId::new("zz"), &participant("A"), VoteStatus::Yes, 1)
            .is_none());
    }

    #[test]
    fn append_note_trims_and_rejects_blank() {
        let mut state = seeded();
        let id = SessionId::new("b");
        assert!(state.append_note(&id, &participant("A"), "   ", 1).is_none());

        let notes = state
            .append_note(&id, &participant("A"), "  bring candles ", 5)
            .unwrap();
        assert_eq!(
            notes,
            vec![FieldNote {
                text: "bring candles".to_string(),
                author: "A".to_string(),
                timestamp: 5,
            }]
        );
        assert_eq!(state.session(&id).unwrap().notes.len(), 1);
    }
}
