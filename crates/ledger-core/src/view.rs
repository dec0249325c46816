//! Transient interaction state shared by the clients.
//!
//! Nothing here is persisted; it is rebuilt empty on every launch.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::media::ImageAttachment;
use crate::models::{parse_session_date_input, SessionDraft, SessionId};
use crate::service::CASE_LOG_SAVE_FAILED;
use crate::Result;

/// How long a toast stays visible
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Identifies one shown toast so a stale timer cannot hide a newer one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub ticket: ToastTicket,
    pub message: String,
}

/// Fields of the proposal form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionForm {
    /// Raw date-time input
    pub date: String,
    pub title: String,
    pub location: String,
    pub image: Option<ImageAttachment>,
}

impl SessionForm {
    /// A date is the only required field
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.date.trim().is_empty()
    }

    pub fn draft(&self) -> Result<SessionDraft> {
        Ok(SessionDraft {
            date: parse_session_date_input(&self.date)?,
            title: self.title.clone(),
            location: self.location.clone(),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pending_delete: Option<SessionId>,
    note_drafts: BTreeMap<SessionId, String>,
    expanded_notes: BTreeSet<SessionId>,
    case_log_draft: Option<String>,
    toast: Option<Toast>,
    next_ticket: u64,
    pub form: SessionForm,
    /// Identity gate text field
    pub name_input: String,
}

impl ViewState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_delete(&mut self, id: SessionId) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    #[must_use]
    pub const fn pending_delete(&self) -> Option<&SessionId> {
        self.pending_delete.as_ref()
    }

    /// Take the session awaiting confirmation, clearing the selection
    pub fn confirm_delete(&mut self) -> Option<SessionId> {
        self.pending_delete.take()
    }

    pub fn set_note_draft(&mut self, id: &SessionId, text: impl Into<String>) {
        self.note_drafts.insert(id.clone(), text.into());
    }

    #[must_use]
    pub fn note_draft(&self, id: &SessionId) -> &str {
        self.note_drafts.get(id).map_or("", String::as_str)
    }

    /// Trimmed draft text ready to submit, `None` when blank. The draft is
    /// kept until [`ViewState::clear_note_draft`] confirms it was applied.
    #[must_use]
    pub fn submittable_note(&self, id: &SessionId) -> Option<String> {
        let text = self.note_drafts.get(id)?.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    pub fn clear_note_draft(&mut self, id: &SessionId) {
        self.note_drafts.remove(id);
    }

    pub fn toggle_notes(&mut self, id: &SessionId) {
        if !self.expanded_notes.remove(id) {
            self.expanded_notes.insert(id.clone());
        }
    }

    #[must_use]
    pub fn notes_expanded(&self, id: &SessionId) -> bool {
        self.expanded_notes.contains(id)
    }

    /// Enter edit mode with a draft seeded from the committed text
    pub fn begin_case_log_edit(&mut self, committed: &str) {
        self.case_log_draft = Some(committed.to_string());
    }

    pub fn set_case_log_draft(&mut self, text: impl Into<String>) {
        if let Some(draft) = self.case_log_draft.as_mut() {
            *draft = text.into();
        }
    }

    pub fn discard_case_log_edit(&mut self) {
        self.case_log_draft = None;
    }

    /// Current draft, `None` outside edit mode
    #[must_use]
    pub fn case_log_draft(&self) -> Option<&str> {
        self.case_log_draft.as_deref()
    }

    #[must_use]
    pub const fn is_editing_case_log(&self) -> bool {
        self.case_log_draft.is_some()
    }

    /// Settle a case log save. Success leaves edit mode; failure keeps the
    /// draft open and returns the toast to show.
    pub fn settle_case_log_save(&mut self, saved: bool) -> Option<&'static str> {
        if saved {
            self.case_log_draft = None;
            None
        } else {
            Some(CASE_LOG_SAVE_FAILED)
        }
    }

    /// Show `message`, replacing any visible toast
    pub fn show_toast(&mut self, message: impl Into<String>) -> ToastTicket {
        self.next_ticket += 1;
        let ticket = ToastTicket(self.next_ticket);
        self.toast = Some(Toast {
            ticket,
            message: message.into(),
        });
        ticket
    }

    /// Hide the toast only if it is still the one `ticket` refers to
    pub fn dismiss_toast(&mut self, ticket: ToastTicket) -> bool {
        if self.toast.as_ref().is_some_and(|toast| toast.ticket == ticket) {
            self.toast = None;
            return true;
        }
        false
    }

    #[must_use]
    pub const fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }
}
