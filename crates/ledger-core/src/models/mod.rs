//! Data models for the Ledger

mod case_log;
mod note;
mod participant;
mod session;
mod vote;

pub use case_log::{CaseLog, CASE_LOG_KEY};
pub use note::FieldNote;
pub use participant::{Participant, ParticipantId};
pub use session::{
    parse_session_date_input, NewSession, Session, SessionDraft, SessionId,
    DEFAULT_LOCATION, DEFAULT_TITLE,
};
pub use vote::{Tally, Vote, VoteStatus, Votes};

use serde::{Deserialize, Deserializer};

/// Timestamp for a new vote or note, in Unix milliseconds
#[must_use]
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Deserialize a nullable column into the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
