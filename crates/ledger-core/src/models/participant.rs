//! Participant identity model

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Device-stable participant identifier.
///
/// Generated once per device and never validated server-side, so any
/// non-empty string read back from local storage is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Generate a new globally unique identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an identifier previously read from storage
    #[must_use]
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The local participant: stable id plus the user-chosen display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_uuids() {
        let first = ParticipantId::generate();
        let second = ParticipantId::generate();
        assert_ne!(first, second);
        assert!(Uuid::parse_str(first.as_str()).is_ok());
    }

    #[test]
    fn stored_ids_round_trip_through_display() {
        let id = ParticipantId::from_stored("legacy-id");
        assert_eq!(id.to_string(), "legacy-id");
    }
}
