//! Field note model

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A note left on a session. Notes are append-only from the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNote {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    /// Unix ms
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: i64,
}

impl FieldNote {
    /// Build a note from user input. Returns `None` for whitespace-only text.
    #[must_use]
    pub fn new(text: &str, author: impl Into<String>, timestamp: i64) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            author: author.into(),
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_and_rejects_blank_text() {
        assert!(FieldNote::new("   ", "Malone", 1).is_none());

        let note = FieldNote::new("  bring dice  ", "Malone", 42).unwrap();
        assert_eq!(note.text, "bring dice");
        assert_eq!(note.author, "Malone");
        assert_eq!(note.timestamp, 42);
    }

    #[test]
    fn tolerates_null_fields_in_stored_blob() {
        let note: FieldNote =
            serde_json::from_str(r#"{"text":"hi","author":null,"timestamp":null}"#).unwrap();
        assert_eq!(note.author, "");
        assert_eq!(note.timestamp, 0);
    }
}
