//! Shared case log model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Fixed key of the singleton case log row in the `general` table
pub const CASE_LOG_KEY: &str = "case_log";

/// The freeform log shared by every participant.
///
/// Replaced wholesale on every save; no history is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseLog {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_edited_by: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CaseLog {
    #[must_use]
    pub fn new(text: impl Into<String>, editor: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            last_edited_by: editor.into(),
            updated_at: Some(at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn serializes_camel_case_payload() {
        let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let log = CaseLog::new("The cult meets at dawn", "Malone", at);
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["text"], "The cult meets at dawn");
        assert_eq!(json["lastEditedBy"], "Malone");
        assert!(json["updatedAt"].as_str().unwrap().starts_with("2025-01-02T03:04:05"));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let log: CaseLog = serde_json::from_str(r#"{"text":null}"#).unwrap();
        assert_eq!(log, CaseLog::default());
    }
}
