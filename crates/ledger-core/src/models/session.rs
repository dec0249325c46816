//! Session model

use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{null_as_default, FieldNote, Participant, Votes};
use crate::{Error, Result};

/// Title used when the proposer leaves it blank
pub const DEFAULT_TITLE: &str = "Unnamed Ritual";
/// Location used when the proposer leaves it blank
pub const DEFAULT_LOCATION: &str = "Undisclosed Location";

const NAIVE_DATE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Server-assigned session identifier.
///
/// The backend may hand out numeric or text keys; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SessionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(value) => Self(value.to_string()),
            RawId::Text(value) => Self(value),
        })
    }
}

/// A proposed meeting, as stored in the `sessions` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "deserialize_session_date")]
    pub date: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub proposer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub proposer_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub votes: Votes,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: Vec<FieldNote>,
}

impl Session {
    #[must_use]
    pub fn has_image(&self) -> bool {
        !self.image_url.trim().is_empty()
    }

    /// The image lives at an http(s) URL the webview can load
    #[must_use]
    pub fn has_web_image(&self) -> bool {
        self.image_url
            .split_once("://")
            .is_some_and(|(scheme, _)| matches!(scheme, "http" | "https"))
    }
}

/// User-entered fields for a new session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDraft {
    pub date: DateTime<Utc>,
    pub title: String,
    pub location: String,
}

/// Insert payload for the `sessions` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSession {
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub image_url: String,
    pub proposer: String,
    pub proposer_id: String,
    pub votes: Votes,
    pub notes: Vec<FieldNote>,
}

impl NewSession {
    /// Build an insert payload, filling placeholders for blank fields.
    #[must_use]
    pub fn new(draft: &SessionDraft, proposer: &Participant, image_url: Option<String>) -> Self {
        Self {
            title: non_blank_or(&draft.title, DEFAULT_TITLE),
            date: draft.date,
            location: non_blank_or(&draft.location, DEFAULT_LOCATION),
            image_url: image_url.unwrap_or_default(),
            proposer: proposer.name.clone(),
            proposer_id: proposer.id.to_string(),
            votes: Votes::new(),
            notes: Vec::new(),
        }
    }
}

fn non_blank_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parse a date-time entered by a user.
///
/// Accepts RFC 3339, or a `YYYY-MM-DDTHH:MM[:SS]` value interpreted in the
/// local time zone (the shape a `datetime-local` input produces).
pub fn parse_session_date_input(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::InvalidInput("a session date is required".to_string()));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let naive = parse_naive(raw)
        .ok_or_else(|| Error::InvalidInput(format!("unrecognised date '{raw}'")))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| Error::InvalidInput(format!("'{raw}' does not exist in local time")))
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    NAIVE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// Backend timestamps with an offset are converted to UTC; bare values are
/// taken as UTC.
fn deserialize_session_date<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Ok(parsed.with_timezone(&Utc));
    }
    parse_naive(&raw)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid session date '{raw}'")))
}
