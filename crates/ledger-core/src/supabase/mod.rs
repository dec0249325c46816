//! Supabase-backed implementation of [`LedgerBackend`].
//!
//! Tables are reached through PostgREST (`/rest/v1`), images through
//! Storage, and the live feed through Realtime. Every request carries the
//! public anon key as both `apikey` and bearer token.

pub mod realtime;
mod storage;

pub use storage::SupabaseStorage;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::{LedgerBackend, LiveFeed};
use crate::config::SupabaseConfig;
use crate::media::ImageAttachment;
use crate::models::{CaseLog, FieldNote, NewSession, Session, SessionId, Votes, CASE_LOG_KEY};
use crate::{Error, Result};

const SESSIONS_TABLE: &str = "sessions";
const GENERAL_TABLE: &str = "general";
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
/// Longest response excerpt quoted in an error
const ERROR_EXCERPT_CHARS: usize = 180;

/// REST, storage, and realtime client for one Supabase project
#[derive(Clone)]
pub struct SupabaseBackend {
    project_url: String,
    rest_url: String,
    anon_key: String,
    storage: SupabaseStorage,
    client: Client,
}

impl std::fmt::Debug for SupabaseBackend {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SupabaseBackend")
            .field("rest_url", &self.rest_url)
            .field("anon_key", &"[REDACTED]")
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct VotesPatch<'a> {
    votes: &'a Votes,
}

#[derive(Debug, Serialize)]
struct NotesPatch<'a> {
    notes: &'a [FieldNote],
}

#[derive(Debug, Serialize)]
struct GeneralUpsert<'a> {
    id: &'a str,
    content: &'a CaseLog,
}

#[derive(Debug, Deserialize)]
struct GeneralContent {
    #[serde(default)]
    content: Option<CaseLog>,
}

#[derive(Debug, Deserialize)]
struct SupabaseErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
    msg: Option<String>,
}

impl SupabaseBackend {
    pub fn new(config: SupabaseConfig) -> Result<Self> {
        let anon_key = config.anon_key.trim().to_string();
        if anon_key.is_empty() {
            return Err(Error::InvalidConfiguration(
                "Supabase anon key must not be empty".to_string(),
            ));
        }
        let storage = SupabaseStorage::new(&config.url, &config.image_bucket, &anon_key)?;

        Ok(Self {
            rest_url: format!("{}/rest/v1", config.url),
            project_url: config.url,
            anon_key,
            storage,
            client: Client::builder().build()?,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.rest_url)
    }

    fn row_url(&self, table: &str, id: &str) -> String {
        format!(
            "{}/{table}?id=eq.{}",
            self.rest_url,
            urlencoding::encode(id)
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorized(request).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api(parse_api_error(status, &body)));
        }
        Ok(response)
    }
}

#[async_trait]
impl LedgerBackend for SupabaseBackend {
    fn describe(&self) -> String {
        format!("Supabase ({})", self.project_url)
    }

    async fn list_sessions(&self) -> Result<Vec<Session>> {
        let request = self
            .client
            .get(self.table_url(SESSIONS_TABLE))
            .query(&[("select", "*"), ("order", "date.asc")]);
        let rows = self.send(request).await?.json::<Vec<Value>>().await?;
        Ok(decode_session_rows(rows))
    }

    async fn fetch_case_log(&self) -> Result<Option<CaseLog>> {
        let key_filter = format!("eq.{CASE_LOG_KEY}");
        let request = self
            .client
            .get(self.table_url(GENERAL_TABLE))
            .query(&[("select", "content"), ("id", key_filter.as_str())])
            .header("Accept", SINGLE_OBJECT);
        let response = self.authorized(request).send().await?;

        // PostgREST answers 406 when a single-object request matches no rows.
        if response.status() == StatusCode::NOT_ACCEPTABLE {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api(parse_api_error(status, &body)));
        }
        Ok(response.json::<GeneralContent>().await?.content)
    }

    async fn insert_session(&self, session: &NewSession) -> Result<Session> {
        let request = self
            .client
            .post(self.table_url(SESSIONS_TABLE))
            .header("Prefer", "return=representation")
            .json(&[session]);
        let mut rows = self.send(request).await?.json::<Vec<Session>>().await?;
        if rows.is_empty() {
            return Err(Error::Api(
                "insert returned no representation".to_string(),
            ));
        }
        Ok(rows.swap_remove(0))
    }

    async fn update_votes(&self, id: &SessionId, votes: &Votes) -> Result<()> {
        let request = self
            .client
            .patch(self.row_url(SESSIONS_TABLE, id.as_str()))
            .json(&VotesPatch { votes });
        self.send(request).await?;
        Ok(())
    }

    async fn update_notes(&self, id: &SessionId, notes: &[FieldNote]) -> Result<()> {
        let request = self
            .client
            .patch(self.row_url(SESSIONS_TABLE, id.as_str()))
            .json(&NotesPatch { notes });
        self.send(request).await?;
        Ok(())
    }

    async fn delete_session(&self, id: &SessionId) -> Result<()> {
        let request = self.client.delete(self.row_url(SESSIONS_TABLE, id.as_str()));
        self.send(request).await?;
        Ok(())
    }

    async fn upsert_case_log(&self, log: &CaseLog) -> Result<()> {
        let request = self
            .client
            .post(self.table_url(GENERAL_TABLE))
            .header("Prefer", "resolution=merge-duplicates")
            .json(&GeneralUpsert {
                id: CASE_LOG_KEY,
                content: log,
            });
        self.send(request).await?;
        Ok(())
    }

    async fn upload_image(&self, object_path: &str, image: &ImageAttachment) -> Result<String> {
        self.storage.upload(&self.client, object_path, image).await
    }

    async fn subscribe(&self) -> Result<LiveFeed> {
        realtime::connect(&self.project_url, &self.anon_key).await
    }
}

/// Decode rows one by one so a single malformed row does not hide the rest.
fn decode_session_rows(rows: Vec<Value>) -> Vec<Session> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.get("id").cloned().unwrap_or(Value::Null);
            match serde_json::from_value::<Session>(row) {
                Ok(session) => Some(session),
                Err(error) => {
                    tracing::warn!("Skipping unreadable session row {}: {}", id, error);
                    None
                }
            }
        })
        .collect()
}

pub(crate) fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<SupabaseErrorResponse>(body) {
        if let Some(message) = payload
            .message
            .or(payload.msg)
            .or(payload.error_description)
            .or(payload.error)
        {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed: String = body.trim().chars().take(ERROR_EXCERPT_CHARS).collect();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_IMAGE_BUCKET;

    fn backend() -> SupabaseBackend {
        SupabaseBackend::new(SupabaseConfig {
            url: "https://demo.supabase.co".to_string(),
            anon_key: "anon-key".to_string(),
            image_bucket: DEFAULT_IMAGE_BUCKET.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn builds_rest_urls() {
        let backend = backend();
        assert_eq!(
            backend.table_url(SESSIONS_TABLE),
            "https://demo.supabase.co/rest/v1/sessions"
        );
        assert_eq!(
            backend.row_url(SESSIONS_TABLE, "42"),
            "https://demo.supabase.co/rest/v1/sessions?id=eq.42"
        );
    }

    #[test]
    fn debug_redacts_anon_key() {
        let rendered = format!("{:?}", backend());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("anon-key"));
    }

    #[test]
    fn rejects_blank_anon_key() {
        let result = SupabaseBackend::new(SupabaseConfig {
            url: "https://demo.supabase.co".to_string(),
            anon_key: "  ".to_string(),
            image_bucket: DEFAULT_IMAGE_BUCKET.to_string(),
        });
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn case_log_upsert_body_uses_fixed_key() {
        let log = CaseLog::default();
        let body = serde_json::to_value(GeneralUpsert {
            id: CASE_LOG_KEY,
            content: &log,
        })
        .unwrap();
        assert_eq!(body["id"], "case_log");
        assert_eq!(body["content"]["lastEditedBy"], "");
    }

    #[test]
    fn unreadable_session_rows_are_skipped() {
        let rows: Vec<Value> = serde_json::from_str(
            r#"[
                {"id": 1, "title": "Lost date", "date": null},
                {"id": 2, "title": "The Haunting", "date": "2025-06-13T19:00:00+00:00",
                 "location": "Corbitt House", "image_url": "", "proposer": "Malone",
                 "proposer_id": "uid-m", "votes": {}, "notes": []}
            ]"#,
        )
        .unwrap();

        let sessions = decode_session_rows(rows);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id.as_str(), "2");
        assert_eq!(sessions[0].title, "The Haunting");
    }

    #[test]
    fn parse_api_error_prefers_message_field() {
        let message = parse_api_error(
            StatusCode::BAD_REQUEST,
            r#"{"message":"violates row-level security policy"}"#,
        );
        assert_eq!(message, "violates row-level security policy (400)");
    }

    #[test]
    fn parse_api_error_quotes_long_bodies_briefly() {
        let message = parse_api_error(StatusCode::BAD_GATEWAY, &"x".repeat(400));
        assert_eq!(message, format!("{} (502)", "x".repeat(ERROR_EXCERPT_CHARS)));
    }

    #[test]
    fn parse_api_error_falls_back_to_body_or_status() {
        assert_eq!(
            parse_api_error(StatusCode::BAD_GATEWAY, "upstream down"),
            "upstream down (502)"
        );
        assert_eq!(
            parse_api_error(StatusCode::INTERNAL_SERVER_ERROR, "  "),
            "HTTP 500"
        );
    }
}
