//! Client configuration.
//!
//! Provides a unified `LedgerConfig` used by desktop and CLI to discover the
//! Supabase project, the image bucket, and the public app URL.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Storage bucket used when none is configured
pub const DEFAULT_IMAGE_BUCKET: &str = "session-images";

const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
const ENV_IMAGE_BUCKET: &str = "LEDGER_IMAGE_BUCKET";
const ENV_APP_URL: &str = "LEDGER_APP_URL";

/// Client configuration.
///
/// These values are safe-to-ship public endpoints/keys. Secret credentials
/// must never be stored here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_anon_key: Option<String>,
    #[serde(default)]
    pub image_bucket: Option<String>,
    #[serde(default)]
    pub app_url: Option<String>,
}

/// Validated Supabase project settings
#[derive(Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    /// Project URL without trailing slash, e.g. `https://demo.supabase.co`
    pub url: String,
    pub anon_key: String,
    pub image_bucket: String,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &"[REDACTED]")
            .field("image_bucket", &self.image_bucket)
            .finish()
    }
}

impl LedgerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            supabase_url: setting(lookup(ENV_SUPABASE_URL)),
            supabase_anon_key: setting(lookup(ENV_SUPABASE_ANON_KEY)),
            image_bucket: setting(lookup(ENV_IMAGE_BUCKET)),
            app_url: setting(lookup(ENV_APP_URL)),
        }
    }

    /// Field-by-field overlay: values present in `other` win.
    #[must_use]
    pub fn overlay(self, other: Self) -> Self {
        Self {
            supabase_url: setting(other.supabase_url)
                .or_else(|| setting(self.supabase_url)),
            supabase_anon_key: setting(other.supabase_anon_key)
                .or_else(|| setting(self.supabase_anon_key)),
            image_bucket: setting(other.image_bucket)
                .or_else(|| setting(self.image_bucket)),
            app_url: setting(other.app_url)
                .or_else(|| setting(self.app_url)),
        }
    }

    /// Bucket for uploaded session images
    pub fn image_bucket(&self) -> String {
        setting(self.image_bucket.clone())
            .unwrap_or_else(|| DEFAULT_IMAGE_BUCKET.to_string())
    }

    /// Public URL handed out when sharing the app
    pub fn app_url(&self) -> Option<String> {
        setting(self.app_url.clone())
    }

    /// Validate the Supabase settings.
    ///
    /// Returns `Ok(None)` when neither URL nor key is set (local-only mode)
    /// and an error when only one of them is.
    pub fn supabase(&self) -> Result<Option<SupabaseConfig>> {
        let url = setting(self.supabase_url.clone());
        let anon_key = setting(self.supabase_anon_key.clone());

        match (url, anon_key) {
            (None, None) => Ok(None),
            (Some(url), Some(anon_key)) => Ok(Some(SupabaseConfig {
                url: normalize_project_url(&url)?,
                anon_key,
                image_bucket: self.image_bucket(),
            })),
            _ => Err(Error::InvalidConfiguration(format!(
                "{ENV_SUPABASE_URL} and {ENV_SUPABASE_ANON_KEY} must be set together"
            ))),
        }
    }
}

/// Trim a project URL and require an http(s) scheme.
pub fn normalize_project_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::InvalidConfiguration(
            "Supabase URL must not be empty".to_string(),
        ));
    }
    if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
        return Err(Error::InvalidConfiguration(
            "Supabase URL must include http:// or https://".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Trimmed setting value; blank counts as unset.
fn setting(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
