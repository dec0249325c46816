//! Client configuration embedded at build time.

use ledger_core::config::LedgerConfig;

/// Parse the embedded configuration, falling back to an empty config so the
/// app can still start in local-only mode.
fn parse_embedded_config(raw: &str) -> LedgerConfig {
    serde_json::from_str(raw).unwrap_or_else(|error| {
        tracing::warn!("Failed to parse embedded ledger config: {}", error);
        LedgerConfig::default()
    })
}

/// Loads the generated configuration JSON from `OUT_DIR`.
pub fn load_embedded_config() -> LedgerConfig {
    parse_embedded_config(include_str!(concat!(env!("OUT_DIR"), "/ledger-config.json")))
}

/// Embedded values overridden field-by-field by the runtime environment.
pub fn resolve_runtime_config() -> LedgerConfig {
    let config = load_embedded_config().overlay(LedgerConfig::from_env());
    tracing::debug!(
        "Runtime config: supabase={} bucket={} app_url={}",
        config.supabase_url.as_deref().unwrap_or("(none)"),
        config.image_bucket(),
        config.app_url().as_deref().unwrap_or("(none)")
    );
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_generated_shape() {
        let config = parse_embedded_config(
            r#"{
                "supabase_url": "https://demo.supabase.co",
                "supabase_anon_key": "anon",
                "image_bucket": null,
                "app_url": "https://ledger.example"
            }"#,
        );
        assert_eq!(config.supabase_url.as_deref(), Some("https://demo.supabase.co"));
        assert_eq!(config.app_url().as_deref(), Some("https://ledger.example"));
        assert_eq!(config.image_bucket(), "session-images");
    }

    #[test]
    fn invalid_json_falls_back_to_local_only() {
        let config = parse_embedded_config("not json");
        assert_eq!(config, LedgerConfig::default());
        assert!(config.supabase().unwrap().is_none());
    }
}
