use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::Serialize;

/// Mirrors `ledger_core::config::LedgerConfig`
#[derive(Debug, Default, Serialize)]
struct EmbeddedLedgerConfig {
    supabase_url: Option<String>,
    supabase_anon_key: Option<String>,
    image_bucket: Option<String>,
    app_url: Option<String>,
}

fn main() {
    println!("cargo:rerun-if-env-changed=SUPABASE_URL");
    println!("cargo:rerun-if-env-changed=SUPABASE_ANON_KEY");
    println!("cargo:rerun-if-env-changed=LEDGER_IMAGE_BUCKET");
    println!("cargo:rerun-if-env-changed=LEDGER_APP_URL");

    if let Err(error) = write_embedded_config() {
        println!("cargo:warning=failed to generate embedded ledger config: {error}");
    }
}

fn write_embedded_config() -> io::Result<()> {
    load_workspace_dotenv();

    let out_dir = env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "OUT_DIR is not set"))?;
    fs::create_dir_all(&out_dir)?;

    let config = EmbeddedLedgerConfig {
        supabase_url: env_var_trimmed("SUPABASE_URL"),
        supabase_anon_key: env_var_trimmed("SUPABASE_ANON_KEY"),
        image_bucket: env_var_trimmed("LEDGER_IMAGE_BUCKET"),
        app_url: env_var_trimmed("LEDGER_APP_URL"),
    };

    let content = serde_json::to_string_pretty(&config)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error.to_string()))?;
    fs::write(out_dir.join("ledger-config.json"), content)?;
    Ok(())
}

fn load_workspace_dotenv() {
    let manifest_dir =
        env::var_os("CARGO_MANIFEST_DIR").map_or_else(|| PathBuf::from("."), PathBuf::from);
    let candidate = manifest_dir.join("..").join("..").join(".env");
    if candidate.exists() {
        let _ = dotenvy::from_path(candidate);
    }
}

fn env_var_trimmed(name: &str) -> Option<String> {
    let value = env::var(name).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
