//! The Investigator's Ledger - desktop application
//!
//! Schedules tabletop sessions, collects availability votes, and keeps the
//! shared case log in sync across every open ledger.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod bootstrap_config;
mod components;
mod services;
mod state;
mod theme;
mod views;

use dioxus::desktop::{Config, WindowBuilder};
use tracing_subscriber::EnvFilter;

fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "ledger=debug".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Opening the ledger...");

    let config = Config::new()
        .with_window(WindowBuilder::new().with_title("The Investigator's Ledger"));

    dioxus::LaunchBuilder::new()
        .with_cfg(config)
        .launch(app::App);
}
