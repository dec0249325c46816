//! ledger-core - Core library for the Investigator's Ledger
//!
//! This crate contains the shared models, backend access layer, live feed
//! handling, and view state used by the desktop app and the CLI.

pub mod backend;
pub mod calendar;
pub mod config;
pub mod error;
pub mod identity;
pub mod media;
pub mod models;
pub mod service;
pub mod share;
pub mod state;
pub mod supabase;
pub mod view;

pub use error::{Error, Result};
pub use models::{CaseLog, FieldNote, Session, SessionId, Vote, VoteStatus, Votes};
