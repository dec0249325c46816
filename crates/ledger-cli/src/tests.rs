use std::sync::Arc;

use chrono::{TimeZone, Utc};
use ledger_core::backend::{ChangeEvent, MemoryBackend};
use ledger_core::config::LedgerConfig;
use ledger_core::identity::{IdentityManager, MemoryLocalStorage};
use ledger_core::models::CaseLog;
use ledger_core::service::LedgerService;
use ledger_core::{Session, SessionId, Vote, VoteStatus, Votes};
use pretty_assertions::assert_eq;

use crate::cli::{CompletionShell, VoteChoice};
use crate::commands::common::{
    default_editor, find_session, format_session_lines, is_affirmative, normalize_content,
    normalize_session_id, open_service_with, resolve_storage_path, session_to_list_item,
};
use crate::commands::completions::render_completions;
use crate::commands::export::run_export;
use crate::commands::identity::{run_identity_reset, run_identity_set};
use crate::commands::log::{format_case_log, run_log_set};
use crate::commands::note::run_note;
use crate::commands::propose::{run_propose, ProposeArgs};
use crate::commands::vote::run_vote;
use crate::commands::watch::describe_change;
use crate::error::CliError;

fn memory_service() -> LedgerService {
    LedgerService::with_backend(Arc::new(MemoryBackend::new()))
}

fn named_identity(name: &str) -> IdentityManager<MemoryLocalStorage> {
    let mut identity = IdentityManager::load(MemoryLocalStorage::new()).unwrap();
    identity.submit_name(name).unwrap();
    identity
}

fn vote(name: &str, status: VoteStatus) -> Vote {
    Vote {
        name: name.to_string(),
        status,
        timestamp: 0,
        participant_id: format!("uid-{name}"),
    }
}

fn session(id: &str, title: &str, votes: Votes) -> Session {
    Session {
        id: SessionId::new(id),
        title: title.to_string(),
        date: Utc.with_ymd_and_hms(2025, 10, 31, 19, 0, 0).unwrap(),
        location: "Miskatonic Library".to_string(),
        image_url: String::new(),
        proposer: "Armitage".to_string(),
        proposer_id: "uid-armitage".to_string(),
        votes,
        notes: Vec::new(),
    }
}

fn propose_args(date: &str) -> ProposeArgs {
    ProposeArgs {
        date: date.to_string(),
        title: Some("The Colour Out of Space".to_string()),
        location: None,
        image: None,
    }
}

#[test]
fn normalize_content_trims_and_rejects_empty() {
    assert_eq!(normalize_content("  hello  "), Some("hello".to_string()));
    assert_eq!(normalize_content(" \n\t "), None);
}

#[test]
fn default_editor_is_defined() {
    assert!(!default_editor().is_empty());
}

#[test]
fn explicit_storage_path_wins() {
    let path = resolve_storage_path(Some("/tmp/ledger-test.json".into()));
    assert_eq!(path, std::path::PathBuf::from("/tmp/ledger-test.json"));
}

#[test]
fn session_id_is_trimmed_and_required() {
    assert_eq!(normalize_session_id(" 42 ").unwrap(), SessionId::new("42"));
    assert!(matches!(
        normalize_session_id("   "),
        Err(CliError::EmptySessionId)
    ));
}

#[test]
fn affirmative_answers() {
    assert!(is_affirmative("y\n"));
    assert!(is_affirmative(" YES "));
    assert!(!is_affirmative(""));
    assert!(!is_affirmative("nope"));
}

#[test]
fn vote_choice_maps_to_status() {
    assert_eq!(VoteStatus::from(VoteChoice::Yes), VoteStatus::Yes);
    assert_eq!(VoteStatus::from(VoteChoice::Maybe), VoteStatus::Maybe);
    assert_eq!(VoteStatus::from(VoteChoice::No), VoteStatus::No);
}

#[test]
fn missing_backend_is_reported() {
    let error = open_service_with(&LedgerConfig::default()).unwrap_err();
    assert!(matches!(error, CliError::BackendNotConfigured));
}

#[test]
fn partial_backend_config_is_invalid() {
    let config = LedgerConfig {
        supabase_anon_key: Some("anon".to_string()),
        ..LedgerConfig::default()
    };
    assert!(matches!(
        open_service_with(&config),
        Err(CliError::Core(ledger_core::Error::InvalidConfiguration(_)))
    ));
}

#[test]
fn session_lines_mark_aligned_stars() {
    let aligned: Votes = [vote("Armitage", VoteStatus::Yes), vote("Rice", VoteStatus::Yes)]
        .into_iter()
        .collect();
    let hedged: Votes = [vote("Armitage", VoteStatus::Yes), vote("Morgan", VoteStatus::Maybe)]
        .into_iter()
        .collect();
    let lines = format_session_lines(
        &[session("1", "Dunwich", aligned), session("2", "Innsmouth", hedged)],
        false,
    );

    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("yes=2 maybe=0 no=0"));
    assert!(lines[0].ends_with("Stars Aligned"));
    assert!(lines[1].contains("yes=1 maybe=1 no=0"));
    assert!(!lines[1].contains("Stars Aligned"));
}

#[test]
fn list_item_includes_notes_only_when_requested() {
    let mut row = session("7", "Arkham", Votes::new());
    row.notes.push(ledger_core::FieldNote::new("Bring lanterns", "Rice", 5).unwrap());

    let plain = serde_json::to_value(session_to_list_item(&row, false)).unwrap();
    assert!(plain.get("notes").is_none());
    assert_eq!(plain["stars_aligned"], false);

    let detailed = serde_json::to_value(session_to_list_item(&row, true)).unwrap();
    assert_eq!(detailed["notes"][0]["author"], "Rice");
    assert_eq!(detailed["notes"][0]["text"], "Bring lanterns");
}

#[test]
fn case_log_rendering_names_the_editor() {
    let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 0).unwrap();
    let rendered = format_case_log(&CaseLog::new("The cult meets at dawn", "Malone", at));
    assert_eq!(
        rendered,
        "The cult meets at dawn\n\n-- Malone, 2025-01-02 03:04 UTC"
    );
    assert_eq!(format_case_log(&CaseLog::default()), "No entries found.");
}

#[test]
fn change_descriptions() {
    assert_eq!(
        describe_change(&ChangeEvent::SessionDeleted(SessionId::new("9"))),
        "- 9"
    );
    let event = ChangeEvent::CaseLogChanged {
        key: "case_log".to_string(),
        log: CaseLog::default(),
    };
    assert_eq!(describe_change(&event), "# case_log rewritten by someone");
}

#[test]
fn completions_name_the_binary() {
    let script = String::from_utf8(render_completions(CompletionShell::Bash)).unwrap();
    assert!(script.contains("ledger"));
}

#[test]
fn identity_set_and_reset_keep_the_id() {
    let mut identity = IdentityManager::load(MemoryLocalStorage::new()).unwrap();
    let id = identity.id().clone();

    run_identity_set(&mut identity, &["Detective".to_string(), "Malone".to_string()]).unwrap();
    assert_eq!(identity.display_name(), Some("Detective Malone"));

    run_identity_reset(&mut identity).unwrap();
    assert_eq!(identity.display_name(), None);
    assert_eq!(identity.id(), &id);
}

#[tokio::test]
async fn propose_requires_a_name() {
    let service = memory_service();
    let identity = IdentityManager::load(MemoryLocalStorage::new()).unwrap();
    let result = run_propose(&service, &identity, &propose_args("2025-10-31T19:00")).await;
    assert!(matches!(result, Err(CliError::NoIdentity)));
}

#[tokio::test]
async fn propose_rejects_unparseable_dates() {
    let service = memory_service();
    let identity = named_identity("Armitage");
    let result = run_propose(&service, &identity, &propose_args("next full moon")).await;
    assert!(matches!(
        result,
        Err(CliError::Core(ledger_core::Error::InvalidInput(_)))
    ));
    assert!(service.load_sessions().await.unwrap().is_empty());
}

#[tokio::test]
async fn propose_vote_and_note_round_trip_through_backend() {
    let service = memory_service();
    let armitage = named_identity("Armitage");
    let rice = named_identity("Rice");

    let created = run_propose(&service, &armitage, &propose_args("2025-10-31T19:00:00Z"))
        .await
        .unwrap();
    assert_eq!(created.proposer, "Armitage");

    run_vote(&service, &armitage, created.id.as_str(), VoteStatus::Yes)
        .await
        .unwrap();
    let votes = run_vote(&service, &rice, created.id.as_str(), VoteStatus::Yes)
        .await
        .unwrap();
    assert!(votes.consensus_reached());

    run_note(
        &service,
        &rice,
        created.id.as_str(),
        &["Bring".to_string(), "lanterns".to_string()],
    )
    .await
    .unwrap();

    let stored = find_session(&service, created.id.as_str()).await.unwrap();
    assert_eq!(stored.votes.len(), 2);
    assert_eq!(stored.notes.len(), 1);
    assert_eq!(stored.notes[0].text, "Bring lanterns");
    assert_eq!(stored.notes[0].author, "Rice");
}

#[tokio::test]
async fn revote_overwrites_previous_choice() {
    let service = memory_service();
    let armitage = named_identity("Armitage");
    let created = run_propose(&service, &armitage, &propose_args("2025-10-31T19:00:00Z"))
        .await
        .unwrap();

    run_vote(&service, &armitage, created.id.as_str(), VoteStatus::Yes)
        .await
        .unwrap();
    let votes = run_vote(&service, &armitage, created.id.as_str(), VoteStatus::No)
        .await
        .unwrap();

    assert_eq!(votes.len(), 1);
    assert_eq!(votes.get("Armitage").unwrap().status, VoteStatus::No);
}

#[tokio::test]
async fn vote_on_unknown_session_is_not_found() {
    let service = memory_service();
    let identity = named_identity("Armitage");
    let result = run_vote(&service, &identity, "404", VoteStatus::Yes).await;
    assert!(matches!(result, Err(CliError::SessionNotFound(id)) if id == "404"));
}

#[tokio::test]
async fn log_set_stamps_editor() {
    let service = memory_service();
    let identity = named_identity("Olmstead");
    let saved = run_log_set(&service, &identity, &["Gilman".to_string(), "House".to_string()])
        .await
        .unwrap();

    assert_eq!(saved.text, "Gilman House");
    assert_eq!(saved.last_edited_by, "Olmstead");
    assert_eq!(service.load_case_log().await.unwrap(), Some(saved));
}

#[tokio::test]
async fn export_writes_ics_file() {
    let service = memory_service();
    let identity = named_identity("Armitage");
    let created = run_propose(&service, &identity, &propose_args("2025-10-31T19:00:00Z"))
        .await
        .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("ritual.ics");

    let written = run_export(&service, created.id.as_str(), Some(&target))
        .await
        .unwrap();

    assert_eq!(written, target);
    let contents = std::fs::read_to_string(&target).unwrap();
    assert!(contents.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(contents.contains("SUMMARY:The Colour Out of Space\r\n"));
    assert!(contents.contains("DTSTART:20251031T190000Z\r\n"));
}
