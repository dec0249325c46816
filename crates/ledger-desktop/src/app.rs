//! Main application component

use dioxus::prelude::*;
use ledger_core::identity::{FileLocalStorage, IdentityManager};
use ledger_core::service::LedgerService;
use ledger_core::state::LedgerState;
use ledger_core::view::ViewState;

use crate::bootstrap_config::resolve_runtime_config;
use crate::state::{AppState, DesktopIdentity};
use crate::theme::{ELDRITCH_PALETTE, TYPEWRITER_FONT};
use crate::views::Home;

const FONTS_URL: &str =
    "https://fonts.googleapis.com/css2?family=Cinzel:wght@400;700&family=Special+Elite&display=swap";

fn load_identity() -> Option<DesktopIdentity> {
    let storage = FileLocalStorage::open_default();
    tracing::debug!("Local identity stored at {}", storage.path().display());
    match IdentityManager::load(storage) {
        Ok(identity) => Some(identity),
        Err(e) => {
            tracing::error!("Failed to load local identity: {}", e);
            None
        }
    }
}

fn build_service(state: AppState) -> LedgerService {
    match LedgerService::from_config(&state.config.read()) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!("Invalid backend configuration, running local-only: {}", e);
            LedgerService::local_only()
        }
    }
}

/// Root application component
#[component]
pub fn App() -> Element {
    let ledger = use_signal(LedgerState::new);
    let view = use_signal(ViewState::new);
    let identity = use_signal(load_identity);
    let service = use_signal(|| None);
    let config = use_signal(resolve_runtime_config);
    let creating_session = use_signal(|| false);
    let saving_case_log = use_signal(|| false);

    let state = use_context_provider(|| AppState {
        ledger,
        view,
        identity,
        service,
        config,
        creating_session,
        saving_case_log,
    });

    // Subscribe before the first fetch so nothing committed in between is
    // missed. The feed lives as long as this future; unmounting drops it,
    // which stops the socket.
    use_future(move || async move {
        let mut state = state;
        let ledger_service = build_service(state);
        state.service.set(Some(ledger_service.clone()));

        let feed = match ledger_service.subscribe_to_changes().await {
            Ok(feed) => Some(feed),
            Err(e) => {
                tracing::error!("Failed to subscribe to live changes: {}", e);
                None
            }
        };

        let sessions = ledger_service.load_sessions().await;
        if state.ledger.write().absorb_sessions(sessions) {
            tracing::info!("Loaded {} sessions", state.ledger.read().sessions().len());
        }
        let case_log = ledger_service.load_case_log().await;
        state.ledger.write().absorb_case_log(case_log);

        let Some(mut feed) = feed else {
            return;
        };
        while let Some(event) = feed.next().await {
            tracing::debug!("Live change: {:?}", event);
            if !state.ledger.write().apply_change(event) {
                tracing::debug!("Live change did not alter the cached ledger");
            }
        }
        tracing::warn!("Live feed ended; showing cached data until restart");
        feed.close().await;
    });

    let colors = ELDRITCH_PALETTE;

    rsx! {
        document::Link { rel: "stylesheet", href: FONTS_URL }
        document::Title { "The Investigator's Ledger" }

        div {
            style: "
                min-height: 100vh;
                background: {colors.bg_page};
                color: {colors.text_secondary};
                font-family: {TYPEWRITER_FONT};
            ",
            Home {}
        }
    }
}
