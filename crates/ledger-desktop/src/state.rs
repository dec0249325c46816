//! Application state management
//!
//! Global state accessible via Dioxus context providers.

use dioxus::prelude::*;
use ledger_core::config::LedgerConfig;
use ledger_core::identity::{FileLocalStorage, IdentityManager};
use ledger_core::models::Participant;
use ledger_core::service::LedgerService;
use ledger_core::state::LedgerState;
use ledger_core::view::{ViewState, TOAST_DURATION};

/// Identity persisted in the platform data directory
pub type DesktopIdentity = IdentityManager<FileLocalStorage>;

/// Global application state
#[derive(Clone, Copy)]
pub struct AppState {
    /// Cached sessions and case log
    pub ledger: Signal<LedgerState>,
    /// Drafts, modal selection, toast
    pub view: Signal<ViewState>,
    /// Local identity; `None` if local storage could not be read
    pub identity: Signal<Option<DesktopIdentity>>,
    /// Backend access, set once the root component has started
    pub service: Signal<Option<LedgerService>>,
    pub config: Signal<LedgerConfig>,
    /// A session is being uploaded/inserted
    pub creating_session: Signal<bool>,
    /// A case log save is in flight
    pub saving_case_log: Signal<bool>,
}

impl AppState {
    /// Current participant, once a name has been chosen
    #[must_use]
    pub fn participant(&self) -> Option<Participant> {
        self.identity
            .read()
            .as_ref()
            .and_then(IdentityManager::participant)
    }

    #[must_use]
    pub fn service(&self) -> Option<LedgerService> {
        self.service.read().clone()
    }

    /// Show a toast and hide it again after [`TOAST_DURATION`].
    pub fn show_toast(&mut self, message: impl Into<String>) {
        let ticket = self.view.write().show_toast(message);
        let mut view = self.view;
        spawn(async move {
            tokio::time::sleep(TOAST_DURATION).await;
            view.write().dismiss_toast(ticket);
        });
    }
}
