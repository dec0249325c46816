//! Current investigator, invitation sharing, and identity change

use dioxus::prelude::*;
use ledger_core::share::CLIPBOARD_TOAST;

use crate::services::{share_invitation, ShareOutcome};
use crate::state::AppState;
use crate::theme::{ELDRITCH_PALETTE, TYPEWRITER_FONT};

#[component]
pub fn InvestigatorBar() -> Element {
    let mut state = use_context::<AppState>();
    let colors = ELDRITCH_PALETTE;
    let name = state
        .participant()
        .map(|participant| participant.name)
        .unwrap_or_default();
    let local_only = state
        .service
        .read()
        .as_ref()
        .is_some_and(ledger_core::service::LedgerService::is_local_only);

    let share = move |_: MouseEvent| {
        let Some(url) = state.config.read().app_url() else {
            state.show_toast("No summoning address is configured.");
            return;
        };
        spawn(async move {
            match share_invitation(&url).await {
                ShareOutcome::Copied => state.show_toast(CLIPBOARD_TOAST),
                ShareOutcome::Shared | ShareOutcome::Cancelled => {}
                ShareOutcome::Failed { error } => {
                    tracing::warn!("Sharing failed: {}", error);
                }
            }
        });
    };

    let change_identity = move |_: MouseEvent| {
        let result = match state.identity.write().as_mut() {
            Some(identity) => identity.change_identity(),
            None => return,
        };
        if let Err(error) = result {
            tracing::error!("Failed to forget display name: {}", error);
        }
    };

    rsx! {
        div {
            style: "
                display: flex;
                justify-content: space-between;
                align-items: center;
                gap: 16px;
                background: {colors.bg_panel};
                padding: 16px;
                border: 1px solid {colors.border};
                border-radius: 2px;
            ",
            div {
                p {
                    style: "margin: 0; font-size: 11px; color: {colors.text_muted}; font-family: {TYPEWRITER_FONT}; text-transform: uppercase; letter-spacing: 0.08em;",
                    "Current Investigator"
                }
                p {
                    style: "margin: 0; color: {colors.text_primary}; font-weight: bold;",
                    "{name}"
                }
                if local_only {
                    p {
                        style: "margin: 4px 0 0; font-size: 11px; color: {colors.text_muted}; font-family: {TYPEWRITER_FONT};",
                        "Local-only mode: nothing leaves this machine."
                    }
                }
            }
            div {
                style: "display: flex; align-items: center; gap: 12px;",
                button {
                    r#type: "button",
                    style: "
                        color: {colors.accent};
                        background: rgba(120, 53, 15, 0.1);
                        border: 1px solid rgba(120, 53, 15, 0.5);
                        padding: 8px 16px;
                        font-family: {TYPEWRITER_FONT};
                        cursor: pointer;
                    ",
                    onclick: share,
                    "Summon"
                }
                button {
                    r#type: "button",
                    style: "
                        background: none;
                        border: none;
                        color: {colors.text_muted};
                        text-decoration: underline;
                        font-family: {TYPEWRITER_FONT};
                        font-size: 12px;
                        cursor: pointer;
                    ",
                    onclick: change_identity,
                    "Change Identity"
                }
            }
        }
    }
}
