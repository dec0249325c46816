//! Confirmation before a session is burned

use dioxus::prelude::*;

use crate::state::AppState;
use crate::theme::{DISPLAY_FONT, ELDRITCH_PALETTE, TYPEWRITER_FONT};

#[component]
pub fn DeleteModal() -> Element {
    let mut state = use_context::<AppState>();
    let colors = ELDRITCH_PALETTE;

    if state.view.read().pending_delete().is_none() {
        return rsx! {};
    }

    let confirm = move |_: MouseEvent| {
        let Some(id) = state.view.write().confirm_delete() else {
            return;
        };
        state.ledger.write().remove_session(&id);
        let Some(service) = state.service() else {
            return;
        };
        spawn(async move {
            match service.delete_session(&id).await {
                Ok(()) => tracing::info!("Burned session {}", id),
                Err(error) => tracing::error!("Failed to delete session {}: {}", id, error),
            }
        });
    };

    rsx! {
        div {
            style: "
                position: fixed;
                inset: 0;
                z-index: 40;
                background: rgba(0, 0, 0, 0.85);
                display: flex;
                align-items: center;
                justify-content: center;
                padding: 16px;
            ",
            onclick: move |_| state.view.write().cancel_delete(),
            div {
                style: "
                    background: {colors.bg_panel};
                    border: 1px solid {colors.blood};
                    padding: 32px;
                    max-width: 380px;
                    width: 100%;
                    text-align: center;
                ",
                onclick: move |evt| evt.stop_propagation(),
                h2 {
                    style: "font-family: {DISPLAY_FONT}; color: {colors.blood_bright}; margin: 0 0 12px;",
                    "Burn This Page?"
                }
                p {
                    style: "font-family: {TYPEWRITER_FONT}; font-style: italic; color: {colors.text_secondary}; margin: 0 0 24px;",
                    "\"Fire cleanses all... but what is lost can never be recovered.\""
                }
                div {
                    style: "display: flex; gap: 12px;",
                    button {
                        r#type: "button",
                        style: "flex: 1; padding: 10px; background: none; border: 1px solid {colors.border_strong}; color: {colors.text_secondary}; font-family: {TYPEWRITER_FONT}; cursor: pointer;",
                        onclick: move |_| state.view.write().cancel_delete(),
                        "Spare It"
                    }
                    button {
                        r#type: "button",
                        style: "flex: 1; padding: 10px; background: {colors.blood}; border: 1px solid {colors.blood_bright}; color: {colors.text_primary}; font-family: {DISPLAY_FONT}; cursor: pointer;",
                        onclick: confirm,
                        "Burn It"
                    }
                }
            }
        }
    }
}
