//! Identity gate shown until a display name is chosen

use dioxus::prelude::*;

use super::EldritchButton;
use crate::state::AppState;
use crate::theme::{DISPLAY_FONT, ELDRITCH_PALETTE, TYPEWRITER_FONT};

#[component]
pub fn IdentityGate() -> Element {
    let mut state = use_context::<AppState>();
    let colors = ELDRITCH_PALETTE;
    let name_input = state.view.read().name_input.clone();
    let can_submit = !name_input.trim().is_empty();

    let mut submit = move || {
        let name = state.view.read().name_input.clone();
        let result = match state.identity.write().as_mut() {
            Some(identity) => identity.submit_name(&name),
            None => return,
        };
        match result {
            Ok(participant) => {
                tracing::info!("Signed the book as {}", participant.name);
                state.view.write().name_input.clear();
            }
            Err(error) => tracing::warn!("Rejected display name: {}", error),
        }
    };

    rsx! {
        div {
            style: "
                position: fixed;
                inset: 0;
                z-index: 50;
                background: rgba(0, 0, 0, 0.9);
                display: flex;
                align-items: center;
                justify-content: center;
                padding: 16px;
            ",
            div {
                style: "
                    background: {colors.bg_panel};
                    border: 1px solid {colors.border_strong};
                    padding: 32px;
                    max-width: 420px;
                    width: 100%;
                    border-radius: 2px;
                ",
                h2 {
                    style: "font-family: {DISPLAY_FONT}; color: {colors.text_primary}; text-align: center; margin: 0 0 24px;",
                    "Identify Yourself"
                }
                label {
                    style: "display: block; font-family: {TYPEWRITER_FONT}; color: {colors.text_secondary}; font-size: 14px; margin-bottom: 8px;",
                    "Investigator Name"
                }
                input {
                    r#type: "text",
                    value: "{name_input}",
                    placeholder: "e.g. Detective Malone",
                    autofocus: true,
                    style: "
                        width: 100%;
                        box-sizing: border-box;
                        background: {colors.bg_inset};
                        border: 1px solid {colors.border_strong};
                        padding: 12px;
                        color: {colors.text_primary};
                        font-family: {TYPEWRITER_FONT};
                        font-size: 16px;
                        margin-bottom: 24px;
                    ",
                    oninput: move |evt| state.view.write().name_input = evt.value(),
                    onkeydown: move |evt| {
                        if evt.key() == Key::Enter {
                            submit();
                        }
                    },
                }
                EldritchButton {
                    disabled: !can_submit,
                    onclick: move |_| submit(),
                    "Sign the Book"
                }
            }
        }
    }
}
