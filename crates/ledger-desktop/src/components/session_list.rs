//! Pending sessions, soonest first

use dioxus::prelude::*;

use super::SessionCard;
use crate::state::AppState;
use crate::theme::{DISPLAY_FONT, ELDRITCH_PALETTE, TYPEWRITER_FONT};

#[component]
pub fn SessionList() -> Element {
    let state = use_context::<AppState>();
    let colors = ELDRITCH_PALETTE;
    let sessions = state.ledger.read().sessions().to_vec();

    rsx! {
        section {
            h2 {
                style: "font-family: {DISPLAY_FONT}; color: {colors.text_secondary}; font-size: 18px; border-bottom: 1px solid {colors.border}; padding-bottom: 8px;",
                "Pending Rituals"
            }
            if sessions.is_empty() {
                p {
                    style: "
                        text-align: center;
                        padding: 48px 16px;
                        font-family: {TYPEWRITER_FONT};
                        font-style: italic;
                        color: {colors.text_muted};
                        border: 1px dashed {colors.border_strong};
                    ",
                    "No dates have been inscribed yet. The void is silent."
                }
            } else {
                div {
                    style: "display: flex; flex-direction: column; gap: 24px;",
                    for session in sessions.iter() {
                        SessionCard { key: "{session.id}", session: session.clone() }
                    }
                }
            }
        }
    }
}
