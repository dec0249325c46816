//! Transient message at the bottom of the window

use dioxus::prelude::*;

use crate::state::AppState;
use crate::theme::{ELDRITCH_PALETTE, TYPEWRITER_FONT};

#[component]
pub fn Toast() -> Element {
    let state = use_context::<AppState>();
    let colors = ELDRITCH_PALETTE;
    let Some(message) = state.view.read().toast().map(|toast| toast.message.clone()) else {
        return rsx! {};
    };

    rsx! {
        div {
            role: "status",
            style: "
                position: fixed;
                bottom: 32px;
                left: 50%;
                transform: translateX(-50%);
                z-index: 60;
                background: {colors.toast_bg};
                color: {colors.text_primary};
                border: 1px solid {colors.blood_bright};
                padding: 12px 24px;
                font-family: {TYPEWRITER_FONT};
                box-shadow: 0 8px 24px rgba(0, 0, 0, 0.6);
            ",
            "{message}"
        }
    }
}
