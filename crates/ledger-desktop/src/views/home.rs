//! Home view - the single ledger screen

use dioxus::prelude::*;

use crate::components::{
    CaseLogPanel, DeleteModal, IdentityGate, InvestigatorBar, SessionForm, SessionList, Toast,
};
use crate::state::AppState;
use crate::theme::{DISPLAY_FONT, ELDRITCH_PALETTE, TYPEWRITER_FONT};

/// Identity unavailable, gate, or the full ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    NoStorage,
    NeedsName,
    Ready,
}

#[component]
pub fn Home() -> Element {
    let state = use_context::<AppState>();
    let colors = ELDRITCH_PALETTE;
    let stage = match state.identity.read().as_ref() {
        None => Stage::NoStorage,
        Some(identity) if identity.needs_name() => Stage::NeedsName,
        Some(_) => Stage::Ready,
    };

    rsx! {
        div {
            style: "max-width: 880px; margin: 0 auto; padding: 32px 16px 64px;",
            header {
                style: "text-align: center; margin-bottom: 40px;",
                h1 {
                    style: "font-family: {DISPLAY_FONT}; color: {colors.text_primary}; font-size: 40px; letter-spacing: 0.08em; margin: 0;",
                    "The Investigator's Ledger"
                }
                p {
                    style: "font-family: {TYPEWRITER_FONT}; color: {colors.text_muted}; font-style: italic; margin: 12px 0 0;",
                    "The oldest and strongest emotion of mankind is fear... or trying to schedule a Friday night."
                }
            }

            {match stage {
                Stage::NoStorage => rsx! {
                    p {
                        style: "text-align: center; font-family: {TYPEWRITER_FONT}; color: {colors.blood_bright};",
                        "The ledger could not find its local archive. Check the logs and restart."
                    }
                },
                Stage::NeedsName => rsx! { IdentityGate {} },
                Stage::Ready => rsx! {
                    div {
                        style: "display: flex; flex-direction: column; gap: 32px;",
                        InvestigatorBar {}
                        CaseLogPanel {}
                        SessionForm {}
                        SessionList {}
                    }
                    DeleteModal {}
                },
            }}

            footer {
                style: "margin-top: 64px; text-align: center; font-family: {TYPEWRITER_FONT}; font-size: 11px; color: {colors.text_muted}; opacity: 0.6;",
                "Ph'nglui mglw'nafh Cthulhu R'lyeh wgah'nagl fhtagn"
            }
        }
        Toast {}
    }
}
