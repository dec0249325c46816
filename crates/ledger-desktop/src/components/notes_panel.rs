//! Collapsible field notes for one session

use dioxus::prelude::*;
use ledger_core::models::now_millis;
use ledger_core::{FieldNote, SessionId};

use crate::state::AppState;
use crate::theme::{ELDRITCH_PALETTE, TYPEWRITER_FONT};

#[component]
pub fn NotesPanel(session_id: SessionId, notes: Vec<FieldNote>) -> Element {
    let mut state = use_context::<AppState>();
    let colors = ELDRITCH_PALETTE;
    let expanded = state.view.read().notes_expanded(&session_id);
    let draft = state.view.read().note_draft(&session_id).to_string();
    let count = notes.len();

    let id = session_id.clone();
    let submit = move || {
        let Some(participant) = state.participant() else {
            return;
        };
        let Some(text) = state.view.read().submittable_note(&id) else {
            return;
        };
        let Some(notes) =
            state
                .ledger
                .write()
                .append_note(&id, &participant, &text, now_millis())
        else {
            return;
        };
        state.view.write().clear_note_draft(&id);
        let Some(service) = state.service() else {
            return;
        };
        let id = id.clone();
        spawn(async move {
            if let Err(error) = service.update_notes(&id, &notes).await {
                tracing::error!("Failed to save notes on session {}: {}", id, error);
            }
        });
    };

    let mut submit_on_enter = submit.clone();
    let mut submit_on_click = submit;
    let toggle_id = session_id.clone();
    let input_id = session_id.clone();

    rsx! {
        div {
            style: "margin-top: 16px;",
            button {
                r#type: "button",
                style: "background: none; border: none; padding: 0; color: {colors.text_secondary}; font-family: {TYPEWRITER_FONT}; font-size: 12px; cursor: pointer;",
                onclick: move |_| state.view.write().toggle_notes(&toggle_id),
                if expanded { "▾ " } else { "▸ " }
                "Notes ({count})"
            }
            if expanded {
                div {
                    style: "margin-top: 8px; background: {colors.bg_inset}; border: 1px solid {colors.border}; padding: 12px;",
                    if notes.is_empty() {
                        p {
                            style: "margin: 0 0 8px; font-family: {TYPEWRITER_FONT}; font-style: italic; font-size: 12px; color: {colors.text_muted};",
                            "No notes inscribed yet."
                        }
                    } else {
                        ul {
                            style: "list-style: none; margin: 0 0 8px; padding: 0;",
                            for (index, note) in notes.iter().enumerate() {
                                li {
                                    key: "{index}",
                                    style: "margin-bottom: 6px; font-family: {TYPEWRITER_FONT}; font-size: 13px;",
                                    span { style: "color: {colors.accent};", "{note.author}: " }
                                    span { style: "color: {colors.text_secondary};", "{note.text}" }
                                }
                            }
                        }
                    }
                    div {
                        style: "display: flex; gap: 8px;",
                        input {
                            r#type: "text",
                            value: "{draft}",
                            placeholder: "Add a field note...",
                            style: "
                                flex: 1;
                                background: {colors.bg_panel};
                                border: 1px solid {colors.border_strong};
                                padding: 6px 8px;
                                color: {colors.text_primary};
                                font-family: {TYPEWRITER_FONT};
                                font-size: 13px;
                            ",
                            oninput: move |evt| state.view.write().set_note_draft(&input_id, evt.value()),
                            onkeydown: move |evt| {
                                if evt.key() == Key::Enter {
                                    submit_on_enter();
                                }
                            },
                        }
                        button {
                            r#type: "button",
                            title: "Inscribe note",
                            style: "background: {colors.blood}; border: none; color: {colors.text_primary}; padding: 6px 10px; cursor: pointer;",
                            onclick: move |_| submit_on_click(),
                            "➤"
                        }
                    }
                }
            }
        }
    }
}
