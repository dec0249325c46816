//! Shared case log: read view and single-editor draft

use dioxus::prelude::*;

use crate::state::AppState;
use crate::theme::{DISPLAY_FONT, ELDRITCH_PALETTE, TYPEWRITER_FONT};

#[component]
pub fn CaseLogPanel() -> Element {
    let mut state = use_context::<AppState>();
    let colors = ELDRITCH_PALETTE;
    let log = state.ledger.read().case_log().clone();
    let draft = state.view.read().case_log_draft().map(str::to_string);
    let saving = *state.saving_case_log.read();

    let begin_edit = move |_: MouseEvent| {
        let committed = state.ledger.read().case_log().text.clone();
        state.view.write().begin_case_log_edit(&committed);
    };

    let save = move |_: MouseEvent| {
        if *state.saving_case_log.read() {
            return;
        }
        let Some(text) = state.view.read().case_log_draft().map(str::to_string) else {
            return;
        };
        let Some(editor) = state.participant() else {
            return;
        };
        let Some(service) = state.service() else {
            return;
        };

        state.saving_case_log.set(true);
        spawn(async move {
            let saved = match service.save_case_log(&text, &editor.name).await {
                Ok(saved) => {
                    state.ledger.write().set_case_log(saved);
                    true
                }
                Err(error) => {
                    tracing::error!("Failed to save case log: {}", error);
                    false
                }
            };
            let failure = state.view.write().settle_case_log_save(saved);
            if let Some(message) = failure {
                state.show_toast(message);
            }
            state.saving_case_log.set(false);
        });
    };

    let footer = if log.last_edited_by.is_empty() {
        None
    } else {
        let when = log
            .updated_at
            .map(|at| {
                at.with_timezone(&chrono::Local)
                    .format(" on %b %-d, %H:%M")
                    .to_string()
            })
            .unwrap_or_default();
        Some(format!("Last entry by {}{when}", log.last_edited_by))
    };

    rsx! {
        section {
            style: "
                position: relative;
                background: {colors.bg_paper};
                color: {colors.text_ink};
                padding: 24px;
                border-radius: 2px;
                box-shadow: 0 10px 25px rgba(0, 0, 0, 0.5);
            ",
            div {
                style: "display: flex; justify-content: space-between; align-items: center; margin-bottom: 16px; border-bottom: 2px solid {colors.text_ink}; padding-bottom: 8px;",
                div {
                    span {
                        style: "
                            display: inline-block;
                            border: 2px solid {colors.blood_bright};
                            color: {colors.blood_bright};
                            font-family: {TYPEWRITER_FONT};
                            font-size: 11px;
                            text-transform: uppercase;
                            padding: 2px 6px;
                            transform: rotate(-3deg);
                            margin-right: 12px;
                        ",
                        "Confidential"
                    }
                    h2 {
                        style: "display: inline; font-family: {DISPLAY_FONT}; font-size: 20px; margin: 0;",
                        "Case Log"
                    }
                }
                if draft.is_some() {
                    div {
                        style: "display: flex; gap: 8px;",
                        button {
                            r#type: "button",
                            title: "Cancel",
                            style: "background: none; border: 1px solid {colors.text_ink}; padding: 4px 10px; cursor: pointer;",
                            onclick: move |_| state.view.write().discard_case_log_edit(),
                            "✕"
                        }
                        button {
                            r#type: "button",
                            title: "Save",
                            disabled: saving,
                            style: "background: {colors.text_ink}; color: {colors.bg_paper}; border: none; padding: 4px 10px; cursor: pointer;",
                            onclick: save,
                            if saving { "…" } else { "✓" }
                        }
                    }
                } else {
                    button {
                        r#type: "button",
                        title: "Edit",
                        style: "background: none; border: none; font-size: 18px; cursor: pointer;",
                        onclick: begin_edit,
                        "✎"
                    }
                }
            }
            if let Some(text) = &draft {
                textarea {
                    value: "{text}",
                    placeholder: "Enter investigation details...",
                    rows: "8",
                    style: "
                        width: 100%;
                        box-sizing: border-box;
                        background: rgba(255, 255, 255, 0.5);
                        border: 1px dashed {colors.text_muted};
                        padding: 12px;
                        font-family: {TYPEWRITER_FONT};
                        font-size: 14px;
                        color: {colors.text_ink};
                        resize: vertical;
                    ",
                    oninput: move |evt| state.view.write().set_case_log_draft(evt.value()),
                }
            } else if log.text.trim().is_empty() {
                p {
                    style: "font-family: {TYPEWRITER_FONT}; font-style: italic; color: {colors.text_muted}; margin: 0;",
                    "No entries found. Click the pen to document..."
                }
            } else {
                p {
                    style: "font-family: {TYPEWRITER_FONT}; white-space: pre-wrap; line-height: 1.6; margin: 0;",
                    "{log.text}"
                }
            }
            if let Some(footer) = footer {
                p {
                    style: "margin: 16px 0 0; text-align: right; font-size: 11px; font-family: {TYPEWRITER_FONT}; color: {colors.text_muted};",
                    "{footer}"
                }
            }
        }
    }
}
