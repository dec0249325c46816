//! Proposal form for a new session

use dioxus::prelude::*;

use super::EldritchButton;
use crate::services::pick_session_image;
use crate::state::AppState;
use crate::theme::{DISPLAY_FONT, ELDRITCH_PALETTE, TYPEWRITER_FONT};

#[component]
pub fn SessionForm() -> Element {
    let mut state = use_context::<AppState>();
    let colors = ELDRITCH_PALETTE;
    let form = state.view.read().form.clone();
    let creating = *state.creating_session.read();
    let can_submit = form.can_submit() && !creating;
    let image_label = form
        .image
        .as_ref()
        .map_or_else(|| "No file selected".to_string(), |image| image.file_name.clone());

    let choose_image = move |_: MouseEvent| {
        spawn(async move {
            if let Some(image) = pick_session_image().await {
                state.view.write().form.image = Some(image);
            }
        });
    };

    let submit = move |_: MouseEvent| {
        if *state.creating_session.read() {
            return;
        }
        let form = state.view.read().form.clone();
        if !form.can_submit() {
            return;
        }
        let draft = match form.draft() {
            Ok(draft) => draft,
            Err(error) => {
                tracing::warn!("Rejected session date '{}': {}", form.date, error);
                state.show_toast("The stars do not recognize that date.");
                return;
            }
        };
        let Some(proposer) = state.participant() else {
            return;
        };
        let Some(service) = state.service() else {
            return;
        };

        state.creating_session.set(true);
        spawn(async move {
            match service
                .create_session(&draft, &proposer, form.image.as_ref())
                .await
            {
                Ok(session) => {
                    state.ledger.write().merge_session(session);
                    state.view.write().form.reset();
                }
                Err(error) => state.show_toast(error.toast_message()),
            }
            state.creating_session.set(false);
        });
    };

    let label_style = format!(
        "display: block; font-family: {TYPEWRITER_FONT}; font-size: 12px; color: {}; text-transform: uppercase; letter-spacing: 0.08em; margin-bottom: 6px;",
        colors.text_secondary
    );
    let input_style = format!(
        "width: 100%; box-sizing: border-box; background: {}; border: 1px solid {}; padding: 10px; color: {}; font-family: {TYPEWRITER_FONT}; color-scheme: dark;",
        colors.bg_inset, colors.border_strong, colors.text_primary
    );

    rsx! {
        section {
            style: "
                background: {colors.bg_panel};
                border: 1px solid {colors.border};
                padding: 24px;
                border-radius: 2px;
            ",
            h2 {
                style: "font-family: {DISPLAY_FONT}; color: {colors.text_primary}; margin: 0 0 20px; font-size: 20px;",
                "Propose a Gathering"
            }
            div {
                style: "display: grid; grid-template-columns: 1fr 1fr; gap: 16px;",
                div {
                    label { style: "{label_style}", "Scenario / Title" }
                    input {
                        r#type: "text",
                        value: "{form.title}",
                        placeholder: "e.g. The Haunting",
                        style: "{input_style}",
                        oninput: move |evt| state.view.write().form.title = evt.value(),
                    }
                }
                div {
                    label { style: "{label_style}", "Date & Time" }
                    input {
                        r#type: "datetime-local",
                        value: "{form.date}",
                        style: "{input_style}",
                        oninput: move |evt| state.view.write().form.date = evt.value(),
                    }
                }
                div {
                    label { style: "{label_style}", "Location" }
                    input {
                        r#type: "text",
                        value: "{form.location}",
                        placeholder: "e.g. John's House / Discord",
                        style: "{input_style}",
                        oninput: move |evt| state.view.write().form.location = evt.value(),
                    }
                }
                div {
                    label { style: "{label_style}", "Evidence" }
                    div {
                        style: "display: flex; align-items: center; gap: 12px;",
                        button {
                            r#type: "button",
                            style: "
                                background: {colors.bg_inset};
                                border: 1px solid {colors.border_strong};
                                color: {colors.text_secondary};
                                padding: 8px 12px;
                                font-family: {TYPEWRITER_FONT};
                                cursor: pointer;
                            ",
                            onclick: choose_image,
                            "Choose image"
                        }
                        span {
                            style: "font-family: {TYPEWRITER_FONT}; font-size: 12px; color: {colors.text_muted}; overflow: hidden; text-overflow: ellipsis; white-space: nowrap;",
                            "{image_label}"
                        }
                    }
                }
            }
            div {
                style: "margin-top: 20px;",
                EldritchButton {
                    disabled: !can_submit,
                    onclick: submit,
                    if creating { "Inscribing..." } else { "Inscribe Date" }
                }
            }
        }
    }
}
