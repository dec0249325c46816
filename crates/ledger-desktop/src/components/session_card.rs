//! A proposed session: details, voting, tally, and notes

use dioxus::prelude::*;
use ledger_core::models::now_millis;
use ledger_core::{Session, VoteStatus};

use super::NotesPanel;
use crate::services::save_calendar_file;
use crate::state::AppState;
use crate::theme::{vote_colors, vote_label, DISPLAY_FONT, ELDRITCH_PALETTE, TYPEWRITER_FONT};

const VOTE_CHOICES: [VoteStatus; 3] = [VoteStatus::Yes, VoteStatus::Maybe, VoteStatus::No];

#[component]
pub fn SessionCard(session: Session) -> Element {
    let mut state = use_context::<AppState>();
    let colors = ELDRITCH_PALETTE;
    let participant = state.participant();
    let aligned = session.votes.consensus_reached();
    let local_date = session.date.with_timezone(&chrono::Local);
    let day_label = local_date.format("%A, %B %-d").to_string();
    let time_label = local_date.format("%H:%M").to_string();
    let own_vote = participant
        .as_ref()
        .and_then(|participant| session.votes.get(&participant.name))
        .map(|vote| vote.status);
    let voter_name = participant
        .as_ref()
        .map(|participant| participant.name.clone())
        .unwrap_or_default();
    let votes: Vec<_> = session.votes.iter().cloned().collect();
    let (border, shadow) = if aligned {
        (colors.accent, format!("0 0 24px {}", colors.accent_glow))
    } else {
        (colors.border, "0 4px 12px rgba(0, 0, 0, 0.4)".to_string())
    };

    let session_id = session.id.clone();
    let cast_vote = move |status: VoteStatus| {
        let Some(participant) = state.participant() else {
            return;
        };
        let Some(votes) = state.ledger.write().record_vote(
            &session_id,
            &participant,
            status,
            now_millis(),
        ) else {
            return;
        };
        let Some(service) = state.service() else {
            return;
        };
        let id = session_id.clone();
        spawn(async move {
            if let Err(error) = service.update_votes(&id, &votes).await {
                tracing::error!("Failed to record vote on session {}: {}", id, error);
            }
        });
    };

    let delete_id = session.id.clone();
    let export_session = session.clone();

    rsx! {
        article {
            style: "
                position: relative;
                background: {colors.bg_panel};
                border: 1px solid {border};
                box-shadow: {shadow};
                border-radius: 2px;
                overflow: hidden;
            ",
            if session.has_image() {
                if session.has_web_image() {
                    img {
                        src: "{session.image_url}",
                        alt: "{session.title}",
                        style: "display: block; width: 100%; height: 180px; object-fit: cover; filter: sepia(0.6) contrast(1.1);",
                    }
                } else {
                    div {
                        style: "padding: 8px 16px; font-family: {TYPEWRITER_FONT}; font-size: 11px; color: {colors.text_muted}; border-bottom: 1px dashed {colors.border_strong};",
                        "Evidence held in the local archive"
                    }
                }
            }
            div {
                style: "padding: 20px;",
                div {
                    style: "display: flex; justify-content: space-between; align-items: flex-start; gap: 12px;",
                    div {
                        p {
                            style: "margin: 0; font-family: {TYPEWRITER_FONT}; color: {colors.accent}; font-size: 13px;",
                            "{day_label} · {time_label}"
                        }
                        h3 {
                            style: "margin: 4px 0; font-family: {DISPLAY_FONT}; color: {colors.text_primary}; font-size: 22px;",
                            "{session.title}"
                        }
                        p {
                            style: "margin: 0; font-family: {TYPEWRITER_FONT}; color: {colors.text_secondary}; font-size: 13px;",
                            "{session.location}"
                        }
                        p {
                            style: "margin: 4px 0 0; font-family: {TYPEWRITER_FONT}; color: {colors.text_muted}; font-size: 11px;",
                            "Proposed by {session.proposer}"
                        }
                    }
                    div {
                        style: "display: flex; align-items: center; gap: 8px;",
                        if aligned {
                            span {
                                style: "
                                    border: 1px solid {colors.accent};
                                    color: {colors.accent};
                                    font-family: {DISPLAY_FONT};
                                    font-size: 11px;
                                    padding: 2px 8px;
                                    text-transform: uppercase;
                                    letter-spacing: 0.1em;
                                ",
                                "Stars Aligned"
                            }
                            button {
                                r#type: "button",
                                title: "Add to calendar",
                                style: "background: none; border: none; color: {colors.accent}; cursor: pointer; font-size: 16px;",
                                onclick: move |_| {
                                    let session = export_session.clone();
                                    spawn(async move {
                                        match save_calendar_file(&session).await {
                                            Ok(Some(_)) => state.show_toast("The ritual has been marked in your calendar."),
                                            Ok(None) => {}
                                            Err(error) => {
                                                tracing::error!("Calendar export failed: {}", error);
                                                state.show_toast("The calendar refused the inscription.");
                                            }
                                        }
                                    });
                                },
                                "⬇"
                            }
                        }
                        button {
                            r#type: "button",
                            title: "Burn this page",
                            style: "background: none; border: none; color: {colors.text_muted}; cursor: pointer; font-size: 16px;",
                            onclick: move |_| state.view.write().request_delete(delete_id.clone()),
                            "✕"
                        }
                    }
                }

                div {
                    style: "margin-top: 20px;",
                    p {
                        style: "margin: 0 0 8px; font-family: {TYPEWRITER_FONT}; font-size: 12px; color: {colors.text_secondary};",
                        "Cast your Sign for {voter_name}"
                    }
                    div {
                        style: "display: grid; grid-template-columns: repeat(3, 1fr); gap: 8px;",
                        for status in VOTE_CHOICES {
                            {
                                let mut cast_vote = cast_vote.clone();
                                let palette = vote_colors(status);
                                let selected = own_vote == Some(status);
                                let (background, text) = if selected {
                                    (palette.background, palette.text)
                                } else {
                                    ("transparent", colors.text_muted)
                                };
                                rsx! {
                                    button {
                                        key: "{status}",
                                        r#type: "button",
                                        style: "
                                            padding: 8px;
                                            border: 1px solid {palette.border};
                                            background: {background};
                                            color: {text};
                                            font-family: {TYPEWRITER_FONT};
                                            cursor: pointer;
                                        ",
                                        onclick: move |_| cast_vote(status),
                                        "{vote_label(status)}"
                                    }
                                }
                            }
                        }
                    }
                }

                div {
                    style: "margin-top: 20px; border-top: 1px solid {colors.border}; padding-top: 12px;",
                    p {
                        style: "margin: 0 0 8px; font-family: {TYPEWRITER_FONT}; font-size: 11px; color: {colors.text_muted}; text-transform: uppercase;",
                        "Status"
                    }
                    if votes.is_empty() {
                        p {
                            style: "margin: 0; font-family: {TYPEWRITER_FONT}; font-style: italic; font-size: 12px; color: {colors.text_muted};",
                            "The silence is deafening..."
                        }
                    } else {
                        div {
                            style: "display: flex; flex-wrap: wrap; gap: 6px;",
                            for vote in votes.iter() {
                                {
                                    let palette = vote_colors(vote.status);
                                    let decoration = if vote.status == VoteStatus::No { "line-through" } else { "none" };
                                    rsx! {
                                        span {
                                            key: "{vote.name}",
                                            style: "
                                                border: 1px solid {palette.border};
                                                background: {palette.background};
                                                color: {palette.text};
                                                font-family: {TYPEWRITER_FONT};
                                                font-size: 12px;
                                                padding: 2px 8px;
                                                text-decoration: {decoration};
                                            ",
                                            if vote.status == VoteStatus::Yes { "📜 " }
                                            "{vote.name}"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                NotesPanel { session_id: session.id.clone(), notes: session.notes.clone() }
            }
        }
    }
}
