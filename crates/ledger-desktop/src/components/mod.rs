//! UI Components
//!
//! Reusable UI components for the desktop application.

mod case_log_panel;
mod delete_modal;
mod eldritch_button;
mod identity_gate;
mod investigator_bar;
mod notes_panel;
mod session_card;
mod session_form;
mod session_list;
mod toast;

pub use case_log_panel::CaseLogPanel;
pub use delete_modal::DeleteModal;
pub use eldritch_button::EldritchButton;
pub use identity_gate::IdentityGate;
pub use investigator_bar::InvestigatorBar;
pub use notes_panel::NotesPanel;
pub use session_card::SessionCard;
pub use session_form::SessionForm;
pub use session_list::SessionList;
pub use toast::Toast;
