//! Application services
//!
//! Platform glue for sharing, file dialogs, and calendar export.

mod calendar_export;
mod image_picker;
mod share;

pub use calendar_export::{save_calendar_file, CalendarExportError};
pub use image_picker::pick_session_image;
pub use share::{share_invitation, ShareOutcome};
