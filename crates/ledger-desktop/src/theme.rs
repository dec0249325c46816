//! Eldritch palette and fonts for the desktop app

use ledger_core::VoteStatus;

/// Color palette for the application
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub bg_page: &'static str,
    pub bg_panel: &'static str,
    pub bg_inset: &'static str,
    pub bg_paper: &'static str,
    pub text_primary: &'static str,
    pub text_secondary: &'static str,
    pub text_muted: &'static str,
    pub text_ink: &'static str,
    pub border: &'static str,
    pub border_strong: &'static str,
    pub accent: &'static str,
    pub accent_glow: &'static str,
    pub blood: &'static str,
    pub blood_bright: &'static str,
    pub toast_bg: &'static str,
}

/// The only palette: aged paper on a dark study
pub const ELDRITCH_PALETTE: ColorPalette = ColorPalette {
    bg_page: "#1a1814",
    bg_panel: "#25221e",
    bg_inset: "#1c1917",
    bg_paper: "#e7e5e4",
    text_primary: "#fef3c7",
    text_secondary: "#a8a29e",
    text_muted: "#57534e",
    text_ink: "#292524",
    border: "#292524",
    border_strong: "#44403c",
    accent: "#d97706",
    accent_glow: "rgba(217, 119, 6, 0.15)",
    blood: "#7f1d1d",
    blood_bright: "#b91c1c",
    toast_bg: "#7f1d1d",
};

/// Headings
pub const DISPLAY_FONT: &str = "'Cinzel', Georgia, serif";
/// Body text
pub const TYPEWRITER_FONT: &str = "'Special Elite', 'Courier New', monospace";

/// Border, background, and text colors for a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteColors {
    pub border: &'static str,
    pub background: &'static str,
    pub text: &'static str,
}

#[must_use]
pub const fn vote_colors(status: VoteStatus) -> VoteColors {
    match status {
        VoteStatus::Yes => VoteColors {
            border: "#15803d",
            background: "rgba(20, 83, 45, 0.3)",
            text: "#4ade80",
        },
        VoteStatus::Maybe => VoteColors {
            border: "#a16207",
            background: "rgba(113, 63, 18, 0.3)",
            text: "#facc15",
        },
        VoteStatus::No => VoteColors {
            border: "#b91c1c",
            background: "rgba(127, 29, 29, 0.3)",
            text: "#f87171",
        },
    }
}

/// Button label for a vote choice
#[must_use]
pub const fn vote_label(status: VoteStatus) -> &'static str {
    match status {
        VoteStatus::Yes => "Available",
        VoteStatus::Maybe => "Uncertain",
        VoteStatus::No => "Insane",
    }
}
