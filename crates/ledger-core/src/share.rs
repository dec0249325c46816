//! Invitation text used by the share action.

/// Title passed to the native share sheet
pub const SHARE_TITLE: &str = "Investigator's Ledger";
/// Message passed to the native share sheet
pub const SHARE_TEXT: &str = "The stars are aligning... Join the ritual.";
/// Toast shown after falling back to the clipboard
pub const CLIPBOARD_TOAST: &str = "Summoning spell copied to clipboard!";

/// Clipboard fallback text: the share message followed by the app URL.
#[must_use]
pub fn share_clipboard_text(url: &str) -> String {
    format!("{SHARE_TEXT} {}", url.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipboard_text_appends_url() {
        assert_eq!(
            share_clipboard_text(" https://ledger.example "),
            "The stars are aligning... Join the ritual. https://ledger.example"
        );
    }
}
