//! Invitation sharing through the webview.
//!
//! Uses the native share sheet when the webview exposes one and otherwise
//! copies the invitation to the clipboard. A failed share is reported as
//! such; it does not fall through to the clipboard.

use dioxus::document;
use ledger_core::share::{share_clipboard_text, SHARE_TEXT, SHARE_TITLE};
use serde::Deserialize;

/// What happened to the invitation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ShareOutcome {
    Shared,
    Cancelled,
    Copied,
    Failed { error: String },
}

/// Build the script run in the webview. Values are embedded as JSON string
/// literals.
fn share_script(url: &str) -> String {
    let literal = |value: &str| {
        serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
    };
    format!(
        r#"
const title = {title};
const text = {text};
const url = {url};
const clipboardText = {clipboard};
if (navigator.share) {{
    try {{
        await navigator.share({{ title, text, url }});
        return {{ outcome: "shared" }};
    }} catch (error) {{
        if (error && error.name === "AbortError") {{
            return {{ outcome: "cancelled" }};
        }}
        return {{ outcome: "failed", error: String(error) }};
    }}
}}
try {{
    await navigator.clipboard.writeText(clipboardText);
    return {{ outcome: "copied" }};
}} catch (error) {{
    return {{ outcome: "failed", error: String(error) }};
}}
"#,
        title = literal(SHARE_TITLE),
        text = literal(SHARE_TEXT),
        url = literal(url),
        clipboard = literal(&share_clipboard_text(url)),
    )
}

/// Share the app URL.
pub async fn share_invitation(url: &str) -> ShareOutcome {
    match document::eval(&share_script(url)).join::<ShareOutcome>().await {
        Ok(outcome) => outcome,
        Err(error) => ShareOutcome::Failed {
            error: error.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_embeds_escaped_values() {
        let script = share_script("https://ledger.example/?a=\"b\"");
        assert!(script.contains(r#"const title = "Investigator's Ledger";"#));
        assert!(script.contains(r#"const url = "https://ledger.example/?a=\"b\"";"#));
        assert!(script.contains(
            r#"const clipboardText = "The stars are aligning... Join the ritual. https://ledger.example/?a=\"b\"";"#
        ));
    }

    #[test]
    fn share_errors_do_not_fall_through_to_clipboard() {
        let script = share_script("https://ledger.example/");
        let share_branch = script
            .split("if (navigator.share)")
            .nth(1)
            .and_then(|rest| rest.split("navigator.clipboard").next())
            .unwrap();
        assert!(share_branch.contains(r#"return { outcome: "cancelled" };"#));
        assert!(share_branch.contains(r#"return { outcome: "failed", error: String(error) };"#));
    }

    #[test]
    fn outcome_parses_script_results() {
        let outcome: ShareOutcome = serde_json::from_str(r#"{"outcome":"copied"}"#).unwrap();
        assert_eq!(outcome, ShareOutcome::Copied);
        let failed: ShareOutcome =
            serde_json::from_str(r#"{"outcome":"failed","error":"denied"}"#).unwrap();
        assert_eq!(
            failed,
            ShareOutcome::Failed {
                error: "denied".to_string()
            }
        );
    }
}
