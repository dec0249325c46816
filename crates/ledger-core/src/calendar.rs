//! iCalendar export for a single session.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Session, DEFAULT_TITLE};

/// Length of the exported event
pub const EVENT_DURATION_HOURS: i64 = 4;
const PRODUCT_ID: &str = "-//InvestigatorLedger//RPG//EN";
const UID_DOMAIN: &str = "investigatorledger";
const DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const MAX_LINE_OCTETS: usize = 75;

/// Render `session` as an RFC 5545 calendar with one event.
///
/// `now` becomes the `DTSTAMP`. Lines end in CRLF and are folded at 75
/// octets; text values are escaped.
#[must_use]
pub fn render_calendar_event(session: &Session, now: DateTime<Utc>) -> String {
    let end = session.date + Duration::hours(EVENT_DURATION_HOURS);
    let description = format!(
        "Organised via The Investigator's Ledger. Proposer: {}",
        session.proposer
    );

    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{PRODUCT_ID}"),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}@{UID_DOMAIN}", session.id),
        format!("DTSTAMP:{}", now.format(DATE_FORMAT)),
        format!("DTSTART:{}", session.date.format(DATE_FORMAT)),
        format!("DTEND:{}", end.format(DATE_FORMAT)),
        format!("SUMMARY:{}", escape_text(&session.title)),
        format!("LOCATION:{}", escape_text(&session.location)),
        format!("DESCRIPTION:{}", escape_text(&description)),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ];

    let mut output = String::new();
    for line in &lines {
        push_folded(&mut output, line);
    }
    output
}

/// File name for the exported event: whitespace runs become `_`.
#[must_use]
pub fn calendar_file_name(title: &str) -> String {
    let stem = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .replace(['/', '\\'], "-");
    let stem = if stem.is_empty() {
        DEFAULT_TITLE.replace(' ', "_")
    } else {
        stem
    };
    format!("{stem}.ics")
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

// Continuation lines start with one space, which counts toward the limit.
// Multi-byte characters are never split.
fn push_folded(output: &mut String, line: &str) {
    let mut width = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            output.push_str("\r\n ");
            width = 1;
        }
        output.push(ch);
        width += len;
    }
    output.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SessionId, Votes};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn session(title: &str, location: &str) -> Session {
        Session {
            id: SessionId::new("42"),
            title: title.to_string(),
            date: Utc.with_ymd_and_hms(2025, 10, 31, 19, 0, 0).unwrap(),
            location: location.to_string(),
            image_url: String::new(),
            proposer: "Armitage".to_string(),
            proposer_id: "uid-a".to_string(),
            votes: Votes::new(),
            notes: Vec::new(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 1, 8, 30, 0).unwrap()
    }

    #[test]
    fn renders_event_with_four_hour_duration() {
        let rendered = render_calendar_event(&session("The Haunting", "Discord"), now());
        let expected = [
            "BEGIN:VCALENDAR",
            "VERSION:2.0",
            "PRODID:-//InvestigatorLedger//RPG//EN",
            "BEGIN:VEVENT",
            "UID:42@investigatorledger",
            "DTSTAMP:20251001T083000Z",
            "DTSTART:20251031T190000Z",
            "DTEND:20251031T230000Z",
            "SUMMARY:The Haunting",
            "LOCATION:Discord",
            "DESCRIPTION:Organised via The Investigator's Ledger. Proposer: Armitage",
            "END:VEVENT",
            "END:VCALENDAR",
            "",
        ]
        .join("\r\n");
        assert_eq!(rendered, expected);
    }

    #[test]
    fn escapes_text_values() {
        let rendered = render_calendar_event(
            &session("Dinner; then, ritual", "Arkham\\Library\nRoom 3"),
            now(),
        );
        assert!(rendered.contains("SUMMARY:Dinner\\; then\\, ritual\r\n"));
        assert!(rendered.contains("LOCATION:Arkham\\\\Library\\nRoom 3\r\n"));
    }

    #[test]
    fn folds_long_lines_at_75_octets() {
        let title = "Ph'nglui mglw'nafh ".repeat(8);
        let rendered = render_calendar_event(&session(title.trim(), "R'lyeh"), now());

        for line in rendered.split("\r\n") {
            assert!(line.len() <= MAX_LINE_OCTETS, "line too long: {line:?}");
        }
        let unfolded = rendered.replace("\r\n ", "");
        assert!(unfolded.contains(&format!("SUMMARY:{}\r\n", title.trim())));
    }

    #[test]
    fn folding_keeps_multibyte_characters_whole() {
        let mut output = String::new();
        push_folded(&mut output, &"é".repeat(60));
        for line in output.split("\r\n") {
            assert!(line.len() <= MAX_LINE_OCTETS);
        }
        assert_eq!(output.replace("\r\n ", ""), format!("{}\r\n", "é".repeat(60)));
    }

    #[test]
    fn file_name_replaces_whitespace_runs() {
        assert_eq!(calendar_file_name("The   Haunting\tof Arkham"), "The_Haunting_of_Arkham.ics");
        assert_eq!(calendar_file_name("Masks/Nyarlathotep"), "Masks-Nyarlathotep.ics");
        assert_eq!(calendar_file_name("  "), "Unnamed_Ritual.ics");
    }
}
