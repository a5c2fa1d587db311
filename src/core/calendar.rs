//! iCalendar (RFC 5545) export
//!
//! Every schedule row becomes one all-day `VEVENT`. The output is meant for
//! import into Google Calendar and similar tools; it is never read back.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use super::rows::ScheduleRow;
use super::set::EventKind;

/// Product identifier written into every calendar
pub const PROD_ID: &str = "-//G5 Schedule Generator//g5//EN";

/// Maximum line length in octets before folding
const FOLD_AT: usize = 75;

/// Calendar rendering options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarOptions {
    /// Prefix event titles with an emoji per event kind
    #[serde(default = "default_emoji")]
    pub emoji: bool,

    /// Append `.ics` to export paths that lack it
    #[serde(default = "default_append_extension")]
    pub append_extension: bool,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            emoji: default_emoji(),
            append_extension: default_append_extension(),
        }
    }
}

fn default_emoji() -> bool {
    true
}

fn default_append_extension() -> bool {
    true
}

fn emoji_for(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Learn => "📚",
        EventKind::Review(round) => match round.get() {
            1 => "🔍",
            2 => "🔄",
            3 => "📝",
            _ => "✅",
        },
    }
}

/// Event title, e.g. `📚 Learn Set 01`
pub fn summary(row: &ScheduleRow, options: &CalendarOptions) -> String {
    if options.emoji {
        format!("{} {}", emoji_for(row.event), row.action())
    } else {
        row.action()
    }
}

/// Render rows into a complete `VCALENDAR` document.
pub fn render<I>(rows: I, options: &CalendarOptions, stamp: DateTime<Utc>) -> String
where
    I: IntoIterator<Item = ScheduleRow>,
{
    let dtstamp = stamp.format("%Y%m%dT%H%M%SZ").to_string();

    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, &format!("PRODID:{}", PROD_ID));
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, "CALSCALE:GREGORIAN");
    push_line(&mut out, "METHOD:PUBLISH");

    for row in rows {
        let title = summary(&row, options);
        let category = if row.event.is_learn() { "Learn" } else { "Review" };

        push_line(&mut out, "BEGIN:VEVENT");
        push_line(&mut out, &format!("UID:{}@g5", Ulid::new()));
        push_line(&mut out, &format!("DTSTAMP:{}", dtstamp));
        push_line(&mut out, &format!("DTSTART;VALUE=DATE:{}", ics_date(row.date)));
        push_line(
            &mut out,
            &format!("DTEND;VALUE=DATE:{}", ics_date(next_day(row.date))),
        );
        push_line(&mut out, &format!("SUMMARY:{}", escape_text(&title)));
        push_line(
            &mut out,
            &format!(
                "DESCRIPTION:{}",
                escape_text(&format!("G5 Spaced Repetition - {}", row.action()))
            ),
        );
        push_line(&mut out, &format!("CATEGORIES:{}", category));
        push_line(&mut out, "TRANSP:TRANSPARENT");
        push_line(&mut out, "END:VEVENT");
    }

    push_line(&mut out, "END:VCALENDAR");
    out
}

fn ics_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

// Saturates at the last representable date; Set::new already rejects
// schedules that reach it.
fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}

/// Escape a TEXT value (RFC 5545 §3.3.11)
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Append a content line, folded at 75 octets and terminated by CRLF.
fn push_line(out: &mut String, line: &str) {
    let mut width = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if width + len > FOLD_AT {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(c);
        width += len;
    }
    out.push_str("\r\n");
}
