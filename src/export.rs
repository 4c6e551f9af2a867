//! CSV rendering of a session.
//!
//! Values are written as-is. A comma inside a `session_id` or `user_id`
//! shifts the columns of that line; clients only send plain identifiers.

use std::fmt::Write;

use chrono::SecondsFormat;

use crate::models::LogEntry;

pub const CSV_HEADER: &str = "id,session_id,user_id,latitude,longitude,elevation,timestamp";

/// Header line followed by one line per entry, each ending in `\n`.
pub fn to_csv(entries: &[LogEntry]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + entries.len() * 64);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for e in entries {
        // writing to a String cannot fail
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{}",
            e.id,
            e.session_id,
            e.user_id,
            e.latitude,
            e.longitude,
            e.elevation,
            e.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
        );
    }
    out
}

pub fn filename(session_id: &str) -> String {
    format!("{}.csv", session_id)
}
