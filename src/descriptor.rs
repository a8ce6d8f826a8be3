//! Session descriptor parsing.
//!
//! A descriptor token looks like `MON (9:30 AM-10:50 AM-Room1)`. The day is
//! the leading alphabetic run; the times are the first two `H:MM AM|PM`
//! matches anywhere in the token, so the room part may contain anything.

use crate::error::{Error, Result};
use crate::time::{normalize_day, time_to_minutes, Day};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Literal that marks an empty session field in exported routines.
pub const NO_SESSIONS: &str = "N/A";

fn clock_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(\d{1,2}:\d{2})\s*([AP]M)").expect("clock pattern is a valid regex")
    })
}

/// One parsed session. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSession {
    pub day: Day,
    pub start_minutes: u32,
    pub end_minutes: u32,
}

/// Pull every `H:MM AM|PM` occurrence out of `s` and convert to minutes.
fn clock_times(s: &str) -> Result<Vec<u32>> {
    clock_pattern()
        .captures_iter(s)
        .map(|c| time_to_minutes(&format!("{} {}", &c[1], &c[2])))
        .collect()
}

/// Start and end of a time range: the first match is the start, the second
/// (or the first again) is the end.
fn time_range(s: &str) -> Result<(u32, u32)> {
    let times = clock_times(s)?;
    let start = *times
        .first()
        .ok_or_else(|| Error::Descriptor(format!("no time found in {:?}", s)))?;
    let end = times.get(1).copied().unwrap_or(start);
    if end < start {
        return Err(Error::Descriptor(format!("session ends before it starts: {:?}", s)));
    }
    Ok((start, end))
}

/// Parse a single session token.
pub fn parse_session(token: &str) -> Result<ParsedSession> {
    let token = token.trim();
    let day_len = token
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphabetic())
        .map(|(i, _)| i)
        .unwrap_or(token.len());
    if day_len == 0 {
        return Err(Error::Descriptor(format!("missing day in session {:?}", token)));
    }

    let day = normalize_day(&token[..day_len]).map_err(|fb| Error::Descriptor(fb.to_string()))?;
    let (start_minutes, end_minutes) = time_range(&token[day_len..])?;

    Ok(ParsedSession { day, start_minutes, end_minutes })
}

/// Parse a row label, either `START-END` on one line or `START` and `END`
/// on two lines.
pub fn parse_time_range(label: &str) -> Result<(u32, u32)> {
    time_range(label)
}

/// Split a `", "`-joined session field into tokens, dropping blanks and the
/// `N/A` marker.
pub fn split_sessions(field: &str) -> Vec<String> {
    field
        .split(", ")
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(NO_SESSIONS))
        .map(str::to_string)
        .collect()
}
