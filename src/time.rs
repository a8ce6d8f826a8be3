//! Clock-string and weekday utilities shared by the parser, the slot table
//! and the remote record converter.

use crate::error::{Error, Fallback, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minutes in a day; valid offsets are `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// The seven grid columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Sun,
        Day::Mon,
        Day::Tue,
        Day::Wed,
        Day::Thu,
        Day::Fri,
        Day::Sat,
    ];

    /// Column index, Sunday first.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Upper-case three-letter token used in descriptors ("MON").
    pub fn abbrev(self) -> &'static str {
        match self {
            Day::Sun => "SUN",
            Day::Mon => "MON",
            Day::Tue => "TUE",
            Day::Wed => "WED",
            Day::Thu => "THU",
            Day::Fri => "FRI",
            Day::Sat => "SAT",
        }
    }

    /// Header label ("Mon").
    pub fn label(self) -> &'static str {
        match self {
            Day::Sun => "Sun",
            Day::Mon => "Mon",
            Day::Tue => "Tue",
            Day::Wed => "Wed",
            Day::Thu => "Thu",
            Day::Fri => "Fri",
            Day::Sat => "Sat",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalize a day token ("mon", "MONDAY", "Wed") to a [`Day`].
///
/// Only the first three letters are looked at. Anything that is not one of
/// the seven known prefixes comes back as a [`Fallback`] carrying the raw
/// token unchanged.
pub fn normalize_day(token: &str) -> std::result::Result<Day, Fallback> {
    let trimmed = token.trim();
    let prefix: String = trimmed.chars().take(3).collect::<String>().to_ascii_uppercase();
    Day::ALL
        .iter()
        .copied()
        .find(|d| d.abbrev() == prefix)
        .ok_or_else(|| Fallback::new(trimmed, "unrecognized day token"))
}

/// Parse a 12-hour clock string ("9:30 AM", "12:05pm", "2:00 PM") into
/// minutes since midnight.
///
/// 12 AM is midnight (0) and 12 PM stays noon (720).
pub fn time_to_minutes(s: &str) -> Result<u32> {
    let upper = s.trim().to_ascii_uppercase();
    let (clock, is_pm) = if let Some(rest) = upper.strip_suffix("PM") {
        (rest.trim_end(), true)
    } else if let Some(rest) = upper.strip_suffix("AM") {
        (rest.trim_end(), false)
    } else {
        return Err(Error::Descriptor(format!("missing AM/PM in time {:?}", s)));
    };

    let (h, m) = clock
        .split_once(':')
        .ok_or_else(|| Error::Descriptor(format!("expected H:MM in time {:?}", s)))?;
    let hours: u32 = h
        .trim()
        .parse()
        .map_err(|_| Error::Descriptor(format!("bad hour in time {:?}", s)))?;
    let minutes: u32 = m
        .trim()
        .parse()
        .map_err(|_| Error::Descriptor(format!("bad minutes in time {:?}", s)))?;

    if !(1..=12).contains(&hours) || minutes > 59 {
        return Err(Error::Descriptor(format!("time out of range: {:?}", s)));
    }

    let base = hours % 12;
    let hours24 = if is_pm { base + 12 } else { base };
    Ok(hours24 * 60 + minutes)
}

/// Format minutes since midnight as a canonical 12-hour clock string.
pub fn minutes_to_time(total: u32) -> String {
    let total = total % MINUTES_PER_DAY;
    let hours = total / 60;
    let minutes = total % 60;
    let period = if hours >= 12 { "PM" } else { "AM" };
    let display = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", display, minutes, period)
}

/// Convert a 24-hour "HH:MM" or "HH:MM:SS" string into the 12-hour form
/// used in descriptors ("14:00:00" -> "2:00 PM").
pub fn to_12_hour(time24: &str) -> Result<String> {
    let mut parts = time24.trim().split(':');
    let hours: u32 = parts
        .next()
        .and_then(|h| h.parse().ok())
        .ok_or_else(|| Error::Descriptor(format!("bad 24-hour time {:?}", time24)))?;
    let minutes: u32 = parts
        .next()
        .and_then(|m| m.parse().ok())
        .ok_or_else(|| Error::Descriptor(format!("bad 24-hour time {:?}", time24)))?;
    if hours > 23 || minutes > 59 {
        return Err(Error::Descriptor(format!("24-hour time out of range: {:?}", time24)));
    }
    Ok(minutes_to_time(hours * 60 + minutes))
}
