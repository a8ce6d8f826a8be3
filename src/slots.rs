//! The fixed weekly time slots and the allocator that places parsed
//! sessions into them.

use crate::descriptor::{parse_time_range, ParsedSession};
use crate::error::Result;
use crate::grid::{ScheduleEntry, ScheduleGrid};
use crate::palette::Swatch;
use crate::source::CourseEntry;
use crate::time::minutes_to_time;
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Row labels of the academic day, in order.
pub const SLOT_LABELS: [&str; 7] = [
    "8:00 AM-9:20 AM",
    "9:30 AM-10:50 AM",
    "11:00 AM-12:20 PM",
    "12:30 PM-1:50 PM",
    "2:00 PM-3:20 PM",
    "3:30 PM-4:50 PM",
    "5:00 PM-6:20 PM",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub label: String,
    pub start_minutes: u32,
    pub end_minutes: u32,
}

impl TimeSlot {
    pub fn from_label(label: &str) -> Result<Self> {
        let (start_minutes, end_minutes) = parse_time_range(label)?;
        Ok(Self { label: label.to_string(), start_minutes, end_minutes })
    }

    /// Closed-interval overlap: a session touching the slot boundary counts.
    pub fn overlaps(&self, session: &ParsedSession) -> bool {
        session.start_minutes <= self.end_minutes && session.end_minutes >= self.start_minutes
    }

    /// Two-line label for the narrow time column.
    pub fn row_label(&self) -> String {
        format!("{}\n{}", minutes_to_time(self.start_minutes), minutes_to_time(self.end_minutes))
    }
}

/// The standard slot table, parsed once per process.
pub fn standard_slots() -> &'static [TimeSlot] {
    static SLOTS: OnceLock<Vec<TimeSlot>> = OnceLock::new();
    SLOTS.get_or_init(|| {
        SLOT_LABELS
            .iter()
            .filter_map(|label| match TimeSlot::from_label(label) {
                Ok(slot) => Some(slot),
                Err(e) => {
                    error!("bad built-in slot label {:?}: {}", label, e);
                    None
                }
            })
            .collect()
    })
}

/// Course code to show for one session of `course`.
///
/// A session string that appears in the course's lab list shows the lab code
/// when one was supplied; otherwise the plain course code is used.
pub fn display_code<'a>(course: &'a CourseEntry, session: &str) -> &'a str {
    let is_lab = course.lab_sessions.iter().any(|s| s == session);
    match (&course.lab_course_code, is_lab) {
        (Some(code), true) if !code.trim().is_empty() => code,
        _ => &course.course_code,
    }
}

/// Who a session belongs to.
#[derive(Debug, Clone, Copy)]
pub struct Owner<'a> {
    pub name: &'a str,
    pub swatch: &'a Swatch,
}

/// Append one entry to every slot the session overlaps. Returns how many
/// slots received it. Never deduplicates.
pub fn allocate(
    grid: &mut ScheduleGrid,
    session: &ParsedSession,
    raw_session: &str,
    course: &CourseEntry,
    owner: Owner<'_>,
) -> usize {
    let entry = ScheduleEntry {
        owner_name: owner.name.to_string(),
        course_code: display_code(course, raw_session).to_string(),
        section_label: course.section().to_string(),
        instructor: course.instructor.clone(),
        background_color: owner.swatch.background.clone(),
        accent_color: owner.swatch.accent.clone(),
        text_color: owner.swatch.text.clone(),
    };

    let rows: Vec<usize> = grid
        .slots()
        .iter()
        .enumerate()
        .filter(|(_, slot)| slot.overlaps(session))
        .map(|(i, _)| i)
        .collect();

    for &row in &rows {
        grid.push(row, session.day, entry.clone());
    }
    debug!(
        "placed {} {} on {} in {} slot(s)",
        owner.name,
        entry.course_code,
        session.day,
        rows.len()
    );
    rows.len()
}
