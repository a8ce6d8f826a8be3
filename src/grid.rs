//! The merged weekly grid and the builder that folds sources into it.

use crate::descriptor::parse_session;
use crate::error::{Result, SourceError};
use crate::palette::Palette;
use crate::slots::{allocate, standard_slots, Owner, TimeSlot};
use crate::source::ScheduleSource;
use crate::theme::ThemeConfig;
use crate::time::Day;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// One colored box in a grid cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub owner_name: String,
    pub course_code: String,
    pub section_label: String,
    pub instructor: String,
    pub background_color: String,
    pub accent_color: String,
    pub text_color: String,
}

impl ScheduleEntry {
    /// Text drawn inside the entry box.
    pub fn label(&self) -> String {
        format!(
            "{} - {}[{}] - {}",
            self.owner_name, self.course_code, self.section_label, self.instructor
        )
    }
}

/// Slots by seven days, each cell holding entries in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleGrid {
    slots: Vec<TimeSlot>,
    cells: Vec<[Vec<ScheduleEntry>; 7]>,
}

impl ScheduleGrid {
    pub fn new(slots: Vec<TimeSlot>) -> Self {
        let cells = slots.iter().map(|_| Default::default()).collect();
        Self { slots, cells }
    }

    /// Empty grid over the standard slot table.
    pub fn standard() -> Self {
        Self::new(standard_slots().to_vec())
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn row_count(&self) -> usize {
        self.slots.len()
    }

    pub fn cell(&self, row: usize, day: Day) -> &[ScheduleEntry] {
        self.cells.get(row).map(|r| r[day.index()].as_slice()).unwrap_or(&[])
    }

    pub(crate) fn push(&mut self, row: usize, day: Day, entry: ScheduleEntry) {
        if let Some(r) = self.cells.get_mut(row) {
            r[day.index()].push(entry);
        }
    }

    /// Largest cell in one row.
    pub fn row_max(&self, row: usize) -> usize {
        self.cells.get(row).map(|r| r.iter().map(Vec::len).max().unwrap_or(0)).unwrap_or(0)
    }

    /// Largest cell anywhere in the grid.
    pub fn max_entries(&self) -> usize {
        (0..self.row_count()).map(|r| self.row_max(r)).max().unwrap_or(0)
    }

    pub fn total_entries(&self) -> usize {
        self.cells.iter().flat_map(|r| r.iter()).map(Vec::len).sum()
    }

    /// Serialized form handed to the markup store for restore-on-reload.
    pub fn to_markup(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_markup(markup: &str) -> Result<Self> {
        Ok(serde_json::from_str(markup)?)
    }
}

/// A problem that skipped part of a source without excluding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceWarning {
    pub source_name: String,
    pub position: usize,
    pub message: String,
}

/// Result of one aggregation pass.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub grid: ScheduleGrid,
    pub warnings: Vec<SourceWarning>,
    /// Input positions that were excluded because they failed to resolve
    pub excluded: Vec<usize>,
}

/// Folds resolved sources into a fresh [`ScheduleGrid`].
#[derive(Debug, Clone)]
pub struct GridBuilder {
    slots: Vec<TimeSlot>,
    palette: Palette,
}

impl GridBuilder {
    pub fn new(theme: &ThemeConfig) -> Self {
        Self { slots: standard_slots().to_vec(), palette: theme.palette() }
    }

    pub fn with_slots(mut self, slots: Vec<TimeSlot>) -> Self {
        self.slots = slots;
        self
    }

    /// Build from per-source resolution outcomes, in input order.
    ///
    /// Failed sources are excluded but still consume their palette position,
    /// so everyone else keeps the same color whether or not a sibling failed.
    pub fn build(&self, sources: &[std::result::Result<ScheduleSource, SourceError>]) -> Aggregation {
        let mut grid = ScheduleGrid::new(self.slots.clone());
        let mut warnings = Vec::new();
        let mut excluded = Vec::new();

        for (position, outcome) in sources.iter().enumerate() {
            match outcome {
                Ok(source) => self.fold_source(&mut grid, position, source, &mut warnings),
                Err(e) => {
                    warn!("{}", e);
                    excluded.push(position);
                }
            }
        }

        debug!(
            "aggregated {} entries from {} source(s), {} excluded",
            grid.total_entries(),
            sources.len(),
            excluded.len()
        );
        Aggregation { grid, warnings, excluded }
    }

    /// Build from sources that are already known to be good.
    pub fn build_sources(&self, sources: &[ScheduleSource]) -> Aggregation {
        let outcomes: Vec<_> = sources.iter().cloned().map(Ok).collect();
        self.build(&outcomes)
    }

    fn fold_source(
        &self,
        grid: &mut ScheduleGrid,
        position: usize,
        source: &ScheduleSource,
        warnings: &mut Vec<SourceWarning>,
    ) {
        let swatch = self.palette.resolve(position);
        let owner = Owner { name: &source.display_name, swatch: &swatch };

        for course in &source.entries {
            for raw in course.class_sessions.iter().chain(course.lab_sessions.iter()) {
                match parse_session(raw) {
                    Ok(session) => {
                        allocate(grid, &session, raw, course, owner);
                    }
                    Err(e) => {
                        warn!("{}: skipping session {:?}: {}", source.display_name, raw, e);
                        warnings.push(SourceWarning {
                            source_name: source.display_name.clone(),
                            position,
                            message: format!("{} {}: {}", course.course_code, raw, e),
                        });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::CourseEntry;

    fn source(name: &str, sessions: &[&str]) -> ScheduleSource {
        ScheduleSource {
            display_name: name.into(),
            entries: vec![CourseEntry {
                course_code: "CSE110".into(),
                section_label: "Section 01".into(),
                instructor: "ABC".into(),
                class_sessions: sessions.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            }],
        }
    }

    #[test]
    fn session_spanning_two_slots_lands_in_both() {
        let b = GridBuilder::new(&ThemeConfig::default());
        let agg = b.build_sources(&[source("A", &["SUN (9:00 AM-11:00 AM-R)"])]);
        assert_eq!(agg.grid.cell(0, Day::Sun).len(), 1);
        assert_eq!(agg.grid.cell(1, Day::Sun).len(), 1);
        assert_eq!(agg.grid.cell(2, Day::Sun).len(), 1);
        assert_eq!(agg.grid.cell(3, Day::Sun).len(), 0);
    }

    #[test]
    fn bad_sessions_become_warnings() {
        let b = GridBuilder::new(&ThemeConfig::default());
        let agg = b.build_sources(&[source("A", &["MON (TBA)", "MON (8:00 AM-9:20 AM-R)"])]);
        assert_eq!(agg.warnings.len(), 1);
        assert_eq!(agg.warnings[0].source_name, "A");
        assert_eq!(agg.grid.total_entries(), 1);
    }

    #[test]
    fn failed_source_keeps_its_color_position() {
        let b = GridBuilder::new(&ThemeConfig::default());
        let failed = Err(SourceError {
            source_name: "B".into(),
            position: 0,
            error: crate::Error::Resolution("nope".into()),
        });
        let agg = b.build(&[failed, Ok(source("C", &["MON (8:00 AM-9:20 AM-R)"]))]);
        assert_eq!(agg.excluded, vec![0]);
        let entry = &agg.grid.cell(0, Day::Mon)[0];
        assert_eq!(entry.background_color, ThemeConfig::default().palette().resolve(1).background);
    }

    #[test]
    fn entry_label_format() {
        let b = GridBuilder::new(&ThemeConfig::default());
        let agg = b.build_sources(&[source("Alice", &["MON (8:00 AM-9:20 AM-R)"])]);
        assert_eq!(agg.grid.cell(0, Day::Mon)[0].label(), "Alice - CSE110[01] - ABC");
    }

    #[test]
    fn markup_round_trips() {
        let b = GridBuilder::new(&ThemeConfig::default());
        let agg = b.build_sources(&[source("Alice", &["MON (8:00 AM-9:20 AM-R)"])]);
        let markup = agg.grid.to_markup().unwrap();
        assert_eq!(ScheduleGrid::from_markup(&markup).unwrap(), agg.grid);
    }
}
