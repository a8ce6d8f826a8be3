//! Persistence boundary: the last rendered grid markup, and a debouncer for
//! in-progress input. Nothing in aggregation or rendering depends on these.

use crate::error::{Error, Result};
use crate::grid::ScheduleGrid;
use crate::source::SourceInput;
use directories::ProjectDirs;
use log::{debug, warn};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Storage for the last rendered grid markup.
pub trait MarkupStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn store(&self, markup: &str) -> Result<()>;
}

/// In-memory store used in tests and when no cache directory exists.
#[derive(Debug, Default)]
pub struct MemoryMarkupStore {
    markup: Mutex<Option<String>>,
}

impl MemoryMarkupStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MarkupStore for MemoryMarkupStore {
    fn load(&self) -> Option<String> {
        self.markup.lock().ok().and_then(|g| g.clone())
    }

    fn store(&self, markup: &str) -> Result<()> {
        let mut g = self
            .markup
            .lock()
            .map_err(|_| Error::Other("markup store lock poisoned".into()))?;
        *g = Some(markup.to_string());
        Ok(())
    }
}

/// File-backed store in the platform cache directory.
#[derive(Debug, Clone)]
pub struct FileMarkupStore {
    path: PathBuf,
}

impl FileMarkupStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<cache dir>/<file_name>` for this application.
    pub fn in_cache_dir(file_name: &str) -> Result<Self> {
        let dirs = ProjectDirs::from("com", "routinegrid", "routinegrid")
            .ok_or_else(|| Error::Config("Could not determine cache directory".into()))?;
        Ok(Self::at(dirs.cache_dir().join(file_name)))
    }

    /// Where the last rendered grid markup lives.
    pub fn default_location() -> Result<Self> {
        Self::in_cache_dir("cached_routine.json")
    }

    /// Where the last input snapshot lives.
    pub fn inputs_location() -> Result<Self> {
        Self::in_cache_dir("cached_inputs.json")
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl MarkupStore for FileMarkupStore {
    fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(s) => Some(s),
            Err(e) => {
                debug!("no cached markup at {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn store(&self, markup: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, markup)?;
        Ok(())
    }
}

/// Time-windowed batching of input snapshots before they are persisted.
///
/// Every `push` replaces the pending snapshot and restarts the window; `poll`
/// hands the snapshot out once the window has passed with no new push.
#[derive(Debug)]
pub struct InputDebouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> InputDebouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self { window, pending: None }
    }

    pub fn push(&mut self, snapshot: T, now: Instant) {
        self.pending = Some((snapshot, now));
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if now.saturating_duration_since(*at) >= self.window => {
                self.pending.take().map(|(s, _)| s)
            }
            _ => None,
        }
    }

    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(s, _)| s)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Store `markup`, logging instead of failing: the cache is best effort.
pub fn remember(store: &dyn MarkupStore, markup: &str) {
    if let Err(e) = store.store(markup) {
        warn!("could not cache routine markup: {}", e);
    }
}

/// Serialize `grid` and [`remember`] it.
pub fn remember_grid(store: &dyn MarkupStore, grid: &ScheduleGrid) {
    match grid.to_markup() {
        Ok(markup) => remember(store, &markup),
        Err(e) => warn!("could not serialize routine grid: {}", e),
    }
}

/// The last remembered grid, if there is one and it still parses.
pub fn restore_grid(store: &dyn MarkupStore) -> Option<ScheduleGrid> {
    let markup = store.load()?;
    match ScheduleGrid::from_markup(&markup) {
        Ok(grid) => Some(grid),
        Err(e) => {
            warn!("ignoring unreadable cached routine: {}", e);
            None
        }
    }
}

/// Debounced persistence of the caller's input list.
///
/// Snapshots are serialized on `record` and written once the debounce window
/// passes quietly, or on `flush`.
pub struct InputCache<S> {
    store: S,
    debouncer: InputDebouncer<String>,
}

impl<S: MarkupStore> InputCache<S> {
    pub fn new(store: S, window: Duration) -> Self {
        Self { store, debouncer: InputDebouncer::new(window) }
    }

    pub fn record(&mut self, inputs: &[SourceInput], now: Instant) -> Result<()> {
        let snapshot = serde_json::to_string(inputs)?;
        self.debouncer.push(snapshot, now);
        Ok(())
    }

    /// Write the pending snapshot if its window has elapsed. Returns whether
    /// anything was written.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(snapshot) => {
                remember(&self.store, &snapshot);
                true
            }
            None => false,
        }
    }

    pub fn flush(&mut self) -> bool {
        match self.debouncer.flush() {
            Some(snapshot) => {
                remember(&self.store, &snapshot);
                true
            }
            None => false,
        }
    }

    pub fn restore(&self) -> Option<Vec<SourceInput>> {
        let raw = self.store.load()?;
        match serde_json::from_str(&raw) {
            Ok(inputs) => Some(inputs),
            Err(e) => {
                warn!("ignoring unreadable cached inputs: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let s = MemoryMarkupStore::new();
        assert_eq!(s.load(), None);
        s.store("{}").unwrap();
        assert_eq!(s.load().as_deref(), Some("{}"));
    }

    #[test]
    fn file_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileMarkupStore::at(dir.path().join("nested/cache.json"));
        assert_eq!(store.load(), None);
        remember(&store, "markup");
        assert_eq!(store.load().as_deref(), Some("markup"));
    }

    #[test]
    fn grid_survives_a_reload() {
        let store = MemoryMarkupStore::new();
        assert!(restore_grid(&store).is_none());
        let mut grid = ScheduleGrid::standard();
        grid.push(1, crate::time::Day::Tue, Default::default());
        remember_grid(&store, &grid);
        assert_eq!(restore_grid(&store), Some(grid));

        store.store("{not markup").unwrap();
        assert!(restore_grid(&store).is_none());
    }

    #[test]
    fn input_cache_writes_after_quiet_window() {
        let t0 = Instant::now();
        let ms = Duration::from_millis;
        let mut cache = InputCache::new(MemoryMarkupStore::new(), ms(500));
        let first = vec![SourceInput::new("Alice", "#000")];
        let second = vec![SourceInput::new("Alice", "#000"), SourceInput::new("Bob", "[]")];

        cache.record(&first, t0).unwrap();
        cache.record(&second, t0 + ms(300)).unwrap();
        assert!(!cache.poll(t0 + ms(600)));
        assert!(cache.restore().is_none());
        assert!(cache.poll(t0 + ms(800)));
        assert_eq!(cache.restore(), Some(second));
        assert!(!cache.flush());
    }

    #[test]
    fn input_cache_flush_writes_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = InputCache::new(FileMarkupStore::at(dir.path().join("inputs.json")), Duration::from_secs(60));
        let inputs = vec![SourceInput::new("Alice", "[]")];
        cache.record(&inputs, Instant::now()).unwrap();
        assert!(cache.flush());
        assert_eq!(cache.restore(), Some(inputs));
    }

    #[test]
    fn debouncer_coalesces_bursts() {
        let t0 = Instant::now();
        let ms = Duration::from_millis;
        let mut d = InputDebouncer::new(ms(500));
        d.push("a", t0);
        d.push("ab", t0 + ms(200));
        assert_eq!(d.poll(t0 + ms(600)), None);
        assert_eq!(d.poll(t0 + ms(700)), Some("ab"));
        assert!(!d.is_pending());
        d.push("abc", t0 + ms(800));
        assert_eq!(d.flush(), Some("abc"));
    }
}
