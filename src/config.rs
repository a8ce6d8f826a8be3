//! Runtime configuration.

use crate::error::{Error, Result};
use crate::rendering::layout::LayoutOptions;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Public section feed used to expand short codes.
pub const DEFAULT_RESOLVER_ENDPOINT: &str = "https://usis-cdn.eniamza.com/connect.json";

/// Configuration for routine generation
///
/// The defaults produce a 3x oversampled image, give rendering ten seconds,
/// and point the short-code resolver at the public section feed.
///
/// # Examples
///
/// ```
/// let cfg = routinegrid::RoutineConfig::default();
/// assert_eq!(cfg.output_scale, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutineConfig {
    /// Product name used in artifact filenames
    pub product_name: String,
    /// Uniform oversampling factor for the output image
    pub output_scale: u32,
    /// Render time budget in milliseconds
    pub render_timeout_ms: u64,
    /// Smallest legible font size in logical pixels
    pub min_font_size: u32,
    /// Section feed URL for short-code lookups
    pub resolver_endpoint: String,
    /// HTTP timeout for the section feed in milliseconds
    pub resolver_timeout_ms: u64,
    /// Quiet window before cached input is written
    pub cache_debounce_ms: u64,
}

impl Default for RoutineConfig {
    fn default() -> Self {
        Self {
            product_name: "HomiesUnlocked".to_string(),
            output_scale: 3,
            render_timeout_ms: 10_000,
            min_font_size: 8,
            resolver_endpoint: DEFAULT_RESOLVER_ENDPOINT.to_string(),
            resolver_timeout_ms: 30_000,
            cache_debounce_ms: 500,
        }
    }
}

impl RoutineConfig {
    /// Read a JSON config file; missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let cfg: Self = serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.output_scale == 0 || self.output_scale > 8 {
            return Err(Error::Config(format!("output_scale must be 1..=8, got {}", self.output_scale)));
        }
        if self.min_font_size == 0 {
            return Err(Error::Config("min_font_size must be positive".into()));
        }
        if self.product_name.trim().is_empty() {
            return Err(Error::Config("product_name must not be empty".into()));
        }
        Ok(())
    }

    /// Quiet window for [`InputCache`](crate::cache::InputCache).
    pub fn cache_debounce(&self) -> Duration {
        Duration::from_millis(self.cache_debounce_ms)
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions { scale: self.output_scale, min_font_size: self.min_font_size }
    }

    /// `<product>_Routine_<YYYY-MM-DD>.png`
    pub fn artifact_filename(&self, date: NaiveDate) -> String {
        format!("{}_Routine_{}.png", self.product_name, date.format("%Y-%m-%d"))
    }

    pub fn artifact_filename_today(&self) -> String {
        self.artifact_filename(Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_pattern() {
        let cfg = RoutineConfig::default();
        let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        assert_eq!(cfg.artifact_filename(date), "HomiesUnlocked_Routine_2025-01-09.png");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routine.json");
        std::fs::write(&path, r#"{"output_scale": 1, "product_name": "Crew"}"#).unwrap();
        let cfg = RoutineConfig::load(&path).unwrap();
        assert_eq!(cfg.output_scale, 1);
        assert_eq!(cfg.product_name, "Crew");
        assert_eq!(cfg.render_timeout_ms, 10_000);
    }

    #[test]
    fn debounce_window_comes_from_config() {
        let cfg = RoutineConfig { cache_debounce_ms: 250, ..Default::default() };
        assert_eq!(cfg.cache_debounce(), Duration::from_millis(250));
    }

    #[test]
    fn rejects_zero_scale() {
        let cfg = RoutineConfig { output_scale: 0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
    }
}
