//! Routine Grid
//!
//! Merges several people's weekly class routines into one time-slot by
//! weekday grid and renders it as a PNG.
//!
//! # Pipeline
//!
//! - **Resolve**: each `(name, descriptor)` input becomes a [`ScheduleSource`].
//!   Inline JSON is parsed directly; `#` short codes go through a
//!   [`SectionResolver`]. This is the only step that suspends.
//! - **Aggregate**: sources fold into a [`ScheduleGrid`] in input order, with
//!   colors taken from the theme's palette by input position.
//! - **Render**: a layout plan sizes rows and fonts by cell density and the
//!   rasterizer draws the grid under a wall-clock budget.
//!
//! # Example
//!
//! ```no_run
//! use routinegrid::{Generator, RoutineConfig, SourceInput, ThemeConfig};
//!
//! # async fn run() -> routinegrid::Result<()> {
//! let generator = Generator::new(RoutineConfig::default())?;
//! let inputs = vec![SourceInput::new(
//!     "Alice",
//!     r#"[{"Course":"CSE110","Class":"MON (9:30 AM-10:50 AM-7A)"}]"#,
//! )];
//! let generated = generator.generate(&inputs, &ThemeConfig::default()).await?;
//! std::fs::write("routine.png", &generated.image.png_data)?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod color;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod grid;
pub mod palette;
pub mod rendering;
pub mod resolve;
pub mod shortcode;
pub mod slots;
pub mod source;
pub mod theme;
pub mod time;

pub use config::RoutineConfig;
pub use error::{Error, Fallback, Result, SourceError};
pub use grid::{Aggregation, GridBuilder, ScheduleEntry, ScheduleGrid, SourceWarning};
pub use rendering::{Deadline, RenderedImage};
#[cfg(feature = "remote")]
pub use resolve::HttpResolver;
pub use resolve::{ResolvedSources, SectionResolver, StaticResolver};
pub use source::{CourseEntry, ScheduleSource, SourceInput};
pub use theme::{ThemeConfig, ThemeName};

use log::{debug, info};

/// One finished generation: the grid that was drawn and its image.
#[derive(Debug, Clone)]
pub struct Generated {
    pub aggregation: Aggregation,
    pub image: RenderedImage,
}

/// Entry point tying resolution, aggregation and rendering together.
///
/// A generator holds no per-run state, so one instance serves any number of
/// calls. Callers that switch themes keep the [`ResolvedSources`] from
/// [`Generator::resolve`] and call [`Generator::regenerate`].
pub struct Generator {
    config: RoutineConfig,
    resolver: Option<Box<dyn SectionResolver>>,
}

impl Generator {
    /// Build a generator. With the `remote` feature the short-code resolver
    /// targets `config.resolver_endpoint`; if the HTTP client cannot be built
    /// short codes fail per source instead.
    ///
    /// Fails with [`Error::Config`] when `config` does not validate.
    pub fn new(config: RoutineConfig) -> Result<Self> {
        config.validate()?;
        #[cfg(feature = "remote")]
        let resolver: Option<Box<dyn SectionResolver>> =
            match HttpResolver::new(config.resolver_endpoint.clone(), config.resolver_timeout_ms) {
                Ok(r) => Some(Box::new(r)),
                Err(e) => {
                    log::warn!("short codes disabled: {}", e);
                    None
                }
            };
        #[cfg(not(feature = "remote"))]
        let resolver: Option<Box<dyn SectionResolver>> = None;
        Ok(Self { config, resolver })
    }

    /// Build a generator with an explicit resolver.
    pub fn with_resolver(config: RoutineConfig, resolver: Box<dyn SectionResolver>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, resolver: Some(resolver) })
    }

    /// Build a generator that only accepts inline descriptors.
    pub fn offline(config: RoutineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, resolver: None })
    }

    pub fn config(&self) -> &RoutineConfig {
        &self.config
    }

    /// Resolve every input concurrently; one slot per input, in input order.
    pub async fn resolve(&self, inputs: &[SourceInput]) -> ResolvedSources {
        debug!("resolving {} source(s)", inputs.len());
        resolve::resolve_all(inputs, self.resolver.as_deref()).await
    }

    pub fn aggregate(&self, resolved: &ResolvedSources, theme: &ThemeConfig) -> Aggregation {
        GridBuilder::new(theme).build(resolved)
    }

    /// Plan and draw `aggregation.grid` within `render_timeout_ms`.
    pub fn render(&self, aggregation: &Aggregation, theme: &ThemeConfig) -> Result<RenderedImage> {
        let plan = rendering::layout::plan(&aggregation.grid, theme, self.config.layout_options());
        let deadline = Deadline::from_millis(self.config.render_timeout_ms);
        let image = rendering::render_with_deadline(&aggregation.grid, &plan, theme, Some(&deadline))?;
        info!("rendered {}x{} routine ({} bytes)", image.width, image.height, image.png_data.len());
        Ok(image)
    }

    pub async fn generate(&self, inputs: &[SourceInput], theme: &ThemeConfig) -> Result<Generated> {
        let resolved = self.resolve(inputs).await;
        self.regenerate(&resolved, theme)
    }

    /// Rebuild and redraw already-resolved sources, typically after a theme
    /// change. Nothing is fetched again.
    pub fn regenerate(&self, resolved: &ResolvedSources, theme: &ThemeConfig) -> Result<Generated> {
        let aggregation = self.aggregate(resolved, theme);
        let image = self.render(&aggregation, theme)?;
        Ok(Generated { aggregation, image })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = r#"[{"Course":"CSE110","section":"Section 01","faculty":"ABC","Class":"MON (8:00 AM-9:20 AM-7A)"}]"#;

    fn small_config() -> RoutineConfig {
        RoutineConfig { output_scale: 1, ..Default::default() }
    }

    #[tokio::test]
    async fn generates_an_image() {
        let g = Generator::offline(small_config()).unwrap();
        let out = g.generate(&[SourceInput::new("Alice", ALICE)], &ThemeConfig::default()).await.unwrap();
        assert_eq!(out.aggregation.grid.total_entries(), 1);
        assert!(out.image.width > 0);
    }

    #[tokio::test]
    async fn regenerate_recolors_without_resolving() {
        let g = Generator::offline(small_config()).unwrap();
        let resolved = g.resolve(&[SourceInput::new("Alice", ALICE)]).await;
        let dark = g.regenerate(&resolved, &ThemeConfig::for_name(ThemeName::Dark)).unwrap();
        let pink = g.regenerate(&resolved, &ThemeConfig::for_name(ThemeName::Pink)).unwrap();
        let color = |a: &Aggregation| a.grid.cell(0, time::Day::Mon)[0].background_color.clone();
        assert_ne!(color(&dark.aggregation), color(&pink.aggregation));
        assert_ne!(dark.image.digest(), pink.image.digest());
    }

    #[tokio::test]
    async fn zero_timeout_fails_closed() {
        let g = Generator::offline(RoutineConfig { render_timeout_ms: 0, ..small_config() }).unwrap();
        let resolved = g.resolve(&[SourceInput::new("Alice", ALICE)]).await;
        let agg = g.aggregate(&resolved, &ThemeConfig::default());
        // A zero budget can only pass if the whole render takes under 1ms.
        if let Err(e) = g.render(&agg, &ThemeConfig::default()) {
            assert!(e.is_timeout());
        }
        assert_eq!(agg.grid.total_entries(), 1);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        for cfg in [
            RoutineConfig { output_scale: 0, ..Default::default() },
            RoutineConfig { output_scale: 4096, ..Default::default() },
            RoutineConfig { min_font_size: 0, ..Default::default() },
        ] {
            assert!(matches!(Generator::offline(cfg.clone()), Err(Error::Config(_))));
            assert!(matches!(Generator::new(cfg), Err(Error::Config(_))));
        }
    }
}
