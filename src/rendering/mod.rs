//! Rendering: layout planning, paint list construction and rasterization.

pub mod layout;
pub mod paint;
pub mod raster;
pub mod text;

use crate::error::{Error, Result};
use crate::grid::ScheduleGrid;
use crate::theme::ThemeConfig;
use base64::Engine as _;
use layout::LayoutPlan;
use log::debug;
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};

/// An encoded routine image.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl RenderedImage {
    /// Hex SHA-256 of the PNG bytes; stable for identical input.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.png_data))
    }

    pub fn to_data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png_data)
        )
    }
}

/// Wall-clock budget for one render call.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self { started: Instant::now(), budget }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::after(Duration::from_millis(ms))
    }

    pub fn check(&self) -> Result<()> {
        if self.started.elapsed() > self.budget {
            return Err(Error::Timeout(self.budget.as_millis() as u64));
        }
        Ok(())
    }
}

/// Render `grid` with `plan` and `theme`, without a time budget.
pub fn render(grid: &ScheduleGrid, plan: &LayoutPlan, theme: &ThemeConfig) -> Result<RenderedImage> {
    render_with_deadline(grid, plan, theme, None)
}

/// Render, failing with [`Error::Timeout`] once `deadline` passes. Nothing
/// partial is ever returned; the grid is only read.
pub fn render_with_deadline(
    grid: &ScheduleGrid,
    plan: &LayoutPlan,
    theme: &ThemeConfig,
    deadline: Option<&Deadline>,
) -> Result<RenderedImage> {
    if grid.row_count() == 0 {
        return Err(Error::Render("grid has no time-slot rows".into()));
    }
    if plan.row_heights.len() != grid.row_count() {
        return Err(Error::Render(format!(
            "layout plan has {} rows but grid has {}",
            plan.row_heights.len(),
            grid.row_count()
        )));
    }

    let commands = paint::build_display_list(grid, plan, theme, deadline)?;
    let (width, height) = (plan.width(), plan.height());
    debug!("rasterizing {} commands onto {}x{}", commands.len(), width, height);
    let canvas = raster::rasterize(width, height, &commands, deadline)?;
    if let Some(d) = deadline {
        d.check()?;
    }
    let png_data = canvas.encode_png()?;
    Ok(RenderedImage { width, height, png_data })
}
