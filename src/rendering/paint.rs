//! Paint command list for one routine image.
//!
//! Building the list is where draw order lives; the rasterizer just executes
//! commands in sequence, each one fully opaque over what came before.

use super::layout::{LayoutPlan, Rect, COLUMN_COUNT};
use super::text::{fit_text, measure};
use super::Deadline;
use crate::color::{resolve_color, Rgba};
use crate::error::Result;
use crate::grid::{ScheduleEntry, ScheduleGrid};
use crate::theme::ThemeConfig;
use crate::time::Day;

/// Header label of the time column.
pub const TIME_HEADER: &str = "Time";

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    SolidRect {
        rect: Rect,
        rgba: Rgba,
    },
    RoundedRect {
        rect: Rect,
        radius: u32,
        fill: Rgba,
        edge: Rgba,
        edge_width: u32,
    },
    StrokeRect {
        rect: Rect,
        width: u32,
        rgba: Rgba,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        size: u32,
        bold: bool,
        rgba: Rgba,
    },
}

/// Text horizontally centered on `cx` with its glyph cell centered on `cy`.
fn centered_text(text: &str, cx: i32, cy: i32, size: u32, bold: bool, rgba: Rgba) -> PaintCommand {
    let w = measure(text, size, bold) as i32;
    PaintCommand::Text {
        x: cx - w / 2,
        y: cy - (size / 2) as i32,
        text: text.to_string(),
        size,
        bold,
        rgba,
    }
}

/// One or more lines centered as a block inside `rect`.
fn centered_lines(out: &mut Vec<PaintCommand>, text: &str, rect: &Rect, size: u32, gap: u32, rgba: Rgba) {
    let lines: Vec<&str> = text.split('\n').collect();
    let n = lines.len() as u32;
    let block = n * size + n.saturating_sub(1) * gap;
    let top = rect.center_y() - (block / 2) as i32;
    for (i, line) in lines.iter().enumerate() {
        let line_cy = top + (i as u32 * (size + gap) + size / 2) as i32;
        let fitted = fit_text(line, rect.width, size, false);
        out.push(centered_text(&fitted, rect.center_x(), line_cy, size, false, rgba));
    }
}

fn entry_box(out: &mut Vec<PaintCommand>, plan: &LayoutPlan, rect: Rect, label: &str, entry: &ScheduleEntry) {
    let text_rgba = resolve_color(&entry.text_color);
    out.push(PaintCommand::RoundedRect {
        rect,
        radius: plan.corner_radius,
        fill: resolve_color(&entry.background_color),
        edge: resolve_color(&entry.accent_color),
        edge_width: plan.scale,
    });
    let fitted = fit_text(label, plan.entry_text_width(&rect), plan.fonts.entry, false);
    out.push(centered_text(&fitted, rect.center_x(), rect.center_y(), plan.fonts.entry, false, text_rgba));
}

fn overflow_box(out: &mut Vec<PaintCommand>, plan: &LayoutPlan, theme: &ThemeConfig, rect: Rect, hidden: usize) {
    let border = theme.border();
    out.push(PaintCommand::RoundedRect {
        rect,
        radius: plan.corner_radius,
        fill: theme.header_fill(),
        edge: border,
        edge_width: plan.scale,
    });
    let label = fit_text(&format!("+{} more", hidden), plan.entry_text_width(&rect), plan.fonts.entry, false);
    out.push(centered_text(&label, rect.center_x(), rect.center_y(), plan.fonts.entry, false, theme.text()));
}

fn cell_entries(out: &mut Vec<PaintCommand>, plan: &LayoutPlan, theme: &ThemeConfig, row: usize, col: usize, entries: &[ScheduleEntry]) {
    if entries.is_empty() {
        return;
    }
    let capacity = plan.capacity(row);
    if entries.len() <= capacity {
        for (rect, entry) in plan.entry_stack(row, col, entries.len()).into_iter().zip(entries) {
            entry_box(out, plan, rect, &entry.label(), entry);
        }
        return;
    }

    let shown = capacity - 1;
    let rects = plan.entry_stack(row, col, capacity);
    for (rect, entry) in rects.iter().zip(&entries[..shown]) {
        entry_box(out, plan, *rect, &entry.label(), entry);
    }
    log::warn!(
        "{} entries in row {} {} exceed capacity {}; collapsing {}",
        entries.len(),
        row,
        Day::ALL[col - 1],
        capacity,
        entries.len() - shown
    );
    overflow_box(out, plan, theme, rects[shown], entries.len() - shown);
}

/// Produce the full command list in draw order. Checks `deadline` after
/// every row.
pub fn build_display_list(
    grid: &ScheduleGrid,
    plan: &LayoutPlan,
    theme: &ThemeConfig,
    deadline: Option<&Deadline>,
) -> Result<Vec<PaintCommand>> {
    let width = plan.width();
    let height = plan.height();
    let text = theme.text();
    let border = theme.border();
    let frame = theme.frame();
    let b = plan.border_width;
    let mut out = Vec::new();

    // Background and outer border
    out.push(PaintCommand::SolidRect { rect: Rect::new(0, 0, width, height), rgba: theme.background() });
    out.push(PaintCommand::StrokeRect { rect: Rect::new(0, 0, width, height), width: plan.frame_width, rgba: frame });

    // Header band
    out.push(PaintCommand::SolidRect {
        rect: Rect::new(0, b as i32, width, plan.header_height),
        rgba: theme.header_fill(),
    });
    for col in 0..COLUMN_COUNT {
        let label = if col == 0 { TIME_HEADER } else { Day::ALL[col - 1].label() };
        let r = plan.header_rect(col);
        let fitted = fit_text(label, r.width, plan.fonts.header, true);
        out.push(centered_text(&fitted, r.center_x(), r.center_y(), plan.fonts.header, true, text));
    }

    // Body rows
    for (row, slot) in grid.slots().iter().enumerate() {
        let y = plan.row_y(row);
        out.push(PaintCommand::SolidRect {
            rect: Rect::new(0, y, width, plan.row_heights[row]),
            rgba: theme.row_band(row),
        });
        let label_rect = plan.cell_rect(row, 0);
        centered_lines(&mut out, &slot.row_label(), &label_rect, plan.fonts.base, plan.line_gap, text);

        for day in Day::ALL {
            cell_entries(&mut out, plan, theme, row, day.index() + 1, grid.cell(row, day));
        }

        if let Some(d) = deadline {
            d.check()?;
        }
    }

    // Grid separators
    for col in 0..=COLUMN_COUNT {
        let x = plan.column_x(col) - b as i32;
        out.push(PaintCommand::SolidRect { rect: Rect::new(x, 0, b, height), rgba: border });
    }
    for row in 0..=grid.row_count() {
        let y = plan.row_y(row) - b as i32;
        out.push(PaintCommand::SolidRect { rect: Rect::new(0, y, width, b), rgba: border });
    }
    out.push(PaintCommand::StrokeRect { rect: Rect::new(0, 0, width, height), width: plan.frame_width, rgba: frame });

    // Header separator
    let sep = 2 * b;
    let sep_y = plan.row_y(0) - b as i32 - (b / 2) as i32;
    out.push(PaintCommand::SolidRect { rect: Rect::new(0, sep_y, width, sep), rgba: frame });

    Ok(out)
}
