//! Layout planning for the routine image.
//!
//! There is no general flow engine here. Every size comes from a small set
//! of discrete step tables keyed by how crowded the grid is, so the output
//! changes size in a few visible steps instead of creeping with each entry.

use crate::grid::ScheduleGrid;
use crate::theme::{ThemeConfig, ThemeName};

/// Day columns plus the time column.
pub const COLUMN_COUNT: usize = 8;

/// Row height by the largest cell in that row (index 9 covers 9 and up).
const ROW_HEIGHTS: [u32; 10] = [56, 56, 72, 96, 120, 144, 168, 192, 216, 240];

/// Grid-wide maximum entries per cell at which day columns widen.
const WIDTH_STEPS: [usize; 4] = [4, 6, 8, 10];
const DAY_WIDTHS: [u32; 5] = [180, 200, 220, 240, 260];
const LABEL_WIDTHS: [u32; 5] = [160, 165, 170, 175, 180];

/// Font sizes per density tier.
const LABEL_FONT: [u32; 5] = [13, 12, 11, 10, 9];
const HEADER_FONT: [u32; 5] = [16, 15, 14, 13, 12];
const ENTRY_FONT: [u32; 5] = [12, 11, 10, 9, 8];

const HEADER_HEIGHT: u32 = 50;
const BORDER_WIDTH: u32 = 1;
const FRAME_WIDTH: u32 = 2;
const ENTRY_BOX_MIN: u32 = 20;
const ENTRY_BOX_MAX: u32 = 28;
const ENTRY_BOX_PADDING: u32 = 6;
const ENTRY_SPACING: u32 = 4;
const CELL_PADDING: u32 = 8;
const BOX_INSET: u32 = 6;
const LINE_GAP: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center_x(&self) -> i32 {
        self.x + (self.width / 2) as i32
    }

    pub fn center_y(&self) -> i32 {
        self.y + (self.height / 2) as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Shrink horizontally by `dx` on each side.
    pub fn inset_x(&self, dx: u32) -> Rect {
        Rect::new(self.x + dx as i32, self.y, self.width.saturating_sub(2 * dx), self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSizes {
    /// Row label (time column)
    pub base: u32,
    pub header: u32,
    pub entry: u32,
}

/// Knobs that come from configuration rather than content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Oversampling factor applied to every linear dimension
    pub scale: u32,
    /// Smallest font size, in logical pixels
    pub min_font_size: u32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self { scale: 3, min_font_size: 8 }
    }
}

/// Every size the rasterizer needs, already multiplied by `scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    pub scale: u32,
    pub column_widths: [u32; COLUMN_COUNT],
    pub row_heights: Vec<u32>,
    pub header_height: u32,
    pub border_width: u32,
    pub frame_width: u32,
    pub fonts: FontSizes,
    pub entry_box_min_height: u32,
    pub entry_box_max_height: u32,
    pub entry_box_height: u32,
    pub spacing: u32,
    pub cell_padding: u32,
    pub box_inset: u32,
    pub text_padding: u32,
    pub line_gap: u32,
    pub corner_radius: u32,
}

/// Density tier for the grid-wide maximum entries per cell.
fn density_tier(max_entries: usize) -> usize {
    match max_entries {
        0..=2 => 0,
        3..=4 => 1,
        5..=6 => 2,
        7..=8 => 3,
        _ => 4,
    }
}

fn width_tier(max_entries: usize) -> usize {
    WIDTH_STEPS.iter().filter(|&&step| max_entries >= step).count()
}

/// Logical row height for a row whose fullest cell holds `count` entries.
pub fn row_height_for(count: usize) -> u32 {
    ROW_HEIGHTS[count.min(ROW_HEIGHTS.len() - 1)]
}

/// Most boxes a row grows to hold; fuller cells collapse into `+N more`.
pub const MAX_STACKED_ENTRIES: usize = ROW_HEIGHTS.len() - 1;

/// Logical row height that also fits `count` stacked boxes of `entry_box`
/// height, up to [`MAX_STACKED_ENTRIES`]. Raised font floors make boxes
/// taller than the step table assumes.
pub fn fitted_row_height(count: usize, entry_box: u32) -> u32 {
    let n = count.min(MAX_STACKED_ENTRIES) as u32;
    if n == 0 {
        return row_height_for(count);
    }
    let stack = n * entry_box + (n - 1) * ENTRY_SPACING + 2 * CELL_PADDING;
    row_height_for(count).max(stack)
}

/// Compute the layout for `grid`. Pure; draws nothing.
pub fn plan(grid: &ScheduleGrid, theme: &ThemeConfig, options: LayoutOptions) -> LayoutPlan {
    let s = options.scale.max(1);
    let max_entries = grid.max_entries();
    let tier = density_tier(max_entries);
    let wtier = width_tier(max_entries);
    let floor = options.min_font_size.max(1);

    let mut column_widths = [DAY_WIDTHS[wtier] * s; COLUMN_COUNT];
    column_widths[0] = LABEL_WIDTHS[wtier] * s;


    let fonts = FontSizes {
        base: LABEL_FONT[tier].max(floor) * s,
        header: HEADER_FONT[tier].max(floor) * s,
        entry: ENTRY_FONT[tier].max(floor) * s,
    };

    let entry_box = (ENTRY_FONT[tier].max(floor) + 2 * ENTRY_BOX_PADDING).clamp(ENTRY_BOX_MIN, ENTRY_BOX_MAX);
    let row_heights = (0..grid.row_count())
        .map(|r| fitted_row_height(grid.row_max(r), entry_box) * s)
        .collect();
    let corner_radius = match theme.name {
        ThemeName::Pink => 6,
        ThemeName::Dark | ThemeName::Light => 4,
    };

    LayoutPlan {
        scale: s,
        column_widths,
        row_heights,
        header_height: HEADER_HEIGHT * s,
        border_width: BORDER_WIDTH * s,
        frame_width: FRAME_WIDTH * s,
        fonts,
        entry_box_min_height: ENTRY_BOX_MIN * s,
        entry_box_max_height: ENTRY_BOX_MAX * s,
        entry_box_height: entry_box * s,
        spacing: ENTRY_SPACING * s,
        cell_padding: CELL_PADDING * s,
        box_inset: BOX_INSET * s,
        text_padding: ENTRY_BOX_PADDING * s,
        line_gap: LINE_GAP * s,
        corner_radius: corner_radius * s,
    }
}

impl LayoutPlan {
    /// Left edge of column `col`, just past its leading grid line.
    pub fn column_x(&self, col: usize) -> i32 {
        let b = self.border_width;
        (b + self.column_widths[..col].iter().map(|w| w + b).sum::<u32>()) as i32
    }

    /// Top edge of body row `row`, just past its leading grid line.
    pub fn row_y(&self, row: usize) -> i32 {
        let b = self.border_width;
        (b + self.header_height + b + self.row_heights[..row].iter().map(|h| h + b).sum::<u32>()) as i32
    }

    pub fn width(&self) -> u32 {
        self.column_x(COLUMN_COUNT) as u32
    }

    pub fn height(&self) -> u32 {
        self.row_y(self.row_heights.len()) as u32
    }

    pub fn header_rect(&self, col: usize) -> Rect {
        Rect::new(self.column_x(col), self.border_width as i32, self.column_widths[col], self.header_height)
    }

    pub fn cell_rect(&self, row: usize, col: usize) -> Rect {
        Rect::new(self.column_x(col), self.row_y(row), self.column_widths[col], self.row_heights[row])
    }

    /// How many entry boxes fit stacked in a cell of `row`.
    pub fn capacity(&self, row: usize) -> usize {
        let usable = self.row_heights[row].saturating_sub(2 * self.cell_padding) + self.spacing;
        ((usable / (self.entry_box_height + self.spacing)) as usize).max(1)
    }

    /// Rectangles for `count` entry boxes in a cell, stacked with fixed
    /// spacing and centered as a group. `count` must not exceed the capacity.
    pub fn entry_stack(&self, row: usize, col: usize, count: usize) -> Vec<Rect> {
        if count == 0 {
            return Vec::new();
        }
        let cell = self.cell_rect(row, col);
        let n = count as u32;
        let group = n * self.entry_box_height + (n - 1) * self.spacing;
        let top = cell.y + (cell.height.saturating_sub(group) / 2) as i32;
        let column = cell.inset_x(self.box_inset);
        (0..n)
            .map(|i| {
                Rect::new(
                    column.x,
                    top + (i * (self.entry_box_height + self.spacing)) as i32,
                    column.width,
                    self.entry_box_height,
                )
            })
            .collect()
    }

    /// Usable text width inside an entry box.
    pub fn entry_text_width(&self, box_rect: &Rect) -> u32 {
        box_rect.width.saturating_sub(2 * self.text_padding)
    }
}
