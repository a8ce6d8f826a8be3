//! Rasterizer: executes paint commands on an RGBA buffer and encodes PNG.

use super::layout::Rect;
use super::paint::PaintCommand;
use super::text::{bold_offset, glyph};
use super::Deadline;
use crate::color::Rgba;
use crate::error::{Error, Result};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgba as Pixel, RgbaImage};

pub struct Canvas {
    img: RgbaImage,
}

fn blend(dst: &mut Pixel<u8>, src: Rgba) {
    if src.a == 255 {
        *dst = Pixel(src.to_array());
        return;
    }
    let a = src.a as u32;
    let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a) + 127) / 255) as u8;
    let [dr, dg, db, da] = dst.0;
    *dst = Pixel([mix(src.r, dr), mix(src.g, dg), mix(src.b, db), da.max(src.a)]);
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { img: RgbaImage::new(width, height) }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let [r, g, b, a] = self.img.get_pixel(x, y).0;
        Some(Rgba { r, g, b, a })
    }

    fn put(&mut self, x: i32, y: i32, c: Rgba) {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return;
        }
        blend(self.img.get_pixel_mut(x as u32, y as u32), c);
    }

    pub fn fill_rect(&mut self, r: &Rect, c: Rgba) {
        for y in r.y..r.bottom() {
            for x in r.x..r.x + r.width as i32 {
                self.put(x, y, c);
            }
        }
    }

    pub fn stroke_rect(&mut self, r: &Rect, width: u32, c: Rgba) {
        let w = width.min(r.width).min(r.height);
        self.fill_rect(&Rect::new(r.x, r.y, r.width, w), c);
        self.fill_rect(&Rect::new(r.x, r.bottom() - w as i32, r.width, w), c);
        self.fill_rect(&Rect::new(r.x, r.y, w, r.height), c);
        self.fill_rect(&Rect::new(r.x + (r.width - w) as i32, r.y, w, r.height), c);
    }

    /// Whether pixel (x, y) lies inside `r` with corners of `radius`.
    fn inside_rounded(r: &Rect, radius: u32, x: i32, y: i32) -> bool {
        let rad = radius.min(r.width / 2).min(r.height / 2) as f32;
        let px = x as f32 + 0.5;
        let py = y as f32 + 0.5;
        let left = r.x as f32 + rad;
        let right = (r.x + r.width as i32) as f32 - rad;
        let top = r.y as f32 + rad;
        let bottom = r.bottom() as f32 - rad;
        let cx = px.clamp(left, right);
        let cy = py.clamp(top, bottom);
        let (dx, dy) = (px - cx, py - cy);
        dx * dx + dy * dy <= rad * rad
    }

    pub fn fill_rounded_rect(&mut self, r: &Rect, radius: u32, fill: Rgba, edge: Rgba, edge_width: u32) {
        let inner = Rect::new(
            r.x + edge_width as i32,
            r.y + edge_width as i32,
            r.width.saturating_sub(2 * edge_width),
            r.height.saturating_sub(2 * edge_width),
        );
        let inner_radius = radius.saturating_sub(edge_width);
        for y in r.y..r.bottom() {
            for x in r.x..r.x + r.width as i32 {
                if !Self::inside_rounded(r, radius, x, y) {
                    continue;
                }
                let c = if edge_width > 0 && !Self::inside_rounded(&inner, inner_radius, x, y) {
                    edge
                } else {
                    fill
                };
                self.put(x, y, c);
            }
        }
    }

    /// Draw one line of text with its glyph cells' top-left at (x, y).
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, size: u32, bold: bool, c: Rgba) {
        let smear = if bold { bold_offset(size) as i32 } else { 0 };
        for (i, ch) in text.chars().enumerate() {
            let bitmap = glyph(ch);
            let ox = x + (i as u32 * size) as i32;
            for py in 0..size {
                let row = bitmap[(py * 8 / size) as usize];
                for px in 0..size {
                    if row >> (px * 8 / size) & 1 == 0 {
                        continue;
                    }
                    let gx = ox + px as i32;
                    let gy = y + py as i32;
                    self.put(gx, gy, c);
                    if smear > 0 {
                        self.put(gx + smear, gy, c);
                    }
                }
            }
        }
    }

    pub fn execute(&mut self, cmd: &PaintCommand) {
        match cmd {
            PaintCommand::SolidRect { rect, rgba } => self.fill_rect(rect, *rgba),
            PaintCommand::StrokeRect { rect, width, rgba } => self.stroke_rect(rect, *width, *rgba),
            PaintCommand::RoundedRect { rect, radius, fill, edge, edge_width } => {
                self.fill_rounded_rect(rect, *radius, *fill, *edge, *edge_width)
            }
            PaintCommand::Text { x, y, text, size, bold, rgba } => {
                self.draw_text(*x, *y, text, *size, *bold, *rgba)
            }
        }
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(self.img.as_raw(), self.width(), self.height(), ExtendedColorType::Rgba8)
            .map_err(|e| Error::Render(format!("PNG encoding failed: {}", e)))?;
        Ok(out)
    }
}

/// Commands executed between deadline checks.
const DEADLINE_STRIDE: usize = 256;

/// Execute `commands` on a fresh canvas of the given size, checking
/// `deadline` every [`DEADLINE_STRIDE`] commands.
pub fn rasterize(
    width: u32,
    height: u32,
    commands: &[PaintCommand],
    deadline: Option<&Deadline>,
) -> Result<Canvas> {
    let mut canvas = Canvas::new(width, height);
    for (i, cmd) in commands.iter().enumerate() {
        if i % DEADLINE_STRIDE == 0 {
            if let Some(d) = deadline {
                d.check()?;
            }
        }
        canvas.execute(cmd);
    }
    Ok(canvas)
}
