//! Terminal backend: a `Canvas` that rasterises into half-block cells.
//!
//! The logical window (e.g. 800×600) is scaled onto `cols × rows*2` pixels;
//! every terminal cell shows two vertical pixels as `▀` with the top pixel in
//! the foreground colour and the bottom pixel in the background colour.
//! Text is laid over whole cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Attribute, Color, Print},
    QueueableCommand,
};
use glam::Vec2;

use crate::engine::{rotate_about_centroid, Canvas, Rgba};

const HALF_BLOCK: char = '▀';
/// Text at or above this size is printed bold.
const BOLD_TEXT_SIZE: f32 = 24.0;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Glyph {
    ch: char,
    color: Rgba,
    bold: bool,
}

pub struct TerminalCanvas {
    cols: u16,
    rows: u16,
    /// Logical window size the game draws in.
    world: Vec2,
    pixels: Vec<Rgba>,
    glyphs: Vec<Option<Glyph>>,
    fill: Rgba,
    stroke: Option<Rgba>,
    text_size: f32,
}

impl TerminalCanvas {
    pub fn new(cols: u16, rows: u16, width: f32, height: f32) -> Self {
        let mut canvas = Self {
            cols: 0,
            rows: 0,
            world: Vec2::new(width, height),
            pixels: Vec::new(),
            glyphs: Vec::new(),
            fill: Rgba::WHITE,
            stroke: None,
            text_size: 12.0,
        };
        canvas.resize(cols, rows);
        canvas
    }

    /// Reallocate for a new terminal size.  The contents are blanked.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.pixels = vec![Rgba::BLACK; cols as usize * rows as usize * 2];
        self.glyphs = vec![None; cols as usize * rows as usize];
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    pub fn pixel_width(&self) -> usize {
        self.cols as usize
    }

    pub fn pixel_height(&self) -> usize {
        self.rows as usize * 2
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.pixel_width() || y >= self.pixel_height() {
            return None;
        }
        Some(self.pixels[y * self.pixel_width() + x])
    }

    pub fn glyph(&self, col: u16, row: u16) -> Option<char> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.glyphs[row as usize * self.cols as usize + col as usize].map(|g| g.ch)
    }

    /// Pixels per logical unit on each axis.
    fn scale(&self) -> Vec2 {
        Vec2::new(
            self.pixel_width() as f32 / self.world.x,
            self.pixel_height() as f32 / self.world.y,
        )
    }

    fn pixel_center(&self, x: usize, y: usize) -> Vec2 {
        Vec2::new(x as f32 + 0.5, y as f32 + 0.5) / self.scale()
    }

    fn blend(&mut self, x: usize, y: usize, color: Rgba) {
        let i = y * self.pixel_width() + x;
        self.pixels[i] = color.over(self.pixels[i]);
    }

    /// Paint every pixel whose centre satisfies `inside`, scanning only the
    /// pixels under the logical box `min..max`.  Pixels with an outside
    /// neighbour take the stroke colour when one is set.  A shape too small
    /// to cover any pixel centre still lights the pixel under `anchor`.
    fn paint<F: Fn(Vec2) -> bool>(&mut self, min: Vec2, max: Vec2, anchor: Vec2, inside: F) {
        let (pw, ph) = (self.pixel_width(), self.pixel_height());
        if pw == 0 || ph == 0 {
            return;
        }
        let scale = self.scale();
        let step = Vec2::ONE / scale;
        let lo = (min * scale).floor().max(Vec2::ZERO);
        let hi = (max * scale).ceil();
        let (x0, y0) = (lo.x as usize, lo.y as usize);
        let x1 = (hi.x.max(0.0) as usize).min(pw);
        let y1 = (hi.y.max(0.0) as usize).min(ph);

        let mut painted = 0usize;
        for y in y0..y1 {
            for x in x0..x1 {
                let c = self.pixel_center(x, y);
                if !inside(c) {
                    continue;
                }
                let color = match self.stroke {
                    Some(stroke) if on_border(c, step, &inside) => stroke,
                    _ => self.fill,
                };
                self.blend(x, y, color);
                painted += 1;
            }
        }

        if painted == 0 {
            let p = anchor * scale;
            if p.x >= 0.0 && p.y >= 0.0 && (p.x as usize) < pw && (p.y as usize) < ph {
                let fill = self.fill;
                self.blend(p.x as usize, p.y as usize, fill);
            }
        }
    }

    /// Emit the frame.  Colour and attribute changes are queued only when
    /// they differ from the previous cell.
    pub fn present<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let mut fg: Option<Rgba> = None;
        let mut bg: Option<Rgba> = None;
        let mut bold = false;

        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row))?;
            for col in 0..self.cols {
                let (x, y) = (col as usize, row as usize * 2);
                let top = self.pixels[y * self.pixel_width() + x];
                let bottom = self.pixels[(y + 1) * self.pixel_width() + x];
                let glyph = self.glyphs[row as usize * self.cols as usize + x];

                let (ch, cell_fg, cell_bg, cell_bold) = match glyph {
                    Some(g) => (g.ch, g.color, top, g.bold),
                    None => (HALF_BLOCK, top, bottom, false),
                };

                if cell_bold != bold {
                    let attr = if cell_bold { Attribute::Bold } else { Attribute::NormalIntensity };
                    out.queue(style::SetAttribute(attr))?;
                    bold = cell_bold;
                }
                if fg != Some(cell_fg) {
                    out.queue(style::SetForegroundColor(to_color(cell_fg)))?;
                    fg = Some(cell_fg);
                }
                if bg != Some(cell_bg) {
                    out.queue(style::SetBackgroundColor(to_color(cell_bg)))?;
                    bg = Some(cell_bg);
                }
                out.queue(Print(ch))?;
            }
        }

        out.queue(style::SetAttribute(Attribute::Reset))?;
        out.queue(style::ResetColor)?;
        out.flush()?;
        Ok(())
    }
}

fn to_color(c: Rgba) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

fn on_border<F: Fn(Vec2) -> bool>(c: Vec2, step: Vec2, inside: &F) -> bool {
    [
        Vec2::new(step.x, 0.0),
        Vec2::new(-step.x, 0.0),
        Vec2::new(0.0, step.y),
        Vec2::new(0.0, -step.y),
    ]
    .iter()
    .any(|d| !inside(c + *d))
}

fn edge(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    (p.x - b.x) * (a.y - b.y) - (a.x - b.x) * (p.y - b.y)
}

/// Winding-independent point-in-triangle test.
fn in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d = [edge(p, a, b), edge(p, b, c), edge(p, c, a)];
    let neg = d.iter().any(|v| *v < 0.0);
    let pos = d.iter().any(|v| *v > 0.0);
    !(neg && pos)
}

impl Canvas for TerminalCanvas {
    fn clear(&mut self, color: Rgba) {
        let opaque = Rgba { a: 255, ..color };
        self.pixels.iter_mut().for_each(|p| *p = opaque);
        self.glyphs.iter_mut().for_each(|g| *g = None);
    }

    fn fill(&mut self, color: Rgba) {
        self.fill = color;
    }

    fn stroke(&mut self, color: Option<Rgba>) {
        self.stroke = color;
    }

    fn text_size(&mut self, size: f32) {
        self.text_size = size;
    }

    fn rect(&mut self, center: Vec2, w: f32, h: f32) {
        let half = Vec2::new(w, h) / 2.0;
        self.paint(center - half, center + half, center, |p| {
            (p.x - center.x).abs() <= half.x && (p.y - center.y).abs() <= half.y
        });
    }

    fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2) {
        let min = a.min(b).min(c);
        let max = a.max(b).max(c);
        let centroid = (a + b + c) / 3.0;
        self.paint(min, max, centroid, |p| in_triangle(p, a, b, c));
    }

    fn triangle_rotated(&mut self, a: Vec2, b: Vec2, c: Vec2, degrees: f32) {
        let [a, b, c] = rotate_about_centroid([a, b, c], degrees);
        self.triangle(a, b, c);
    }

    fn circle(&mut self, center: Vec2, diameter: f32) {
        let r = diameter / 2.0;
        self.paint(center - Vec2::splat(r), center + Vec2::splat(r), center, |p| {
            p.distance(center) <= r
        });
    }

    fn text(&mut self, text: &str, pos: Vec2) {
        if self.cols == 0 || self.rows == 0 {
            return;
        }
        let p = pos * self.scale();
        if p.x < 0.0 || p.y < 0.0 {
            return;
        }
        // The baseline sits under the glyphs, so use the pixel row just above it.
        let row = (p.y as usize).saturating_sub(1) / 2;
        if row >= self.rows as usize {
            return;
        }
        let glyph_color = self.fill.over(Rgba::BLACK);
        let bold = self.text_size >= BOLD_TEXT_SIZE;
        let start = p.x as usize;
        for (i, ch) in text.chars().enumerate() {
            let col = start + i;
            if col >= self.cols as usize {
                break;
            }
            self.glyphs[row * self.cols as usize + col] = Some(Glyph {
                ch,
                color: glyph_color,
                bold,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 100×30 cells → 100×60 pixels over 800×600: 8×10 units per pixel.
    fn canvas() -> TerminalCanvas {
        let mut c = TerminalCanvas::new(100, 30, 800.0, 600.0);
        c.clear(Rgba::BLACK);
        c
    }

    fn lit(c: &TerminalCanvas) -> usize {
        (0..c.pixel_height())
            .flat_map(|y| (0..c.pixel_width()).map(move |x| (x, y)))
            .filter(|&(x, y)| c.pixel(x, y) != Some(Rgba::BLACK))
            .count()
    }

    #[test]
    fn circle_covers_its_centre_pixel() {
        let mut c = canvas();
        c.fill(Rgba::rgb(212, 21, 208));
        c.circle(Vec2::new(400.0, 300.0), 30.0);
        assert_eq!(c.pixel(50, 30), Some(Rgba::rgb(212, 21, 208)));
        assert_eq!(c.pixel(0, 0), Some(Rgba::BLACK));
    }

    #[test]
    fn tiny_shape_still_lights_one_pixel() {
        let mut c = canvas();
        c.fill(Rgba::WHITE);
        // Diameter 2 at a pixel corner covers no pixel centre.
        c.circle(Vec2::new(16.0, 20.0), 2.0);
        assert_eq!(lit(&c), 1);
        assert_eq!(c.pixel(2, 2), Some(Rgba::WHITE));
    }

    #[test]
    fn offscreen_shapes_are_clipped() {
        let mut c = canvas();
        c.fill(Rgba::WHITE);
        c.circle(Vec2::new(-500.0, -500.0), 30.0);
        c.rect(Vec2::new(2000.0, 2000.0), 20.0, 20.0);
        assert_eq!(lit(&c), 0);
    }

    #[test]
    fn alpha_blends_over_background() {
        let mut c = canvas();
        c.fill(Rgba::rgba(255, 255, 255, 128));
        c.rect(Vec2::new(400.0, 300.0), 40.0, 40.0);
        assert_eq!(c.pixel(50, 30), Some(Rgba::rgb(128, 128, 128)));
    }

    #[test]
    fn stroke_outlines_rect() {
        let mut c = canvas();
        c.fill(Rgba::WHITE);
        c.stroke(Some(Rgba::rgb(255, 0, 0)));
        c.rect(Vec2::new(400.0, 300.0), 80.0, 100.0);
        // Interior keeps the fill, the outermost covered column takes the stroke.
        assert_eq!(c.pixel(50, 30), Some(Rgba::WHITE));
        assert_eq!(c.pixel(45, 30), Some(Rgba::rgb(255, 0, 0)));
    }

    #[test]
    fn triangle_winding_does_not_matter() {
        let a = Vec2::new(400.0, 200.0);
        let b = Vec2::new(300.0, 400.0);
        let d = Vec2::new(500.0, 400.0);
        let mut cw = canvas();
        cw.triangle(a, b, d);
        let mut ccw = canvas();
        ccw.triangle(a, d, b);
        assert!(lit(&cw) > 0);
        assert_eq!(lit(&cw), lit(&ccw));
    }

    #[test]
    fn text_lands_above_baseline() {
        let mut c = canvas();
        c.fill(Rgba::WHITE);
        c.text_size(30.0);
        c.text("SCORE: 0", Vec2::new(50.0, 100.0));
        // x 50 → column 6; y 100 → pixel 10 → cell row 4.
        assert_eq!(c.glyph(6, 4), Some('S'));
        assert_eq!(c.glyph(13, 4), Some('0'));
        assert_eq!(c.glyph(14, 4), None);
    }

    #[test]
    fn text_is_cut_at_the_right_edge() {
        let mut c = canvas();
        c.text("abcdef", Vec2::new(776.0, 100.0));
        assert_eq!(c.glyph(97, 4), Some('a'));
        assert_eq!(c.glyph(99, 4), Some('c'));
    }

    #[test]
    fn clear_drops_text() {
        let mut c = canvas();
        c.text("hi", Vec2::new(50.0, 100.0));
        c.clear(Rgba::BLACK);
        assert_eq!(c.glyph(6, 4), None);
    }

    #[test]
    fn resize_reallocates() {
        let mut c = canvas();
        c.resize(40, 10);
        assert_eq!(c.size(), (40, 10));
        assert_eq!(c.pixel_height(), 20);
        assert_eq!(c.pixel(39, 19), Some(Rgba::BLACK));
        assert_eq!(c.pixel(40, 0), None);
    }

    #[test]
    fn present_prints_every_cell() {
        let mut c = TerminalCanvas::new(4, 2, 800.0, 600.0);
        c.clear(Rgba::BLACK);
        c.text("ok", Vec2::new(0.0, 300.0));
        let mut out = Vec::new();
        c.present(&mut out).unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.contains("ok"));
        assert_eq!(s.matches(HALF_BLOCK).count(), 6);
    }
}
