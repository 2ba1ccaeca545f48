//! The capability surface the game core draws through and is driven by.
//!
//! Backends implement `Canvas`; the game implements `Scene`.  Neither side
//! knows about the other's concrete type.

use glam::Vec2;

use crate::entities::FrameInput;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Composite `self` over an opaque `below`.
    pub fn over(self, below: Rgba) -> Rgba {
        let a = self.a as u16;
        let mix = |top: u8, bottom: u8| ((top as u16 * a + bottom as u16 * (255 - a)) / 255) as u8;
        Rgba::rgb(mix(self.r, below.r), mix(self.g, below.g), mix(self.b, below.b))
    }
}

/// Immediate-mode 2D drawing in window units.
///
/// Fill, stroke and text size are sticky state, like a pen: they apply to
/// every following call until changed.
pub trait Canvas {
    fn clear(&mut self, color: Rgba);
    fn fill(&mut self, color: Rgba);
    /// `None` disables outlines.
    fn stroke(&mut self, color: Option<Rgba>);
    fn text_size(&mut self, size: f32);

    /// Axis-aligned rectangle centred on `center`.
    fn rect(&mut self, center: Vec2, w: f32, h: f32);
    fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2);
    /// Triangle rotated by `degrees` (clockwise on screen) about its centroid.
    fn triangle_rotated(&mut self, a: Vec2, b: Vec2, c: Vec2, degrees: f32);
    fn circle(&mut self, center: Vec2, diameter: f32);
    /// `pos` is the left end of the text baseline.
    fn text(&mut self, text: &str, pos: Vec2);
}

/// Lifecycle callbacks handed to a run loop once at startup.
pub trait Scene {
    fn init(&mut self);
    fn update<C: Canvas>(&mut self, input: &FrameInput, canvas: &mut C);
    fn exit(&mut self);
}

/// Rotate `points` about their centroid by `degrees`.
pub fn rotate_about_centroid(points: [Vec2; 3], degrees: f32) -> [Vec2; 3] {
    let centroid = (points[0] + points[1] + points[2]) / 3.0;
    let rot = Vec2::from_angle(degrees.to_radians());
    points.map(|p| centroid + rot.rotate(p - centroid))
}
