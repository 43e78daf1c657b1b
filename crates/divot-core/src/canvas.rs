//! Drawing surface abstraction shared by the renderers and the chart panels.
//!
//! The web frontend implements [`Canvas`] on top of a `CanvasRenderingContext2d`;
//! host tests implement it as a command recorder. Coordinates are in canvas
//! pixels with the origin at the top-left corner.

use glam::Vec2;

/// Pixel size of a drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Used when the containing panel reports no size (detached or collapsed).
    pub const FALLBACK: Viewport = Viewport {
        width: 300.0,
        height: 200.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Replace a degenerate size with [`Viewport::FALLBACK`].
    pub fn or_fallback(self) -> Self {
        if self.width >= 1.0 && self.height >= 1.0 {
            self
        } else {
            Self::FALLBACK
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    pub fn shorter_side(&self) -> f32 {
        self.width.min(self.height)
    }
}

/// Straight-alpha sRGB color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// `0xRRGGBB`, fully opaque.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
            a: 1.0,
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS color string accepted by canvas `fillStyle`/`strokeStyle`.
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f32,
    /// `[dash, gap]` in pixels; `None` for a solid line.
    pub dash: Option<[f32; 2]>,
}

impl Stroke {
    pub fn solid(color: Rgba, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Rgba, width: f32, dash: f32, gap: f32) -> Self {
        Self {
            color,
            width,
            dash: Some([dash, gap]),
        }
    }
}

/// Blurred halo drawn behind a filled shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub color: Rgba,
    pub blur: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub color: Rgba,
    pub size_px: f32,
    pub align: TextAlign,
}

/// Minimal immediate-mode 2D drawing surface.
pub trait Canvas {
    /// Current pixel size of the element that contains the surface.
    fn container_size(&self) -> Viewport;
    /// Set the backing store size. Implementations may clear as a side effect.
    fn resize(&mut self, viewport: Viewport);
    /// Clear to transparent.
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: Rect, color: Rgba);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: Stroke);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba, glow: Option<Glow>);
    fn fill_text(&mut self, text: &str, at: Vec2, style: TextStyle);
}

/// Read the container size, resize the backing store to it and return it.
///
/// Every frame starts with this so container resizes are honored without a
/// resize listener.
pub fn fit_to_container(canvas: &mut dyn Canvas) -> Viewport {
    let viewport = canvas.container_size().or_fallback();
    canvas.resize(viewport);
    viewport
}
