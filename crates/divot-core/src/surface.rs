//! "Tiled valley" topology: an animated height field drawn as an isometric
//! wireframe.

use crate::canvas::{fit_to_container, Canvas, Rect, Rgba, Stroke};
use crate::frame_loop::Renderer;
use crate::projection::Isometric;
use serde::Deserialize;

pub const SURFACE_BACKGROUND: Rgba = Rgba::hex(0x020617);
/// Lines from a vertex to its right neighbor.
pub const SURFACE_ROW_COLOR: Rgba = Rgba::rgb(0, 255, 255);
/// Lines from a vertex to the neighbor below.
pub const SURFACE_COLUMN_COLOR: Rgba = Rgba::rgb(168, 85, 247);

pub const MIN_LINE_ALPHA: f32 = 0.2;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SurfaceParams {
    pub cols: u32,
    pub rows: u32,
    /// Peak height in pixels.
    pub amplitude: f32,
    /// Spatial frequency applied to normalized grid coordinates.
    pub frequency: f32,
    /// Phase advance per frame.
    pub phase_step: f32,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            cols: 20,
            rows: 20,
            amplitude: 20.0,
            frequency: 3.0,
            phase_step: 0.02,
        }
    }
}

/// Animation-time scalar; only ever moves forward.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct AnimationPhase(f32);

impl AnimationPhase {
    pub fn value(self) -> f32 {
        self.0
    }

    pub fn advance(&mut self, step: f32) {
        self.0 += step.abs();
    }
}

/// `amplitude * sin(f*x + phase) * cos(f*y + phase)` for normalized `x`, `y`.
#[inline]
pub fn surface_height(
    x_local: f32,
    y_local: f32,
    phase: f32,
    frequency: f32,
    amplitude: f32,
) -> f32 {
    amplitude * (frequency * x_local + phase).sin() * (frequency * y_local + phase).cos()
}

/// Peaks are brighter: 0.2 in the deepest valley up to 0.7 on the highest peak.
#[inline]
pub fn height_alpha(height: f32, amplitude: f32) -> f32 {
    if amplitude <= 0.0 {
        return MIN_LINE_ALPHA;
    }
    let h = height.clamp(-amplitude, amplitude);
    MIN_LINE_ALPHA + (h + amplitude) / (4.0 * amplitude)
}

pub struct SurfaceRenderer {
    params: SurfaceParams,
    phase: AnimationPhase,
}

impl SurfaceRenderer {
    pub fn new(params: SurfaceParams) -> Self {
        Self {
            params,
            phase: AnimationPhase::default(),
        }
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    /// Height at grid vertex (`col`, `row`) for the current phase.
    pub fn height_at(&self, col: u32, row: u32) -> f32 {
        let (x, y) = self.local(col as f32, row as f32);
        surface_height(
            x,
            y,
            self.phase.value(),
            self.params.frequency,
            self.params.amplitude,
        )
    }

    fn half_extents(&self) -> (f32, f32) {
        (
            (self.params.cols as f32 / 2.0).max(1.0),
            (self.params.rows as f32 / 2.0).max(1.0),
        )
    }

    /// Grid coordinates to the [-1, 1] square.
    fn local(&self, col: f32, row: f32) -> (f32, f32) {
        let (hx, hy) = self.half_extents();
        ((col - hx) / hx, (row - hy) / hy)
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        let viewport = fit_to_container(canvas);
        canvas.clear();
        canvas.fill_rect(
            Rect::new(0.0, 0.0, viewport.width, viewport.height),
            SURFACE_BACKGROUND,
        );

        let SurfaceParams {
            cols,
            rows,
            amplitude,
            frequency,
            ..
        } = self.params;
        let iso = Isometric::new(cols, rows, viewport);
        let (hx, hy) = self.half_extents();
        let phase = self.phase.value();
        let vertex = |col: u32, row: u32| {
            let (gx, gy) = (col as f32 - hx, row as f32 - hy);
            let h = surface_height(gx / hx, gy / hy, phase, frequency, amplitude);
            (iso.project(gx, gy, h), h)
        };

        for row in 0..=rows {
            for col in 0..=cols {
                let (here, h) = vertex(col, row);
                let alpha = height_alpha(h, amplitude);
                if col < cols {
                    let (right, _) = vertex(col + 1, row);
                    canvas.stroke_line(
                        here,
                        right,
                        Stroke::solid(SURFACE_ROW_COLOR.with_alpha(alpha), 1.0),
                    );
                }
                if row < rows {
                    let (below, _) = vertex(col, row + 1);
                    canvas.stroke_line(
                        here,
                        below,
                        Stroke::solid(SURFACE_COLUMN_COLOR.with_alpha(alpha), 1.0),
                    );
                }
            }
        }
    }
}

impl Renderer for SurfaceRenderer {
    fn render_frame(&mut self, canvas: &mut dyn Canvas) {
        self.draw(canvas);
        self.phase.advance(self.params.phase_step);
    }
}
