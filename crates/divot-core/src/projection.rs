//! 3D to 2D projection used by both renderers.

use crate::canvas::Viewport;
use glam::{Mat3, Vec2, Vec3};

/// Fraction of the viewport's shorter side covered by one unit of model space.
pub const ORTHO_SCALE: f32 = 0.4;

/// Rotation applied before projection: yaw about Y first, then pitch about X.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotation {
    pub pitch: f32,
    pub yaw: f32,
}

impl Rotation {
    pub fn new(pitch: f32, yaw: f32) -> Self {
        Self { pitch, yaw }
    }

    /// `pitch_matrix * yaw_matrix`.
    pub fn matrix(&self) -> Mat3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sx, cx) = self.pitch.sin_cos();
        let yaw = Mat3::from_cols(
            Vec3::new(cy, 0.0, sy),
            Vec3::Y,
            Vec3::new(-sy, 0.0, cy),
        );
        let pitch = Mat3::from_cols(
            Vec3::X,
            Vec3::new(0.0, cx, sx),
            Vec3::new(0.0, -sx, cx),
        );
        pitch * yaw
    }

    pub fn rotate(&self, p: Vec3) -> Vec3 {
        self.matrix() * p
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub screen: Vec2,
    /// Post-rotation z; larger is nearer the viewer.
    pub depth: f32,
}

/// Orthographic projector for one frame: rotation matrix, scale and center are
/// computed once and reused for every point.
#[derive(Clone, Copy, Debug)]
pub struct Projector {
    matrix: Mat3,
    scale: f32,
    center: Vec2,
}

impl Projector {
    pub fn new(rotation: Rotation, viewport: Viewport) -> Self {
        Self {
            matrix: rotation.matrix(),
            scale: viewport.shorter_side() * ORTHO_SCALE,
            center: viewport.center(),
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn project(&self, p: Vec3) -> Projected {
        let r = self.matrix * p;
        Projected {
            screen: Vec2::new(r.x, r.y) * self.scale + self.center,
            depth: r.z,
        }
    }
}

/// One-shot convenience over [`Projector`].
pub fn project(p: Vec3, rotation: Rotation, viewport: Viewport) -> Projected {
    Projector::new(rotation, viewport).project(p)
}

/// Non-rotating isometric transform for a `cols x rows` grid filling a viewport.
#[derive(Clone, Copy, Debug)]
pub struct Isometric {
    cell_w: f32,
    cell_h: f32,
    origin: Vec2,
}

impl Isometric {
    pub fn new(cols: u32, rows: u32, viewport: Viewport) -> Self {
        Self {
            cell_w: viewport.width / (cols as f32 * 1.5),
            cell_h: viewport.height / (rows as f32 * 1.5),
            origin: Vec2::new(viewport.width / 2.0, viewport.height / 3.0),
        }
    }

    /// `gx`, `gy` are grid coordinates centered on the grid midpoint; `lift`
    /// is the surface height in pixels and raises the point on screen.
    #[inline]
    pub fn project(&self, gx: f32, gy: f32, lift: f32) -> Vec2 {
        Vec2::new(
            (gx - gy) * self.cell_w * 0.8 + self.origin.x,
            (gx + gy) * self.cell_h * 0.4 - lift + self.origin.y,
        )
    }
}
