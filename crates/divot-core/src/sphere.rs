//! Rotating engram sphere: a fixed cloud of points on a sphere, projected and
//! painted back-to-front every frame.

use crate::canvas::{fit_to_container, Canvas, Glow, Rgba};
use crate::frame_loop::Renderer;
use crate::projection::{Projected, Projector, Rotation};
use glam::{Vec2, Vec3};
use rand::Rng;
use serde::Deserialize;
use std::f32::consts::TAU;
use std::rc::Rc;

pub const BACKGROUND_POINT_COLOR: Rgba = Rgba::hex(0x06b6d4);
pub const SEED_POINT_COLOR: Rgba = Rgba::hex(0x84cc16);
pub const SEED_GLOW_BLUR: f32 = 15.0;

/// Points whose fade factor falls below this are not drawn.
pub const VISIBILITY_FLOOR: f32 = 0.1;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SphereParams {
    pub point_count: usize,
    pub radius: f32,
    pub point_size: f32,
    pub seed_position: [f32; 3],
    pub seed_size: f32,
    /// Rotation about X per frame.
    pub pitch_step: f32,
    /// Rotation about Y per frame.
    pub yaw_step: f32,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            point_count: 200,
            radius: 0.8,
            point_size: 1.5,
            seed_position: [0.5, 0.5, 0.5],
            seed_size: 6.0,
            pitch_step: 0.005,
            yaw_step: 0.01,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointKind {
    Background,
    /// The distinguished "new memory" point.
    Seed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpherePoint {
    pub position: Vec3,
    pub kind: PointKind,
    pub size: f32,
}

/// Sample a direction uniformly over the sphere surface.
///
/// The polar angle is `acos(u)` with `u` uniform in [-1, 1]; sampling the angle
/// itself uniformly would crowd points at the poles.
pub fn uniform_on_sphere<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let azimuth = rng.gen_range(0.0..TAU);
    let polar = rng.gen_range(-1.0f32..=1.0).acos();
    let (sp, cp) = polar.sin_cos();
    radius * Vec3::new(sp * azimuth.cos(), sp * azimuth.sin(), cp)
}

/// Immutable point cloud, built once per mount and shared read-only.
#[derive(Clone, Debug)]
pub struct SpherePointSet {
    points: Rc<[SpherePoint]>,
}

impl SpherePointSet {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, params: &SphereParams) -> Self {
        let mut points: Vec<SpherePoint> = (0..params.point_count)
            .map(|_| SpherePoint {
                position: uniform_on_sphere(rng, params.radius),
                kind: PointKind::Background,
                size: params.point_size,
            })
            .collect();
        points.push(SpherePoint {
            position: Vec3::from_array(params.seed_position),
            kind: PointKind::Seed,
            size: params.seed_size,
        });
        Self {
            points: points.into(),
        }
    }

    pub fn points(&self) -> &[SpherePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedPoint {
    pub screen: Vec2,
    pub depth: f32,
    pub kind: PointKind,
    pub size: f32,
}

impl ProjectedPoint {
    /// 0 at the far pole, 1 at the near pole.
    pub fn fade(&self) -> f32 {
        (self.depth + 1.0) / 2.0
    }
}

/// Project every point and order them far-to-near for painter's drawing.
pub fn project_sorted(points: &[SpherePoint], projector: &Projector) -> Vec<ProjectedPoint> {
    let mut out: Vec<ProjectedPoint> = points
        .iter()
        .map(|p| {
            let Projected { screen, depth } = projector.project(p.position);
            ProjectedPoint {
                screen,
                depth,
                kind: p.kind,
                size: p.size,
            }
        })
        .collect();
    out.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    out
}

pub struct SphereRenderer {
    params: SphereParams,
    points: SpherePointSet,
    rotation: Rotation,
}

impl SphereRenderer {
    pub fn new(params: SphereParams, points: SpherePointSet) -> Self {
        Self {
            params,
            points,
            rotation: Rotation::default(),
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn points(&self) -> &SpherePointSet {
        &self.points
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        let viewport = fit_to_container(canvas);
        canvas.clear();
        let projector = Projector::new(self.rotation, viewport);
        for p in project_sorted(self.points.points(), &projector) {
            let fade = p.fade();
            if fade < VISIBILITY_FLOOR {
                continue;
            }
            match p.kind {
                PointKind::Seed => canvas.fill_circle(
                    p.screen,
                    p.size,
                    SEED_POINT_COLOR,
                    Some(Glow {
                        color: SEED_POINT_COLOR,
                        blur: SEED_GLOW_BLUR,
                    }),
                ),
                PointKind::Background => canvas.fill_circle(
                    p.screen,
                    p.size,
                    BACKGROUND_POINT_COLOR.with_alpha(fade),
                    None,
                ),
            }
        }
    }
}

impl Renderer for SphereRenderer {
    fn render_frame(&mut self, canvas: &mut dyn Canvas) {
        self.draw(canvas);
        self.rotation.yaw += self.params.yaw_step;
        self.rotation.pitch += self.params.pitch_step;
    }
}
