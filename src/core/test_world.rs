//! Core domain: deterministic in-memory physics world for unit tests.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::core::physics::{OverlapHit, PhysicsQuery, RayHit, SurfaceTag};
use crate::movement::GameLayer;

#[derive(Debug, Clone)]
pub(crate) struct TestBox {
    pub min: Vec2,
    pub max: Vec2,
    pub tag: SurfaceTag,
    pub layer: GameLayer,
}

/// Axis-aligned boxes standing in for level geometry.
#[derive(Debug, Clone, Default)]
pub(crate) struct TestWorld {
    pub boxes: Vec<TestBox>,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ground(mut self, center: Vec2, half_extents: Vec2) -> Self {
        self.boxes.push(TestBox {
            min: center - half_extents,
            max: center + half_extents,
            tag: SurfaceTag::Ground,
            layer: GameLayer::Ground,
        });
        self
    }

    pub fn with_wall(mut self, center: Vec2, half_extents: Vec2) -> Self {
        self.boxes.push(TestBox {
            min: center - half_extents,
            max: center + half_extents,
            tag: SurfaceTag::Wall,
            layer: GameLayer::Wall,
        });
        self
    }

    /// A floor whose top surface sits at y = 0.
    pub fn flat_floor() -> Self {
        Self::new().with_ground(Vec2::new(0.0, -0.5), Vec2::new(100.0, 0.5))
    }

    fn matches(mask: LayerMask, layer: GameLayer) -> bool {
        mask.0 & layer.to_bits() != 0
    }
}

fn ray_box(origin: Vec2, dir: Vec2, max_distance: f32, b: &TestBox) -> Option<(f32, Vec2)> {
    let mut t_min = 0.0_f32;
    let mut t_max = max_distance;
    let mut normal = Vec2::ZERO;

    for axis in 0..2 {
        let o = origin[axis];
        let d = dir[axis];
        let (lo, hi) = (b.min[axis], b.max[axis]);

        if d.abs() < 1e-6 {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let (mut t1, mut t2) = ((lo - o) * inv, (hi - o) * inv);
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }

        let mut face = Vec2::ZERO;
        face[axis] = -d.signum();
        if t1 > t_min {
            t_min = t1;
            normal = face;
        }
        t_max = t_max.min(t2);
        if t_min > t_max {
            return None;
        }
    }

    Some((t_min, normal))
}

impl PhysicsQuery for TestWorld {
    fn ray_query(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Vec<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec2::ZERO {
            return Vec::new();
        }

        let mut hits: Vec<RayHit> = self
            .boxes
            .iter()
            .filter(|b| Self::matches(mask, b.layer))
            .filter_map(|b| {
                ray_box(origin, dir, max_distance, b).map(|(distance, normal)| RayHit {
                    tag: b.tag,
                    distance,
                    point: origin + dir * distance,
                    normal,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn circle_overlap_all(&self, point: Vec2, radius: f32, mask: LayerMask) -> Vec<OverlapHit> {
        self.boxes
            .iter()
            .filter(|b| Self::matches(mask, b.layer))
            .filter_map(|b| {
                let closest_point = point.clamp(b.min, b.max);
                (closest_point.distance(point) <= radius).then_some(OverlapHit {
                    tag: b.tag,
                    closest_point,
                })
            })
            .collect()
    }
}
