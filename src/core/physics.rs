//! Core domain: physics query seam between gameplay policy and the engine.

use avian2d::prelude::*;
use bevy::ecs::query::Has;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::movement::{GameLayer, Ground, Player, Wall};

/// Upper bound on hits collected by a single ray query.
const MAX_RAY_HITS: u32 = 8;

/// Gameplay tag carried by a collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceTag {
    Ground,
    Wall,
    Player,
    Untagged,
}

impl SurfaceTag {
    /// Ground and walls reflect projectiles.
    pub fn is_bounce_surface(self) -> bool {
        matches!(self, SurfaceTag::Ground | SurfaceTag::Wall)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub tag: SurfaceTag,
    pub distance: f32,
    pub point: Vec2,
    /// Surface normal at the hit, pointing out of the surface.
    pub normal: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapHit {
    pub tag: SurfaceTag,
    /// Point on the overlapping collider closest to the query center.
    pub closest_point: Vec2,
}

/// Read-only queries the gameplay core issues against the physics world.
///
/// Every query that finds nothing resolves to an empty result; callers treat
/// that as "condition false" and never as an error.
pub trait PhysicsQuery {
    /// All hits along a ray, nearest first.
    fn ray_query(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Vec<RayHit>;

    /// Every collider on `mask` overlapping the circle.
    fn circle_overlap_all(&self, point: Vec2, radius: f32, mask: LayerMask) -> Vec<OverlapHit>;

    /// Any collider on `mask` overlapping the circle.
    fn circle_overlap(&self, point: Vec2, radius: f32, mask: LayerMask) -> Option<OverlapHit> {
        self.circle_overlap_all(point, radius, mask).into_iter().next()
    }
}

/// Reflect `vector` about the surface `normal`.
pub fn reflect(vector: Vec2, normal: Vec2) -> Vec2 {
    let normal = normal.normalize_or_zero();
    vector - 2.0 * vector.dot(normal) * normal
}

/// Layers that count as level geometry (floors, platforms, walls).
pub fn surface_mask() -> LayerMask {
    LayerMask::from([GameLayer::Ground, GameLayer::Wall])
}

/// Bevy-side implementation of [`PhysicsQuery`] backed by avian's spatial queries.
#[derive(SystemParam)]
pub struct WorldProbe<'w, 's> {
    spatial: SpatialQuery<'w, 's>,
    tags: Query<'w, 's, (Has<Ground>, Has<Wall>, Has<Player>)>,
    shapes: Query<'w, 's, (&'static Collider, &'static Position, &'static Rotation)>,
}

impl WorldProbe<'_, '_> {
    fn tag_of(&self, entity: Entity) -> SurfaceTag {
        match self.tags.get(entity) {
            Ok((true, _, _)) => SurfaceTag::Ground,
            Ok((_, true, _)) => SurfaceTag::Wall,
            Ok((_, _, true)) => SurfaceTag::Player,
            _ => SurfaceTag::Untagged,
        }
    }
}

impl PhysicsQuery for WorldProbe<'_, '_> {
    fn ray_query(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Vec<RayHit> {
        let Ok(dir) = Dir2::new(direction) else {
            return Vec::new();
        };
        let filter = SpatialQueryFilter::from_mask(mask);

        let mut hits: Vec<RayHit> = self
            .spatial
            .ray_hits(origin, dir, max_distance, MAX_RAY_HITS, true, &filter)
            .into_iter()
            .map(|hit| RayHit {
                tag: self.tag_of(hit.entity),
                distance: hit.distance,
                point: origin + dir.as_vec2() * hit.distance,
                normal: hit.normal,
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn circle_overlap_all(&self, point: Vec2, radius: f32, mask: LayerMask) -> Vec<OverlapHit> {
        let filter = SpatialQueryFilter::from_mask(mask);

        self.spatial
            .shape_intersections(&Collider::circle(radius), point, 0.0, &filter)
            .into_iter()
            .filter_map(|entity| {
                let (collider, position, rotation) = self.shapes.get(entity).ok()?;
                let (closest_point, _) = collider.project_point(*position, *rotation, point, true);
                Some(OverlapHit {
                    tag: self.tag_of(entity),
                    closest_point,
                })
            })
            .collect()
    }
}
