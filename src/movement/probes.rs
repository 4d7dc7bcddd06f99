//! Movement domain: ground and wall probes.

use bevy::prelude::*;

use crate::core::{PhysicsQuery, SurfaceTag, surface_mask};
use crate::movement::MovementTuning;

fn probe_hits(
    physics: &impl PhysicsQuery,
    origin: Vec2,
    direction: Vec2,
    length: f32,
    tag: SurfaceTag,
) -> bool {
    physics
        .ray_query(origin, direction, length, surface_mask())
        .iter()
        .any(|hit| hit.tag == tag)
}

/// Two downward probes offset left and right of the body origin.
/// Grounded iff either one touches geometry tagged Ground.
pub fn detect_ground(physics: &impl PhysicsQuery, origin: Vec2, tuning: &MovementTuning) -> bool {
    [-tuning.ground_probe_offset, tuning.ground_probe_offset]
        .into_iter()
        .any(|dx| {
            probe_hits(
                physics,
                origin + Vec2::new(dx, 0.0),
                Vec2::NEG_Y,
                tuning.ground_probe_length,
                SurfaceTag::Ground,
            )
        })
}

/// One probe from slightly above the origin along the facing direction.
pub fn detect_wall(
    physics: &impl PhysicsQuery,
    origin: Vec2,
    facing: Vec2,
    tuning: &MovementTuning,
) -> bool {
    probe_hits(
        physics,
        origin + Vec2::new(0.0, tuning.wall_probe_height),
        facing,
        tuning.wall_probe_length,
        SurfaceTag::Wall,
    )
}
