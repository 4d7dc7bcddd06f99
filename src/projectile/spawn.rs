//! Projectile domain: engine entity for a projectile.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::GameLayer;
use crate::projectile::{ProjectileBody, ProjectileId, ProjectileTuning};

/// Collision layers for a projectile. While the owner-ignore window is open
/// the projectile collides with nothing.
pub fn projectile_layers(ignore_player: bool) -> CollisionLayers {
    let filters = if ignore_player {
        LayerMask::NONE
    } else {
        LayerMask::from(GameLayer::Player)
    };
    CollisionLayers::new(GameLayer::Projectile, filters)
}

/// Dynamic sensor body: the engine integrates gravity, bounces are resolved
/// by the lifecycle sweep.
pub(crate) fn projectile_bundle(
    id: ProjectileId,
    owner: Entity,
    position: Vec2,
    velocity: Vec2,
    ignore_player: bool,
    tuning: &ProjectileTuning,
) -> impl Bundle {
    (
        Name::new(format!("Projectile {}", id.0)),
        ProjectileBody { id, owner },
        Sprite {
            color: Color::WHITE,
            custom_size: Some(Vec2::splat(tuning.radius * 2.0)),
            ..default()
        },
        Transform::from_translation(position.extend(1.0)),
        RigidBody::Dynamic,
        Collider::circle(tuning.radius),
        Sensor,
        Mass(1.0),
        GravityScale(1.0),
        LinearVelocity(velocity),
        CollisionEventsEnabled,
        projectile_layers(ignore_player),
    )
}
