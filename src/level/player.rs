//! Level domain: player spawn.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::abilities::{AbilityCoordinator, AbilityTuning};
use crate::level::room::FLOOR_TOP;
use crate::movement::{GameLayer, LocomotionState, MovementTuning, Player};
use crate::projectile::ProjectileTuning;

pub const PLAYER_SIZE: Vec2 = Vec2::new(0.8, 1.0);

/// Engine gravity multiplier the ability layer treats as "normal".
const BASE_GRAVITY_SCALE: f32 = 1.0;

pub(crate) fn spawn_player(
    mut commands: Commands,
    movement: Res<MovementTuning>,
    abilities: Res<AbilityTuning>,
    projectile: Res<ProjectileTuning>,
) {
    let spawn = Vec2::new(0.0, FLOOR_TOP + PLAYER_SIZE.y * 0.5);

    commands.spawn((
        (
            Name::new("Player"),
            Player,
            LocomotionState::default(),
            AbilityCoordinator::new(abilities.clone(), projectile.clone(), BASE_GRAVITY_SCALE),
        ),
        Sprite {
            color: Color::srgb(0.9, 0.9, 0.9),
            custom_size: Some(PLAYER_SIZE),
            ..default()
        },
        Transform::from_translation(spawn.extend(0.5)),
        (
            RigidBody::Dynamic,
            Collider::rectangle(PLAYER_SIZE.x, PLAYER_SIZE.y),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::default(),
            GravityScale(BASE_GRAVITY_SCALE),
            Friction::new(0.0),
            Mass(movement.mass),
            CollisionEventsEnabled,
            CollisionLayers::new(
                GameLayer::Player,
                [GameLayer::Ground, GameLayer::Wall, GameLayer::Projectile],
            ),
        ),
    ));

    info!(
        "Player spawned at {:?} in scene {:?}",
        spawn, abilities.starting_scene
    );
}
