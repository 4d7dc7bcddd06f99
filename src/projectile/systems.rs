//! Projectile domain: engine sync, pickup detection and tint.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::abilities::AbilityCoordinator;
use crate::core::{PlayerBody, TickContext, WorldProbe};
use crate::movement::Player;
use crate::projectile::{PickupState, ProjectileBody};

/// Pull the engine-integrated motion into the live projectile, run its
/// lifecycle step, and push the resulting velocity back.
pub(crate) fn step_projectiles(
    time: Res<Time>,
    probe: WorldProbe,
    mut players: Query<(Entity, &mut AbilityCoordinator), With<Player>>,
    mut projectiles: Query<(&ProjectileBody, &Transform, &mut LinearVelocity), Without<Player>>,
) {
    let ctx = TickContext::from_time(&time);

    for (owner, mut coordinator) in &mut players {
        let Some(id) = coordinator.projectile().map(|p| p.id) else {
            continue;
        };
        // Spawned this frame; the entity appears once commands flush
        let Some((_, transform, mut velocity)) = projectiles
            .iter_mut()
            .find(|(body, _, _)| body.id == id && body.owner == owner)
        else {
            continue;
        };

        coordinator.observe_projectile(id, transform.translation.truncate(), velocity.0);
        coordinator.step_projectile(ctx, &probe);

        if let Some(projectile) = coordinator.projectile().filter(|p| p.id == id)
            && velocity.0 != projectile.velocity
        {
            velocity.0 = projectile.velocity;
        }
    }
}

/// Contact between a projectile and its owner is a pickup attempt.
pub(crate) fn detect_player_pickups(
    time: Res<Time>,
    mut collisions: MessageReader<CollisionStart>,
    projectiles: Query<(&ProjectileBody, &Transform), Without<Player>>,
    mut players: Query<
        (
            &mut AbilityCoordinator,
            &mut Transform,
            &mut LinearVelocity,
            &mut GravityScale,
        ),
        With<Player>,
    >,
) {
    let ctx = TickContext::from_time(&time);

    for event in collisions.read() {
        let pair = [
            (event.collider1, event.collider2),
            (event.collider2, event.collider1),
        ];
        for (projectile_entity, player_entity) in pair {
            let Ok((projectile, projectile_transform)) = projectiles.get(projectile_entity) else {
                continue;
            };
            if projectile.owner != player_entity {
                continue;
            }
            let Ok((mut coordinator, mut transform, mut velocity, mut gravity)) =
                players.get_mut(player_entity)
            else {
                continue;
            };
            if coordinator.projectile().map(|p| p.id) != Some(projectile.id) {
                continue;
            }

            let flight_velocity = coordinator.projectile().map_or(Vec2::ZERO, |p| p.velocity);
            coordinator.observe_projectile(
                projectile.id,
                projectile_transform.translation.truncate(),
                flight_velocity,
            );
            let mut body = PlayerBody::from_engine(&transform, &velocity, &gravity);
            coordinator.projectile_player_contact(ctx, &mut body);
            body.write_to(&mut transform, &mut velocity, &mut gravity);
        }
    }
}

/// White until the first bounce, yellow once bounced, green when it can be caught.
pub(crate) fn tint_projectiles(
    players: Query<&AbilityCoordinator, With<Player>>,
    mut projectiles: Query<(&ProjectileBody, &mut Sprite)>,
) {
    for (body, mut sprite) in &mut projectiles {
        let Some(projectile) = players
            .get(body.owner)
            .ok()
            .and_then(|coordinator| coordinator.projectile())
            .filter(|p| p.id == body.id)
        else {
            continue;
        };

        let color = match projectile.pickup_state() {
            PickupState::Fresh => Color::WHITE,
            PickupState::Bounced => Color::srgb(1.0, 0.9, 0.2),
            PickupState::Eligible => Color::srgb(0.3, 0.9, 0.3),
        };
        if sprite.color != color {
            sprite.color = color;
        }
    }
}
