//! Abilities domain: input sampling, coordinator ticks and command application.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::abilities::{
    AbilityCommand, AbilityCoordinator, AbilityInput, ReclaimProjectileEvent, SetSceneEvent,
};
use crate::core::{MainCamera, PlayerBody, TickContext, WorldProbe};
use crate::movement::{LocomotionState, Player};
use crate::projectile::{ProjectileBody, ProjectileTuning, projectile_bundle, projectile_layers};

type PlayerBodyQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut AbilityCoordinator,
        &'static mut Transform,
        &'static mut LinearVelocity,
        &'static mut GravityScale,
    ),
    With<Player>,
>;

pub(crate) fn read_ability_input(
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut input: ResMut<AbilityInput>,
) {
    input.aim_target = windows
        .single()
        .ok()
        .and_then(|window| window.cursor_position())
        .and_then(|cursor| {
            let (camera, camera_transform) = cameras.single().ok()?;
            camera.viewport_to_world_2d(camera_transform, cursor).ok()
        });

    input.fire_just_pressed = mouse.just_pressed(MouseButton::Left);
    input.aim_just_pressed = mouse.just_pressed(MouseButton::Right);
    input.aim_just_released = mouse.just_released(MouseButton::Right);
    input.projectile_teleport_just_pressed = keyboard.just_pressed(KeyCode::KeyT);
    input.bounce_just_pressed = keyboard.just_pressed(KeyCode::KeyR);
    input.gravity_just_pressed = keyboard.just_pressed(KeyCode::Space);
}

pub(crate) fn apply_scene_changes(
    mut scene_events: MessageReader<SetSceneEvent>,
    mut players: PlayerBodyQuery,
) {
    for event in scene_events.read() {
        for (mut coordinator, mut transform, mut velocity, mut gravity) in &mut players {
            debug!(
                "Scene change requested: {:?} -> {:?}",
                coordinator.profile(),
                event.profile
            );
            let mut body = PlayerBody::from_engine(&transform, &velocity, &gravity);
            coordinator.set_scene(event.profile, &mut body);
            body.write_to(&mut transform, &mut velocity, &mut gravity);
        }
    }
}

/// External reclaim: destroy any live projectile and, with `refresh`, grant
/// the pickup rewards.
pub(crate) fn apply_reclaim_requests(
    time: Res<Time>,
    mut reclaim_events: MessageReader<ReclaimProjectileEvent>,
    mut players: PlayerBodyQuery,
) {
    let ctx = TickContext::from_time(&time);

    for event in reclaim_events.read() {
        for (mut coordinator, mut transform, mut velocity, mut gravity) in &mut players {
            let mut body = PlayerBody::from_engine(&transform, &velocity, &gravity);
            coordinator.reclaim_projectile(event.refresh, ctx, &mut body);
            body.write_to(&mut transform, &mut velocity, &mut gravity);
        }
    }
}

pub(crate) fn step_abilities(
    time: Res<Time>,
    input: Res<AbilityInput>,
    probe: WorldProbe,
    mut players: PlayerBodyQuery,
) {
    let ctx = TickContext::from_time(&time);

    for (mut coordinator, mut transform, mut velocity, mut gravity) in &mut players {
        let mut body = PlayerBody::from_engine(&transform, &velocity, &gravity);
        coordinator.tick(ctx, &input, &mut body, &probe);
        body.write_to(&mut transform, &mut velocity, &mut gravity);
    }
}

/// Carry out the engine work each coordinator queued this frame.
pub(crate) fn apply_ability_commands(
    mut commands: Commands,
    tuning: Res<ProjectileTuning>,
    mut players: Query<
        (Entity, &mut AbilityCoordinator, Option<&mut LocomotionState>),
        With<Player>,
    >,
    mut projectiles: Query<
        (
            Entity,
            &ProjectileBody,
            &mut Transform,
            &mut LinearVelocity,
            &mut CollisionLayers,
        ),
        Without<Player>,
    >,
) {
    for (owner, mut coordinator, mut locomotion) in &mut players {
        for command in coordinator.drain_commands() {
            match command {
                AbilityCommand::SpawnProjectile {
                    id,
                    position,
                    velocity,
                    ignore_player,
                } => {
                    commands.spawn(projectile_bundle(
                        id,
                        owner,
                        position,
                        velocity,
                        ignore_player,
                        &tuning,
                    ));
                }
                AbilityCommand::DespawnProjectile { id } => {
                    for (entity, body, ..) in &projectiles {
                        if body.id == id && body.owner == owner {
                            commands.entity(entity).despawn();
                        }
                    }
                }
                AbilityCommand::SetPlayerCollision { id, ignored } => {
                    for (_, body, _, _, mut layers) in &mut projectiles {
                        if body.id == id && body.owner == owner {
                            *layers = projectile_layers(ignored);
                        }
                    }
                }
                AbilityCommand::RelocateProjectile { id } => {
                    let Some(live) = coordinator.projectile().filter(|p| p.id == id) else {
                        continue;
                    };
                    for (_, body, mut transform, mut linear_velocity, _) in &mut projectiles {
                        if body.id == id && body.owner == owner {
                            transform.translation.x = live.position.x;
                            transform.translation.y = live.position.y;
                            linear_velocity.0 = live.velocity;
                        }
                    }
                }
                AbilityCommand::RedirectProjectile { id } => {
                    let Some(live) = coordinator.projectile().filter(|p| p.id == id) else {
                        continue;
                    };
                    for (_, body, _, mut linear_velocity, _) in &mut projectiles {
                        if body.id == id && body.owner == owner {
                            linear_velocity.0 = live.velocity;
                        }
                    }
                }
                AbilityCommand::RefreshDash => match locomotion.as_mut() {
                    Some(state) => state.refresh_dash(),
                    None => warn!("Dash refresh ignored: player {:?} has no locomotion", owner),
                },
            }
        }
    }
}

pub(crate) fn finish_ability_frame(mut coordinators: Query<&mut AbilityCoordinator>) {
    for mut coordinator in &mut coordinators {
        coordinator.end_frame();
    }
}
