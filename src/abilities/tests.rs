//! Abilities domain: tests for the coordinator, teleport, gravity and cooldowns.

use avian2d::prelude::{GravityScale, LinearVelocity};
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::coordinator::TimedEffect;
use super::systems::apply_reclaim_requests;
use super::teleport::TeleportRefusal;
use super::{
    AbilityCommand, AbilityCoordinator, AbilityInput, AbilityTuning, CooldownTimer,
    ReclaimProjectileEvent, SceneProfile, TeleportOutcome, TeleportState,
};
use crate::core::test_world::TestWorld;
use crate::core::{PlayerBody, TickContext};
use crate::movement::Player;
use crate::projectile::{ProjectileId, ProjectileTuning};

const DT: f32 = 0.016;

fn ctx(now: f32) -> TickContext {
    TickContext::new(now, DT)
}

fn coordinator(scene: SceneProfile) -> AbilityCoordinator {
    AbilityCoordinator::new(
        AbilityTuning {
            starting_scene: scene,
            ..default()
        },
        ProjectileTuning::default(),
        1.0,
    )
}

fn fire_at(target: Vec2) -> AbilityInput {
    AbilityInput {
        aim_target: Some(target),
        fire_just_pressed: true,
        ..default()
    }
}

fn aim_at(target: Vec2) -> AbilityInput {
    AbilityInput {
        aim_target: Some(target),
        ..default()
    }
}

fn idle() -> AbilityInput {
    AbilityInput::default()
}

fn spawned(commands: &[AbilityCommand]) -> usize {
    commands
        .iter()
        .filter(|c| matches!(c, AbilityCommand::SpawnProjectile { .. }))
        .count()
}

/// Walls on both sides of the origin: x in [2, 3] and x in [-1.5, -0.5].
fn corridor() -> TestWorld {
    TestWorld::new()
        .with_wall(Vec2::new(2.5, 0.0), Vec2::new(0.5, 5.0))
        .with_wall(Vec2::new(-1.0, 0.0), Vec2::new(0.5, 5.0))
}

/// Shoot right from the origin at t = 0 and bounce once off the right wall.
fn bounced_projectile(world: &TestWorld) -> (AbilityCoordinator, PlayerBody) {
    let mut abilities = coordinator(SceneProfile::Home);
    let mut body = PlayerBody::default();
    abilities.tick(ctx(0.0), &fire_at(Vec2::new(10.0, 0.0)), &mut body, world);
    abilities.step_projectile(TickContext::new(0.1, 0.2), world);
    assert!(abilities.projectile().is_some_and(|p| p.pickup_eligible));
    abilities.drain_commands();
    (abilities, body)
}

// -----------------------------------------------------------------------------
// Profiles and scene changes
// -----------------------------------------------------------------------------

#[test]
fn test_scene_capabilities() {
    let home = SceneProfile::Home.capabilities();
    assert!(home.can_shoot && !home.can_teleport && !home.can_reverse_gravity);

    let office = SceneProfile::Office.capabilities();
    assert!(office.can_shoot && office.can_teleport && office.can_teleport_projectile);
    assert!(!office.can_reverse_gravity);

    let dream = SceneProfile::Dream.capabilities();
    assert!(dream.can_reverse_gravity && !dream.can_shoot && !dream.can_teleport);
}

#[test]
fn test_set_scene_resets_transient_state_but_keeps_cooldowns() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Dream);
    let mut body = PlayerBody::default();

    let flip = AbilityInput {
        gravity_just_pressed: true,
        ..default()
    };
    abilities.tick(ctx(1.0), &flip, &mut body, &world);
    abilities.teleport.charges = 0;
    abilities.teleport.is_aiming = true;
    assert!(abilities.gravity.is_reversed);

    abilities.set_scene(SceneProfile::Office, &mut body);

    assert_eq!(abilities.profile(), SceneProfile::Office);
    assert_eq!(abilities.teleport.charges, abilities.teleport.max_charges);
    assert!(!abilities.teleport.is_aiming);
    assert!(!abilities.gravity.is_reversed);
    assert!(!abilities.is_in_gravity_reverse_mode());
    assert_eq!(body.gravity_scale, 1.0);
    assert!(!body.flip_y);
    assert_eq!(abilities.cooldowns.gravity.last_fired_at, Some(1.0));
}

#[test]
fn test_set_scene_keeps_live_projectile() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Home);
    let mut body = PlayerBody::default();
    abilities.tick(ctx(0.0), &fire_at(Vec2::X), &mut body, &world);

    abilities.set_scene(SceneProfile::Dream, &mut body);

    assert!(abilities.projectile().is_some());
}

// -----------------------------------------------------------------------------
// Cooldowns
// -----------------------------------------------------------------------------

#[test]
fn test_cooldown_ready_at_exact_boundary() {
    let mut cooldown = CooldownTimer::new(0.5);
    assert!(cooldown.is_ready(0.0));

    cooldown.fire(1.0);
    assert!(!cooldown.is_ready(1.49));
    assert!(cooldown.is_ready(1.5));
    assert_eq!(cooldown.remaining(2.0), 0.0);
}

// -----------------------------------------------------------------------------
// Shoot
// -----------------------------------------------------------------------------

#[test]
fn test_shot_travels_toward_aim_at_configured_speed() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Home);
    let mut body = PlayerBody::default();

    abilities.tick(ctx(0.0), &fire_at(Vec2::new(3.0, 4.0)), &mut body, &world);

    let projectile = abilities.projectile().expect("projectile spawned");
    let tuning = ProjectileTuning::default();
    assert!((projectile.speed() - tuning.speed).abs() < 1e-4);
    assert!((projectile.velocity.normalize() - Vec2::new(0.6, 0.8)).length() < 1e-4);
    assert!((projectile.position - Vec2::new(0.6, 0.8) * tuning.spawn_clearance).length() < 1e-4);
    assert!(projectile.owner_ignore_window_active);

    let commands = abilities.drain_commands();
    assert!(matches!(
        commands.as_slice(),
        [AbilityCommand::SpawnProjectile {
            ignore_player: true,
            ..
        }]
    ));
}

#[test]
fn test_second_shot_refused_while_projectile_live() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Home);
    let mut body = PlayerBody::default();

    abilities.tick(ctx(0.0), &fire_at(Vec2::X), &mut body, &world);
    abilities.tick(ctx(1.0), &fire_at(Vec2::X), &mut body, &world);

    assert_eq!(spawned(&abilities.drain_commands()), 1);
    assert_eq!(abilities.projectile().map(|p| p.id), Some(ProjectileId(0)));
}

#[test]
fn test_shot_without_aim_target_is_refused_and_not_stamped() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Home);
    let mut body = PlayerBody::default();
    let blind = AbilityInput {
        fire_just_pressed: true,
        ..default()
    };

    abilities.tick(ctx(0.0), &blind, &mut body, &world);
    assert!(abilities.projectile().is_none());
    assert_eq!(abilities.cooldowns.shoot.last_fired_at, None);

    abilities.tick(ctx(0.1), &fire_at(Vec2::X), &mut body, &world);
    assert!(abilities.projectile().is_some());
}

#[test]
fn test_shoot_disabled_in_dream() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Dream);
    let mut body = PlayerBody::default();

    abilities.tick(ctx(0.0), &fire_at(Vec2::X), &mut body, &world);

    assert!(abilities.projectile().is_none());
    assert!(abilities.drain_commands().is_empty());
}

#[test]
fn test_shoot_cooldown_gates_next_shot() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Home);
    let mut body = PlayerBody::default();

    abilities.tick(ctx(1.0), &fire_at(Vec2::X), &mut body, &world);
    abilities.reclaim_projectile(false, ctx(1.1), &mut body);

    abilities.tick(ctx(1.2), &fire_at(Vec2::X), &mut body, &world);
    assert!(abilities.projectile().is_none());

    abilities.tick(ctx(1.5), &fire_at(Vec2::X), &mut body, &world);
    assert!(abilities.projectile().is_some());
    assert_eq!(abilities.cooldowns.shoot.last_fired_at, Some(1.5));
}

// -----------------------------------------------------------------------------
// Lifespan and stale continuations
// -----------------------------------------------------------------------------

#[test]
fn test_projectile_expires_after_lifespan() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Home);
    let mut body = PlayerBody::default();

    abilities.tick(ctx(0.0), &fire_at(Vec2::X), &mut body, &world);
    abilities.drain_commands();

    abilities.tick(ctx(2.9), &idle(), &mut body, &world);
    assert!(abilities.projectile().is_some());

    abilities.tick(ctx(3.0), &idle(), &mut body, &world);
    assert!(abilities.projectile().is_none());
    assert!(
        abilities
            .drain_commands()
            .contains(&AbilityCommand::DespawnProjectile { id: ProjectileId(0) })
    );
}

#[test]
fn test_continuations_for_destroyed_projectile_are_no_ops() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Home);
    let mut body = PlayerBody::default();

    abilities.tick(ctx(0.0), &fire_at(Vec2::X), &mut body, &world);
    abilities.reclaim_projectile(false, ctx(0.1), &mut body);
    abilities.tick(ctx(0.6), &fire_at(Vec2::X), &mut body, &world);
    abilities.drain_commands();

    // First projectile's restore and expiry are due; neither touches the second
    abilities.tick(ctx(3.05), &idle(), &mut body, &world);
    let live = abilities.projectile().expect("second projectile still live");
    assert_eq!(live.id, ProjectileId(1));
    assert!(
        !abilities
            .drain_commands()
            .iter()
            .any(|c| matches!(c, AbilityCommand::DespawnProjectile { .. }))
    );

    abilities.tick(ctx(3.7), &idle(), &mut body, &world);
    assert!(abilities.projectile().is_none());
}

// -----------------------------------------------------------------------------
// Collision-ignore windows
// -----------------------------------------------------------------------------

#[test]
fn test_spawn_ignore_window_restores_on_deadline() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Home);
    let mut body = PlayerBody::default();

    abilities.tick(ctx(0.0), &fire_at(Vec2::X), &mut body, &world);
    abilities.drain_commands();

    abilities.tick(ctx(0.49), &idle(), &mut body, &world);
    assert!(abilities.projectile().is_some_and(|p| p.owner_ignore_window_active));

    abilities.tick(ctx(0.5), &idle(), &mut body, &world);
    assert!(abilities.projectile().is_some_and(|p| !p.owner_ignore_window_active));
    assert_eq!(
        abilities.drain_commands(),
        vec![AbilityCommand::SetPlayerCollision {
            id: ProjectileId(0),
            ignored: false,
        }]
    );
}

#[test]
fn test_shorter_overlapping_window_does_not_restore_early() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Office);
    let mut body = PlayerBody::default();

    abilities.tick(ctx(0.0), &fire_at(Vec2::X), &mut body, &world);
    let relocate = AbilityInput {
        aim_target: Some(Vec2::new(2.0, 2.0)),
        projectile_teleport_just_pressed: true,
        ..default()
    };
    // Relocation window ends at 0.4, spawn window at 0.5
    abilities.tick(ctx(0.1), &relocate, &mut body, &world);
    abilities.drain_commands();

    abilities.tick(ctx(0.45), &idle(), &mut body, &world);
    assert!(abilities.projectile().is_some_and(|p| p.owner_ignore_window_active));
    assert!(abilities.drain_commands().is_empty());

    abilities.tick(ctx(0.5), &idle(), &mut body, &world);
    assert!(abilities.projectile().is_some_and(|p| !p.owner_ignore_window_active));
}

#[test]
fn test_longer_overlapping_window_extends_ignore() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Office);
    let mut body = PlayerBody::default();

    abilities.tick(ctx(0.0), &fire_at(Vec2::X), &mut body, &world);
    let relocate = AbilityInput {
        aim_target: Some(Vec2::new(2.0, 2.0)),
        projectile_teleport_just_pressed: true,
        ..default()
    };
    abilities.tick(ctx(0.4), &relocate, &mut body, &world);

    abilities.tick(ctx(0.5), &idle(), &mut body, &world);
    assert!(abilities.projectile().is_some_and(|p| p.owner_ignore_window_active));

    abilities.tick(ctx(0.75), &idle(), &mut body, &world);
    assert!(abilities.projectile().is_some_and(|p| !p.owner_ignore_window_active));
}

// -----------------------------------------------------------------------------
// Projectile flight through the coordinator
// -----------------------------------------------------------------------------

#[test]
fn test_projectile_destroyed_on_third_wall_bounce() {
    let world = corridor();
    let mut abilities = coordinator(SceneProfile::Home);
    let mut body = PlayerBody::default();
    abilities.tick(ctx(0.0), &fire_at(Vec2::new(10.0, 0.0)), &mut body, &world);

    let long_tick = TickContext::new(0.1, 0.2);
    abilities.step_projectile(long_tick, &world);
    abilities.step_projectile(long_tick, &world);
    let survivor = abilities.projectile().expect("alive after two bounces");
    assert_eq!(survivor.bounce_count, 2);

    abilities.step_projectile(long_tick, &world);
    assert!(abilities.projectile().is_none());
    assert!(
        abilities
            .drain_commands()
            .contains(&AbilityCommand::DespawnProjectile { id: ProjectileId(0) })
    );
}

#[test]
fn test_stalled_projectile_is_destroyed() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Home);
    let mut body = PlayerBody::default();
    abilities.tick(ctx(0.0), &fire_at(Vec2::X), &mut body, &world);

    abilities.observe_projectile(ProjectileId(0), Vec2::new(3.0, 3.0), Vec2::new(0.4, 0.0));
    abilities.step_projectile(ctx(0.5), &world);

    assert!(abilities.projectile().is_none());
}

#[test]
fn test_projectile_teleport_skips_obstruction_check() {
    let world = TestWorld::new().with_wall(Vec2::new(4.0, 0.0), Vec2::new(1.0, 1.0));
    let mut abilities = coordinator(SceneProfile::Office);
    let mut body = PlayerBody::default();
    abilities.tick(ctx(0.0), &fire_at(Vec2::new(-5.0, 0.0)), &mut body, &world);
    abilities.drain_commands();

    let inside_wall = Vec2::new(4.0, 0.0);
    let relocate = AbilityInput {
        aim_target: Some(inside_wall),
        projectile_teleport_just_pressed: true,
        ..default()
    };
    abilities.tick(ctx(0.2), &relocate, &mut body, &world);

    let projectile = abilities.projectile().expect("projectile relocated");
    assert_eq!(projectile.position, inside_wall);
    assert_eq!(projectile.velocity, Vec2::ZERO);
    let commands = abilities.drain_commands();
    assert!(commands.contains(&AbilityCommand::RelocateProjectile { id: ProjectileId(0) }));
    assert!(commands.contains(&AbilityCommand::SetPlayerCollision {
        id: ProjectileId(0),
        ignored: true,
    }));

    // Resting after the move does not count as a stall
    abilities.step_projectile(ctx(0.25), &world);
    assert!(abilities.projectile().is_some());
}

#[test]
fn test_projectile_teleport_needs_live_projectile_and_cooldown() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Office);
    let mut body = PlayerBody::default();
    let relocate = AbilityInput {
        aim_target: Some(Vec2::new(2.0, 2.0)),
        projectile_teleport_just_pressed: true,
        ..default()
    };

    abilities.tick(ctx(0.0), &relocate, &mut body, &world);
    assert_eq!(abilities.cooldowns.projectile_teleport.last_fired_at, None);

    abilities.tick(ctx(0.1), &fire_at(Vec2::X), &mut body, &world);
    abilities.tick(ctx(0.2), &relocate, &mut body, &world);
    abilities.tick(ctx(0.4), &aim_at(Vec2::ZERO), &mut body, &world);
    let far = AbilityInput {
        aim_target: Some(Vec2::new(-3.0, 1.0)),
        projectile_teleport_just_pressed: true,
        ..default()
    };
    abilities.tick(ctx(0.5), &far, &mut body, &world);

    assert_eq!(abilities.projectile().map(|p| p.position), Some(Vec2::new(2.0, 2.0)));
}

// -----------------------------------------------------------------------------
// Pickup and reclaim
// -----------------------------------------------------------------------------

#[test]
fn test_pickup_refreshes_dash_charge_and_hover() {
    let world = corridor();
    let (mut abilities, mut body) = bounced_projectile(&world);
    abilities.teleport.charges = 1;
    abilities.tick(ctx(0.5), &idle(), &mut body, &world);
    abilities.drain_commands();

    abilities.projectile_player_contact(ctx(0.6), &mut body);

    assert!(abilities.projectile().is_none());
    let commands = abilities.drain_commands();
    assert!(commands.contains(&AbilityCommand::DespawnProjectile { id: ProjectileId(0) }));
    assert!(commands.contains(&AbilityCommand::RefreshDash));
    assert_eq!(abilities.teleport.charges, 2);
    assert!((body.gravity_scale - 0.2).abs() < 1e-5);
    assert_eq!(body.velocity.y, 5.0);
}

#[test]
fn test_pickup_refused_within_clearance() {
    let world = corridor();
    let (mut abilities, _) = bounced_projectile(&world);
    let projectile_position = abilities.projectile().map(|p| p.position).unwrap_or_default();
    let mut body = PlayerBody::at(projectile_position - Vec2::new(0.2, 0.0));
    abilities.tick(ctx(0.5), &idle(), &mut body, &world);

    abilities.projectile_player_contact(ctx(0.6), &mut body);

    assert!(abilities.projectile().is_some());
    assert!(!abilities.drain_commands().contains(&AbilityCommand::RefreshDash));
}

#[test]
fn test_pickup_refused_before_first_bounce() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Home);
    let mut body = PlayerBody::default();
    abilities.tick(ctx(0.0), &fire_at(Vec2::new(10.0, 0.0)), &mut body, &world);
    abilities.tick(ctx(0.6), &idle(), &mut body, &world);

    abilities.projectile_player_contact(ctx(0.7), &mut body);

    assert!(abilities.projectile().is_some());
}

#[test]
fn test_pickup_refused_during_ignore_window() {
    let world = corridor();
    let (mut abilities, mut body) = bounced_projectile(&world);

    abilities.projectile_player_contact(ctx(0.2), &mut body);

    assert!(abilities.projectile().is_some());
}

#[test]
fn test_reclaim_with_refresh_does_not_overflow_charges() {
    let mut abilities = coordinator(SceneProfile::Office);
    let mut body = PlayerBody::default();
    let max = abilities.teleport.max_charges;

    abilities.reclaim_projectile(true, ctx(0.0), &mut body);

    assert_eq!(abilities.teleport.charges, max);
    assert_eq!(abilities.drain_commands(), vec![AbilityCommand::RefreshDash]);
}

#[test]
fn test_reclaim_without_refresh_only_destroys() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Office);
    let mut body = PlayerBody::default();
    abilities.tick(ctx(0.0), &fire_at(Vec2::X), &mut body, &world);
    abilities.teleport.charges = 0;
    abilities.drain_commands();

    abilities.reclaim_projectile(false, ctx(0.1), &mut body);

    assert!(abilities.projectile().is_none());
    assert_eq!(abilities.teleport.charges, 0);
    assert_eq!(body.gravity_scale, 1.0);
    assert_eq!(
        abilities.drain_commands(),
        vec![AbilityCommand::DespawnProjectile { id: ProjectileId(0) }]
    );
}

// -----------------------------------------------------------------------------
// Hover
// -----------------------------------------------------------------------------

#[test]
fn test_hover_holds_then_blends_back_to_baseline() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Home);
    let mut body = PlayerBody::default();

    abilities.reclaim_projectile(true, ctx(1.0), &mut body);
    assert!((body.gravity_scale - 0.2).abs() < 1e-5);

    abilities.tick(ctx(1.25), &idle(), &mut body, &world);
    assert!((body.gravity_scale - 0.2).abs() < 1e-5);

    abilities.tick(ctx(1.3), &idle(), &mut body, &world);
    abilities.tick(ctx(1.4), &idle(), &mut body, &world);
    assert!((body.gravity_scale - 0.6).abs() < 1e-3);

    abilities.tick(ctx(1.55), &idle(), &mut body, &world);
    assert!((body.gravity_scale - 1.0).abs() < 1e-5);
    assert!(
        !abilities
            .pending_effects()
            .any(|e| matches!(e, TimedEffect::HoverRelease { .. }))
    );
}

#[test]
fn test_hover_restores_reversed_baseline() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Dream);
    let mut body = PlayerBody::default();
    let flip = AbilityInput {
        gravity_just_pressed: true,
        ..default()
    };
    abilities.tick(ctx(0.0), &flip, &mut body, &world);

    abilities.reclaim_projectile(true, ctx(1.0), &mut body);
    assert!((body.gravity_scale + 0.2).abs() < 1e-5);

    for now in [1.3, 1.4, 1.6] {
        abilities.tick(ctx(now), &idle(), &mut body, &world);
    }
    assert!((body.gravity_scale + 1.0).abs() < 1e-5);
}

#[test]
fn test_newer_hover_takes_over_from_older() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Home);
    let mut body = PlayerBody::default();

    abilities.reclaim_projectile(true, ctx(1.0), &mut body);
    abilities.tick(ctx(1.3), &idle(), &mut body, &world);
    abilities.reclaim_projectile(true, ctx(1.35), &mut body);

    // The first hover would be half-way back by now
    abilities.tick(ctx(1.4), &idle(), &mut body, &world);
    assert!((body.gravity_scale - 0.2).abs() < 1e-5);

    for now in [1.65, 1.8, 1.9] {
        abilities.tick(ctx(now), &idle(), &mut body, &world);
    }
    assert!((body.gravity_scale - 1.0).abs() < 1e-5);
}

// -----------------------------------------------------------------------------
// Gravity
// -----------------------------------------------------------------------------

#[test]
fn test_gravity_flip_sets_one_frame_mode_flag() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Dream);
    let mut body = PlayerBody::default();
    let flip = AbilityInput {
        gravity_just_pressed: true,
        ..default()
    };

    abilities.tick(ctx(1.0), &flip, &mut body, &world);

    assert!(abilities.gravity.is_reversed);
    assert!(abilities.is_in_gravity_reverse_mode());
    assert_eq!(body.gravity_scale, -1.0);
    assert!(body.flip_y);

    abilities.end_frame();
    assert!(!abilities.is_in_gravity_reverse_mode());
    assert!(abilities.gravity.is_reversed);
}

#[test]
fn test_gravity_flip_respects_cooldown() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Dream);
    let mut body = PlayerBody::default();
    let flip = AbilityInput {
        gravity_just_pressed: true,
        ..default()
    };

    abilities.tick(ctx(1.0), &flip, &mut body, &world);
    abilities.end_frame();
    abilities.tick(ctx(1.5), &flip, &mut body, &world);
    assert!(abilities.gravity.is_reversed);
    assert!(!abilities.is_in_gravity_reverse_mode());

    abilities.tick(ctx(1.85), &flip, &mut body, &world);
    assert!(!abilities.gravity.is_reversed);
    assert_eq!(body.gravity_scale, 1.0);
    assert!(!body.flip_y);
}

#[test]
fn test_gravity_flip_disabled_outside_dream() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Office);
    let mut body = PlayerBody::default();
    let flip = AbilityInput {
        gravity_just_pressed: true,
        ..default()
    };

    abilities.tick(ctx(1.0), &flip, &mut body, &world);

    assert!(!abilities.gravity.is_reversed);
    assert!(!abilities.is_in_gravity_reverse_mode());
}

// -----------------------------------------------------------------------------
// Teleport
// -----------------------------------------------------------------------------

fn press_aim(target: Vec2) -> AbilityInput {
    AbilityInput {
        aim_target: Some(target),
        aim_just_pressed: true,
        ..default()
    }
}

fn release_aim(target: Vec2) -> AbilityInput {
    AbilityInput {
        aim_target: Some(target),
        aim_just_released: true,
        ..default()
    }
}

#[test]
fn test_aim_refused_without_charges() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Office);
    let mut body = PlayerBody::default();
    abilities.teleport.charges = 0;

    abilities.tick(ctx(0.0), &press_aim(Vec2::X), &mut body, &world);

    assert!(!abilities.teleport.is_aiming);
    assert!(abilities.teleport.preview.is_none());
}

#[test]
fn test_aim_refused_during_cooldown() {
    let mut teleport = TeleportState::from_tuning(&AbilityTuning::default());
    teleport.cooldown.fire(1.0);

    assert!(!teleport.start_aim(2.0));
    assert!(!teleport.is_aiming);
    assert!(teleport.start_aim(2.5));
}

#[test]
fn test_teleport_clamps_range_and_keeps_velocity() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Office);
    let mut body = PlayerBody::default();
    body.velocity = Vec2::new(1.0, -2.0);

    abilities.tick(ctx(0.0), &press_aim(Vec2::new(10.0, 0.0)), &mut body, &world);
    assert!(abilities.teleport.is_aiming);
    assert_eq!(
        abilities.teleport.preview.map(|p| p.target),
        Some(Vec2::new(5.0, 0.0))
    );

    abilities.tick(ctx(0.1), &release_aim(Vec2::new(10.0, 0.0)), &mut body, &world);

    assert_eq!(body.position, Vec2::new(5.0, 0.0));
    assert_eq!(body.velocity, Vec2::new(1.0, -2.0));
    assert_eq!(abilities.teleport.charges, 1);
    assert_eq!(abilities.teleport.cooldown.last_fired_at, Some(0.1));
    assert!(!abilities.teleport.is_aiming);
    assert!(abilities.teleport.preview.is_none());
}

#[test]
fn test_obstructed_teleport_backs_off_to_clear_space() {
    let world = TestWorld::new().with_wall(Vec2::new(5.0, 0.0), Vec2::new(1.0, 5.0));
    let mut abilities = coordinator(SceneProfile::Office);
    let mut body = PlayerBody::default();
    let target = Vec2::new(5.0, 0.0);

    abilities.tick(ctx(0.0), &press_aim(target), &mut body, &world);
    assert!(abilities.teleport.preview.is_some_and(|p| p.blocked));

    abilities.tick(ctx(0.1), &release_aim(target), &mut body, &world);

    assert!(!abilities.teleport.is_blocked(body.position, &world));
    assert!(body.position.x > 3.5 && body.position.x < 3.71);
    assert_eq!(body.position.y, 0.0);
    assert_eq!(abilities.teleport.charges, 1);
}

#[test]
fn test_teleport_cancelled_when_no_clear_point() {
    // Wall starts 0.2 in front of the player: every back-off point is inside the probe
    let world = TestWorld::new().with_wall(Vec2::new(5.2, 0.0), Vec2::new(5.0, 5.0));
    let mut abilities = coordinator(SceneProfile::Office);
    let mut body = PlayerBody::default();
    let target = Vec2::new(4.0, 0.0);

    abilities.tick(ctx(0.0), &press_aim(target), &mut body, &world);
    abilities.tick(ctx(0.1), &release_aim(target), &mut body, &world);

    assert_eq!(body.position, Vec2::ZERO);
    assert_eq!(abilities.teleport.charges, abilities.teleport.max_charges);
    assert_eq!(abilities.teleport.cooldown.last_fired_at, None);
    assert!(!abilities.teleport.is_aiming);
}

#[test]
fn test_execute_requires_aiming() {
    let world = TestWorld::new();
    let mut teleport = TeleportState::from_tuning(&AbilityTuning::default());

    let outcome = teleport.execute(0.0, Vec2::ZERO, Vec2::X, &world);

    assert_eq!(outcome, TeleportOutcome::Refused(TeleportRefusal::NotAiming));
    assert_eq!(teleport.charges, teleport.max_charges);
}

#[test]
fn test_release_without_aim_target_cancels() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Office);
    let mut body = PlayerBody::default();

    abilities.tick(ctx(0.0), &press_aim(Vec2::X), &mut body, &world);
    let blind_release = AbilityInput {
        aim_just_released: true,
        ..default()
    };
    abilities.tick(ctx(0.1), &blind_release, &mut body, &world);

    assert!(!abilities.teleport.is_aiming);
    assert_eq!(body.position, Vec2::ZERO);
    assert_eq!(abilities.teleport.charges, abilities.teleport.max_charges);
}

#[test]
fn test_refresh_one_caps_at_max() {
    let mut teleport = TeleportState::from_tuning(&AbilityTuning::default());
    teleport.charges = 1;

    assert!(teleport.refresh_one());
    assert!(!teleport.refresh_one());
    assert_eq!(teleport.charges, teleport.max_charges);
}

// -----------------------------------------------------------------------------
// Manual bounce
// -----------------------------------------------------------------------------

#[test]
fn test_bounce_ready_needs_projectile_near_surface() {
    let open = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Home);
    let mut body = PlayerBody::default();

    abilities.tick(ctx(0.0), &idle(), &mut body, &open);
    assert!(!abilities.is_bounce_ready());

    abilities.tick(ctx(0.1), &fire_at(Vec2::X), &mut body, &open);
    assert!(!abilities.is_bounce_ready());

    let floor = TestWorld::flat_floor();
    abilities.tick(ctx(0.2), &idle(), &mut body, &floor);
    assert!(abilities.is_bounce_ready());
}

#[test]
fn test_manual_bounce_reflects_off_nearest_surface_and_cools_down() {
    let world = TestWorld::flat_floor();
    let mut abilities = coordinator(SceneProfile::Home);
    let mut body = PlayerBody::at(Vec2::new(0.0, 1.5));

    abilities.tick(ctx(0.0), &fire_at(Vec2::new(3.0, -2.5)), &mut body, &world);
    assert!(abilities.is_bounce_ready());

    let bounce = AbilityInput {
        bounce_just_pressed: true,
        ..default()
    };
    abilities.tick(ctx(0.1), &bounce, &mut body, &world);

    let projectile = abilities.projectile().expect("projectile still live");
    assert!((projectile.velocity - Vec2::new(6.0, 8.0)).length() < 1e-3);
    assert_eq!(projectile.bounce_count, 0);
    assert!(!abilities.is_bounce_ready());
    assert!(
        abilities
            .drain_commands()
            .contains(&AbilityCommand::RedirectProjectile { id: ProjectileId(0) })
    );

    abilities.tick(ctx(0.4), &idle(), &mut body, &world);
    assert!(!abilities.is_bounce_ready());
    abilities.tick(ctx(0.65), &idle(), &mut body, &world);
    assert!(abilities.is_bounce_ready());
}

#[test]
fn test_bounce_input_ignored_when_not_ready() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Home);
    let mut body = PlayerBody::default();
    abilities.tick(ctx(0.0), &fire_at(Vec2::X), &mut body, &world);

    let bounce = AbilityInput {
        bounce_just_pressed: true,
        ..default()
    };
    abilities.tick(ctx(0.1), &bounce, &mut body, &world);

    assert_eq!(
        abilities.projectile().map(|p| p.velocity),
        Some(Vec2::new(10.0, 0.0))
    );
    assert_eq!(abilities.cooldowns.bounce.last_fired_at, None);
}

// -----------------------------------------------------------------------------
// Full frames in system order
// -----------------------------------------------------------------------------

const GRAVITY: f32 = 9.81;

/// Engine-side copy of the projectile entity.
#[derive(Debug, Clone, Copy)]
struct EngineProjectile {
    id: ProjectileId,
    position: Vec2,
    velocity: Vec2,
}

/// One frame as the systems run it: ability tick, engine sync and lifecycle
/// step, then the queued commands.
fn run_frame(
    abilities: &mut AbilityCoordinator,
    engine: &mut Option<EngineProjectile>,
    tick: TickContext,
    input: &AbilityInput,
    body: &mut PlayerBody,
    world: &TestWorld,
) {
    abilities.tick(tick, input, body, world);

    if let Some(entity) = engine.as_mut()
        && abilities.projectile().is_some_and(|p| p.id == entity.id)
    {
        abilities.observe_projectile(entity.id, entity.position, entity.velocity);
        abilities.step_projectile(tick, world);
        if let Some(live) = abilities.projectile().filter(|p| p.id == entity.id) {
            entity.velocity = live.velocity;
        }
    }

    for command in abilities.drain_commands() {
        let live = abilities.projectile().cloned();
        match command {
            AbilityCommand::SpawnProjectile {
                id,
                position,
                velocity,
                ..
            } => {
                *engine = Some(EngineProjectile {
                    id,
                    position,
                    velocity,
                });
            }
            AbilityCommand::DespawnProjectile { id } => {
                if engine.as_ref().is_some_and(|e| e.id == id) {
                    *engine = None;
                }
            }
            AbilityCommand::RelocateProjectile { id } => {
                if let Some(entity) = engine.as_mut().filter(|e| e.id == id)
                    && let Some(live) = live.filter(|p| p.id == id)
                {
                    entity.position = live.position;
                    entity.velocity = live.velocity;
                }
            }
            AbilityCommand::RedirectProjectile { id } => {
                if let Some(entity) = engine.as_mut().filter(|e| e.id == id)
                    && let Some(live) = live.filter(|p| p.id == id)
                {
                    entity.velocity = live.velocity;
                }
            }
            AbilityCommand::SetPlayerCollision { .. } | AbilityCommand::RefreshDash => {}
        }
    }

    abilities.end_frame();
}

/// Engine integration between frames.
fn integrate(engine: &mut Option<EngineProjectile>, dt: f32) {
    if let Some(entity) = engine.as_mut() {
        entity.velocity.y -= GRAVITY * dt;
        entity.position += entity.velocity * dt;
    }
}

#[test]
fn test_manual_bounce_reaches_engine_over_full_frame() {
    let world = TestWorld::flat_floor();
    let mut abilities = coordinator(SceneProfile::Home);
    let mut body = PlayerBody::at(Vec2::new(0.0, 1.5));
    let mut engine = None;

    run_frame(
        &mut abilities,
        &mut engine,
        ctx(0.0),
        &fire_at(Vec2::new(3.0, -2.5)),
        &mut body,
        &world,
    );
    assert!(engine.is_some());
    assert!(abilities.is_bounce_ready());

    integrate(&mut engine, DT);
    let before = engine.map(|e| e.position);
    let bounce = AbilityInput {
        bounce_just_pressed: true,
        ..default()
    };
    run_frame(&mut abilities, &mut engine, ctx(DT), &bounce, &mut body, &world);

    let entity = engine.expect("projectile entity survives the bounce");
    assert!((entity.velocity - Vec2::new(6.0, 8.0)).length() < 1e-3);
    // Position keeps the engine's integration
    assert_eq!(Some(entity.position), before);
    assert_eq!(abilities.cooldowns.bounce.last_fired_at, Some(DT));

    integrate(&mut engine, DT);
    run_frame(&mut abilities, &mut engine, ctx(2.0 * DT), &idle(), &mut body, &world);

    let projectile = abilities.projectile().expect("projectile still live");
    assert!(projectile.velocity.y > 7.0);
    assert!(engine.is_some_and(|e| e.velocity.y > 7.0));
}

#[test]
fn test_teleported_projectile_rests_and_survives_following_frames() {
    let world = TestWorld::new();
    let mut abilities = coordinator(SceneProfile::Office);
    let mut body = PlayerBody::default();
    let mut engine = None;

    run_frame(
        &mut abilities,
        &mut engine,
        ctx(0.0),
        &fire_at(Vec2::new(10.0, 0.0)),
        &mut body,
        &world,
    );
    integrate(&mut engine, DT);
    run_frame(&mut abilities, &mut engine, ctx(DT), &idle(), &mut body, &world);
    integrate(&mut engine, DT);

    let target = Vec2::new(2.0, 3.0);
    let relocate = AbilityInput {
        aim_target: Some(target),
        projectile_teleport_just_pressed: true,
        ..default()
    };
    run_frame(&mut abilities, &mut engine, ctx(2.0 * DT), &relocate, &mut body, &world);

    let entity = engine.expect("projectile entity after teleport");
    assert_eq!(entity.position, target);
    assert_eq!(entity.velocity, Vec2::ZERO);
    assert_eq!(abilities.projectile().map(|p| p.position), Some(target));

    for frame in 3..20 {
        integrate(&mut engine, DT);
        run_frame(
            &mut abilities,
            &mut engine,
            ctx(frame as f32 * DT),
            &idle(),
            &mut body,
            &world,
        );
        assert!(
            abilities.projectile().is_some_and(|p| p.id == ProjectileId(0)),
            "destroyed on frame {frame}"
        );
    }
    assert!(engine.is_some_and(|e| e.position.y < target.y));
}

// -----------------------------------------------------------------------------
// Reclaim requests
// -----------------------------------------------------------------------------

#[test]
fn test_reclaim_message_destroys_projectile_and_grants_rewards() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_message::<ReclaimProjectileEvent>()
        .add_systems(Update, apply_reclaim_requests);

    let mut abilities = coordinator(SceneProfile::Office);
    assert!(abilities.shoot_projectile(ctx(0.0), Some(Vec2::X), Vec2::ZERO));
    abilities.teleport.charges = 0;
    abilities.drain_commands();
    let player = app
        .world_mut()
        .spawn((
            Player,
            abilities,
            Transform::default(),
            LinearVelocity::default(),
            GravityScale(1.0),
        ))
        .id();

    app.world_mut()
        .write_message(ReclaimProjectileEvent { refresh: true });
    app.update();

    let world = app.world_mut();
    assert!(world.get::<GravityScale>(player).is_some_and(|g| g.0 < 1.0));
    assert!(world.get::<LinearVelocity>(player).is_some_and(|v| v.y > 0.0));
    let mut abilities = world
        .get_mut::<AbilityCoordinator>(player)
        .expect("player keeps its coordinator");
    assert!(abilities.projectile().is_none());
    assert_eq!(abilities.teleport.charges, 1);
    let commands = abilities.drain_commands();
    assert!(commands.contains(&AbilityCommand::DespawnProjectile { id: ProjectileId(0) }));
    assert!(commands.contains(&AbilityCommand::RefreshDash));
}

// -----------------------------------------------------------------------------
// Randomized invariants
// -----------------------------------------------------------------------------

fn random_input(rng: &mut ChaCha8Rng) -> AbilityInput {
    let aim_target = (!rng.random_bool(0.05)).then(|| {
        Vec2::new(rng.random_range(-10.0..10.0), rng.random_range(-2.0..8.0))
    });
    AbilityInput {
        aim_target,
        fire_just_pressed: rng.random_bool(0.2),
        aim_just_pressed: rng.random_bool(0.15),
        aim_just_released: rng.random_bool(0.15),
        projectile_teleport_just_pressed: rng.random_bool(0.1),
        bounce_just_pressed: rng.random_bool(0.1),
        gravity_just_pressed: rng.random_bool(0.1),
    }
}

fn random_scene(rng: &mut ChaCha8Rng) -> SceneProfile {
    match rng.random_range(0..3) {
        0 => SceneProfile::Home,
        1 => SceneProfile::Office,
        _ => SceneProfile::Dream,
    }
}

#[test]
fn test_random_sequences_hold_invariants() {
    let world = TestWorld::flat_floor()
        .with_wall(Vec2::new(-8.5, 5.0), Vec2::new(0.5, 5.0))
        .with_wall(Vec2::new(8.5, 5.0), Vec2::new(0.5, 5.0))
        .with_ground(Vec2::new(3.0, 4.0), Vec2::new(1.5, 0.25));
    let dt = 0.05;
    let shoot_cooldown = AbilityTuning::default().shoot_cooldown;

    for seed in 0..8 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut abilities = coordinator(random_scene(&mut rng));
        let mut body = PlayerBody::at(Vec2::new(0.0, 1.0));
        let mut live = 0_i32;
        let mut last_spawn: Option<f32> = None;
        let mut eligible: Option<ProjectileId> = None;

        for step in 0..400 {
            let tick = TickContext::new(step as f32 * dt, dt);
            if rng.random_bool(0.02) {
                abilities.set_scene(random_scene(&mut rng), &mut body);
            }

            let before = body.position;
            abilities.tick(tick, &random_input(&mut rng), &mut body, &world);
            if body.position != before {
                assert!(
                    !abilities.teleport.is_blocked(body.position, &world),
                    "seed {seed}: teleported into geometry at {:?}",
                    body.position
                );
            }

            // Stand-in for engine integration
            if let Some((id, position, velocity)) =
                abilities.projectile().map(|p| (p.id, p.position, p.velocity))
            {
                abilities.observe_projectile(id, position + velocity * dt, velocity);
            }
            abilities.step_projectile(tick, &world);
            if rng.random_bool(0.1) {
                abilities.projectile_player_contact(tick, &mut body);
            }
            abilities.end_frame();

            for command in abilities.drain_commands() {
                match command {
                    AbilityCommand::SpawnProjectile { .. } => {
                        if let Some(last) = last_spawn {
                            assert!(tick.now >= last + shoot_cooldown, "seed {seed}");
                        }
                        last_spawn = Some(tick.now);
                        live += 1;
                    }
                    AbilityCommand::DespawnProjectile { .. } => live -= 1,
                    _ => {}
                }
            }

            assert!(abilities.teleport.charges <= abilities.teleport.max_charges);
            assert!((0..=1).contains(&live), "seed {seed}: {live} live projectiles");
            assert_eq!(live == 1, abilities.projectile().is_some());
            assert!(!abilities.is_in_gravity_reverse_mode());

            if let Some(projectile) = abilities.projectile() {
                if eligible == Some(projectile.id) {
                    assert!(projectile.pickup_eligible, "seed {seed}: eligibility reverted");
                }
                if projectile.pickup_eligible {
                    eligible = Some(projectile.id);
                }
            }
        }
    }
}
