use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::abilities::{AbilityTuning, SceneProfile};
use crate::movement::MovementTuning;
use crate::projectile::ProjectileTuning;

/// Contents of `tuning.ron`. Omitted sections and fields keep their defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TuningFile {
    pub schema_version: u32,
    #[serde(default)]
    pub starting_scene: SceneProfile,
    #[serde(default)]
    pub movement: MovementDef,
    #[serde(default)]
    pub abilities: AbilityDef,
    #[serde(default)]
    pub projectile: ProjectileDef,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MovementDef {
    pub move_speed: f32,
    pub jump_force: f32,
    pub max_jump_time: f32,
    pub coyote_time: f32,
    pub dash_impulse: f32,
    pub horizontal_lock_time: f32,
    pub wall_slide_force: [f32; 2],
    pub wall_jump_impulse: [f32; 2],
    pub mass: f32,
    pub epsilon: f32,
    pub ground_probe_offset: f32,
    pub ground_probe_length: f32,
    pub wall_probe_height: f32,
    pub wall_probe_length: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AbilityDef {
    pub shoot_cooldown: f32,
    pub gravity_cooldown: f32,
    pub teleport_max_distance: f32,
    pub teleport_max_charges: u32,
    pub teleport_cooldown: f32,
    pub teleport_probe_radius: f32,
    pub teleport_back_off_step: f32,
    pub projectile_teleport_cooldown: f32,
    pub bounce_cooldown: f32,
    pub bounce_detection_radius: f32,
    pub hover_gravity_factor: f32,
    pub hover_kick: f32,
    pub hover_hold: f32,
    pub hover_transition: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProjectileDef {
    pub speed: f32,
    pub spawn_clearance: f32,
    pub lifespan: f32,
    pub spawn_ignore_window: f32,
    pub relocate_ignore_window: f32,
    pub max_bounces: u32,
    pub required_bounces: u32,
    pub restitution: f32,
    pub stall_speed: f32,
    pub stuck_speed: f32,
    pub unstick_impulse: f32,
    pub pickup_clearance: f32,
    pub radius: f32,
    pub contact_skin: f32,
}

impl TuningFile {
    pub fn movement_tuning(&self) -> MovementTuning {
        let def = &self.movement;
        MovementTuning {
            move_speed: def.move_speed,
            jump_force: def.jump_force,
            max_jump_time: def.max_jump_time,
            coyote_time: def.coyote_time,
            dash_impulse: def.dash_impulse,
            horizontal_lock_time: def.horizontal_lock_time,
            wall_slide_force: Vec2::from_array(def.wall_slide_force),
            wall_jump_impulse: Vec2::from_array(def.wall_jump_impulse),
            mass: def.mass,
            epsilon: def.epsilon,
            ground_probe_offset: def.ground_probe_offset,
            ground_probe_length: def.ground_probe_length,
            wall_probe_height: def.wall_probe_height,
            wall_probe_length: def.wall_probe_length,
        }
    }

    pub fn ability_tuning(&self) -> AbilityTuning {
        let def = &self.abilities;
        AbilityTuning {
            starting_scene: self.starting_scene,
            shoot_cooldown: def.shoot_cooldown,
            gravity_cooldown: def.gravity_cooldown,
            teleport_max_distance: def.teleport_max_distance,
            teleport_max_charges: def.teleport_max_charges,
            teleport_cooldown: def.teleport_cooldown,
            teleport_probe_radius: def.teleport_probe_radius,
            teleport_back_off_step: def.teleport_back_off_step,
            projectile_teleport_cooldown: def.projectile_teleport_cooldown,
            bounce_cooldown: def.bounce_cooldown,
            bounce_detection_radius: def.bounce_detection_radius,
            hover_gravity_factor: def.hover_gravity_factor,
            hover_kick: def.hover_kick,
            hover_hold: def.hover_hold,
            hover_transition: def.hover_transition,
        }
    }

    pub fn projectile_tuning(&self) -> ProjectileTuning {
        let def = &self.projectile;
        ProjectileTuning {
            speed: def.speed,
            spawn_clearance: def.spawn_clearance,
            lifespan: def.lifespan,
            spawn_ignore_window: def.spawn_ignore_window,
            relocate_ignore_window: def.relocate_ignore_window,
            max_bounces: def.max_bounces,
            required_bounces: def.required_bounces,
            restitution: def.restitution,
            stall_speed: def.stall_speed,
            stuck_speed: def.stuck_speed,
            unstick_impulse: def.unstick_impulse,
            pickup_clearance: def.pickup_clearance,
            radius: def.radius,
            contact_skin: def.contact_skin,
        }
    }
}

impl Default for MovementDef {
    fn default() -> Self {
        let tuning = MovementTuning::default();
        Self {
            move_speed: tuning.move_speed,
            jump_force: tuning.jump_force,
            max_jump_time: tuning.max_jump_time,
            coyote_time: tuning.coyote_time,
            dash_impulse: tuning.dash_impulse,
            horizontal_lock_time: tuning.horizontal_lock_time,
            wall_slide_force: tuning.wall_slide_force.to_array(),
            wall_jump_impulse: tuning.wall_jump_impulse.to_array(),
            mass: tuning.mass,
            epsilon: tuning.epsilon,
            ground_probe_offset: tuning.ground_probe_offset,
            ground_probe_length: tuning.ground_probe_length,
            wall_probe_height: tuning.wall_probe_height,
            wall_probe_length: tuning.wall_probe_length,
        }
    }
}

impl Default for AbilityDef {
    fn default() -> Self {
        let tuning = AbilityTuning::default();
        Self {
            shoot_cooldown: tuning.shoot_cooldown,
            gravity_cooldown: tuning.gravity_cooldown,
            teleport_max_distance: tuning.teleport_max_distance,
            teleport_max_charges: tuning.teleport_max_charges,
            teleport_cooldown: tuning.teleport_cooldown,
            teleport_probe_radius: tuning.teleport_probe_radius,
            teleport_back_off_step: tuning.teleport_back_off_step,
            projectile_teleport_cooldown: tuning.projectile_teleport_cooldown,
            bounce_cooldown: tuning.bounce_cooldown,
            bounce_detection_radius: tuning.bounce_detection_radius,
            hover_gravity_factor: tuning.hover_gravity_factor,
            hover_kick: tuning.hover_kick,
            hover_hold: tuning.hover_hold,
            hover_transition: tuning.hover_transition,
        }
    }
}

impl Default for ProjectileDef {
    fn default() -> Self {
        let tuning = ProjectileTuning::default();
        Self {
            speed: tuning.speed,
            spawn_clearance: tuning.spawn_clearance,
            lifespan: tuning.lifespan,
            spawn_ignore_window: tuning.spawn_ignore_window,
            relocate_ignore_window: tuning.relocate_ignore_window,
            max_bounces: tuning.max_bounces,
            required_bounces: tuning.required_bounces,
            restitution: tuning.restitution,
            stall_speed: tuning.stall_speed,
            stuck_speed: tuning.stuck_speed,
            unstick_impulse: tuning.unstick_impulse,
            pickup_clearance: tuning.pickup_clearance,
            radius: tuning.radius,
            contact_skin: tuning.contact_skin,
        }
    }
}
