//! Abilities domain: tuning and input resources.

use bevy::prelude::*;

use crate::abilities::SceneProfile;

#[derive(Resource, Debug, Clone)]
pub struct AbilityTuning {
    pub starting_scene: SceneProfile,
    pub shoot_cooldown: f32,
    pub gravity_cooldown: f32,
    pub teleport_max_distance: f32,
    pub teleport_max_charges: u32,
    pub teleport_cooldown: f32,
    /// Radius of the obstruction test at a teleport target.
    pub teleport_probe_radius: f32,
    pub teleport_back_off_step: f32,
    pub projectile_teleport_cooldown: f32,
    pub bounce_cooldown: f32,
    /// Manual bounce is ready when a surface lies within this radius.
    pub bounce_detection_radius: f32,
    /// Gravity multiplier while hovering after a pickup.
    pub hover_gravity_factor: f32,
    pub hover_kick: f32,
    pub hover_hold: f32,
    pub hover_transition: f32,
}

impl Default for AbilityTuning {
    fn default() -> Self {
        Self {
            starting_scene: SceneProfile::Home,
            shoot_cooldown: 0.5,
            gravity_cooldown: 0.8,
            teleport_max_distance: 5.0,
            teleport_max_charges: 2,
            teleport_cooldown: 1.5,
            teleport_probe_radius: 0.3,
            teleport_back_off_step: 0.1,
            projectile_teleport_cooldown: 0.5,
            bounce_cooldown: 0.5,
            bounce_detection_radius: 2.0,
            hover_gravity_factor: 0.2,
            hover_kick: 5.0,
            hover_hold: 0.3,
            hover_transition: 0.2,
        }
    }
}

/// Ability input sampled once per frame.
#[derive(Resource, Debug, Default, Clone)]
pub struct AbilityInput {
    /// Cursor position in world space; `None` without a window cursor or camera.
    pub aim_target: Option<Vec2>,
    pub fire_just_pressed: bool,
    pub aim_just_pressed: bool,
    pub aim_just_released: bool,
    pub projectile_teleport_just_pressed: bool,
    pub bounce_just_pressed: bool,
    pub gravity_just_pressed: bool,
}
