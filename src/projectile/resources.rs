//! Projectile domain: flight and lifecycle tuning.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct ProjectileTuning {
    pub speed: f32,
    /// Spawn offset from the player along the aim direction.
    pub spawn_clearance: f32,
    pub lifespan: f32,
    /// Player collision is ignored this long after a shot.
    pub spawn_ignore_window: f32,
    /// Player collision is ignored this long after a projectile teleport.
    pub relocate_ignore_window: f32,
    pub max_bounces: u32,
    pub required_bounces: u32,
    pub restitution: f32,
    /// Crossing below this speed destroys the projectile.
    pub stall_speed: f32,
    pub stuck_speed: f32,
    pub unstick_impulse: f32,
    /// Pickups closer than this to the player are refused.
    pub pickup_clearance: f32,
    pub radius: f32,
    /// Extra distance beyond the radius that still counts as resting contact.
    pub contact_skin: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 10.0,
            spawn_clearance: 0.8,
            lifespan: 3.0,
            spawn_ignore_window: 0.5,
            relocate_ignore_window: 0.3,
            max_bounces: 3,
            required_bounces: 1,
            restitution: 0.9,
            stall_speed: 0.5,
            stuck_speed: 1.0,
            unstick_impulse: 3.0,
            pickup_clearance: 0.3,
            radius: 0.15,
            contact_skin: 0.05,
        }
    }
}
