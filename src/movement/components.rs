//! Movement domain: components and physics layers for locomotion.

use avian2d::prelude::*;
use bevy::prelude::*;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Ground surfaces (floors, platforms)
    Ground,
    /// Wall surfaces
    Wall,
    /// Player character
    Player,
    /// Thrown projectile (sensor, bounce handled by gameplay code)
    Projectile,
}

#[derive(Component, Debug)]
pub struct Player;

/// Locomotion state machine. States are combined booleans:
/// {grounded, airborne within coyote window, airborne falling} x {wall contact}.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct LocomotionState {
    /// Unit vector of the last nonzero horizontal velocity.
    pub facing: Vec2,
    pub is_grounded: bool,
    /// Jumping is no longer allowed until the next ground contact.
    pub is_airborne: bool,
    pub touching_wall: bool,
    pub jump_time_elapsed: f32,
    pub coyote_time_elapsed: f32,
    pub can_dash: bool,
    /// Horizontal input is ignored while this is positive (after dash / wall jump).
    pub horizontal_lock_timer: f32,
}

impl Default for LocomotionState {
    fn default() -> Self {
        Self {
            facing: Vec2::X,
            is_grounded: false,
            is_airborne: false,
            touching_wall: false,
            jump_time_elapsed: 0.0,
            coyote_time_elapsed: 0.0,
            can_dash: true,
            horizontal_lock_timer: 0.0,
        }
    }
}

/// Marker for ground colliders
#[derive(Component, Debug)]
pub struct Ground;

/// Marker for wall colliders
#[derive(Component, Debug)]
pub struct Wall;
