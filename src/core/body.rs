//! Core domain: the slice of the player's rigid body the gameplay core drives.

use avian2d::prelude::*;
use bevy::prelude::*;

/// Player body state read from the engine before a step and written back after.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub gravity_scale: f32,
    /// Visual body mirrored vertically (gravity inverted).
    pub flip_y: bool,
}

impl Default for PlayerBody {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            gravity_scale: 1.0,
            flip_y: false,
        }
    }
}

impl PlayerBody {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..default()
        }
    }

    pub fn from_engine(
        transform: &Transform,
        velocity: &LinearVelocity,
        gravity: &GravityScale,
    ) -> Self {
        Self {
            position: transform.translation.truncate(),
            velocity: velocity.0,
            gravity_scale: gravity.0,
            flip_y: transform.scale.y < 0.0,
        }
    }

    /// Write changed fields back, leaving untouched components unmarked.
    pub fn write_to(
        &self,
        transform: &mut Mut<Transform>,
        velocity: &mut Mut<LinearVelocity>,
        gravity: &mut Mut<GravityScale>,
    ) {
        if transform.translation.truncate() != self.position {
            transform.translation.x = self.position.x;
            transform.translation.y = self.position.y;
        }
        let scale_y = if self.flip_y {
            -transform.scale.y.abs()
        } else {
            transform.scale.y.abs()
        };
        if transform.scale.y != scale_y {
            transform.scale.y = scale_y;
        }
        if velocity.0 != self.velocity {
            velocity.0 = self.velocity;
        }
        if gravity.0 != self.gravity_scale {
            gravity.0 = self.gravity_scale;
        }
    }

    /// Continuous force over one tick.
    pub fn apply_force(&mut self, force: Vec2, dt: f32, mass: f32) {
        self.velocity += force / mass.max(f32::EPSILON) * dt;
    }

    pub fn apply_impulse(&mut self, impulse: Vec2, mass: f32) {
        self.velocity += impulse / mass.max(f32::EPSILON);
    }
}
