//! Movement domain: tuning and input resources.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct MovementTuning {
    pub move_speed: f32,
    pub jump_force: f32,
    /// Longest time the jump force keeps pushing while the button is held.
    pub max_jump_time: f32,
    /// Grace window after leaving the ground during which a jump still starts.
    pub coyote_time: f32,
    pub dash_impulse: f32,
    /// Horizontal input lock after a dash or wall jump.
    pub horizontal_lock_time: f32,
    pub wall_slide_force: Vec2,
    pub wall_jump_impulse: Vec2,
    pub mass: f32,
    pub epsilon: f32,
    pub ground_probe_offset: f32,
    pub ground_probe_length: f32,
    pub wall_probe_height: f32,
    pub wall_probe_length: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            move_speed: 6.0,
            jump_force: 40.0,
            max_jump_time: 0.25,
            coyote_time: 0.1,
            dash_impulse: 14.0,
            horizontal_lock_time: 0.2,
            wall_slide_force: Vec2::new(0.0, -4.0),
            wall_jump_impulse: Vec2::new(6.0, 8.0),
            mass: 1.0,
            epsilon: 0.01,
            ground_probe_offset: 0.4,
            ground_probe_length: 0.6,
            wall_probe_height: 0.4,
            wall_probe_length: 0.6,
        }
    }
}

#[derive(Resource, Debug, Default, Clone)]
pub struct MovementInput {
    pub axis: Vec2,
    pub jump_just_pressed: bool,
    pub jump_held: bool,
    pub dash_just_pressed: bool,
}

impl MovementInput {
    /// Same input with the jump button treated as released.
    pub fn without_jump(&self) -> Self {
        Self {
            jump_just_pressed: false,
            jump_held: false,
            ..self.clone()
        }
    }
}
