//! Movement domain: per-tick locomotion state machine.

use bevy::prelude::*;

use crate::core::{PhysicsQuery, PlayerBody, TickContext};
use crate::movement::probes::{detect_ground, detect_wall};
use crate::movement::{LocomotionState, MovementInput, MovementTuning};

impl LocomotionState {
    /// Advance one tick. Order matters: facing, timers, ground, wall slide,
    /// horizontal move, wall jump, jump, dash.
    pub fn step(
        &mut self,
        ctx: TickContext,
        input: &MovementInput,
        body: &mut PlayerBody,
        physics: &impl PhysicsQuery,
        tuning: &MovementTuning,
    ) {
        self.update_facing(body.velocity, tuning);
        self.horizontal_lock_timer = (self.horizontal_lock_timer - ctx.dt).max(0.0);

        let grounded = detect_ground(physics, body.position, tuning);
        self.update_ground_contact(grounded, ctx.dt, tuning);
        self.touching_wall = detect_wall(physics, body.position, self.facing, tuning);

        self.apply_wall_slide(body, ctx.dt, tuning);
        if !self.is_horizontal_locked() {
            body.velocity.x = input.axis.x * tuning.move_speed;
        }
        self.try_wall_jump(input, body, tuning);
        self.apply_jump(input, body, ctx.dt, tuning);
        self.try_dash(input, body, tuning);
    }

    pub fn is_horizontal_locked(&self) -> bool {
        self.horizontal_lock_timer > 0.0
    }

    /// External dash recharge (projectile pickup).
    pub fn refresh_dash(&mut self) {
        if !self.can_dash {
            debug!("Dash refreshed");
        }
        self.can_dash = true;
    }

    fn update_facing(&mut self, velocity: Vec2, tuning: &MovementTuning) {
        if velocity.x.abs() >= tuning.epsilon {
            self.facing = Vec2::new(velocity.x.signum(), 0.0);
        }
    }

    fn update_ground_contact(&mut self, grounded: bool, dt: f32, tuning: &MovementTuning) {
        let was_grounded = self.is_grounded;
        self.is_grounded = grounded;

        if grounded {
            self.jump_time_elapsed = 0.0;
            self.coyote_time_elapsed = 0.0;
            self.is_airborne = false;
            self.can_dash = true;
            if !was_grounded {
                debug!("Landed: dash recharged");
            }
            return;
        }

        self.coyote_time_elapsed += dt;
        if self.coyote_time_elapsed >= tuning.coyote_time && !self.is_airborne {
            self.is_airborne = true;
            debug!(
                "Coyote window closed after {:.3}s",
                self.coyote_time_elapsed
            );
        }
    }

    fn apply_wall_slide(&self, body: &mut PlayerBody, dt: f32, tuning: &MovementTuning) {
        // Sliding only applies while falling or resting against the wall
        if self.touching_wall && self.is_airborne && body.velocity.y < tuning.epsilon {
            body.apply_force(tuning.wall_slide_force, dt, tuning.mass);
        }
    }

    fn try_wall_jump(
        &mut self,
        input: &MovementInput,
        body: &mut PlayerBody,
        tuning: &MovementTuning,
    ) -> bool {
        if !(input.jump_just_pressed && self.is_airborne && self.touching_wall) {
            return false;
        }

        // Facing points into the wall, so push the other way
        let impulse = Vec2::new(
            -tuning.wall_jump_impulse.x * self.facing.x,
            tuning.wall_jump_impulse.y,
        );
        body.apply_impulse(impulse, tuning.mass);
        self.horizontal_lock_timer = tuning.horizontal_lock_time;
        debug!("Wall jump: impulse={:?}", impulse);
        true
    }

    fn apply_jump(
        &mut self,
        input: &MovementInput,
        body: &mut PlayerBody,
        dt: f32,
        tuning: &MovementTuning,
    ) {
        if input.jump_held && self.jump_time_elapsed <= tuning.max_jump_time && !self.is_airborne
        {
            body.apply_force(Vec2::Y * tuning.jump_force, dt, tuning.mass);
            self.jump_time_elapsed += dt;
        }

        // Short-hop cancel
        if !input.jump_held && self.jump_time_elapsed >= tuning.epsilon {
            self.is_airborne = true;
        }
    }

    fn try_dash(
        &mut self,
        input: &MovementInput,
        body: &mut PlayerBody,
        tuning: &MovementTuning,
    ) -> bool {
        if !(self.can_dash && input.dash_just_pressed) {
            return false;
        }

        let mut direction = body.velocity.normalize_or_zero();
        if direction.length() <= tuning.epsilon {
            direction = self.facing;
        }
        body.velocity = Vec2::new(direction.x, direction.y / 2.0) * tuning.dash_impulse;
        self.can_dash = false;
        self.horizontal_lock_timer = tuning.horizontal_lock_time;
        debug!("Dash: velocity={:?}", body.velocity);
        true
    }
}
