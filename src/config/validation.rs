//! Range checks for loaded tuning values.

use super::data::TuningFile;

/// A tuning value outside its allowed range.
#[derive(Debug)]
pub struct TuningValidationError {
    pub field: &'static str,
    pub value: f32,
    pub expected: &'static str,
}

impl std::fmt::Display for TuningValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Tuning field '{}' is {} but must be {}",
            self.field, self.value, self.expected
        )
    }
}

macro_rules! check {
    ($errors:expr, $field:expr, $value:expr, $expected:expr, $ok:expr) => {
        let value: f32 = $value;
        if !$ok(value) {
            $errors.push(TuningValidationError {
                field: $field,
                value,
                expected: $expected,
            });
        }
    };
}

fn positive(v: f32) -> bool {
    v > 0.0
}

fn non_negative(v: f32) -> bool {
    v >= 0.0
}

fn unit(v: f32) -> bool {
    (0.0..=1.0).contains(&v)
}

/// Returns every out-of-range value, empty if the file is usable.
pub fn validate_tuning(tuning: &TuningFile) -> Vec<TuningValidationError> {
    let mut errors = Vec::new();

    let m = &tuning.movement;
    check!(errors, "movement.move_speed", m.move_speed, "> 0", positive);
    check!(errors, "movement.jump_force", m.jump_force, ">= 0", non_negative);
    check!(errors, "movement.max_jump_time", m.max_jump_time, ">= 0", non_negative);
    check!(errors, "movement.coyote_time", m.coyote_time, ">= 0", non_negative);
    check!(errors, "movement.dash_impulse", m.dash_impulse, ">= 0", non_negative);
    check!(
        errors,
        "movement.horizontal_lock_time",
        m.horizontal_lock_time,
        ">= 0",
        non_negative
    );
    check!(errors, "movement.mass", m.mass, "> 0", positive);
    check!(errors, "movement.epsilon", m.epsilon, ">= 0", non_negative);
    check!(
        errors,
        "movement.ground_probe_length",
        m.ground_probe_length,
        "> 0",
        positive
    );
    check!(errors, "movement.wall_probe_length", m.wall_probe_length, "> 0", positive);

    let a = &tuning.abilities;
    check!(errors, "abilities.shoot_cooldown", a.shoot_cooldown, ">= 0", non_negative);
    check!(errors, "abilities.gravity_cooldown", a.gravity_cooldown, ">= 0", non_negative);
    check!(
        errors,
        "abilities.teleport_max_distance",
        a.teleport_max_distance,
        "> 0",
        positive
    );
    check!(
        errors,
        "abilities.teleport_cooldown",
        a.teleport_cooldown,
        ">= 0",
        non_negative
    );
    check!(
        errors,
        "abilities.teleport_probe_radius",
        a.teleport_probe_radius,
        "> 0",
        positive
    );
    check!(
        errors,
        "abilities.teleport_back_off_step",
        a.teleport_back_off_step,
        "> 0",
        positive
    );
    check!(
        errors,
        "abilities.projectile_teleport_cooldown",
        a.projectile_teleport_cooldown,
        ">= 0",
        non_negative
    );
    check!(errors, "abilities.bounce_cooldown", a.bounce_cooldown, ">= 0", non_negative);
    check!(
        errors,
        "abilities.bounce_detection_radius",
        a.bounce_detection_radius,
        "> 0",
        positive
    );
    check!(
        errors,
        "abilities.hover_gravity_factor",
        a.hover_gravity_factor,
        "within [0, 1]",
        unit
    );
    check!(errors, "abilities.hover_hold", a.hover_hold, ">= 0", non_negative);
    check!(
        errors,
        "abilities.hover_transition",
        a.hover_transition,
        ">= 0",
        non_negative
    );

    let p = &tuning.projectile;
    check!(errors, "projectile.speed", p.speed, "> 0", positive);
    check!(errors, "projectile.lifespan", p.lifespan, "> 0", positive);
    check!(
        errors,
        "projectile.max_bounces",
        p.max_bounces as f32,
        ">= 1",
        |v: f32| v >= 1.0
    );
    check!(errors, "projectile.restitution", p.restitution, "within [0, 1]", unit);
    check!(errors, "projectile.stall_speed", p.stall_speed, ">= 0", non_negative);
    check!(errors, "projectile.radius", p.radius, "> 0", positive);
    check!(
        errors,
        "projectile.pickup_clearance",
        p.pickup_clearance,
        ">= 0",
        non_negative
    );
    check!(
        errors,
        "projectile.spawn_ignore_window",
        p.spawn_ignore_window,
        ">= 0",
        non_negative
    );
    check!(
        errors,
        "projectile.relocate_ignore_window",
        p.relocate_ignore_window,
        ">= 0",
        non_negative
    );
    if p.required_bounces > p.max_bounces {
        errors.push(TuningValidationError {
            field: "projectile.required_bounces",
            value: p.required_bounces as f32,
            expected: "<= projectile.max_bounces",
        });
    }

    errors
}
