//! Movement domain: drives the locomotion state machine from the engine body.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::abilities::AbilityCoordinator;
use crate::core::{PlayerBody, TickContext, WorldProbe};
use crate::movement::{LocomotionState, MovementInput, MovementTuning, Player};

pub(crate) fn step_locomotion(
    time: Res<Time>,
    input: Res<MovementInput>,
    tuning: Res<MovementTuning>,
    probe: WorldProbe,
    mut query: Query<
        (
            &mut Transform,
            &mut LinearVelocity,
            &mut GravityScale,
            &mut LocomotionState,
            Option<&AbilityCoordinator>,
        ),
        With<Player>,
    >,
) {
    let ctx = TickContext::from_time(&time);

    for (mut transform, mut velocity, mut gravity, mut state, abilities) in &mut query {
        // The gravity flip shares the jump button; swallow jump on the flip frame
        let frame_input = match abilities {
            Some(abilities) if abilities.is_in_gravity_reverse_mode() => input.without_jump(),
            _ => input.clone(),
        };

        let mut body = PlayerBody::from_engine(&transform, &velocity, &gravity);
        state.step(ctx, &frame_input, &mut body, &probe, &tuning);
        body.write_to(&mut transform, &mut velocity, &mut gravity);
    }
}

/// Players spawned without a rigid body never match the locomotion query;
/// report it once instead of failing.
pub(crate) fn report_missing_body(
    query: Query<Entity, (With<Player>, Without<LinearVelocity>)>,
    mut reported: Local<bool>,
) {
    if *reported {
        return;
    }
    for entity in &query {
        warn!(
            "Player {:?} has no LinearVelocity; locomotion and abilities are disabled",
            entity
        );
        *reported = true;
    }
}
