//! Movement domain: player locomotion (run, jump, wall slide, wall jump, dash).

mod components;
mod locomotion;
mod probes;
mod resources;
mod systems;


pub use components::{GameLayer, Ground, LocomotionState, Player, Wall};
pub use probes::{detect_ground, detect_wall};
pub use resources::{MovementInput, MovementTuning};

use bevy::prelude::*;

use crate::movement::systems::{read_input, report_missing_body, step_locomotion};

/// Ordering of the per-frame gameplay step shared by the domain plugins.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameplaySet {
    Input,
    Abilities,
    Locomotion,
    Projectile,
    Commands,
}

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementTuning>()
            .init_resource::<MovementInput>()
            .configure_sets(
                Update,
                (
                    GameplaySet::Input,
                    GameplaySet::Abilities,
                    GameplaySet::Locomotion,
                    GameplaySet::Projectile,
                    GameplaySet::Commands,
                )
                    .chain(),
            )
            .add_systems(Update, read_input.in_set(GameplaySet::Input))
            .add_systems(
                Update,
                (step_locomotion, report_missing_body).in_set(GameplaySet::Locomotion),
            );
    }
}
