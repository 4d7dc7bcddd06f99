//! Abilities domain: scene-dependent shoot, teleport, projectile teleport,
//! manual bounce and gravity inversion.

mod cooldown;
mod coordinator;
#[cfg(feature = "dev-tools")]
mod dev;
mod events;
mod gravity;
mod profile;
mod resources;
mod systems;
mod teleport;

#[cfg(test)]
mod tests;

pub use cooldown::CooldownTimer;
pub use coordinator::{AbilityCommand, AbilityCoordinator};
pub use events::{ReclaimProjectileEvent, SetSceneEvent};
pub use gravity::GravityState;
pub use profile::{Capabilities, SceneProfile};
pub use resources::{AbilityInput, AbilityTuning};
pub use teleport::{TeleportOutcome, TeleportState};

use bevy::prelude::*;

use crate::abilities::systems::{
    apply_ability_commands, apply_reclaim_requests, apply_scene_changes, finish_ability_frame,
    read_ability_input, step_abilities,
};
use crate::movement::GameplaySet;

pub struct AbilitiesPlugin;

impl Plugin for AbilitiesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AbilityTuning>()
            .init_resource::<AbilityInput>()
            .add_message::<SetSceneEvent>()
            .add_message::<ReclaimProjectileEvent>()
            .add_systems(Update, read_ability_input.in_set(GameplaySet::Input))
            .add_systems(
                Update,
                (apply_scene_changes, apply_reclaim_requests, step_abilities)
                    .chain()
                    .in_set(GameplaySet::Abilities),
            )
            .add_systems(Update, apply_ability_commands.in_set(GameplaySet::Commands))
            .add_systems(Last, finish_ability_frame);

        #[cfg(feature = "dev-tools")]
        app.add_systems(
            Update,
            (
                (dev::scene_hotkeys, dev::reclaim_hotkey).before(GameplaySet::Abilities),
                dev::draw_ability_gizmos.after(GameplaySet::Commands),
            ),
        );
    }
}
