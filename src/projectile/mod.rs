//! Projectile domain: flight, bounce and pickup policy for the thrown projectile.

mod components;
mod lifecycle;
mod resources;
mod spawn;
mod systems;


pub use components::{
    DestroyReason, PickupState, Projectile, ProjectileBody, ProjectileId, ProjectileSignal,
};
pub use resources::ProjectileTuning;
pub use spawn::projectile_layers;
pub(crate) use spawn::projectile_bundle;

use bevy::prelude::*;

use crate::movement::GameplaySet;
use crate::projectile::systems::{detect_player_pickups, step_projectiles, tint_projectiles};

pub struct ProjectilePlugin;

impl Plugin for ProjectilePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ProjectileTuning>().add_systems(
            Update,
            (step_projectiles, detect_player_pickups, tint_projectiles)
                .chain()
                .in_set(GameplaySet::Projectile),
        );
    }
}
