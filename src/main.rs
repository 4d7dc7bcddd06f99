mod abilities;
mod config;
mod core;
mod level;
mod movement;
mod projectile;

use avian2d::prelude::*;
use bevy::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Dreamwalk".to_string(),
                resolution: (1280, 720).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(PhysicsPlugins::default())
        .add_plugins((
            core::CorePlugin,
            config::ConfigPlugin,
            movement::MovementPlugin,
            abilities::AbilitiesPlugin,
            projectile::ProjectilePlugin,
            level::LevelPlugin,
        ))
        .run();
}
