//! Level domain: test room, player spawn and camera follow.

mod camera;
mod player;
mod room;


use bevy::prelude::*;

use crate::level::camera::{CameraBounds, follow_player};
use crate::level::player::spawn_player;
use crate::level::room::spawn_test_room;
use crate::movement::GameplaySet;

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraBounds>()
            .add_systems(Startup, (spawn_test_room, spawn_player))
            .add_systems(Update, follow_player.after(GameplaySet::Commands));
    }
}
