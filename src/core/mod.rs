//! Core domain: shared simulation plumbing (clock, body, physics seam, timed effects).

mod body;
mod clock;
mod physics;
mod schedule;

#[cfg(test)]
pub(crate) mod test_world;


pub use body::PlayerBody;
pub use clock::TickContext;
pub use physics::{PhysicsQuery, RayHit, SurfaceTag, WorldProbe, reflect, surface_mask};
pub use schedule::Continuations;

use bevy::prelude::*;

/// World units shown per screen pixel; the level is authored in metres.
const CAMERA_SCALE: f32 = 1.0 / 48.0;

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera);
    }
}

/// Marks the gameplay camera (aim targets are resolved through it).
#[derive(Component, Debug)]
pub struct MainCamera;

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        MainCamera,
        Camera2d,
        Transform::from_scale(Vec3::splat(CAMERA_SCALE)),
    ));
}
