//! Level domain: camera follow.

use bevy::prelude::*;

use crate::core::MainCamera;
use crate::movement::Player;

/// Follow smoothing rate (1/s).
const FOLLOW_RATE: f32 = 6.0;

/// Region the camera centre may move within.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct CameraBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for CameraBounds {
    fn default() -> Self {
        Self {
            min: Vec2::new(-4.0, -1.0),
            max: Vec2::new(4.0, 3.0),
        }
    }
}

impl CameraBounds {
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max.max(self.min))
    }
}

/// Next camera centre: an exponential step from `current` toward the
/// clamped player position.
pub fn follow_step(current: Vec2, player: Vec2, bounds: &CameraBounds, dt: f32) -> Vec2 {
    let target = bounds.clamp(player);
    let t = 1.0 - (-FOLLOW_RATE * dt).exp();
    current.lerp(target, t)
}

pub(crate) fn follow_player(
    time: Res<Time>,
    bounds: Res<CameraBounds>,
    players: Query<&Transform, With<Player>>,
    mut cameras: Query<&mut Transform, (With<MainCamera>, Without<Player>)>,
) {
    let Ok(player) = players.single() else {
        return;
    };
    let Ok(mut camera) = cameras.single_mut() else {
        return;
    };

    let next = follow_step(
        camera.translation.truncate(),
        player.translation.truncate(),
        &bounds,
        time.delta_secs(),
    );
    camera.translation.x = next.x;
    camera.translation.y = next.y;
}
