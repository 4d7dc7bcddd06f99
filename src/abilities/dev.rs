//! Abilities domain: developer hotkeys and gizmos.

use bevy::prelude::*;

use crate::abilities::{AbilityCoordinator, ReclaimProjectileEvent, SceneProfile, SetSceneEvent};
use crate::projectile::ProjectileBody;

/// 1/2/3 switch to Home/Office/Dream.
pub(crate) fn scene_hotkeys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut scene_events: MessageWriter<SetSceneEvent>,
) {
    let profile = if keyboard.just_pressed(KeyCode::Digit1) {
        SceneProfile::Home
    } else if keyboard.just_pressed(KeyCode::Digit2) {
        SceneProfile::Office
    } else if keyboard.just_pressed(KeyCode::Digit3) {
        SceneProfile::Dream
    } else {
        return;
    };
    scene_events.write(SetSceneEvent { profile });
}

/// Q reclaims the projectile with rewards, Shift+Q without.
pub(crate) fn reclaim_hotkey(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut reclaim_events: MessageWriter<ReclaimProjectileEvent>,
) {
    if !keyboard.just_pressed(KeyCode::KeyQ) {
        return;
    }
    let refresh = !keyboard.pressed(KeyCode::ShiftLeft);
    reclaim_events.write(ReclaimProjectileEvent { refresh });
}

/// Teleport aim line (red when obstructed) and the manual-bounce range.
pub(crate) fn draw_ability_gizmos(
    mut gizmos: Gizmos,
    coordinators: Query<(Entity, &AbilityCoordinator)>,
    projectiles: Query<(&ProjectileBody, &Transform)>,
) {
    for (owner, coordinator) in &coordinators {
        if let Some(preview) = coordinator.teleport.preview {
            let color = if preview.blocked {
                Color::srgb(1.0, 0.2, 0.2)
            } else {
                Color::srgb(0.0, 1.0, 1.0)
            };
            gizmos.line_2d(preview.from, preview.target, color);
            gizmos.circle_2d(preview.target, coordinator.teleport.probe_radius, color);
        }

        let Some(live) = coordinator.projectile() else {
            continue;
        };
        for (body, transform) in &projectiles {
            if body.owner != owner || body.id != live.id {
                continue;
            }
            let color = if coordinator.is_bounce_ready() {
                Color::srgb(1.0, 0.9, 0.2)
            } else {
                Color::srgb(0.5, 0.5, 0.5)
            };
            gizmos.circle_2d(
                transform.translation.truncate(),
                coordinator.bounce_detection_radius(),
                color,
            );
        }
    }
}
