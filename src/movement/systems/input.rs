//! Movement domain: input sampling for locomotion.

use bevy::prelude::*;

use crate::movement::MovementInput;

pub(crate) fn read_input(keyboard: Res<ButtonInput<KeyCode>>, mut input: ResMut<MovementInput>) {
    // Horizontal axis
    let mut x = 0.0;
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        x += 1.0;
    }

    input.axis = Vec2::new(x, 0.0);
    input.jump_just_pressed = keyboard.just_pressed(KeyCode::Space);
    input.jump_held = keyboard.pressed(KeyCode::Space);
    input.dash_just_pressed = keyboard.just_pressed(KeyCode::ShiftLeft);
}
