//! Level domain: the test room geometry.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::{GameLayer, Ground, Wall};

const WALL_COLOR: Color = Color::srgb(0.3, 0.3, 0.4);
const GROUND_COLOR: Color = Color::srgb(0.4, 0.5, 0.4);
const PLATFORM_COLOR: Color = Color::srgb(0.5, 0.4, 0.3);

/// Static block, sized in metres.
#[derive(Debug, Clone, Copy)]
pub struct Block {
    pub center: Vec2,
    pub size: Vec2,
    pub surface: Surface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Floor,
    Platform,
    Wall,
}

impl Block {
    const fn new(x: f32, y: f32, width: f32, height: f32, surface: Surface) -> Self {
        Self {
            center: Vec2::new(x, y),
            size: Vec2::new(width, height),
            surface,
        }
    }
}

/// Floor, side walls, three platforms and a pillar for wall-jump practice.
pub const TEST_ROOM: [Block; 7] = [
    Block::new(0.0, -4.0, 17.0, 0.8, Surface::Floor),
    Block::new(-8.75, 1.0, 0.8, 10.5, Surface::Wall),
    Block::new(8.75, 1.0, 0.8, 10.5, Surface::Wall),
    Block::new(-5.0, -1.0, 3.0, 0.4, Surface::Platform),
    Block::new(5.0, 1.0, 3.0, 0.4, Surface::Platform),
    Block::new(0.0, 3.0, 2.5, 0.4, Surface::Platform),
    Block::new(-2.0, -1.6, 0.6, 4.0, Surface::Wall),
];

/// Top of the floor block.
pub const FLOOR_TOP: f32 = -3.6;

pub(crate) fn spawn_test_room(mut commands: Commands) {
    let ground_layers = CollisionLayers::new(GameLayer::Ground, [GameLayer::Player]);
    let wall_layers = CollisionLayers::new(GameLayer::Wall, [GameLayer::Player]);

    for block in TEST_ROOM {
        let sprite = Sprite {
            color: match block.surface {
                Surface::Floor => GROUND_COLOR,
                Surface::Platform => PLATFORM_COLOR,
                Surface::Wall => WALL_COLOR,
            },
            custom_size: Some(block.size),
            ..default()
        };
        let body = (
            sprite,
            Transform::from_translation(block.center.extend(0.0)),
            RigidBody::Static,
            Collider::rectangle(block.size.x, block.size.y),
        );

        match block.surface {
            Surface::Floor | Surface::Platform => {
                commands.spawn((Name::new("Ground"), Ground, body, ground_layers));
            }
            Surface::Wall => {
                commands.spawn((Name::new("Wall"), Wall, body, wall_layers));
            }
        }
    }

    info!("Test room spawned ({} blocks)", TEST_ROOM.len());
}
