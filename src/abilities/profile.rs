//! Abilities domain: scene profiles and the capabilities they unlock.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum SceneProfile {
    #[default]
    Home,
    Office,
    Dream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub can_shoot: bool,
    pub can_teleport: bool,
    pub can_teleport_projectile: bool,
    pub can_reverse_gravity: bool,
}

impl SceneProfile {
    pub fn capabilities(self) -> Capabilities {
        match self {
            SceneProfile::Home => Capabilities {
                can_shoot: true,
                ..Default::default()
            },
            SceneProfile::Office => Capabilities {
                can_shoot: true,
                can_teleport: true,
                can_teleport_projectile: true,
                ..Default::default()
            },
            SceneProfile::Dream => Capabilities {
                can_reverse_gravity: true,
                ..Default::default()
            },
        }
    }
}
