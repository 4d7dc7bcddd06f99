//! Abilities domain: scene selection and reclaim events.

use bevy::ecs::message::Message;

use crate::abilities::SceneProfile;

/// Switch every ability coordinator to `profile`.
#[derive(Debug, Clone, Copy)]
pub struct SetSceneEvent {
    pub profile: SceneProfile,
}

impl Message for SetSceneEvent {}

/// Destroy the live projectile of every coordinator. With `refresh`, the
/// player also gets the pickup rewards.
#[derive(Debug, Clone, Copy)]
pub struct ReclaimProjectileEvent {
    pub refresh: bool,
}

impl Message for ReclaimProjectileEvent {}
