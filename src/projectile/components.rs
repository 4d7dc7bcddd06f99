//! Projectile domain: projectile state and the entity marker.

use bevy::prelude::*;

/// Per-coordinator monotonic id. Timed effects carry it so they can tell a
/// stale projectile from the live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectileId(pub u32);

/// Flight state of the single live projectile, owned by the ability coordinator.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: ProjectileId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub bounce_count: u32,
    /// Never reverts to false once set.
    pub pickup_eligible: bool,
    pub owner_ignore_window_active: bool,
    /// Latest deadline of any open collision-ignore window.
    pub ignore_until: f32,
    pub spawned_at: f32,
    pub(crate) last_speed: f32,
    pub(crate) unstick_applied: bool,
}

/// Marks the engine entity carrying a projectile.
#[derive(Component, Debug, Clone, Copy)]
pub struct ProjectileBody {
    pub id: ProjectileId,
    pub owner: Entity,
}

/// Pickup readiness as shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupState {
    /// Not bounced yet.
    Fresh,
    /// Bounced, but not enough to be collected.
    Bounced,
    Eligible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyReason {
    MaxBounces,
    Stalled,
    PickedUp,
    Reclaimed,
    Expired,
}

/// Intent raised by the projectile lifecycle. The coordinator acts on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileSignal {
    Destroy(DestroyReason),
    Pickup,
}
