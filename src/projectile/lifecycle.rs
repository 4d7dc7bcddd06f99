//! Projectile domain: bounce, stall, pickup and collision-ignore policy.

use bevy::prelude::*;

use crate::core::{PhysicsQuery, RayHit, TickContext, reflect, surface_mask};
use crate::projectile::{
    DestroyReason, PickupState, Projectile, ProjectileId, ProjectileSignal, ProjectileTuning,
};

impl Projectile {
    /// A freshly shot projectile. The owner-ignore window stays open until
    /// `now + spawn_ignore_window`.
    pub fn new(
        id: ProjectileId,
        position: Vec2,
        velocity: Vec2,
        now: f32,
        tuning: &ProjectileTuning,
    ) -> Self {
        Self {
            id,
            position,
            velocity,
            bounce_count: 0,
            pickup_eligible: false,
            owner_ignore_window_active: true,
            ignore_until: now + tuning.spawn_ignore_window,
            spawned_at: now,
            last_speed: velocity.length(),
            unstick_applied: false,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn pickup_state(&self) -> PickupState {
        if self.pickup_eligible {
            PickupState::Eligible
        } else if self.bounce_count > 0 {
            PickupState::Bounced
        } else {
            PickupState::Fresh
        }
    }

    /// Per-tick update: surface sweep, resting-contact guard, stall check.
    pub fn update(
        &mut self,
        ctx: TickContext,
        physics: &impl PhysicsQuery,
        tuning: &ProjectileTuning,
    ) -> Option<ProjectileSignal> {
        match self.sweep(ctx.dt, physics, tuning) {
            Some(hit) => {
                debug!(
                    "Projectile {:?} hit {:?} at {:?}",
                    self.id, hit.tag, hit.point
                );
                if let Some(signal) = self.on_surface_collision(hit.normal, tuning) {
                    return Some(signal);
                }
            }
            None => self.resting_contact_guard(physics, tuning),
        }

        let speed = self.speed();
        let stalled = speed < tuning.stall_speed && self.last_speed >= tuning.stall_speed;
        self.last_speed = speed;
        if stalled {
            debug!("Projectile {:?} stalled at speed {:.2}", self.id, speed);
            return Some(ProjectileSignal::Destroy(DestroyReason::Stalled));
        }
        None
    }

    /// First bounce surface the projectile reaches this tick.
    fn sweep(
        &self,
        dt: f32,
        physics: &impl PhysicsQuery,
        tuning: &ProjectileTuning,
    ) -> Option<RayHit> {
        let speed = self.speed();
        if speed <= f32::EPSILON {
            return None;
        }

        physics
            .ray_query(
                self.position,
                self.velocity,
                speed * dt + tuning.radius,
                surface_mask(),
            )
            .into_iter()
            // A zero normal means the ray started inside the collider
            .find(|hit| hit.tag.is_bounce_surface() && hit.normal != Vec2::ZERO)
    }

    /// Reflect off a wall or ground surface, losing energy to restitution.
    pub fn on_surface_collision(
        &mut self,
        normal: Vec2,
        tuning: &ProjectileTuning,
    ) -> Option<ProjectileSignal> {
        let incoming = self.velocity;
        let speed = incoming.length() * tuning.restitution;
        self.velocity = reflect(incoming, normal).normalize_or_zero() * speed;
        self.bounce_count += 1;
        self.refresh_pickup_eligibility(tuning);

        debug!(
            "Projectile {:?} bounced ({}/{}), speed {:.2}",
            self.id, self.bounce_count, tuning.max_bounces, speed
        );

        (self.bounce_count >= tuning.max_bounces)
            .then_some(ProjectileSignal::Destroy(DestroyReason::MaxBounces))
    }

    fn refresh_pickup_eligibility(&mut self, tuning: &ProjectileTuning) {
        if !self.pickup_eligible && self.bounce_count >= tuning.required_bounces {
            self.pickup_eligible = true;
            debug!(
                "Projectile {:?} can be picked up after {} bounces",
                self.id, self.bounce_count
            );
        }
    }

    /// One push away from a surface the projectile is resting against while
    /// slower than the stuck threshold. Re-arms once contact is lost.
    fn resting_contact_guard(&mut self, physics: &impl PhysicsQuery, tuning: &ProjectileTuning) {
        let Some(contact) =
            self.nearest_surface(physics, tuning.radius + tuning.contact_skin)
        else {
            self.unstick_applied = false;
            return;
        };
        if self.unstick_applied || self.speed() >= tuning.stuck_speed {
            return;
        }

        let Some(away) = (self.position - contact).try_normalize() else {
            return;
        };
        self.velocity += away * tuning.unstick_impulse;
        self.unstick_applied = true;
        debug!("Projectile {:?} pushed off resting contact", self.id);
    }

    /// Pickup request from the owning player at `player_position`.
    pub fn on_player_contact(
        &self,
        player_position: Vec2,
        tuning: &ProjectileTuning,
    ) -> Option<ProjectileSignal> {
        if self.owner_ignore_window_active {
            return None;
        }
        if !self.pickup_eligible {
            debug!(
                "Pickup refused: {} of {} bounces",
                self.bounce_count, tuning.required_bounces
            );
            return None;
        }
        let distance = self.position.distance(player_position);
        if distance <= tuning.pickup_clearance {
            debug!("Pickup refused: too close ({:.2})", distance);
            return None;
        }
        Some(ProjectileSignal::Pickup)
    }

    /// Projectile teleport: move to `position` at rest and reopen the
    /// owner-ignore window.
    pub fn relocate(&mut self, position: Vec2, now: f32, tuning: &ProjectileTuning) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.last_speed = 0.0;
        self.unstick_applied = false;
        self.open_ignore_window(now + tuning.relocate_ignore_window);
    }

    /// Manual bounce: reflect the heading about the direction to
    /// `surface_point`, then move at `speed`.
    pub fn redirect_from(&mut self, surface_point: Vec2, speed: f32) {
        let toward_surface = (surface_point - self.position).normalize_or_zero();
        let heading = reflect(self.velocity.normalize_or_zero(), toward_surface);
        // At rest there is nothing to reflect; push straight off the surface
        let heading = if heading == Vec2::ZERO {
            -toward_surface
        } else {
            heading
        };
        self.velocity = heading * speed;
        self.last_speed = self.speed();
    }

    /// Closest point on any bounce surface within `radius`.
    pub fn nearest_surface(&self, physics: &impl PhysicsQuery, radius: f32) -> Option<Vec2> {
        physics
            .circle_overlap_all(self.position, radius, surface_mask())
            .into_iter()
            .filter(|hit| hit.tag.is_bounce_surface())
            .map(|hit| hit.closest_point)
            .min_by(|a, b| {
                a.distance_squared(self.position)
                    .total_cmp(&b.distance_squared(self.position))
            })
    }

    /// Open (or extend) the owner-ignore window to `until`.
    pub fn open_ignore_window(&mut self, until: f32) {
        self.ignore_until = self.ignore_until.max(until);
        self.owner_ignore_window_active = true;
    }

    /// Close the window once its latest deadline has passed. Returns true if
    /// it closed on this call.
    pub fn close_ignore_window_if_due(&mut self, now: f32) -> bool {
        if self.owner_ignore_window_active && now >= self.ignore_until {
            self.owner_ignore_window_active = false;
            return true;
        }
        false
    }
}
