//! Abilities domain: per-player coordinator for scene abilities and the
//! projectile they share.
//!
//! The coordinator owns the only reference to the live projectile. The
//! projectile lifecycle reports intent through [`ProjectileSignal`]s and the
//! coordinator performs the resulting destruction or reclaim. Engine side
//! effects leave as [`AbilityCommand`]s for the glue systems to apply.

use bevy::prelude::*;

use crate::abilities::{
    AbilityInput, AbilityTuning, Capabilities, CooldownTimer, GravityState, SceneProfile,
    TeleportOutcome, TeleportState,
};
use crate::core::{Continuations, PhysicsQuery, PlayerBody, TickContext, surface_mask};
use crate::projectile::{
    DestroyReason, Projectile, ProjectileId, ProjectileSignal, ProjectileTuning,
};

/// Deferred effect waiting on the simulation clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimedEffect {
    /// Close the owner-ignore window if its latest deadline has passed.
    RestorePlayerCollision { id: ProjectileId },
    ExpireProjectile { id: ProjectileId },
    ClearGravityReverseMode,
    /// Hover hold or transition step for the hover started at `started_at`.
    HoverRelease { started_at: f32 },
}

/// Engine-side work requested by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbilityCommand {
    SpawnProjectile {
        id: ProjectileId,
        position: Vec2,
        velocity: Vec2,
        ignore_player: bool,
    },
    DespawnProjectile {
        id: ProjectileId,
    },
    SetPlayerCollision {
        id: ProjectileId,
        ignored: bool,
    },
    /// Push the coordinator's position and velocity for `id` to the engine.
    RelocateProjectile {
        id: ProjectileId,
    },
    /// Push the coordinator's velocity for `id` to the engine.
    RedirectProjectile {
        id: ProjectileId,
    },
    RefreshDash,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilityCooldowns {
    pub shoot: CooldownTimer,
    pub gravity: CooldownTimer,
    pub projectile_teleport: CooldownTimer,
    pub bounce: CooldownTimer,
}

impl AbilityCooldowns {
    fn from_tuning(tuning: &AbilityTuning) -> Self {
        Self {
            shoot: CooldownTimer::new(tuning.shoot_cooldown),
            gravity: CooldownTimer::new(tuning.gravity_cooldown),
            projectile_teleport: CooldownTimer::new(tuning.projectile_teleport_cooldown),
            bounce: CooldownTimer::new(tuning.bounce_cooldown),
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct AbilityCoordinator {
    profile: SceneProfile,
    capabilities: Capabilities,
    pub teleport: TeleportState,
    pub gravity: GravityState,
    pub cooldowns: AbilityCooldowns,
    projectile: Option<Projectile>,
    next_projectile_id: u32,
    effects: Continuations<TimedEffect>,
    commands: Vec<AbilityCommand>,
    gravity_reverse_mode: bool,
    bounce_ready: bool,
    /// Start time of the hover currently in control of gravity.
    active_hover: Option<f32>,
    tuning: AbilityTuning,
    projectile_tuning: ProjectileTuning,
}

impl AbilityCoordinator {
    pub fn new(
        tuning: AbilityTuning,
        projectile_tuning: ProjectileTuning,
        base_gravity_scale: f32,
    ) -> Self {
        let profile = tuning.starting_scene;
        Self {
            profile,
            capabilities: profile.capabilities(),
            teleport: TeleportState::from_tuning(&tuning),
            gravity: GravityState::new(base_gravity_scale),
            cooldowns: AbilityCooldowns::from_tuning(&tuning),
            projectile: None,
            next_projectile_id: 0,
            effects: Continuations::default(),
            commands: Vec::new(),
            gravity_reverse_mode: false,
            bounce_ready: false,
            active_hover: None,
            tuning,
            projectile_tuning,
        }
    }

    pub fn profile(&self) -> SceneProfile {
        self.profile
    }

    pub fn projectile(&self) -> Option<&Projectile> {
        self.projectile.as_ref()
    }

    pub fn is_in_gravity_reverse_mode(&self) -> bool {
        self.gravity_reverse_mode
    }

    pub fn is_bounce_ready(&self) -> bool {
        self.bounce_ready
    }

    pub fn bounce_detection_radius(&self) -> f32 {
        self.tuning.bounce_detection_radius
    }

    #[cfg(test)]
    pub fn pending_effects(&self) -> impl Iterator<Item = &TimedEffect> {
        self.effects.iter()
    }

    pub fn drain_commands(&mut self) -> Vec<AbilityCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Switch scene: transient ability state resets, cooldowns and a live
    /// projectile are kept.
    pub fn set_scene(&mut self, profile: SceneProfile, body: &mut PlayerBody) {
        self.profile = profile;
        self.capabilities = profile.capabilities();
        self.teleport.reset();
        self.gravity.reset(body);
        self.gravity_reverse_mode = false;
        info!("Scene set to {:?}: {:?}", profile, self.capabilities);
    }

    /// One simulation tick of the ability layer.
    pub fn tick(
        &mut self,
        ctx: TickContext,
        input: &AbilityInput,
        body: &mut PlayerBody,
        physics: &impl PhysicsQuery,
    ) {
        self.run_due_effects(ctx, body);

        if self.capabilities.can_shoot && input.fire_just_pressed {
            self.shoot_projectile(ctx, input.aim_target, body.position);
        }
        if input.bounce_just_pressed {
            self.try_manual_bounce(ctx, physics);
        }
        if self.capabilities.can_teleport {
            self.handle_teleport(ctx, input, body, physics);
        }
        if self.capabilities.can_teleport_projectile && input.projectile_teleport_just_pressed {
            self.teleport_projectile(ctx, input.aim_target);
        }
        if self.capabilities.can_reverse_gravity && input.gravity_just_pressed {
            self.try_flip_gravity(ctx, body);
        }

        self.refresh_bounce_ready(ctx, physics);
    }

    /// Frame boundary: run end-of-frame continuations.
    pub fn end_frame(&mut self) {
        for effect in self.effects.take_end_of_frame() {
            if effect == TimedEffect::ClearGravityReverseMode {
                self.gravity_reverse_mode = false;
            }
        }
    }

    fn run_due_effects(&mut self, ctx: TickContext, body: &mut PlayerBody) {
        for effect in self.effects.take_due(ctx.now) {
            match effect {
                TimedEffect::RestorePlayerCollision { id } => {
                    let Some(projectile) = self.projectile.as_mut().filter(|p| p.id == id) else {
                        continue;
                    };
                    if projectile.close_ignore_window_if_due(ctx.now) {
                        self.commands.push(AbilityCommand::SetPlayerCollision {
                            id,
                            ignored: false,
                        });
                        debug!("Player collision restored for projectile {:?}", id);
                    }
                }
                TimedEffect::ExpireProjectile { id } => {
                    if self.live_projectile_id() == Some(id) {
                        self.release_projectile(DestroyReason::Expired, ctx.now);
                    }
                }
                TimedEffect::ClearGravityReverseMode => self.gravity_reverse_mode = false,
                TimedEffect::HoverRelease { started_at } => {
                    self.step_hover(ctx, started_at, body);
                }
            }
        }
    }

    fn live_projectile_id(&self) -> Option<ProjectileId> {
        self.projectile.as_ref().map(|p| p.id)
    }

    // -------------------------------------------------------------------------
    // Shoot
    // -------------------------------------------------------------------------

    /// Spawn a projectile toward `aim_target`. Returns true if one was spawned.
    pub fn shoot_projectile(
        &mut self,
        ctx: TickContext,
        aim_target: Option<Vec2>,
        origin: Vec2,
    ) -> bool {
        if !self.cooldowns.shoot.is_ready(ctx.now) {
            debug!("Shot refused: cooling down");
            return false;
        }
        if self.projectile.is_some() {
            debug!("Shot refused: a projectile is already live");
            return false;
        }
        let Some(target) = aim_target else {
            warn!("Shot refused: no aim target (camera or cursor unavailable)");
            return false;
        };
        let Some(direction) = (target - origin).try_normalize() else {
            debug!("Shot refused: aim target on the player");
            return false;
        };

        let tuning = &self.projectile_tuning;
        let id = ProjectileId(self.next_projectile_id);
        self.next_projectile_id += 1;
        let position = origin + direction * tuning.spawn_clearance;
        let velocity = direction * tuning.speed;

        self.projectile = Some(Projectile::new(id, position, velocity, ctx.now, tuning));
        self.effects.after(
            ctx.now,
            tuning.spawn_ignore_window,
            TimedEffect::RestorePlayerCollision { id },
        );
        self.effects
            .after(ctx.now, tuning.lifespan, TimedEffect::ExpireProjectile { id });
        self.commands.push(AbilityCommand::SpawnProjectile {
            id,
            position,
            velocity,
            ignore_player: true,
        });
        self.cooldowns.shoot.fire(ctx.now);
        info!("Projectile {:?} shot toward {:?}", id, direction);
        true
    }

    // -------------------------------------------------------------------------
    // Reclaim and pickup
    // -------------------------------------------------------------------------

    /// Destroy the live projectile; with `refresh`, also refresh dash, add a
    /// teleport charge and start a hover.
    pub fn reclaim_projectile(&mut self, refresh: bool, ctx: TickContext, body: &mut PlayerBody) {
        self.release_projectile(DestroyReason::Reclaimed, ctx.now);
        if refresh {
            self.grant_pickup_rewards(ctx, body);
        }
    }

    fn release_projectile(&mut self, reason: DestroyReason, now: f32) -> Option<Projectile> {
        let projectile = self.projectile.take()?;
        self.commands
            .push(AbilityCommand::DespawnProjectile { id: projectile.id });
        info!(
            "Projectile {:?} destroyed after {:.2}s: {:?}",
            projectile.id,
            now - projectile.spawned_at,
            reason
        );
        Some(projectile)
    }

    fn grant_pickup_rewards(&mut self, ctx: TickContext, body: &mut PlayerBody) {
        self.commands.push(AbilityCommand::RefreshDash);
        self.teleport.refresh_one();
        self.start_hover(ctx, body);
    }

    /// The owning player touched the live projectile.
    pub fn projectile_player_contact(&mut self, ctx: TickContext, body: &mut PlayerBody) {
        let Some(projectile) = &self.projectile else {
            return;
        };
        if projectile.on_player_contact(body.position, &self.projectile_tuning)
            == Some(ProjectileSignal::Pickup)
        {
            self.release_projectile(DestroyReason::PickedUp, ctx.now);
            self.grant_pickup_rewards(ctx, body);
        }
    }

    // -------------------------------------------------------------------------
    // Projectile flight
    // -------------------------------------------------------------------------

    /// Engine-integrated motion for the live projectile. Motion the
    /// coordinator set this frame and has not yet pushed to the engine wins.
    pub fn observe_projectile(&mut self, id: ProjectileId, position: Vec2, velocity: Vec2) {
        if self.has_pending(AbilityCommand::RelocateProjectile { id }) {
            return;
        }
        let redirected = self.has_pending(AbilityCommand::RedirectProjectile { id });
        if let Some(projectile) = self.projectile.as_mut().filter(|p| p.id == id) {
            projectile.position = position;
            if !redirected {
                projectile.velocity = velocity;
            }
        }
    }

    fn has_pending(&self, command: AbilityCommand) -> bool {
        self.commands.contains(&command)
    }

    pub fn step_projectile(&mut self, ctx: TickContext, physics: &impl PhysicsQuery) {
        let Some(projectile) = self.projectile.as_mut() else {
            return;
        };
        match projectile.update(ctx, physics, &self.projectile_tuning) {
            Some(ProjectileSignal::Destroy(reason)) => {
                self.release_projectile(reason, ctx.now);
            }
            Some(ProjectileSignal::Pickup) | None => {}
        }
    }

    // -------------------------------------------------------------------------
    // Manual bounce
    // -------------------------------------------------------------------------

    fn try_manual_bounce(&mut self, ctx: TickContext, physics: &impl PhysicsQuery) {
        if !self.bounce_ready {
            debug!("Bounce refused: not ready");
            return;
        }
        let radius = self.tuning.bounce_detection_radius;
        let speed = self.projectile_tuning.speed;
        let Some(projectile) = self.projectile.as_mut() else {
            return;
        };
        let Some(surface) = projectile.nearest_surface(physics, radius) else {
            return;
        };

        projectile.redirect_from(surface, speed);
        let id = projectile.id;
        debug!(
            "Projectile {:?} bounced manually, velocity {:?}",
            id, projectile.velocity
        );
        self.commands.push(AbilityCommand::RedirectProjectile { id });
        self.cooldowns.bounce.fire(ctx.now);
        self.bounce_ready = false;
    }

    fn refresh_bounce_ready(&mut self, ctx: TickContext, physics: &impl PhysicsQuery) {
        let radius = self.tuning.bounce_detection_radius;
        self.bounce_ready = self.cooldowns.bounce.is_ready(ctx.now)
            && self.projectile.as_ref().is_some_and(|projectile| {
                !physics
                    .circle_overlap_all(projectile.position, radius, surface_mask())
                    .is_empty()
            });
    }

    // -------------------------------------------------------------------------
    // Teleport
    // -------------------------------------------------------------------------

    fn handle_teleport(
        &mut self,
        ctx: TickContext,
        input: &AbilityInput,
        body: &mut PlayerBody,
        physics: &impl PhysicsQuery,
    ) {
        if input.aim_just_pressed {
            self.teleport.start_aim(ctx.now);
        }

        if input.aim_just_released && self.teleport.is_aiming {
            match input.aim_target {
                Some(aim) => {
                    if let TeleportOutcome::Teleported { from, to } =
                        self.teleport.execute(ctx.now, body.position, aim, physics)
                    {
                        debug!("Player moved {:?} -> {:?}", from, to);
                        body.position = to;
                    }
                }
                None => {
                    warn!("Teleport cancelled: no aim target");
                    self.teleport.cancel_aim();
                }
            }
        }

        if let Some(aim) = input.aim_target {
            self.teleport.update_preview(body.position, aim, physics);
        }
    }

    /// Move the live projectile to the aim point at rest. No obstruction test.
    fn teleport_projectile(&mut self, ctx: TickContext, aim_target: Option<Vec2>) {
        if !self.cooldowns.projectile_teleport.is_ready(ctx.now) {
            debug!("Projectile teleport refused: cooling down");
            return;
        }
        let Some(projectile) = self.projectile.as_mut() else {
            debug!("Projectile teleport refused: no live projectile");
            return;
        };
        let Some(target) = aim_target else {
            warn!("Projectile teleport refused: no aim target");
            return;
        };

        let tuning = &self.projectile_tuning;
        projectile.relocate(target, ctx.now, tuning);
        let id = projectile.id;
        self.effects.after(
            ctx.now,
            tuning.relocate_ignore_window,
            TimedEffect::RestorePlayerCollision { id },
        );
        self.commands.push(AbilityCommand::SetPlayerCollision { id, ignored: true });
        self.commands.push(AbilityCommand::RelocateProjectile { id });
        self.cooldowns.projectile_teleport.fire(ctx.now);
        info!("Projectile {:?} teleported to {:?}", id, target);
    }

    // -------------------------------------------------------------------------
    // Gravity and hover
    // -------------------------------------------------------------------------

    fn try_flip_gravity(&mut self, ctx: TickContext, body: &mut PlayerBody) {
        if !self.cooldowns.gravity.is_ready(ctx.now) {
            debug!("Gravity flip refused: cooling down");
            return;
        }
        self.gravity.flip(body);
        self.gravity_reverse_mode = true;
        self.effects
            .at_end_of_frame(TimedEffect::ClearGravityReverseMode);
        self.cooldowns.gravity.fire(ctx.now);
        info!(
            "Gravity {}",
            if self.gravity.is_reversed {
                "reversed"
            } else {
                "restored"
            }
        );
    }

    fn start_hover(&mut self, ctx: TickContext, body: &mut PlayerBody) {
        body.gravity_scale = self.gravity.hover_blend(self.tuning.hover_gravity_factor, 0.0);
        body.velocity.y = self.tuning.hover_kick;
        self.active_hover = Some(ctx.now);
        self.effects.after(
            ctx.now,
            self.tuning.hover_hold,
            TimedEffect::HoverRelease {
                started_at: ctx.now,
            },
        );
        debug!("Hover started");
    }

    /// Blend gravity back toward the current baseline once the hold is over.
    fn step_hover(&mut self, ctx: TickContext, started_at: f32, body: &mut PlayerBody) {
        // A newer hover took over
        if self.active_hover != Some(started_at) {
            return;
        }

        let transition = self.tuning.hover_transition;
        let elapsed = ctx.now - (started_at + self.tuning.hover_hold);
        let t = if transition > 0.0 {
            elapsed / transition
        } else {
            1.0
        };

        body.gravity_scale = self.gravity.hover_blend(self.tuning.hover_gravity_factor, t);
        if t >= 1.0 {
            self.active_hover = None;
            debug!("Hover ended");
        } else {
            self.effects
                .next_tick(ctx.now, TimedEffect::HoverRelease { started_at });
        }
    }
}
