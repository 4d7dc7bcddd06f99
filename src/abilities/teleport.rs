//! Abilities domain: short-range teleport with aim preview, obstruction
//! back-off and a charge economy.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::abilities::{AbilityTuning, CooldownTimer};
use crate::core::{PhysicsQuery, surface_mask};

/// What the aim line should show this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeleportPreview {
    pub from: Vec2,
    /// Aim point clamped to the teleport range.
    pub target: Vec2,
    pub blocked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TeleportOutcome {
    Teleported { from: Vec2, to: Vec2 },
    Refused(TeleportRefusal),
    /// Target obstructed and no clear point found on the way back.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeleportRefusal {
    NotAiming,
    NoCharges,
    CoolingDown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeleportState {
    /// Always within `0..=max_charges`.
    pub charges: u32,
    pub max_charges: u32,
    pub is_aiming: bool,
    pub max_distance: f32,
    pub block_mask: LayerMask,
    pub probe_radius: f32,
    pub back_off_step: f32,
    pub cooldown: CooldownTimer,
    pub preview: Option<TeleportPreview>,
}

impl TeleportState {
    pub fn from_tuning(tuning: &AbilityTuning) -> Self {
        Self {
            charges: tuning.teleport_max_charges,
            max_charges: tuning.teleport_max_charges,
            is_aiming: false,
            max_distance: tuning.teleport_max_distance,
            block_mask: surface_mask(),
            probe_radius: tuning.teleport_probe_radius,
            back_off_step: tuning.teleport_back_off_step,
            cooldown: CooldownTimer::new(tuning.teleport_cooldown),
            preview: None,
        }
    }

    /// Enter aim mode. Refused without a charge or during cooldown, leaving
    /// the aim state untouched.
    pub fn start_aim(&mut self, now: f32) -> bool {
        if self.charges == 0 {
            debug!("Teleport aim refused: no charges");
            return false;
        }
        if !self.cooldown.is_ready(now) {
            debug!(
                "Teleport aim refused: cooling down ({:.1}s left)",
                self.cooldown.remaining(now)
            );
            return false;
        }
        self.is_aiming = true;
        debug!("Teleport aim started");
        true
    }

    pub fn cancel_aim(&mut self) {
        self.is_aiming = false;
        self.preview = None;
    }

    pub fn clamp_target(&self, from: Vec2, aim: Vec2) -> Vec2 {
        let offset = aim - from;
        if offset.length() > self.max_distance {
            from + offset.normalize_or_zero() * self.max_distance
        } else {
            aim
        }
    }

    pub fn is_blocked(&self, point: Vec2, physics: &impl PhysicsQuery) -> bool {
        physics
            .circle_overlap(point, self.probe_radius, self.block_mask)
            .is_some()
    }

    pub fn update_preview(&mut self, from: Vec2, aim: Vec2, physics: &impl PhysicsQuery) {
        if !self.is_aiming {
            return;
        }
        let target = self.clamp_target(from, aim);
        self.preview = Some(TeleportPreview {
            from,
            target,
            blocked: self.is_blocked(target, physics),
        });
    }

    /// Walk from `target` back toward `from` in fixed steps and return the
    /// first clear point. Stops short of `from` itself.
    pub fn back_off(&self, from: Vec2, target: Vec2, physics: &impl PhysicsQuery) -> Option<Vec2> {
        let direction = (target - from).normalize_or_zero();
        let distance = from.distance(target);
        if direction == Vec2::ZERO || self.back_off_step <= 0.0 {
            return None;
        }

        (0..)
            .map(|step| distance - step as f32 * self.back_off_step)
            .take_while(|d| *d > 0.0)
            .map(|d| from + direction * d)
            .find(|point| !self.is_blocked(*point, physics))
    }

    /// Teleport on aim release. The caller moves the body to `to`; velocity
    /// is left untouched.
    pub fn execute(
        &mut self,
        now: f32,
        from: Vec2,
        aim: Vec2,
        physics: &impl PhysicsQuery,
    ) -> TeleportOutcome {
        if !self.is_aiming {
            return TeleportOutcome::Refused(TeleportRefusal::NotAiming);
        }
        if self.charges == 0 {
            debug!("Teleport refused: no charges");
            self.cancel_aim();
            return TeleportOutcome::Refused(TeleportRefusal::NoCharges);
        }
        if !self.cooldown.is_ready(now) {
            debug!(
                "Teleport refused: cooling down ({:.1}s left)",
                self.cooldown.remaining(now)
            );
            self.cancel_aim();
            return TeleportOutcome::Refused(TeleportRefusal::CoolingDown);
        }

        let mut target = self.clamp_target(from, aim);
        if self.is_blocked(target, physics) {
            match self.back_off(from, target, physics) {
                Some(clear) => {
                    debug!("Teleport target obstructed, backed off to {:?}", clear);
                    target = clear;
                }
                None => {
                    warn!("Teleport cancelled: no clear point toward {:?}", target);
                    self.cancel_aim();
                    return TeleportOutcome::Cancelled;
                }
            }
        }

        self.charges -= 1;
        self.cooldown.fire(now);
        self.cancel_aim();
        info!(
            "Teleported to {:?} ({}/{} charges left)",
            target, self.charges, self.max_charges
        );
        TeleportOutcome::Teleported { from, to: target }
    }

    /// Restore one charge, capped at the maximum. Returns true if it grew.
    pub fn refresh_one(&mut self) -> bool {
        if self.charges < self.max_charges {
            self.charges += 1;
            debug!("Teleport charge refreshed: {}/{}", self.charges, self.max_charges);
            true
        } else {
            debug!("Teleport charges already full: {}", self.max_charges);
            false
        }
    }

    /// Scene change: charges to max, aim off.
    pub fn reset(&mut self) {
        self.charges = self.max_charges;
        self.cancel_aim();
    }
}
