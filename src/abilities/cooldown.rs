//! Abilities domain: cooldown gating.

/// Gate for one action. Ready iff never fired or `now >= last_fired_at + duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CooldownTimer {
    pub last_fired_at: Option<f32>,
    pub duration: f32,
}

impl CooldownTimer {
    pub fn new(duration: f32) -> Self {
        Self {
            last_fired_at: None,
            duration,
        }
    }

    pub fn is_ready(&self, now: f32) -> bool {
        self.last_fired_at
            .is_none_or(|fired| now >= fired + self.duration)
    }

    pub fn fire(&mut self, now: f32) {
        self.last_fired_at = Some(now);
    }

    pub fn remaining(&self, now: f32) -> f32 {
        self.last_fired_at
            .map_or(0.0, |fired| (fired + self.duration - now).max(0.0))
    }
}
