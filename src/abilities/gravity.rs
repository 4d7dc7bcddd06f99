//! Abilities domain: gravity inversion and the hover blend.

use crate::core::PlayerBody;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityState {
    pub is_reversed: bool,
    pub base_gravity_scale: f32,
}

impl GravityState {
    pub fn new(base_gravity_scale: f32) -> Self {
        Self {
            is_reversed: false,
            base_gravity_scale,
        }
    }

    pub fn effective_scale(&self) -> f32 {
        if self.is_reversed {
            -self.base_gravity_scale
        } else {
            self.base_gravity_scale
        }
    }

    /// Invert gravity and mirror the body vertically.
    pub fn flip(&mut self, body: &mut PlayerBody) {
        self.is_reversed = !self.is_reversed;
        body.gravity_scale = self.effective_scale();
        body.flip_y = self.is_reversed;
    }

    pub fn reset(&mut self, body: &mut PlayerBody) {
        self.is_reversed = false;
        body.gravity_scale = self.base_gravity_scale;
        body.flip_y = false;
    }

    /// Gravity scale `t` of the way from the hover scale back to the current
    /// baseline.
    pub fn hover_blend(&self, factor: f32, t: f32) -> f32 {
        let baseline = self.effective_scale();
        let reduced = baseline * factor;
        reduced + (baseline - reduced) * t.clamp(0.0, 1.0)
    }
}
