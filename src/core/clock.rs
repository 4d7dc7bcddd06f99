//! Core domain: the per-tick clock handed to every simulation step.

use bevy::prelude::*;

/// Simulation time for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    /// Seconds since startup.
    pub now: f32,
    /// Seconds since the previous tick.
    pub dt: f32,
}

impl TickContext {
    pub fn new(now: f32, dt: f32) -> Self {
        Self { now, dt }
    }

    pub fn from_time(time: &Time) -> Self {
        Self {
            now: time.elapsed_secs(),
            dt: time.delta_secs(),
        }
    }
}
