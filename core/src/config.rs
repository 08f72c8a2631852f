//! Tunable parameters of a simulation session.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::SpawnRing;

/// Size of the playfield the presentation layer displays.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in world units.
    pub width: f32,
    /// Height in world units.
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Parameters used to construct a session.
///
/// Every field has a default, so partial configuration files only need to
/// name the values they override.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed feeding every random stream of the session.
    pub rng_seed: u64,
    /// Playfield dimensions, used to size the spawn ring.
    pub viewport: Viewport,
    /// World-space position of the crystal.
    pub crystal_position: Vec2,
    /// Gold available when the session starts.
    pub starting_gold: u32,
    /// Upper bound applied to each tick delta before the speed multiplier.
    pub max_tick_delta: f32,
    /// Ticks between wave increments.
    pub frames_per_wave: u64,
    /// Ticks between crystal regeneration pulses.
    pub regen_period_frames: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rng_seed: 0x00c0_ffee,
            viewport: Viewport::default(),
            crystal_position: Vec2::ZERO,
            starting_gold: 200,
            max_tick_delta: 0.1,
            frames_per_wave: 2_000,
            regen_period_frames: 60,
        }
    }
}

impl SimulationConfig {
    /// Ring on which hostiles enter, sized to sit just outside the viewport.
    #[must_use]
    pub fn spawn_ring(&self) -> SpawnRing {
        SpawnRing {
            center: self.crystal_position,
            radius: self.viewport.width.max(self.viewport.height) / 2.0 + 50.0,
        }
    }

    /// Clamps a raw tick delta into `[0, max_tick_delta]`.
    ///
    /// `NaN` collapses to zero.
    #[must_use]
    pub fn clamp_delta(&self, delta_seconds: f32) -> f32 {
        if delta_seconds.is_nan() {
            return 0.0;
        }
        delta_seconds.clamp(0.0, self.max_tick_delta.max(0.0))
    }
}
