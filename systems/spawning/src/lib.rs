#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for wave progression and hostile
//! spawn commands.
//!
//! The system reacts to [`Event::TimeAdvanced`] frame counters. Every
//! `frames_per_wave` frames it requests a wave advance, schedules bosses once
//! per fifth wave and releases regular batches on a cadence that tightens as
//! waves progress.

use std::f32::consts::TAU;

use crystal_defence_core::{
    Command, Event, HostileKind, SessionSnapshot, SpawnRing, BOSS_BOUNTY,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const BOSS_WAVE_INTERVAL: u32 = 5;
const BATCH_SPACING: f32 = 20.0;
const REGULAR_KINDS: [HostileKind; 6] = [
    HostileKind::Grunt,
    HostileKind::Flying,
    HostileKind::Exploder,
    HostileKind::Healer,
    HostileKind::Armored,
    HostileKind::Splitter,
];

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    frames_per_wave: u64,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided wave length and seed.
    #[must_use]
    pub const fn new(frames_per_wave: u64, rng_seed: u64) -> Self {
        Self {
            frames_per_wave,
            rng_seed,
        }
    }
}

/// Pure system that deterministically emits wave and spawn commands.
#[derive(Debug)]
pub struct Spawning {
    frames_per_wave: u64,
    rng: ChaCha8Rng,
    pool: Vec<HostileKind>,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            frames_per_wave: config.frames_per_wave,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            pool: Vec::with_capacity(REGULAR_KINDS.len()),
        }
    }

    /// Consumes events and the session snapshot to emit wave and spawn commands.
    ///
    /// The snapshot must reflect the world after the events were produced; wave
    /// advances requested earlier in the same batch are tracked locally.
    pub fn handle(
        &mut self,
        events: &[Event],
        session: &SessionSnapshot,
        ring: SpawnRing,
        out: &mut Vec<Command>,
    ) {
        if !session.active {
            return;
        }

        let mut wave = session.wave;
        let mut boss_wave = session.boss_wave;
        for event in events {
            let Event::TimeAdvanced { frame, .. } = event else {
                continue;
            };

            if self.frames_per_wave > 0 && frame % self.frames_per_wave == 0 {
                wave = wave.saturating_add(1);
                out.push(Command::AdvanceWave);
            }

            if is_boss_wave(wave) && boss_wave < wave {
                boss_wave = wave;
                for _ in 0..boss_count(wave) {
                    let angle = self.rng.gen::<f32>() * TAU;
                    out.push(Command::SpawnHostile {
                        kind: HostileKind::Boss,
                        position: ring.point(angle, 0.0),
                        wave,
                        bounty: Some(BOSS_BOUNTY),
                    });
                }
            }

            if frame % spawn_interval_frames(wave) == 0 {
                self.emit_batch(wave, ring, out);
            }
        }
    }

    fn emit_batch(&mut self, wave: u32, ring: SpawnRing, out: &mut Vec<Command>) {
        unlocked_kinds(wave, &mut self.pool);
        for index in 0..batch_size(wave) {
            let kind = self.pool[self.rng.gen_range(0..self.pool.len())];
            let angle = self.rng.gen::<f32>() * TAU;
            out.push(Command::SpawnHostile {
                kind,
                position: ring.point(angle, index as f32 * BATCH_SPACING),
                wave,
                bounty: None,
            });
        }
    }
}

/// Frames between regular spawn batches on the provided wave.
#[must_use]
pub fn spawn_interval_frames(wave: u32) -> u64 {
    100_u64.saturating_sub(u64::from(wave) * 3).max(20)
}

/// Number of hostiles released per regular batch on the provided wave.
#[must_use]
pub const fn batch_size(wave: u32) -> u32 {
    1 + wave / 5
}

/// Number of bosses released when the provided boss wave begins.
#[must_use]
pub const fn boss_count(wave: u32) -> u32 {
    1 + wave / 10
}

/// Reports whether bosses appear on the provided wave.
#[must_use]
pub const fn is_boss_wave(wave: u32) -> bool {
    wave > 0 && wave % BOSS_WAVE_INTERVAL == 0
}

/// Replaces the contents of `pool` with the regular kinds unlocked on `wave`.
///
/// Grunts are always available.
pub fn unlocked_kinds(wave: u32, pool: &mut Vec<HostileKind>) {
    pool.clear();
    pool.extend(REGULAR_KINDS.iter().copied().filter(|kind| {
        *kind == HostileKind::Grunt
            || kind
                .unlocks_after_wave()
                .is_some_and(|threshold| wave > threshold)
    }));
}
