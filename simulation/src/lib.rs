#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick driver that owns a Crystal Defence session.
//!
//! [`Simulation`] sequences every tick: it advances the world clock, lets the
//! spawning system react to the resulting events, applies the spawn commands
//! and finally runs the entity phase. Player actions are translated into world
//! commands and report success as plain booleans; the typed rejection reasons
//! remain available on the event feed returned by [`Simulation::drain_events`].

use crystal_defence_core::{
    Command, DefenderId, DefenderSnapshot, Effect, Event, HostileSnapshot, ProjectileSnapshot,
    SessionSnapshot, SimulationConfig, SpeedMultiplier, Vec2,
};
use crystal_defence_system_spawning::{Config as SpawningConfig, Spawning};
use crystal_defence_world::{
    self as world,
    query::{self, DefenderView, HostileView},
    World,
};
use tracing::{debug, trace};

/// Owns the world and the systems that drive it for the lifetime of a session.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    world: World,
    spawning: Spawning,
    pending_events: Vec<Event>,
}

impl Simulation {
    /// Creates a session shaped by the provided configuration.
    #[must_use]
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            config: config.clone(),
            world: World::with_config(config),
            spawning: Spawning::new(SpawningConfig::new(
                config.frames_per_wave,
                config.rng_seed,
            )),
            pending_events: Vec::new(),
        }
    }

    /// Advances the session by one tick.
    ///
    /// The delta is clamped to `[0, max_tick_delta]` and scaled by the active
    /// speed multiplier. Ended sessions ignore the call entirely.
    pub fn advance_simulation(&mut self, delta_seconds: f32) {
        if !query::is_active(&self.world) {
            return;
        }

        let dt = self.config.clamp_delta(delta_seconds) * query::speed(&self.world).factor();
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::AdvanceClock { dt }, &mut events);

        let mut commands = Vec::new();
        self.spawning.handle(
            &events,
            &query::session(&self.world),
            query::spawn_ring(&self.world),
            &mut commands,
        );
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        world::apply(&mut self.world, Command::UpdateEntities { dt }, &mut events);
        trace!(dt, events = events.len(), "tick complete");
        self.pending_events.append(&mut events);
    }

    /// Places a defender of the given catalog variant at `(x, y)`.
    ///
    /// Returns `false` and leaves the session unchanged when the placement is
    /// rejected.
    pub fn place_defender(&mut self, variant: u32, x: f32, y: f32) -> bool {
        let position = Vec2::new(x, y);
        self.submit(Command::PlaceDefender { variant, position }, |event| {
            matches!(event, Event::DefenderPlaced { .. })
        })
    }

    /// Sells the selected defender, returning `false` when nothing is selected
    /// or the session has ended.
    pub fn sell_selected(&mut self) -> bool {
        self.submit(Command::SellSelected, |event| {
            matches!(event, Event::DefenderSold { .. })
        })
    }

    /// Selects the defender under `(x, y)`, clearing the selection when none is hit.
    pub fn select_at(&mut self, x: f32, y: f32) -> Option<DefenderId> {
        let position = Vec2::new(x, y);
        let _ = self.submit(Command::SelectAt { position }, |_| true);
        query::session(&self.world).selected
    }

    /// Clears the current defender selection.
    pub fn clear_selection(&mut self) {
        let _ = self.submit(Command::ClearSelection, |_| true);
    }

    /// Trades gold for crystal experience, returning `false` when rejected.
    pub fn purchase_experience(&mut self) -> bool {
        self.submit(Command::PurchaseExperience, |event| {
            matches!(event, Event::ExperiencePurchased { .. })
        })
    }

    /// Sets the speed multiplier applied to subsequent ticks.
    pub fn set_speed(&mut self, speed: SpeedMultiplier) {
        let _ = self.submit(Command::SetSpeed { speed }, |_| true);
    }

    /// Switches between normal and double speed, returning the new multiplier.
    pub fn toggle_speed(&mut self) -> SpeedMultiplier {
        let speed = query::speed(&self.world).toggled();
        self.set_speed(speed);
        speed
    }

    /// Reports whether the session still accepts ticks.
    #[must_use]
    pub fn is_active(&self) -> bool {
        query::is_active(&self.world)
    }

    /// Captures the session-wide state shown by the HUD.
    #[must_use]
    pub fn session(&self) -> SessionSnapshot {
        query::session(&self.world)
    }

    /// Captures every hostile in spawn order.
    #[must_use]
    pub fn hostiles(&self) -> HostileView {
        query::hostile_view(&self.world)
    }

    /// Captures every defender in placement order.
    #[must_use]
    pub fn defenders(&self) -> DefenderView {
        query::defender_view(&self.world)
    }

    /// Captures every projectile in flight.
    #[must_use]
    pub fn projectiles(&self) -> Vec<ProjectileSnapshot> {
        query::projectiles(&self.world)
    }

    /// Visual effect feed for presentation layers.
    #[must_use]
    pub fn effects(&self) -> &[Effect] {
        query::effects(&self.world)
    }

    /// Hostile under `(x, y)`, for hover tooltips.
    #[must_use]
    pub fn hostile_at(&self, x: f32, y: f32) -> Option<HostileSnapshot> {
        query::hostile_at(&self.world, Vec2::new(x, y))
    }

    /// Defender under `(x, y)`, for hover tooltips and selection previews.
    #[must_use]
    pub fn defender_at(&self, x: f32, y: f32) -> Option<DefenderSnapshot> {
        query::defender_at(&self.world, Vec2::new(x, y))
    }

    /// Applies a raw world command, such as a scripted spawn, recording its events.
    pub fn apply(&mut self, command: Command) {
        let _ = self.submit(command, |_| true);
    }

    /// Read-only access to the underlying world for advanced queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Returns and clears every event produced since the previous drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending_events)
    }

    fn submit(&mut self, command: Command, accepted: impl Fn(&Event) -> bool) -> bool {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        let outcome = events.iter().any(accepted);
        if !outcome {
            debug!(?events, "command rejected");
        }
        self.pending_events.append(&mut events);
        outcome
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(&SimulationConfig::default())
    }
}
