#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Crystal Defence.

mod crystal;
mod defenders;
mod effects;
mod hostiles;
mod projectiles;

use crystal_defence_core::{
    Color, Command, DefenderId, Effect, Event, HostileId, PurchaseError, SessionEndCause,
    SimulationConfig, SpawnRing, SpeedMultiplier, WELCOME_BANNER,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

use crate::{crystal::Crystal, defenders::Defender, hostiles::Hostile, projectiles::Projectile};

const WORLD_RNG_STREAM: u64 = 1;

const EXPERIENCE_PRICE_GOLD: u32 = 500;
const EXPERIENCE_PER_PURCHASE: u32 = 500;

const LEVEL_UP_COLOR: Color = Color::from_rgb(0x00, 0xff, 0xff);

/// Represents the authoritative Crystal Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    spawn_ring: SpawnRing,
    regen_period_frames: u64,
    crystal: Crystal,
    gold: u32,
    wave: u32,
    boss_wave: u32,
    frame: u64,
    speed: SpeedMultiplier,
    active: bool,
    selected: Option<DefenderId>,
    hostiles: Vec<Hostile>,
    defenders: Vec<Defender>,
    projectiles: Vec<Projectile>,
    effects: Vec<Effect>,
    next_hostile_id: u32,
    next_defender_id: u32,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a new world using the default session configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&SimulationConfig::default())
    }

    /// Creates a new world shaped by the provided session configuration.
    #[must_use]
    pub fn with_config(config: &SimulationConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        rng.set_stream(WORLD_RNG_STREAM);
        Self {
            banner: WELCOME_BANNER,
            spawn_ring: config.spawn_ring(),
            regen_period_frames: config.regen_period_frames,
            crystal: Crystal::new(config.crystal_position),
            gold: config.starting_gold,
            wave: 1,
            boss_wave: 0,
            frame: 0,
            speed: SpeedMultiplier::Normal,
            active: true,
            selected: None,
            hostiles: Vec::new(),
            defenders: Vec::new(),
            projectiles: Vec::new(),
            effects: Vec::new(),
            next_hostile_id: 0,
            next_defender_id: 0,
            rng,
        }
    }

    fn allocate_hostile_id(&mut self) -> HostileId {
        let id = HostileId::new(self.next_hostile_id);
        self.next_hostile_id = self.next_hostile_id.wrapping_add(1);
        id
    }

    fn allocate_defender_id(&mut self) -> DefenderId {
        let id = DefenderId::new(self.next_defender_id);
        self.next_defender_id = self.next_defender_id.wrapping_add(1);
        id
    }

    fn advance_clock(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        self.frame = self.frame.saturating_add(1);
        if self.regen_period_frames > 0 && self.frame % self.regen_period_frames == 0 {
            self.crystal.regenerate();
        }
        self.crystal.recharge_shield(dt);
        trace!(frame = self.frame, dt, "clock advanced");
        out_events.push(Event::TimeAdvanced {
            dt,
            frame: self.frame,
        });
    }

    fn update_entities(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        self.update_hostiles(dt, out_events);
        self.update_defenders(dt, out_events);
        self.update_projectiles(dt);
        // Boss shots land after the defender phase.
        self.prune_defenders(out_events);
        self.update_effects(dt);

        if self.crystal.is_destroyed() {
            self.end_session(SessionEndCause::CrystalDestroyed, out_events);
        }
    }

    fn grant_experience(&mut self, amount: u32, out_events: &mut Vec<Event>) {
        let gained = self.crystal.gain_experience(amount);
        let reached = self.crystal.level;
        for level in (reached + 1 - gained)..=reached {
            info!(level, "crystal leveled up");
            effects::explosion(
                &mut self.effects,
                &mut self.rng,
                self.crystal.position,
                LEVEL_UP_COLOR,
            );
            out_events.push(Event::CrystalLeveledUp { level });
        }
    }

    fn purchase_experience(&mut self, out_events: &mut Vec<Event>) {
        let rejection = if !self.active {
            Some(PurchaseError::SessionEnded)
        } else if self.gold < EXPERIENCE_PRICE_GOLD {
            Some(PurchaseError::InsufficientGold)
        } else {
            None
        };
        if let Some(reason) = rejection {
            debug!(%reason, "experience purchase rejected");
            out_events.push(Event::PurchaseRejected { reason });
            return;
        }

        self.gold -= EXPERIENCE_PRICE_GOLD;
        out_events.push(Event::ExperiencePurchased {
            cost: EXPERIENCE_PRICE_GOLD,
            experience: EXPERIENCE_PER_PURCHASE,
        });
        self.grant_experience(EXPERIENCE_PER_PURCHASE, out_events);
    }

    fn end_session(&mut self, cause: SessionEndCause, out_events: &mut Vec<Event>) {
        if !self.active {
            return;
        }
        self.active = false;
        info!(?cause, frame = self.frame, wave = self.wave, "session ended");
        out_events.push(Event::SessionEnded { cause });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the session has ended, clock, wave, spawn and entity commands are
/// ignored and economy commands are rejected with a typed reason.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::AdvanceClock { dt } => {
            if world.active {
                world.advance_clock(dt, out_events);
            }
        }
        Command::AdvanceWave => {
            if world.active {
                world.wave = world.wave.saturating_add(1);
                info!(wave = world.wave, "wave advanced");
                out_events.push(Event::WaveAdvanced { wave: world.wave });
            }
        }
        Command::SpawnHostile {
            kind,
            position,
            wave,
            bounty,
        } => {
            if world.active {
                world.spawn_hostile(kind, position, wave, bounty, out_events);
            }
        }
        Command::UpdateEntities { dt } => {
            if world.active {
                world.update_entities(dt, out_events);
            }
        }
        Command::PlaceDefender { variant, position } => {
            world.place_defender(variant, position, out_events);
        }
        Command::SelectAt { position } => world.select_at(position, out_events),
        Command::ClearSelection => world.clear_selection(out_events),
        Command::SellSelected => world.sell_selected(out_events),
        Command::PurchaseExperience => world.purchase_experience(out_events),
        Command::SetSpeed { speed } => {
            world.speed = speed;
            out_events.push(Event::SpeedChanged { speed });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use crystal_defence_core::{
        CrystalSnapshot, DefenderSnapshot, Effect, HostileSnapshot, ProjectileSnapshot,
        SessionSnapshot, SpawnRing, SpeedMultiplier, Vec2,
    };

    const HOSTILE_HIT_MARGIN: f32 = 5.0;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Reports whether the session still accepts ticks.
    #[must_use]
    pub fn is_active(world: &World) -> bool {
        world.active
    }

    /// Active speed multiplier.
    #[must_use]
    pub fn speed(world: &World) -> SpeedMultiplier {
        world.speed
    }

    /// Captures the session-wide state shown by the HUD.
    #[must_use]
    pub fn session(world: &World) -> SessionSnapshot {
        SessionSnapshot {
            gold: world.gold,
            wave: world.wave,
            boss_wave: world.boss_wave,
            frame: world.frame,
            speed: world.speed,
            active: world.active,
            selected: world.selected,
            crystal: world.crystal.snapshot(),
        }
    }

    /// Captures the crystal state.
    #[must_use]
    pub fn crystal(world: &World) -> CrystalSnapshot {
        world.crystal.snapshot()
    }

    /// Ring on which hostiles enter the world.
    #[must_use]
    pub fn spawn_ring(world: &World) -> SpawnRing {
        world.spawn_ring
    }

    /// Captures a read-only view of the hostiles in spawn order.
    #[must_use]
    pub fn hostile_view(world: &World) -> HostileView {
        HostileView {
            snapshots: world.hostiles.iter().map(|hostile| hostile.snapshot()).collect(),
        }
    }

    /// Captures a read-only view of the defenders in placement order.
    #[must_use]
    pub fn defender_view(world: &World) -> DefenderView {
        DefenderView {
            snapshots: world
                .defenders
                .iter()
                .map(|defender| defender.snapshot())
                .collect(),
        }
    }

    /// Captures every projectile in flight.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| projectile.snapshot())
            .collect()
    }

    /// Provides the visual effect feed in creation order.
    #[must_use]
    pub fn effects(world: &World) -> &[Effect] {
        &world.effects
    }

    /// Finds the living hostile nearest to `point` whose body, widened by a
    /// small margin, contains the point.
    #[must_use]
    pub fn hostile_at(world: &World, point: Vec2) -> Option<HostileSnapshot> {
        world
            .hostiles
            .iter()
            .filter(|hostile| hostile.is_alive())
            .filter(|hostile| hostile.position.distance(point) < hostile.radius + HOSTILE_HIT_MARGIN)
            .min_by(|a, b| {
                a.position
                    .distance(point)
                    .total_cmp(&b.position.distance(point))
            })
            .map(|hostile| hostile.snapshot())
    }

    /// Finds the living defender nearest to `point` whose body, widened by a
    /// small margin, contains the point.
    #[must_use]
    pub fn defender_at(world: &World, point: Vec2) -> Option<DefenderSnapshot> {
        world
            .defender_index_at(point)
            .map(|index| world.defenders[index].snapshot())
    }

    /// Read-only snapshot describing all hostiles in the world.
    #[derive(Clone, Debug)]
    pub struct HostileView {
        snapshots: Vec<HostileSnapshot>,
    }

    impl HostileView {
        /// Iterator over the captured hostile snapshots in spawn order.
        pub fn iter(&self) -> impl Iterator<Item = &HostileSnapshot> {
            self.snapshots.iter()
        }

        /// Number of hostiles captured in the view.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether the view is empty.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<HostileSnapshot> {
            self.snapshots
        }
    }

    /// Read-only snapshot describing all defenders in the world.
    #[derive(Clone, Debug)]
    pub struct DefenderView {
        snapshots: Vec<DefenderSnapshot>,
    }

    impl DefenderView {
        /// Iterator over the captured defender snapshots in placement order.
        pub fn iter(&self) -> impl Iterator<Item = &DefenderSnapshot> {
            self.snapshots.iter()
        }

        /// Number of defenders captured in the view.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether the view is empty.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<DefenderSnapshot> {
            self.snapshots
        }
    }
}
