#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Crystal Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

pub mod config;
pub mod effects;
pub mod geometry;

pub use config::{SimulationConfig, Viewport};
pub use effects::{Effect, EffectShape};
pub use glam::Vec2;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Crystal Defence.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the session clock and the crystal's passive timers.
    AdvanceClock {
        /// Simulated seconds elapsed since the previous tick, speed already applied.
        dt: f32,
    },
    /// Raises the wave index by one.
    AdvanceWave,
    /// Requests that a hostile unit enter the world.
    SpawnHostile {
        /// Variant of the hostile to create.
        kind: HostileKind,
        /// World-space spawn position.
        position: Vec2,
        /// Wave index used to scale the hostile and its kill reward.
        wave: u32,
        /// Additional reward paid when the hostile dies.
        bounty: Option<Bounty>,
    },
    /// Runs the entity phase of a tick: hostiles, defenders, projectiles, effects.
    UpdateEntities {
        /// Simulated seconds elapsed since the previous tick, speed already applied.
        dt: f32,
    },
    /// Requests placement of a defender of the provided catalog variant.
    PlaceDefender {
        /// Catalog identifier of the defender variant (see [`DefenderKind::from_variant_id`]).
        variant: u32,
        /// World-space point at which the defender should stand.
        position: Vec2,
    },
    /// Selects the defender under the provided point, clearing the selection when none is hit.
    SelectAt {
        /// World-space point used for the hit test.
        position: Vec2,
    },
    /// Clears the current defender selection.
    ClearSelection,
    /// Sells the currently selected defender.
    SellSelected,
    /// Trades gold for crystal experience.
    PurchaseExperience,
    /// Changes the simulation speed multiplier.
    SetSpeed {
        /// Multiplier that should become active.
        speed: SpeedMultiplier,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the session clock advanced.
    TimeAdvanced {
        /// Simulated seconds covered by the tick.
        dt: f32,
        /// Tick counter after the advance, starting at one for the first tick.
        frame: u64,
    },
    /// Announces that a new wave began.
    WaveAdvanced {
        /// Wave index that became active.
        wave: u32,
    },
    /// Confirms that a hostile entered the world.
    HostileSpawned {
        /// Identifier assigned to the hostile.
        hostile: HostileId,
        /// Variant of the hostile.
        kind: HostileKind,
        /// Wave the hostile belongs to.
        wave: u32,
    },
    /// Reports that a hostile was destroyed and its reward paid out.
    HostileKilled {
        /// Identifier of the destroyed hostile.
        hostile: HostileId,
        /// Variant of the destroyed hostile.
        kind: HostileKind,
        /// Wave the hostile belonged to.
        wave: u32,
        /// Gold and experience credited for the kill, bounty included.
        reward: Reward,
    },
    /// Reports that a hostile reached the crystal and struck it.
    HostileBreached {
        /// Identifier of the hostile that reached the crystal.
        hostile: HostileId,
        /// Variant of the hostile.
        kind: HostileKind,
        /// Damage dealt to the crystal before shield absorption.
        damage: f32,
    },
    /// Confirms that a defender was placed.
    DefenderPlaced {
        /// Identifier assigned to the defender.
        defender: DefenderId,
        /// Variant of the defender.
        kind: DefenderKind,
        /// World-space position of the defender.
        position: Vec2,
    },
    /// Reports that a placement request was rejected without changing state.
    PlacementRejected {
        /// Catalog identifier supplied with the request.
        variant: u32,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports the selection after a selection command.
    DefenderSelected {
        /// Selected defender, if any.
        defender: Option<DefenderId>,
    },
    /// Confirms that a defender was sold.
    DefenderSold {
        /// Identifier of the sold defender.
        defender: DefenderId,
        /// Variant of the sold defender.
        kind: DefenderKind,
        /// Gold credited for the sale.
        refund: u32,
    },
    /// Reports that a sell request was rejected.
    SellRejected {
        /// Specific reason the sale failed.
        reason: SellError,
    },
    /// Reports that a defender was destroyed by hostile damage.
    DefenderDestroyed {
        /// Identifier of the destroyed defender.
        defender: DefenderId,
        /// Variant of the destroyed defender.
        kind: DefenderKind,
    },
    /// Confirms that experience was purchased with gold.
    ExperiencePurchased {
        /// Gold spent.
        cost: u32,
        /// Experience credited to the crystal.
        experience: u32,
    },
    /// Reports that an experience purchase was rejected.
    PurchaseRejected {
        /// Specific reason the purchase failed.
        reason: PurchaseError,
    },
    /// Announces that the crystal reached a new level.
    CrystalLeveledUp {
        /// Level reached.
        level: u32,
    },
    /// Confirms that the speed multiplier changed.
    SpeedChanged {
        /// Multiplier now in effect.
        speed: SpeedMultiplier,
    },
    /// Announces that the session ended. Emitted at most once per session.
    SessionEnded {
        /// Condition that ended the session.
        cause: SessionEndCause,
    },
}

/// RGBA color attached to entities and effect descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
    alpha: u8,
}

impl Color {
    /// Creates an opaque color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::from_rgba(red, green, blue, 0xff)
    }

    /// Creates a color from byte RGBA components.
    #[must_use]
    pub const fn from_rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Alpha component of the color.
    #[must_use]
    pub const fn alpha(&self) -> u8 {
        self.alpha
    }
}

/// Unique identifier assigned to a hostile unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HostileId(u32);

impl HostileId {
    /// Creates a new hostile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DefenderId(u32);

impl DefenderId {
    /// Creates a new defender identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Variants of hostile units that march on the crystal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostileKind {
    /// Plain walker with baseline statistics.
    Grunt,
    /// Fast, fragile flyer that ignores defender blocking.
    Flying,
    /// Slow unit that detonates next to defenders.
    Exploder,
    /// Support unit that periodically heals nearby hostiles.
    Healer,
    /// Slow unit that halves incoming damage.
    Armored,
    /// Unit that splits into two grunts on death.
    Splitter,
    /// Boss that wanders, charges and shoots defenders.
    Boss,
}

impl HostileKind {
    /// Display name shown by presentation layers.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Grunt => "Grunt",
            Self::Flying => "Flyer",
            Self::Exploder => "Exploder",
            Self::Healer => "Healer",
            Self::Armored => "Armored",
            Self::Splitter => "Splitter",
            Self::Boss => "Boss",
        }
    }

    /// Movement speed in world units per second.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Grunt | Self::Healer => 50.0,
            Self::Flying => 80.0,
            Self::Exploder => 35.0,
            Self::Armored => 40.0,
            Self::Splitter => 45.0,
            Self::Boss => 30.0,
        }
    }

    /// Collision radius in world units.
    #[must_use]
    pub const fn radius(self) -> f32 {
        match self {
            Self::Grunt | Self::Healer => 12.0,
            Self::Flying => 10.0,
            Self::Exploder => 15.0,
            Self::Armored => 14.0,
            Self::Splitter => 16.0,
            Self::Boss => 30.0,
        }
    }

    /// Maximum health of a hostile spawned on the provided wave.
    ///
    /// Regular variants scale the baseline `30 + 5 × wave`; the boss uses
    /// `500 + 100 × wave`.
    #[must_use]
    pub fn max_health(self, wave: u32) -> f32 {
        let wave = wave as f32;
        let baseline = 30.0 + wave * 5.0;
        match self {
            Self::Grunt | Self::Healer => baseline,
            Self::Flying => baseline * 0.6,
            Self::Exploder => baseline * 1.5,
            Self::Armored => baseline * 2.0,
            Self::Splitter => baseline * 1.2,
            Self::Boss => 500.0 + wave * 100.0,
        }
    }

    /// Reports whether the variant flies over defenders instead of being blocked.
    #[must_use]
    pub const fn is_flying(self) -> bool {
        matches!(self, Self::Flying)
    }

    /// Color used for the variant's body and death burst.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Grunt => Color::from_rgb(0xff, 0x00, 0x00),
            Self::Flying => Color::from_rgb(0xff, 0xd7, 0x00),
            Self::Exploder => Color::from_rgb(0x22, 0x22, 0x22),
            Self::Healer => Color::from_rgb(0xff, 0x69, 0xb4),
            Self::Armored => Color::from_rgb(0x55, 0x55, 0x55),
            Self::Splitter => Color::from_rgb(0x80, 0x00, 0x80),
            Self::Boss => Color::from_rgb(0x8b, 0x00, 0x00),
        }
    }

    /// Wave index the variant must exceed before regular spawning may pick it.
    ///
    /// Returns `None` for the boss, which only appears through boss waves.
    #[must_use]
    pub const fn unlocks_after_wave(self) -> Option<u32> {
        match self {
            Self::Grunt => Some(0),
            Self::Flying => Some(2),
            Self::Exploder => Some(4),
            Self::Healer => Some(7),
            Self::Armored => Some(10),
            Self::Splitter => Some(15),
            Self::Boss => None,
        }
    }
}

/// Behavior state of a boss hostile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossState {
    /// Drifting toward a random point near the crystal.
    Wander,
    /// Heading straight for the crystal.
    Charge,
}

/// Gold and experience paid for a kill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reward {
    /// Gold credited to the economy.
    pub gold: u32,
    /// Experience credited to the crystal.
    pub experience: u32,
}

impl Reward {
    /// Standard reward for killing a hostile spawned on the provided wave.
    #[must_use]
    pub const fn for_wave(wave: u32) -> Self {
        Self {
            gold: 10 + wave / 2,
            experience: wave.saturating_mul(10),
        }
    }

    /// Combines two rewards.
    #[must_use]
    pub const fn plus(self, other: Bounty) -> Self {
        Self {
            gold: self.gold.saturating_add(other.gold),
            experience: self.experience.saturating_add(other.experience),
        }
    }
}

/// Extra reward attached to an individual hostile and paid on its death.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounty {
    /// Bonus gold.
    pub gold: u32,
    /// Bonus experience.
    pub experience: u32,
}

/// Bounty carried by every boss.
pub const BOSS_BOUNTY: Bounty = Bounty {
    gold: 500,
    experience: 1_000,
};

/// Types of defenders that can be placed around the crystal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefenderKind {
    /// Cheap projectile tower.
    Basic,
    /// Long-range tower with fast projectiles.
    Archer,
    /// Tower whose projectiles set hostiles on fire.
    Flame,
    /// Support tower that repairs nearby defenders.
    Healer,
    /// Tower that fires a penetrating beam.
    Laser,
    /// Tower that generates gold while firing weak shots.
    Money,
    /// Tower that damages and pulls a cluster of hostiles.
    BlackHole,
    /// Tower whose lightning chains between hostiles.
    Tesla,
}

/// Static catalog entry describing a defender variant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DefenderStats {
    /// Display name shown by presentation layers.
    pub name: &'static str,
    /// Gold debited on placement.
    pub cost: u32,
    /// Targeting range in world units.
    pub range: f32,
    /// Damage per attack, or heal amount for the healer.
    pub damage: f32,
    /// Seconds between attacks.
    pub cooldown: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Speed of launched projectiles in world units per second.
    pub projectile_speed: f32,
    /// Minimum crystal level required for placement.
    pub unlock_level: u32,
    /// Body color.
    pub color: Color,
    /// Color of launched projectiles.
    pub projectile_color: Color,
}

/// Collision radius shared by every defender.
pub const DEFENDER_RADIUS: f32 = 15.0;

const DEFAULT_PROJECTILE_SPEED: f32 = 300.0;

impl DefenderKind {
    /// Every defender variant in catalog order.
    pub const ALL: [Self; 8] = [
        Self::Basic,
        Self::Archer,
        Self::Flame,
        Self::Healer,
        Self::Laser,
        Self::Money,
        Self::BlackHole,
        Self::Tesla,
    ];

    /// Resolves a catalog identifier supplied by an adapter.
    ///
    /// Unknown identifiers yield `None`, which callers must treat as a
    /// rejected request.
    #[must_use]
    pub const fn from_variant_id(variant: u32) -> Option<Self> {
        match variant {
            1 => Some(Self::Basic),
            2 => Some(Self::Archer),
            3 => Some(Self::Flame),
            4 => Some(Self::Healer),
            5 => Some(Self::Laser),
            6 => Some(Self::Money),
            7 => Some(Self::BlackHole),
            8 => Some(Self::Tesla),
            _ => None,
        }
    }

    /// Catalog identifier of the variant.
    #[must_use]
    pub const fn variant_id(self) -> u32 {
        match self {
            Self::Basic => 1,
            Self::Archer => 2,
            Self::Flame => 3,
            Self::Healer => 4,
            Self::Laser => 5,
            Self::Money => 6,
            Self::BlackHole => 7,
            Self::Tesla => 8,
        }
    }

    /// Static statistics of the variant.
    #[must_use]
    pub const fn stats(self) -> DefenderStats {
        match self {
            Self::Basic => stats(
                "Basic Tower",
                50,
                250.0,
                30.0,
                1.5,
                100.0,
                DEFAULT_PROJECTILE_SPEED,
                1,
                Color::from_rgb(0x4c, 0xaf, 0x50),
            ),
            Self::Archer => stats(
                "Archer Tower",
                100,
                300.0,
                50.0,
                1.8,
                80.0,
                700.0,
                3,
                Color::from_rgb(0x9c, 0x27, 0xb0),
            ),
            Self::Flame => DefenderStats {
                projectile_color: Color::from_rgb(0xff, 0xa5, 0x00),
                ..stats(
                    "Flame Tower",
                    150,
                    200.0,
                    40.0,
                    1.2,
                    120.0,
                    250.0,
                    5,
                    Color::from_rgb(0xff, 0x57, 0x22),
                )
            },
            Self::Healer => stats(
                "Healer Tower",
                200,
                150.0,
                15.0,
                1.5,
                200.0,
                DEFAULT_PROJECTILE_SPEED,
                7,
                Color::from_rgb(0x00, 0xbc, 0xd4),
            ),
            Self::Laser => stats(
                "Laser Tower",
                300,
                400.0,
                80.0,
                0.8,
                150.0,
                DEFAULT_PROJECTILE_SPEED,
                10,
                Color::from_rgb(0xd3, 0x2f, 0x2f),
            ),
            Self::Money => stats(
                "Money Tower",
                400,
                100.0,
                10.0,
                1.0,
                100.0,
                DEFAULT_PROJECTILE_SPEED,
                3,
                Color::from_rgb(0xff, 0xd7, 0x00),
            ),
            Self::BlackHole => stats(
                "Black Hole Tower",
                500,
                150.0,
                60.0,
                3.0,
                200.0,
                DEFAULT_PROJECTILE_SPEED,
                15,
                Color::from_rgb(0x00, 0x00, 0x00),
            ),
            Self::Tesla => stats(
                "Tesla Tower",
                250,
                200.0,
                25.0,
                1.0,
                120.0,
                DEFAULT_PROJECTILE_SPEED,
                8,
                Color::from_rgb(0x00, 0xe5, 0xff),
            ),
        }
    }

    /// Gold returned when a defender of this variant is sold.
    #[must_use]
    pub const fn refund(self) -> u32 {
        self.stats().cost / 2
    }
}

#[allow(clippy::too_many_arguments)]
const fn stats(
    name: &'static str,
    cost: u32,
    range: f32,
    damage: f32,
    cooldown: f32,
    max_health: f32,
    projectile_speed: f32,
    unlock_level: u32,
    color: Color,
) -> DefenderStats {
    DefenderStats {
        name,
        cost,
        range,
        damage,
        cooldown,
        max_health,
        projectile_speed,
        unlock_level,
        color,
        projectile_color: color,
    }
}

/// Simulation speed multiplier selectable by the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeedMultiplier {
    /// Real-time speed.
    #[default]
    Normal,
    /// Twice real-time speed.
    Double,
}

impl SpeedMultiplier {
    /// Factor applied to every tick delta.
    #[must_use]
    pub const fn factor(self) -> f32 {
        match self {
            Self::Normal => 1.0,
            Self::Double => 2.0,
        }
    }

    /// Returns the other multiplier.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Normal => Self::Double,
            Self::Double => Self::Normal,
        }
    }
}

/// Condition that ended a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionEndCause {
    /// The crystal's health dropped to zero.
    CrystalDestroyed,
    /// A boss reached the crystal.
    BossBreach,
}

/// Reasons a defender placement request may be rejected by the world.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum PlacementError {
    /// The catalog identifier does not name a defender variant.
    #[error("unknown defender variant")]
    UnknownVariant,
    /// The session already ended.
    #[error("the session has ended")]
    SessionEnded,
    /// The requested point has a non-finite coordinate.
    #[error("position is not finite")]
    InvalidPosition,
    /// The economy cannot cover the placement cost.
    #[error("not enough gold")]
    InsufficientGold,
    /// The crystal has not reached the variant's unlock level.
    #[error("crystal level too low for this defender")]
    Locked,
    /// The requested point lies too close to the crystal.
    #[error("too close to the crystal")]
    TooCloseToCrystal,
    /// The requested point overlaps an existing defender.
    #[error("overlaps an existing defender")]
    Occupied,
}

/// Reasons a sell request may be rejected by the world.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum SellError {
    /// No defender is currently selected.
    #[error("no defender selected")]
    NothingSelected,
    /// The session already ended.
    #[error("the session has ended")]
    SessionEnded,
}

/// Reasons an experience purchase may be rejected by the world.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum PurchaseError {
    /// The economy cannot cover the purchase.
    #[error("not enough gold")]
    InsufficientGold,
    /// The session already ended.
    #[error("the session has ended")]
    SessionEnded,
}

/// Entity a projectile is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileTarget {
    /// Projectile launched by a defender at a hostile.
    Hostile(HostileId),
    /// Projectile launched by a boss at a defender.
    Defender(DefenderId),
}

/// Ring around the crystal on which hostiles enter the world.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnRing {
    /// Center of the ring, the crystal position.
    pub center: Vec2,
    /// Radius of the ring in world units.
    pub radius: f32,
}

impl SpawnRing {
    /// Point on the ring at the provided angle, pushed `offset` units further out.
    #[must_use]
    pub fn point(&self, angle: f32, offset: f32) -> Vec2 {
        self.center + Vec2::new(angle.cos(), angle.sin()) * (self.radius + offset)
    }
}

/// Immutable representation of the crystal used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrystalSnapshot {
    /// World-space position.
    pub position: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Current shield.
    pub shield: f32,
    /// Maximum shield.
    pub max_shield: f32,
    /// Seconds until a depleted shield refills.
    pub shield_cooldown: f32,
    /// Current level.
    pub level: u32,
    /// Experience accumulated toward the next level.
    pub experience: u32,
    /// Experience required for the next level.
    pub experience_to_next: u32,
    /// Health restored per regeneration period.
    pub regeneration: f32,
}

/// Read-only view of session state for UI display.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Gold available to spend.
    pub gold: u32,
    /// Current wave index.
    pub wave: u32,
    /// Last wave for which bosses were spawned, zero when none.
    pub boss_wave: u32,
    /// Ticks elapsed since the session started.
    pub frame: u64,
    /// Active speed multiplier.
    pub speed: SpeedMultiplier,
    /// Whether the session still accepts ticks.
    pub active: bool,
    /// Currently selected defender.
    pub selected: Option<DefenderId>,
    /// Crystal state.
    pub crystal: CrystalSnapshot,
}

/// Immutable representation of a single hostile used for queries.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HostileSnapshot {
    /// Identifier assigned by the world.
    pub id: HostileId,
    /// Variant of the hostile.
    pub kind: HostileKind,
    /// Display name.
    pub name: &'static str,
    /// World-space position.
    pub position: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Remaining seconds of burn damage.
    pub burn_remaining: f32,
    /// Wave the hostile belongs to.
    pub wave: u32,
    /// Body color.
    pub color: Color,
    /// Boss behavior state, present only for bosses.
    pub boss_state: Option<BossState>,
    /// Point a wandering boss is drifting toward; `None` while charging and for regular units.
    pub wander_target: Option<Vec2>,
}

/// Immutable representation of a single defender used for queries.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DefenderSnapshot {
    /// Identifier assigned by the world.
    pub id: DefenderId,
    /// Variant of the defender.
    pub kind: DefenderKind,
    /// Display name.
    pub name: &'static str,
    /// World-space position.
    pub position: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Targeting range.
    pub range: f32,
    /// Damage per attack.
    pub damage: f32,
    /// Seconds between attacks.
    pub cooldown: f32,
    /// Seconds until the next attack may trigger.
    pub ready_in: f32,
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Gold paid for placement.
    pub cost: u32,
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    /// World-space position.
    pub position: Vec2,
    /// Entity the projectile is bound to.
    pub target: ProjectileTarget,
    /// Draw radius.
    pub radius: f32,
    /// Draw color.
    pub color: Color,
    /// Whether the projectile ignites its target on hit.
    pub incendiary: bool,
}

#[cfg(test)]
mod tests {
    use super::{
        DefenderKind, HostileKind, PlacementError, Reward, SessionSnapshot, SpeedMultiplier,
        BOSS_BOUNTY,
    };

    #[test]
    fn variant_ids_resolve_to_their_kind() {
        for kind in DefenderKind::ALL {
            assert_eq!(DefenderKind::from_variant_id(kind.variant_id()), Some(kind));
        }
    }

    #[test]
    fn unknown_variant_ids_are_rejected() {
        assert_eq!(DefenderKind::from_variant_id(0), None);
        assert_eq!(DefenderKind::from_variant_id(9), None);
        assert_eq!(DefenderKind::from_variant_id(u32::MAX), None);
    }

    #[test]
    fn refund_is_half_cost_rounded_down() {
        assert_eq!(DefenderKind::Basic.refund(), 25);
        assert_eq!(DefenderKind::Tesla.refund(), 125);
    }

    #[test]
    fn reward_scales_with_wave() {
        assert_eq!(
            Reward::for_wave(1),
            Reward {
                gold: 10,
                experience: 10
            }
        );
        assert_eq!(
            Reward::for_wave(7),
            Reward {
                gold: 13,
                experience: 70
            }
        );
        assert_eq!(
            Reward::for_wave(5).plus(BOSS_BOUNTY),
            Reward {
                gold: 512,
                experience: 1_050
            }
        );
    }

    #[test]
    fn hostile_health_scales_with_wave() {
        assert_eq!(HostileKind::Grunt.max_health(1), 35.0);
        assert_eq!(HostileKind::Armored.max_health(2), 80.0);
        assert_eq!(HostileKind::Boss.max_health(5), 1_000.0);
        assert!((HostileKind::Flying.max_health(0) - 18.0).abs() < 1e-4);
    }

    #[test]
    fn only_flyers_fly() {
        assert!(HostileKind::Flying.is_flying());
        assert!(!HostileKind::Boss.is_flying());
        assert!(!HostileKind::Grunt.is_flying());
    }

    #[test]
    fn speed_toggle_alternates() {
        assert_eq!(SpeedMultiplier::Normal.toggled(), SpeedMultiplier::Double);
        assert_eq!(SpeedMultiplier::Double.toggled().factor(), 1.0);
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        let bytes = bincode::serialize(&PlacementError::Occupied).expect("serialize");
        let restored: PlacementError = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, PlacementError::Occupied);
    }

    #[test]
    fn placement_errors_render_human_messages() {
        assert_eq!(PlacementError::InsufficientGold.to_string(), "not enough gold");
    }

    #[test]
    fn session_snapshot_is_plain_data() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<SessionSnapshot>();
    }
}
