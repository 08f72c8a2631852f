//! Objective state: health, shield and experience progression.

use crystal_defence_core::{CrystalSnapshot, Vec2};

const STARTING_HEALTH: f32 = 1_000.0;
const STARTING_SHIELD: f32 = 500.0;
const STARTING_EXPERIENCE_THRESHOLD: u32 = 1_000;
const STARTING_REGENERATION: f32 = 10.0;
const CRYSTAL_RADIUS: f32 = 35.0;

const MAX_LEVEL: u32 = 20;
const LEVEL_HEALTH_BONUS: f32 = 200.0;
const LEVEL_SHIELD_BONUS: f32 = 100.0;
const LEVEL_REGENERATION_BONUS: f32 = 5.0;

const SHIELD_BASE_COOLDOWN: f32 = 60.0;
const SHIELD_COOLDOWN_PER_LEVEL: f32 = 5.0;

/// Central objective the hostiles converge on.
#[derive(Clone, Debug)]
pub(crate) struct Crystal {
    pub(crate) position: Vec2,
    pub(crate) radius: f32,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    pub(crate) shield: f32,
    pub(crate) max_shield: f32,
    pub(crate) shield_cooldown: f32,
    pub(crate) level: u32,
    pub(crate) experience: u32,
    pub(crate) experience_to_next: u32,
    pub(crate) regeneration: f32,
}

impl Crystal {
    /// Creates a level one crystal at the provided position.
    pub(crate) fn new(position: Vec2) -> Self {
        Self {
            position,
            radius: CRYSTAL_RADIUS,
            health: STARTING_HEALTH,
            max_health: STARTING_HEALTH,
            shield: STARTING_SHIELD,
            max_shield: STARTING_SHIELD,
            shield_cooldown: 0.0,
            level: 1,
            experience: 0,
            experience_to_next: STARTING_EXPERIENCE_THRESHOLD,
            regeneration: STARTING_REGENERATION,
        }
    }

    /// Routes incoming damage through the shield before it reaches health.
    ///
    /// The shield cooldown restarts only on the call that drains the shield.
    pub(crate) fn absorb(&mut self, amount: f32) {
        let mut remaining = amount.max(0.0);
        if self.shield > 0.0 {
            if self.shield > remaining {
                self.shield -= remaining;
                remaining = 0.0;
            } else {
                remaining -= self.shield;
                self.shield = 0.0;
                self.shield_cooldown = self.depleted_shield_cooldown();
            }
        }
        self.health -= remaining;
        debug_assert!(self.shield >= 0.0);
    }

    /// Applies one regeneration pulse, never exceeding maximum health.
    pub(crate) fn regenerate(&mut self) {
        if self.health < self.max_health {
            self.health = (self.health + self.regeneration).min(self.max_health);
        }
    }

    /// Counts down the shield cooldown and refills the shield once it lapses.
    pub(crate) fn recharge_shield(&mut self, dt: f32) {
        if self.shield < self.max_shield {
            self.shield_cooldown -= dt;
            if self.shield_cooldown <= 0.0 {
                self.shield = self.max_shield;
            }
        }
    }

    /// Credits experience and returns the number of levels gained.
    ///
    /// Experience is ignored once the level cap is reached.
    pub(crate) fn gain_experience(&mut self, amount: u32) -> u32 {
        if self.level >= MAX_LEVEL {
            return 0;
        }

        self.experience = self.experience.saturating_add(amount);
        let mut gained = 0;
        while self.level < MAX_LEVEL && self.experience >= self.experience_to_next {
            self.experience -= self.experience_to_next;
            self.level += 1;
            self.experience_to_next = (self.experience_to_next as f32 * 1.2).floor() as u32;
            self.max_health += LEVEL_HEALTH_BONUS;
            self.health += LEVEL_HEALTH_BONUS;
            self.regeneration += LEVEL_REGENERATION_BONUS;
            self.max_shield += LEVEL_SHIELD_BONUS;
            gained += 1;
        }
        gained
    }

    /// Reports whether the crystal has been destroyed.
    pub(crate) fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }

    pub(crate) fn snapshot(&self) -> CrystalSnapshot {
        CrystalSnapshot {
            position: self.position,
            radius: self.radius,
            health: self.health,
            max_health: self.max_health,
            shield: self.shield,
            max_shield: self.max_shield,
            shield_cooldown: self.shield_cooldown,
            level: self.level,
            experience: self.experience,
            experience_to_next: self.experience_to_next,
            regeneration: self.regeneration,
        }
    }

    fn depleted_shield_cooldown(&self) -> f32 {
        (SHIELD_BASE_COOLDOWN - SHIELD_COOLDOWN_PER_LEVEL * self.level as f32).max(0.0)
    }
}
