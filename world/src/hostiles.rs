//! Hostile unit state and the per-tick hostile phase.

use std::f32::consts::TAU;

use crystal_defence_core::{
    geometry, BossState, Bounty, Color, Event, HostileId, HostileKind, HostileSnapshot, Reward,
    SessionEndCause, Vec2,
};
use rand::Rng;
use tracing::debug;

use crate::{effects, projectiles::Projectile, World};

const OBJECTIVE_DAMAGE: f32 = 10.0;
const BURN_DAMAGE_PER_SECOND: f32 = 10.0;
const MELEE_DAMAGE_PER_SECOND: f32 = 5.0;
const BLOCK_NUDGE: f32 = 1.0;

const EXPLODER_TRIGGER_RANGE: f32 = 60.0;
const EXPLODER_CONTACT_DAMAGE: f32 = 100.0;
const EXPLODER_SPLASH_RANGE: f32 = 100.0;
const EXPLODER_SPLASH_DAMAGE: f32 = 50.0;

const HEAL_INTERVAL: f32 = 3.0;
const HEAL_RANGE: f32 = 150.0;
const HEAL_AMOUNT: f32 = 20.0;

// Offspring health and speed are tenths of the parent's health and the grunt speed.
const OFFSPRING_HEALTH_TENTHS: f32 = 3.0;
const OFFSPRING_RADIUS: f32 = 8.0;
const OFFSPRING_SPEED_TENTHS: f32 = 12.0;
const OFFSPRING_OFFSET: f32 = 10.0;
const OFFSPRING_COLOR: Color = Color::from_rgb(0xda, 0x70, 0xd6);

const BOSS_WANDER_SECONDS: f32 = 3.0;
const BOSS_CHARGE_SECONDS: f32 = 5.0;
const BOSS_WANDER_MIN_DISTANCE: f32 = 100.0;
const BOSS_WANDER_SPREAD: f32 = 200.0;
const BOSS_SHOT_INTERVAL: f32 = 2.0;
const BOSS_SHOT_RANGE: f32 = 400.0;

const EXPLOSION_ORANGE: Color = Color::from_rgb(0xff, 0xa5, 0x00);
const EXPLOSION_PURPLE: Color = Color::from_rgb(0x80, 0x00, 0x80);

/// Hostile unit stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Hostile {
    pub(crate) id: HostileId,
    pub(crate) kind: HostileKind,
    pub(crate) position: Vec2,
    pub(crate) radius: f32,
    pub(crate) speed: f32,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    pub(crate) damage: f32,
    pub(crate) burn_remaining: f32,
    pub(crate) wave: u32,
    pub(crate) color: Color,
    pub(crate) bounty: Option<Bounty>,
    pub(crate) breached: bool,
    pub(crate) behavior: Behavior,
}

/// Variant-specific state carried by a hostile.
#[derive(Clone, Debug)]
pub(crate) enum Behavior {
    /// Walks straight at the crystal.
    Walker,
    /// Walks at the crystal and periodically heals its neighbours.
    Medic { heal_timer: f32 },
    /// Runs the boss state machine.
    Boss(BossBrain),
}

#[derive(Clone, Debug)]
pub(crate) struct BossBrain {
    pub(crate) state: BossState,
    pub(crate) state_timer: f32,
    pub(crate) wander_target: Vec2,
    pub(crate) shot_timer: f32,
}

impl Hostile {
    /// Creates a hostile of the provided kind scaled to `wave`.
    pub(crate) fn new(
        id: HostileId,
        kind: HostileKind,
        position: Vec2,
        wave: u32,
        bounty: Option<Bounty>,
        wander_target: Vec2,
    ) -> Self {
        let max_health = kind.max_health(wave);
        let behavior = match kind {
            HostileKind::Healer => Behavior::Medic { heal_timer: 0.0 },
            HostileKind::Boss => Behavior::Boss(BossBrain {
                state: BossState::Wander,
                state_timer: BOSS_WANDER_SECONDS,
                wander_target,
                shot_timer: 0.0,
            }),
            HostileKind::Grunt
            | HostileKind::Flying
            | HostileKind::Exploder
            | HostileKind::Armored
            | HostileKind::Splitter => Behavior::Walker,
        };

        Self {
            id,
            kind,
            position,
            radius: kind.radius(),
            speed: kind.speed(),
            health: max_health,
            max_health,
            damage: OBJECTIVE_DAMAGE,
            burn_remaining: 0.0,
            wave,
            color: kind.color(),
            bounty,
            breached: false,
            behavior,
        }
    }

    /// Creates a small grunt split off a dying parent.
    fn offspring(id: HostileId, parent: &Hostile, offset: Vec2) -> Self {
        let health = parent.max_health * OFFSPRING_HEALTH_TENTHS / 10.0;
        Self {
            id,
            kind: HostileKind::Grunt,
            position: parent.position + offset,
            radius: OFFSPRING_RADIUS,
            speed: HostileKind::Grunt.speed() * OFFSPRING_SPEED_TENTHS / 10.0,
            health,
            max_health: health,
            damage: OBJECTIVE_DAMAGE,
            burn_remaining: 0.0,
            wave: parent.wave,
            color: OFFSPRING_COLOR,
            bounty: None,
            breached: false,
            behavior: Behavior::Walker,
        }
    }

    /// Applies incoming damage, halved for armored units.
    pub(crate) fn take_damage(&mut self, amount: f32) {
        let amount = match self.kind {
            HostileKind::Armored => amount * 0.5,
            _ => amount,
        };
        self.health -= amount;
    }

    /// Sets the unit on fire for the provided number of seconds.
    ///
    /// Bosses never tick burn down, so they cannot be ignited.
    pub(crate) fn ignite(&mut self, seconds: f32) {
        if !matches!(self.behavior, Behavior::Boss(_)) {
            self.burn_remaining = seconds;
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub(crate) fn snapshot(&self) -> HostileSnapshot {
        HostileSnapshot {
            id: self.id,
            kind: self.kind,
            name: self.kind.name(),
            position: self.position,
            radius: self.radius,
            health: self.health,
            max_health: self.max_health,
            burn_remaining: self.burn_remaining.max(0.0),
            wave: self.wave,
            color: self.color,
            boss_state: match &self.behavior {
                Behavior::Boss(brain) => Some(brain.state),
                Behavior::Walker | Behavior::Medic { .. } => None,
            },
            wander_target: match &self.behavior {
                Behavior::Boss(brain) if brain.state == BossState::Wander => {
                    Some(brain.wander_target)
                }
                Behavior::Boss(_) | Behavior::Walker | Behavior::Medic { .. } => None,
            },
        }
    }
}

/// Picks a random point between 100 and 300 units away from `center`.
pub(crate) fn pick_wander_target<R: Rng>(rng: &mut R, center: Vec2) -> Vec2 {
    let angle = rng.gen::<f32>() * TAU;
    let distance = BOSS_WANDER_MIN_DISTANCE + rng.gen::<f32>() * BOSS_WANDER_SPREAD;
    center + Vec2::new(angle.cos(), angle.sin()) * distance
}

impl World {
    pub(crate) fn spawn_hostile(
        &mut self,
        kind: HostileKind,
        position: Vec2,
        wave: u32,
        bounty: Option<Bounty>,
        out_events: &mut Vec<Event>,
    ) {
        let id = self.allocate_hostile_id();
        let wander_target = pick_wander_target(&mut self.rng, self.crystal.position);
        let hostile = Hostile::new(id, kind, position, wave, bounty, wander_target);
        if kind == HostileKind::Boss {
            self.boss_wave = self.boss_wave.max(wave);
        }
        debug!(hostile = id.get(), ?kind, wave, "hostile spawned");
        self.hostiles.push(hostile);
        out_events.push(Event::HostileSpawned {
            hostile: id,
            kind,
            wave,
        });
    }

    /// Moves every living hostile, then removes the dead and the breached.
    pub(crate) fn update_hostiles(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        let mut boss_breached = false;
        for index in 0..self.hostiles.len() {
            if !self.hostiles[index].is_alive() {
                continue;
            }
            if matches!(self.hostiles[index].behavior, Behavior::Boss(_)) {
                boss_breached |= self.update_boss(index, dt);
            } else {
                self.update_walker(index, dt, out_events);
            }
        }

        self.prune_hostiles(out_events);

        if boss_breached {
            self.end_session(SessionEndCause::BossBreach, out_events);
        }
    }

    fn update_walker(&mut self, index: usize, dt: f32, out_events: &mut Vec<Event>) {
        let crystal_position = self.crystal.position;
        let crystal_radius = self.crystal.radius;
        let hostile = &mut self.hostiles[index];

        if hostile.burn_remaining > 0.0 {
            hostile.health -= BURN_DAMAGE_PER_SECOND * dt;
            hostile.burn_remaining -= dt;
        }

        let heading = geometry::heading(hostile.position, crystal_position);
        let mut speed = hostile.speed;
        if !hostile.kind.is_flying() {
            for defender in self.defenders.iter_mut().filter(|defender| defender.is_alive()) {
                let contact = hostile.radius + defender.radius;
                if geometry::distance(hostile.position, defender.position) < contact {
                    defender.health -= MELEE_DAMAGE_PER_SECOND * dt;
                    speed = 0.0;
                    hostile.position -= heading * BLOCK_NUDGE;
                }
            }
        }
        hostile.position += heading * speed * dt;

        if geometry::distance(hostile.position, crystal_position) < crystal_radius + hostile.radius
        {
            self.crystal.absorb(hostile.damage);
            hostile.breached = true;
            out_events.push(Event::HostileBreached {
                hostile: hostile.id,
                kind: hostile.kind,
                damage: hostile.damage,
            });
        }

        if hostile.kind == HostileKind::Exploder {
            for defender in self.defenders.iter_mut().filter(|defender| defender.is_alive()) {
                if geometry::distance(hostile.position, defender.position) < EXPLODER_TRIGGER_RANGE
                {
                    defender.health -= EXPLODER_CONTACT_DAMAGE;
                    hostile.health = 0.0;
                }
            }
        }

        let heal_origin = match &mut hostile.behavior {
            Behavior::Medic { heal_timer } => {
                *heal_timer += dt;
                if *heal_timer > HEAL_INTERVAL {
                    *heal_timer = 0.0;
                    Some(hostile.position)
                } else {
                    None
                }
            }
            Behavior::Walker | Behavior::Boss(_) => None,
        };

        if let Some(origin) = heal_origin {
            for patient in self.hostiles.iter_mut().filter(|patient| patient.is_alive()) {
                if geometry::distance(origin, patient.position) < HEAL_RANGE {
                    patient.health = (patient.health + HEAL_AMOUNT).min(patient.max_health);
                }
            }
        }
    }

    /// Advances a boss and reports whether it reached the crystal.
    fn update_boss(&mut self, index: usize, dt: f32) -> bool {
        let crystal_position = self.crystal.position;
        let crystal_radius = self.crystal.radius;
        let hostile = &mut self.hostiles[index];
        let Behavior::Boss(brain) = &mut hostile.behavior else {
            return false;
        };

        brain.state_timer -= dt;
        if brain.state_timer <= 0.0 {
            match brain.state {
                BossState::Wander => {
                    brain.state = BossState::Charge;
                    brain.state_timer = BOSS_CHARGE_SECONDS;
                }
                BossState::Charge => {
                    brain.state = BossState::Wander;
                    brain.state_timer = BOSS_WANDER_SECONDS;
                    brain.wander_target = pick_wander_target(&mut self.rng, crystal_position);
                }
            }
        }

        let destination = match brain.state {
            BossState::Charge => crystal_position,
            BossState::Wander => brain.wander_target,
        };
        let heading = geometry::heading(hostile.position, destination);
        hostile.position += heading * hostile.speed * dt;

        brain.shot_timer -= dt;
        let fire = brain.shot_timer <= 0.0;
        if fire {
            brain.shot_timer = BOSS_SHOT_INTERVAL;
        }

        let position = hostile.position;
        let breached =
            geometry::distance(position, crystal_position) < crystal_radius + hostile.radius;

        if fire {
            let mut nearest = None;
            let mut nearest_distance = BOSS_SHOT_RANGE;
            for defender in self.defenders.iter().filter(|defender| defender.is_alive()) {
                let distance = geometry::distance(position, defender.position);
                if distance < nearest_distance {
                    nearest_distance = distance;
                    nearest = Some(defender.id);
                }
            }
            if let Some(target) = nearest {
                self.projectiles.push(Projectile::boss_shot(position, target));
            }
        }

        breached
    }

    /// Removes dead and breached hostiles, paying rewards and running death effects.
    ///
    /// Death effects can kill further hostiles; those are collected in the
    /// same pass so nothing with non-positive health survives the prune.
    pub(crate) fn prune_hostiles(&mut self, out_events: &mut Vec<Event>) {
        loop {
            let mut fallen = Vec::new();
            for hostile in std::mem::take(&mut self.hostiles) {
                if !hostile.is_alive() {
                    fallen.push(hostile);
                } else if !hostile.breached {
                    self.hostiles.push(hostile);
                }
            }

            if fallen.is_empty() {
                break;
            }

            for hostile in fallen {
                self.resolve_death(hostile, out_events);
            }
        }
    }

    fn resolve_death(&mut self, hostile: Hostile, out_events: &mut Vec<Event>) {
        let mut reward = Reward::for_wave(hostile.wave);
        if let Some(bounty) = hostile.bounty {
            reward = reward.plus(bounty);
        }

        self.gold = self.gold.saturating_add(reward.gold);
        self.grant_experience(reward.experience, out_events);
        effects::explosion(&mut self.effects, &mut self.rng, hostile.position, hostile.color);
        debug!(
            hostile = hostile.id.get(),
            kind = ?hostile.kind,
            gold = reward.gold,
            experience = reward.experience,
            "hostile killed"
        );
        out_events.push(Event::HostileKilled {
            hostile: hostile.id,
            kind: hostile.kind,
            wave: hostile.wave,
            reward,
        });

        match hostile.kind {
            HostileKind::Exploder => {
                for defender in &mut self.defenders {
                    if geometry::distance(hostile.position, defender.position)
                        < EXPLODER_SPLASH_RANGE
                    {
                        defender.health -= EXPLODER_SPLASH_DAMAGE;
                    }
                }
                for other in &mut self.hostiles {
                    if geometry::distance(hostile.position, other.position) < EXPLODER_SPLASH_RANGE
                    {
                        other.take_damage(EXPLODER_SPLASH_DAMAGE);
                    }
                }
                effects::explosion(
                    &mut self.effects,
                    &mut self.rng,
                    hostile.position,
                    EXPLOSION_ORANGE,
                );
            }
            HostileKind::Splitter => {
                for sign in [-1.0, 1.0] {
                    let id = self.allocate_hostile_id();
                    let offset = Vec2::splat(sign * OFFSPRING_OFFSET);
                    let child = Hostile::offspring(id, &hostile, offset);
                    out_events.push(Event::HostileSpawned {
                        hostile: id,
                        kind: child.kind,
                        wave: child.wave,
                    });
                    self.hostiles.push(child);
                }
            }
            HostileKind::Grunt
            | HostileKind::Flying
            | HostileKind::Healer
            | HostileKind::Armored
            | HostileKind::Boss => {}
        }

        if hostile.bounty.is_some() {
            effects::explosion(
                &mut self.effects,
                &mut self.rng,
                hostile.position,
                EXPLOSION_PURPLE,
            );
        }
    }
}
