//! Defender state, placement rules and the per-tick defender phase.

use crystal_defence_core::{
    geometry, Color, DefenderId, DefenderKind, DefenderSnapshot, Event, PlacementError, SellError,
    Vec2, DEFENDER_RADIUS,
};
use tracing::debug;

use crate::{effects, projectiles::Projectile, World};

const CRYSTAL_CLEARANCE: f32 = 20.0;
const DEFENDER_CLEARANCE: f32 = 20.0;
const HIT_TEST_MARGIN: f32 = 5.0;

const LASER_HIT_MARGIN: f32 = 10.0;
const TESLA_EXTRA_HOPS: usize = 3;
const TESLA_HOP_RANGE: f32 = 150.0;
const BLACK_HOLE_RANGE: f32 = 150.0;
const BLACK_HOLE_PULL: f32 = 100.0;

const INCOME_PERIOD: f32 = 1.0;
const INCOME_GOLD: u32 = 3;
const INCOME_TEXT_OFFSET: f32 = 20.0;

const SALE_EXPLOSION: Color = Color::from_rgb(0xff, 0xd7, 0x00);

/// Stationary defender stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Defender {
    pub(crate) id: DefenderId,
    pub(crate) kind: DefenderKind,
    pub(crate) position: Vec2,
    pub(crate) radius: f32,
    pub(crate) range: f32,
    pub(crate) damage: f32,
    pub(crate) cooldown: f32,
    pub(crate) ready_in: f32,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    pub(crate) cost: u32,
    pub(crate) projectile_speed: f32,
    pub(crate) projectile_color: Color,
    pub(crate) income_timer: f32,
}

impl Defender {
    pub(crate) fn new(id: DefenderId, kind: DefenderKind, position: Vec2) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            position,
            radius: DEFENDER_RADIUS,
            range: stats.range,
            damage: stats.damage,
            cooldown: stats.cooldown,
            ready_in: 0.0,
            health: stats.max_health,
            max_health: stats.max_health,
            cost: stats.cost,
            projectile_speed: stats.projectile_speed,
            projectile_color: stats.projectile_color,
            income_timer: 0.0,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Reports whether `point` falls on the defender for selection purposes.
    pub(crate) fn contains(&self, point: Vec2) -> bool {
        geometry::distance(self.position, point) < self.radius + HIT_TEST_MARGIN
    }

    pub(crate) fn snapshot(&self) -> DefenderSnapshot {
        DefenderSnapshot {
            id: self.id,
            kind: self.kind,
            name: self.kind.stats().name,
            position: self.position,
            radius: self.radius,
            range: self.range,
            damage: self.damage,
            cooldown: self.cooldown,
            ready_in: self.ready_in.max(0.0),
            health: self.health,
            max_health: self.max_health,
            cost: self.cost,
        }
    }
}

impl World {
    pub(crate) fn place_defender(
        &mut self,
        variant: u32,
        position: Vec2,
        out_events: &mut Vec<Event>,
    ) {
        let kind = match self.validate_placement(variant, position) {
            Ok(kind) => kind,
            Err(reason) => {
                debug!(variant, %reason, "placement rejected");
                out_events.push(Event::PlacementRejected { variant, reason });
                return;
            }
        };

        let cost = kind.stats().cost;
        debug_assert!(self.gold >= cost);
        self.gold -= cost;

        let id = self.allocate_defender_id();
        self.defenders.push(Defender::new(id, kind, position));
        debug!(defender = id.get(), ?kind, x = position.x, y = position.y, "defender placed");
        out_events.push(Event::DefenderPlaced {
            defender: id,
            kind,
            position,
        });
    }

    fn validate_placement(
        &self,
        variant: u32,
        position: Vec2,
    ) -> Result<DefenderKind, PlacementError> {
        if !self.active {
            return Err(PlacementError::SessionEnded);
        }
        let kind = DefenderKind::from_variant_id(variant).ok_or(PlacementError::UnknownVariant)?;
        if !position.is_finite() {
            return Err(PlacementError::InvalidPosition);
        }

        let stats = kind.stats();
        if self.gold < stats.cost {
            return Err(PlacementError::InsufficientGold);
        }
        if self.crystal.level < stats.unlock_level {
            return Err(PlacementError::Locked);
        }
        if geometry::distance(position, self.crystal.position)
            < self.crystal.radius + CRYSTAL_CLEARANCE
        {
            return Err(PlacementError::TooCloseToCrystal);
        }
        let occupied = self.defenders.iter().any(|defender| {
            defender.is_alive()
                && geometry::distance(position, defender.position)
                    < defender.radius + DEFENDER_CLEARANCE
        });
        if occupied {
            return Err(PlacementError::Occupied);
        }

        Ok(kind)
    }

    pub(crate) fn select_at(&mut self, point: Vec2, out_events: &mut Vec<Event>) {
        self.selected = self.defender_index_at(point).map(|index| self.defenders[index].id);
        out_events.push(Event::DefenderSelected {
            defender: self.selected,
        });
    }

    pub(crate) fn clear_selection(&mut self, out_events: &mut Vec<Event>) {
        self.selected = None;
        out_events.push(Event::DefenderSelected { defender: None });
    }

    /// Index of the living defender nearest to `point` that the point falls on.
    pub(crate) fn defender_index_at(&self, point: Vec2) -> Option<usize> {
        self.defenders
            .iter()
            .enumerate()
            .filter(|(_, defender)| defender.is_alive() && defender.contains(point))
            .min_by(|(_, a), (_, b)| {
                let a = geometry::distance(a.position, point);
                let b = geometry::distance(b.position, point);
                a.total_cmp(&b)
            })
            .map(|(index, _)| index)
    }

    pub(crate) fn sell_selected(&mut self, out_events: &mut Vec<Event>) {
        if !self.active {
            out_events.push(Event::SellRejected {
                reason: SellError::SessionEnded,
            });
            return;
        }

        let index = self
            .selected
            .and_then(|id| self.defenders.iter().position(|defender| defender.id == id));
        let Some(index) = index else {
            self.selected = None;
            debug!("sell rejected: nothing selected");
            out_events.push(Event::SellRejected {
                reason: SellError::NothingSelected,
            });
            return;
        };

        let defender = self.defenders.remove(index);
        let refund = defender.kind.refund();
        self.gold = self.gold.saturating_add(refund);
        self.selected = None;
        effects::explosion(&mut self.effects, &mut self.rng, defender.position, SALE_EXPLOSION);
        debug!(defender = defender.id.get(), refund, "defender sold");
        out_events.push(Event::DefenderSold {
            defender: defender.id,
            kind: defender.kind,
            refund,
        });
    }

    /// Runs every living defender, then drops the destroyed ones.
    pub(crate) fn update_defenders(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        for index in 0..self.defenders.len() {
            if !self.defenders[index].is_alive() {
                continue;
            }
            match self.defenders[index].kind {
                DefenderKind::Healer => self.run_repairs(index, dt),
                DefenderKind::Money => {
                    self.collect_income(index, dt);
                    self.run_weapon(index, dt);
                }
                DefenderKind::Basic
                | DefenderKind::Archer
                | DefenderKind::Flame
                | DefenderKind::Laser
                | DefenderKind::BlackHole
                | DefenderKind::Tesla => self.run_weapon(index, dt),
            }
        }

        self.prune_defenders(out_events);
    }

    /// Drops destroyed defenders, clearing the selection if it pointed at one.
    pub(crate) fn prune_defenders(&mut self, out_events: &mut Vec<Event>) {
        for defender in self.defenders.iter().filter(|defender| !defender.is_alive()) {
            debug!(defender = defender.id.get(), kind = ?defender.kind, "defender destroyed");
            out_events.push(Event::DefenderDestroyed {
                defender: defender.id,
                kind: defender.kind,
            });
            if self.selected == Some(defender.id) {
                self.selected = None;
            }
        }
        self.defenders.retain(Defender::is_alive);
    }

    fn collect_income(&mut self, index: usize, dt: f32) {
        let defender = &mut self.defenders[index];
        defender.income_timer += dt;
        if defender.income_timer >= INCOME_PERIOD {
            defender.income_timer -= INCOME_PERIOD;
            self.gold = self.gold.saturating_add(INCOME_GOLD);
            let label_position = defender.position - Vec2::new(0.0, INCOME_TEXT_OFFSET);
            self.effects
                .push(effects::floating_text(label_position, format!("+${INCOME_GOLD}")));
        }
    }

    fn run_weapon(&mut self, index: usize, dt: f32) {
        let defender = &mut self.defenders[index];
        if defender.ready_in > 0.0 {
            defender.ready_in -= dt;
        }
        if defender.ready_in > 0.0 {
            return;
        }

        let mut target = None;
        let mut nearest = f32::INFINITY;
        for (candidate, hostile) in self.hostiles.iter().enumerate() {
            if !hostile.is_alive() {
                continue;
            }
            let distance = geometry::distance(defender.position, hostile.position);
            if distance <= defender.range && distance < nearest {
                nearest = distance;
                target = Some(candidate);
            }
        }

        if let Some(target) = target {
            defender.ready_in = defender.cooldown;
            self.attack(index, target);
        }
    }

    fn attack(&mut self, index: usize, target: usize) {
        let defender = &self.defenders[index];
        let origin = defender.position;
        let damage = defender.damage;
        let aim = self.hostiles[target].position;

        match defender.kind {
            DefenderKind::Basic
            | DefenderKind::Archer
            | DefenderKind::Money
            | DefenderKind::Flame => {
                let shot = Projectile::defender_shot(
                    origin,
                    self.hostiles[target].id,
                    damage,
                    defender.projectile_speed,
                    defender.projectile_color,
                    defender.kind == DefenderKind::Flame,
                );
                self.projectiles.push(shot);
            }
            DefenderKind::Laser => {
                let end = origin + geometry::heading(origin, aim) * defender.range;
                self.effects.push(effects::beam(origin, end));
                for hostile in self.hostiles.iter_mut().filter(|hostile| hostile.is_alive()) {
                    let reach = hostile.radius + LASER_HIT_MARGIN;
                    if geometry::distance_to_segment(hostile.position, origin, end) < reach {
                        hostile.take_damage(damage);
                    }
                }
            }
            DefenderKind::Tesla => {
                let mut chain = vec![target];
                let mut link = aim;
                for _ in 0..TESLA_EXTRA_HOPS {
                    let next = self.hostiles.iter().enumerate().find(|(candidate, hostile)| {
                        hostile.is_alive()
                            && !chain.contains(candidate)
                            && geometry::distance(link, hostile.position) < TESLA_HOP_RANGE
                    });
                    let Some((candidate, hostile)) = next else {
                        break;
                    };
                    link = hostile.position;
                    chain.push(candidate);
                }

                let mut from = origin;
                for hit in chain {
                    let hostile = &mut self.hostiles[hit];
                    hostile.take_damage(damage);
                    self.effects.push(effects::lightning(from, hostile.position));
                    from = hostile.position;
                }
            }
            DefenderKind::BlackHole => {
                self.effects.push(effects::black_hole(aim));
                for hostile in self.hostiles.iter_mut().filter(|hostile| hostile.is_alive()) {
                    let distance = geometry::distance(aim, hostile.position);
                    if distance < BLACK_HOLE_RANGE {
                        hostile.take_damage(damage);
                        if distance > 0.0 {
                            hostile.position +=
                                geometry::heading(hostile.position, aim) * BLACK_HOLE_PULL;
                        }
                    }
                }
            }
            // Repairs run through `run_repairs` and never reach the weapon path.
            DefenderKind::Healer => {}
        }
    }

    fn run_repairs(&mut self, index: usize, dt: f32) {
        let healer = &mut self.defenders[index];
        if healer.ready_in > 0.0 {
            healer.ready_in -= dt;
        }
        if healer.ready_in > 0.0 {
            return;
        }

        let origin = healer.position;
        let range = healer.range;
        let amount = healer.damage;
        let patient = self
            .defenders
            .iter()
            .enumerate()
            .find(|(other, defender)| {
                *other != index
                    && defender.is_alive()
                    && defender.health < defender.max_health
                    && geometry::distance(origin, defender.position) < range
            })
            .map(|(other, _)| other);

        if let Some(patient) = patient {
            let target = &mut self.defenders[patient];
            target.health = (target.health + amount).min(target.max_health);
            let destination = target.position;
            self.effects.push(effects::repair_line(origin, destination));
            let healer = &mut self.defenders[index];
            healer.ready_in = healer.cooldown;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defenders_copy_catalog_stats() {
        let defender = Defender::new(DefenderId::new(3), DefenderKind::Archer, Vec2::ZERO);
        assert_eq!(defender.range, 300.0);
        assert_eq!(defender.damage, 50.0);
        assert_eq!(defender.cooldown, 1.8);
        assert_eq!(defender.health, 80.0);
        assert_eq!(defender.projectile_speed, 700.0);
        assert_eq!(defender.ready_in, 0.0);
    }

    #[test]
    fn flame_defenders_fire_orange_projectiles() {
        let defender = Defender::new(DefenderId::new(0), DefenderKind::Flame, Vec2::ZERO);
        assert_eq!(defender.projectile_color, Color::from_rgb(0xff, 0xa5, 0x00));
    }

    #[test]
    fn hit_test_uses_margin() {
        let defender = Defender::new(DefenderId::new(0), DefenderKind::Basic, Vec2::ZERO);
        assert!(defender.contains(Vec2::new(19.9, 0.0)));
        assert!(!defender.contains(Vec2::new(20.0, 0.0)));
    }
}
