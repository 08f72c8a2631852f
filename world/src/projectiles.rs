//! Homing projectiles and the per-tick projectile phase.

use crystal_defence_core::{
    geometry, Color, DefenderId, HostileId, ProjectileSnapshot, ProjectileTarget, Vec2,
};

use crate::World;

const HIT_MARGIN: f32 = 5.0;
const DEFENDER_SHOT_RADIUS: f32 = 3.0;
const BURN_SECONDS: f32 = 3.0;

const BOSS_SHOT_DAMAGE: f32 = 20.0;
const BOSS_SHOT_SPEED: f32 = 150.0;
const BOSS_SHOT_RADIUS: f32 = 5.0;
const BOSS_SHOT_COLOR: Color = Color::from_rgb(0xff, 0x00, 0x00);

/// Projectile bound to a single target for its whole flight.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) position: Vec2,
    pub(crate) target: ProjectileTarget,
    pub(crate) speed: f32,
    pub(crate) damage: f32,
    pub(crate) radius: f32,
    pub(crate) color: Color,
    pub(crate) incendiary: bool,
    pub(crate) spent: bool,
}

impl Projectile {
    /// Creates a projectile fired by a defender at a hostile.
    pub(crate) fn defender_shot(
        origin: Vec2,
        target: HostileId,
        damage: f32,
        speed: f32,
        color: Color,
        incendiary: bool,
    ) -> Self {
        Self {
            position: origin,
            target: ProjectileTarget::Hostile(target),
            speed,
            damage,
            radius: DEFENDER_SHOT_RADIUS,
            color,
            incendiary,
            spent: false,
        }
    }

    /// Creates a projectile fired by a boss at a defender.
    pub(crate) fn boss_shot(origin: Vec2, target: DefenderId) -> Self {
        Self {
            position: origin,
            target: ProjectileTarget::Defender(target),
            speed: BOSS_SHOT_SPEED,
            damage: BOSS_SHOT_DAMAGE,
            radius: BOSS_SHOT_RADIUS,
            color: BOSS_SHOT_COLOR,
            incendiary: false,
            spent: false,
        }
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            position: self.position,
            target: self.target,
            radius: self.radius,
            color: self.color,
            incendiary: self.incendiary,
        }
    }

    /// Steps toward `aim` and reports whether the projectile reached it.
    fn seek(&mut self, aim: Vec2, target_radius: f32, dt: f32) -> bool {
        self.position += geometry::heading(self.position, aim) * self.speed * dt;
        geometry::distance(self.position, aim) < target_radius + HIT_MARGIN
    }
}

impl World {
    /// Moves every projectile and resolves hits, dropping spent projectiles.
    pub(crate) fn update_projectiles(&mut self, dt: f32) {
        for projectile in &mut self.projectiles {
            match projectile.target {
                ProjectileTarget::Hostile(id) => {
                    let target = self
                        .hostiles
                        .iter_mut()
                        .find(|hostile| hostile.id == id && hostile.is_alive());
                    let Some(hostile) = target else {
                        projectile.spent = true;
                        continue;
                    };
                    if projectile.seek(hostile.position, hostile.radius, dt) {
                        hostile.take_damage(projectile.damage);
                        if projectile.incendiary {
                            hostile.ignite(BURN_SECONDS);
                        }
                        projectile.spent = true;
                    }
                }
                ProjectileTarget::Defender(id) => {
                    let target = self
                        .defenders
                        .iter_mut()
                        .find(|defender| defender.id == id && defender.is_alive());
                    let Some(defender) = target else {
                        projectile.spent = true;
                        continue;
                    };
                    if projectile.seek(defender.position, defender.radius, dt) {
                        defender.health -= projectile.damage;
                        projectile.spent = true;
                    }
                }
            }
        }

        self.projectiles.retain(|projectile| !projectile.spent);
    }
}
