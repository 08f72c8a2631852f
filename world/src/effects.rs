//! Constructors for the visual effect feed.

use crystal_defence_core::{Color, Effect, EffectShape, Vec2};
use rand::Rng;

use crate::World;

const PARTICLES_PER_EXPLOSION: usize = 5;
const PARTICLE_LIFETIME: f32 = 0.5;
const PARTICLE_MAX_SPEED: f32 = 300.0;
const PARTICLE_MAX_RADIUS: f32 = 3.0;

const BEAM_LIFETIME: f32 = 0.15;
const BEAM_WIDTH: f32 = 2.0;
const LIGHTNING_LIFETIME: f32 = 0.15;
const LINE_LIFETIME: f32 = 0.2;
const TEXT_LIFETIME: f32 = 1.0;
const TEXT_RISE: f32 = -20.0;
const BLACK_HOLE_LIFETIME: f32 = 1.0;
const BLACK_HOLE_RADIUS: f32 = 100.0;

const BEAM_COLOR: Color = Color::from_rgba(0xff, 0x00, 0x00, 0xcc);
const LIGHTNING_COLOR: Color = Color::from_rgb(0x88, 0xaa, 0xff);
const REPAIR_COLOR: Color = Color::from_rgb(0x00, 0xff, 0xff);
const TEXT_COLOR: Color = Color::from_rgb(0xff, 0xd7, 0x00);
const BLACK_HOLE_COLOR: Color = Color::from_rgba(0x00, 0x00, 0x00, 0x80);

/// Pushes a burst of debris particles centred on `position`.
pub(crate) fn explosion<R: Rng>(effects: &mut Vec<Effect>, rng: &mut R, position: Vec2, color: Color) {
    for _ in 0..PARTICLES_PER_EXPLOSION {
        let velocity = Vec2::new(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5) * PARTICLE_MAX_SPEED;
        let radius = rng.gen::<f32>() * PARTICLE_MAX_RADIUS;
        effects.push(Effect::new(
            EffectShape::Particle {
                position,
                velocity,
                radius,
            },
            color,
            PARTICLE_LIFETIME,
        ));
    }
}

pub(crate) fn beam(from: Vec2, to: Vec2) -> Effect {
    Effect::new(
        EffectShape::Beam {
            from,
            to,
            width: BEAM_WIDTH,
        },
        BEAM_COLOR,
        BEAM_LIFETIME,
    )
}

pub(crate) fn lightning(from: Vec2, to: Vec2) -> Effect {
    Effect::new(EffectShape::Lightning { from, to }, LIGHTNING_COLOR, LIGHTNING_LIFETIME)
}

pub(crate) fn repair_line(from: Vec2, to: Vec2) -> Effect {
    Effect::new(EffectShape::Line { from, to }, REPAIR_COLOR, LINE_LIFETIME)
}

pub(crate) fn floating_text(position: Vec2, label: String) -> Effect {
    Effect::new(
        EffectShape::Text {
            position,
            label,
            rise: TEXT_RISE,
        },
        TEXT_COLOR,
        TEXT_LIFETIME,
    )
}

pub(crate) fn black_hole(position: Vec2) -> Effect {
    Effect::new(
        EffectShape::BlackHole {
            position,
            radius: BLACK_HOLE_RADIUS,
        },
        BLACK_HOLE_COLOR,
        BLACK_HOLE_LIFETIME,
    )
}

impl World {
    /// Ages every effect and drops the expired ones.
    pub(crate) fn update_effects(&mut self, dt: f32) {
        for effect in &mut self.effects {
            effect.advance(dt);
        }
        self.effects.retain(|effect| !effect.is_expired());
    }
}
