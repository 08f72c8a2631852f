//! Short-lived visual effect descriptors published for presentation layers.
//!
//! The simulation never reads these back; it only advances their clocks and
//! drops them once expired.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Color;

/// Geometry of a visual effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EffectShape {
    /// Debris fragment drifting away from an explosion.
    Particle {
        /// Current position.
        position: Vec2,
        /// Drift velocity in world units per second.
        velocity: Vec2,
        /// Draw radius.
        radius: f32,
    },
    /// Laser beam.
    Beam {
        /// Beam origin.
        from: Vec2,
        /// Beam end point.
        to: Vec2,
        /// Stroke width.
        width: f32,
    },
    /// Thin connector, used for defender repairs.
    Line {
        /// Line origin.
        from: Vec2,
        /// Line end point.
        to: Vec2,
    },
    /// Single lightning hop.
    Lightning {
        /// Hop origin.
        from: Vec2,
        /// Hop end point.
        to: Vec2,
    },
    /// Floating text label.
    Text {
        /// Current position.
        position: Vec2,
        /// Label contents.
        label: String,
        /// Vertical drift in world units per second.
        rise: f32,
    },
    /// Singularity drawn where a black hole struck.
    BlackHole {
        /// Center of the singularity.
        position: Vec2,
        /// Draw radius.
        radius: f32,
    },
}

/// Visual effect record with a finite lifetime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    /// Geometry of the effect.
    pub shape: EffectShape,
    /// Draw color.
    pub color: Color,
    /// Seconds of life left.
    pub remaining: f32,
    /// Total lifetime in seconds, used by presentations to fade the effect.
    pub duration: f32,
}

impl Effect {
    /// Creates an effect that lives for `duration` seconds.
    #[must_use]
    pub fn new(shape: EffectShape, color: Color, duration: f32) -> Self {
        Self {
            shape,
            color,
            remaining: duration,
            duration,
        }
    }

    /// Ages the effect and moves drifting shapes.
    pub fn advance(&mut self, dt: f32) {
        self.remaining -= dt;
        match &mut self.shape {
            EffectShape::Particle {
                position, velocity, ..
            } => *position += *velocity * dt,
            EffectShape::Text { position, rise, .. } => position.y += *rise * dt,
            EffectShape::Beam { .. }
            | EffectShape::Line { .. }
            | EffectShape::Lightning { .. }
            | EffectShape::BlackHole { .. } => {}
        }
    }

    /// Reports whether the effect has run out of life.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Fraction of life left in `[0, 1]`.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.remaining / self.duration).clamp(0.0, 1.0)
    }
}
