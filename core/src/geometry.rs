//! Planar geometry helpers shared by the world and its systems.

use glam::Vec2;

/// Euclidean distance between two points.
#[must_use]
pub fn distance(from: Vec2, to: Vec2) -> f32 {
    from.distance(to)
}

/// Angle in radians of the direction pointing from `from` toward `to`.
///
/// Coincident points produce an angle of zero.
#[must_use]
pub fn angle(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x)
}

/// Unit vector pointing from `from` toward `to`.
///
/// Derived from [`angle`], so coincident points yield `(1, 0)` rather than a
/// zero or non-finite vector.
#[must_use]
pub fn heading(from: Vec2, to: Vec2) -> Vec2 {
    let theta = angle(from, to);
    Vec2::new(theta.cos(), theta.sin())
}

/// Shortest distance between `point` and the segment `start..end`.
///
/// A degenerate segment collapses to the distance to `start`.
#[must_use]
pub fn distance_to_segment(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    let span = end - start;
    let length_squared = span.length_squared();
    if length_squared == 0.0 {
        return point.distance(start);
    }

    let t = ((point - start).dot(span) / length_squared).clamp(0.0, 1.0);
    point.distance(start + span * t)
}
