//! Collision detection and response
//!
//! Three resolvers cover the whole course: ball vs. rectangle (closest-point
//! method), ball vs. ramp segment (projection method), and ball vs. ball
//! (impulse exchange along the contact normal). All three fully resolve
//! penetration in a single step; there is no substepping or iterative
//! solver.
//!
//! Every detection test uses strict inequalities on both ends of the
//! overlap range. A squared distance of exactly zero means the normal is
//! undefined, and the contact is skipped rather than disambiguated.

use glam::DVec2;

use super::geom::{Rect, Segment};
use super::state::Ball;
use crate::consts::{FRICTION, RAMP_LATERAL_BOOST};

/// Reflect a velocity about a unit surface normal: `v' = v - 2(v·n)n`
#[inline]
pub fn reflect_velocity(vel: DVec2, normal: DVec2) -> DVec2 {
    vel - 2.0 * vel.dot(normal) * normal
}

/// Resolve a ball against an axis-aligned rectangle.
///
/// The closest point on the rectangle to the ball center is found by
/// clamping x and y independently; a contact exists when the center is
/// strictly outside the rectangle and strictly inside the ball radius.
/// On contact the ball is pushed out along the normal by the full overlap,
/// its velocity reflected, then damped.
///
/// Returns whether a contact was resolved.
pub fn collide_ball_rect(ball: &mut Ball, rect: &Rect) -> bool {
    let closest = rect.closest_point(ball.pos);
    let delta = ball.pos - closest;
    let dist_sq = delta.length_squared();

    // Center inside/on the rectangle leaves the normal undefined: skip.
    if dist_sq <= 0.0 || dist_sq >= ball.radius * ball.radius {
        return false;
    }

    let dist = dist_sq.sqrt();
    let overlap = ball.radius - dist;
    let normal = delta / dist;

    ball.pos += normal * overlap;
    ball.vel = reflect_velocity(ball.vel, normal) * FRICTION;
    true
}

/// Resolve a ball against a ramp segment.
///
/// The ball center is projected onto the segment (parameter clamped to
/// [0, 1]); collision radius is the ball radius only, independent of the
/// ramp's render thickness. The reflected velocity gets the usual FRICTION
/// damping plus an extra lateral boost on x so ramps feed speed back into
/// the race.
///
/// Zero-length segments are a no-op. Returns whether a contact was
/// resolved.
pub fn collide_ball_segment(ball: &mut Ball, seg: &Segment) -> bool {
    let Some(closest) = seg.closest_point(ball.pos) else {
        return false;
    };
    let delta = ball.pos - closest;
    let dist_sq = delta.length_squared();

    if dist_sq <= 0.0 || dist_sq >= ball.radius * ball.radius {
        return false;
    }

    let dist = dist_sq.sqrt();
    let overlap = ball.radius - dist;
    let normal = delta / dist;

    ball.pos += normal * overlap;
    let reflected = reflect_velocity(ball.vel, normal);
    ball.vel = DVec2::new(
        reflected.x * FRICTION * RAMP_LATERAL_BOOST,
        reflected.y * FRICTION,
    );
    true
}

/// 1D elastic collision along the contact normal, parameterized by mass:
/// `v1' = (v1(m1 - m2) + 2 m2 v2) / (m1 + m2)`, and symmetrically for v2'.
///
/// Conserves momentum: `m1 v1' + m2 v2' == m1 v1 + m2 v2`.
#[inline]
pub fn elastic_normal_velocities(v1n: f64, v2n: f64, m1: f64, m2: f64) -> (f64, f64) {
    debug_assert!(m1 > 0.0 && m2 > 0.0);
    let v1 = (v1n * (m1 - m2) + 2.0 * m2 * v2n) / (m1 + m2);
    let v2 = (v2n * (m2 - m1) + 2.0 * m1 * v1n) / (m1 + m2);
    (v1, v2)
}

/// Resolve an elastic collision between two balls.
///
/// Both velocities are decomposed into components along the contact normal
/// and its perpendicular; the normal components exchange momentum via
/// [`elastic_normal_velocities`], the tangential components pass through
/// unchanged, and both reconstructed velocities are damped by FRICTION.
/// The balls are then pushed apart by half the overlap each, plus a small
/// extra separation so the pair does not re-trigger next tick.
///
/// Coincident centers (distance exactly zero) are skipped. Returns the
/// contact midpoint when a collision was resolved.
pub fn resolve_ball_pair(a: &mut Ball, b: &mut Ball) -> Option<DVec2> {
    let delta = b.pos - a.pos;
    let distance = delta.length();

    if distance <= 0.0 || distance >= a.radius + b.radius {
        return None;
    }

    let normal = delta / distance;
    let tangent = DVec2::new(-normal.y, normal.x);

    let a_tan = a.vel.dot(tangent);
    let b_tan = b.vel.dot(tangent);
    let a_norm = a.vel.dot(normal);
    let b_norm = b.vel.dot(normal);

    let (a_norm, b_norm) = elastic_normal_velocities(a_norm, b_norm, a.mass, b.mass);

    a.vel = (tangent * a_tan + normal * a_norm) * FRICTION;
    b.vel = (tangent * b_tan + normal * b_norm) * FRICTION;

    // The +1 keeps the pair from sticking and re-colliding next tick.
    let overlap = 0.5 * (a.radius + b.radius - distance + 1.0);
    a.pos -= normal * overlap;
    b.pos += normal * overlap;

    Some((a.pos + b.pos) / 2.0)
}
