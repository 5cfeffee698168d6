//! Geometry primitives shared by the tree walk and crossing removal.
//!
//! Direction and angle helpers work on floating-point vectors. The
//! segment intersection test works on [`QuantizedPoint`]s. While every
//! grid value fits in [`EXACT_GRID_LIMIT`] it runs on `i128`, so
//! collinearity and parallelism checks compare against an exact zero;
//! beyond that it falls back to `f64` cross products.

use std::f64::consts::{PI, TAU};

use crate::types::{Point, QuantizedPoint};

/// Tolerance below which a turn angle within reach of a full turn
/// collapses to zero.
///
/// This is the only tolerance used anywhere in the pipeline. It makes a
/// reversal along the edge just walked rank below every real turn.
pub const ANGLE_WRAP_EPSILON: f64 = 1e-7;

/// Unit vector pointing from `from` toward `to`.
///
/// The two points must differ; callers guarantee this by deduplicating
/// before any direction is computed.
#[must_use]
pub fn direction(to: Point, from: Point) -> Point {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let length = dx.hypot(dy);
    Point::new(dx / length, dy / length)
}

/// Dot product of two 2D vectors.
#[must_use]
pub fn dot(a: Point, b: Point) -> f64 {
    a.x.mul_add(b.x, a.y * b.y)
}

/// 2D cross product (z component of the 3D cross product).
#[must_use]
pub fn cross(a: Point, b: Point) -> f64 {
    a.x.mul_add(b.y, -(b.x * a.y))
}

/// Turning angle from unit vector `a` to unit vector `b`, in `[0, 2π)`.
///
/// Computed as `atan2(a × b, a · b) + π`, so going straight ahead maps
/// to `π`, left turns land above it and right turns below. A result
/// within [`ANGLE_WRAP_EPSILON`] of `2π` (a full reversal) is reported
/// as `0`.
#[must_use]
pub fn turn_angle(a: Point, b: Point) -> f64 {
    let angle = cross(a, b).atan2(dot(a, b)) + PI;
    if TAU - angle < ANGLE_WRAP_EPSILON {
        0.0
    } else {
        angle
    }
}

/// Largest grid magnitude handled with integer arithmetic (2^61).
///
/// Coordinate differences then stay within 2^62, so each cross product
/// stays within 2^125 and fits in `i128`.
pub const EXACT_GRID_LIMIT: f64 = 2_305_843_009_213_693_952.0;

/// Returns `true` iff segment `ab` and segment `cd` intersect.
///
/// Uses the parametric form `p + t·r`, `q + u·s`:
///
/// - `r × s == 0` and `(q − p) × r == 0`: the segments are collinear and
///   intersect iff their axis-aligned bounding boxes overlap.
/// - `r × s == 0` otherwise: parallel, never intersecting.
/// - else: intersecting iff both `t` and `u` lie in `[0, 1]`.
///
/// Touching at an endpoint counts as intersecting.
#[must_use]
pub fn segments_intersect(
    a: QuantizedPoint,
    b: QuantizedPoint,
    c: QuantizedPoint,
    d: QuantizedPoint,
) -> bool {
    match (exact(a), exact(b), exact(c), exact(d)) {
        (Some(a), Some(b), Some(c), Some(d)) => intersect_exact(a, b, c, d),
        _ => intersect_float(a, b, c, d),
    }
}

/// Grid point as `i128` coordinates, if both lie within
/// [`EXACT_GRID_LIMIT`]. Non-finite values never qualify.
#[allow(clippy::cast_possible_truncation)]
fn exact(p: QuantizedPoint) -> Option<(i128, i128)> {
    (p.x.abs() <= EXACT_GRID_LIMIT && p.y.abs() <= EXACT_GRID_LIMIT)
        .then_some((p.x as i128, p.y as i128))
}

const fn grid_cross((ax, ay): (i128, i128), (bx, by): (i128, i128)) -> i128 {
    ax * by - bx * ay
}

fn intersect_exact(
    a: (i128, i128),
    b: (i128, i128),
    c: (i128, i128),
    d: (i128, i128),
) -> bool {
    let r = (b.0 - a.0, b.1 - a.1);
    let s = (d.0 - c.0, d.1 - c.1);
    let qp = (c.0 - a.0, c.1 - a.1);

    let rxs = grid_cross(r, s);
    let qpxr = grid_cross(qp, r);

    if rxs == 0 {
        if qpxr == 0 {
            // Collinear: bounding-box overlap.
            return a.0.min(b.0) <= c.0.max(d.0)
                && c.0.min(d.0) <= a.0.max(b.0)
                && a.1.min(b.1) <= c.1.max(d.1)
                && c.1.min(d.1) <= a.1.max(b.1);
        }
        return false;
    }

    // t = (q − p) × s / (r × s), u = (q − p) × r / (r × s).
    // Compare numerators against the denominator to stay exact.
    let t_num = grid_cross(qp, s);
    within_unit(t_num, rxs) && within_unit(qpxr, rxs)
}

/// `num / den` lies in `[0, 1]`, for a nonzero `den`.
const fn within_unit(num: i128, den: i128) -> bool {
    if den > 0 {
        0 <= num && num <= den
    } else {
        den <= num && num <= 0
    }
}

/// Same test in floating point, for grid values past
/// [`EXACT_GRID_LIMIT`]. Products that overflow to infinity or NaN fail
/// every comparison and report no intersection.
#[allow(clippy::float_cmp)]
fn intersect_float(
    a: QuantizedPoint,
    b: QuantizedPoint,
    c: QuantizedPoint,
    d: QuantizedPoint,
) -> bool {
    let r = Point::new(b.x - a.x, b.y - a.y);
    let s = Point::new(d.x - c.x, d.y - c.y);
    let qp = Point::new(c.x - a.x, c.y - a.y);

    let rxs = cross(r, s);
    let qpxr = cross(qp, r);

    if rxs == 0.0 {
        if qpxr == 0.0 {
            return a.x.min(b.x) <= c.x.max(d.x)
                && c.x.min(d.x) <= a.x.max(b.x)
                && a.y.min(b.y) <= c.y.max(d.y)
                && c.y.min(d.y) <= a.y.max(b.y);
        }
        return false;
    }

    let t = cross(qp, s) / rxs;
    let u = qpxr / rxs;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}
