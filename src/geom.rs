//! 2-D geometry kernel shared by the movement solver and the renderer.
//!
//! Pure functions over `f64`; no world types.  The tolerance [`EPS`]
//! governs every colinearity / parallelism decision in the crate – both
//! the solver and the wall-ordering predicate rely on the same value.

use glam::DVec2;

/// Colinearity and parallel-line tolerance.
pub const EPS: f64 = 1e-3;

/// 2-D cross product of `b − a` with `p − a`.
///
/// Positive: `p` is left of the directed segment `a → b`; negative:
/// right; within [`EPS`] of zero: colinear.
#[inline]
pub fn side_of(a: DVec2, b: DVec2, p: DVec2) -> f64 {
    (b - a).perp_dot(p - a)
}

/// Do the closed segments `p0→p1` and `q0→q1` intersect?
///
/// Parametric test; parallel segments (denominator within [`EPS`] of
/// zero) never intersect.
pub fn segments_intersect(p0: DVec2, p1: DVec2, q0: DVec2, q1: DVec2) -> bool {
    let denom = (p0 - p1).perp_dot(q0 - q1);
    if denom.abs() < EPS {
        return false;
    }
    let t = (p0 - q0).perp_dot(q0 - q1) / denom;
    let u = (p0 - q0).perp_dot(p0 - p1) / denom;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Intersection of the two infinite lines through `p0p1` and `q0q1`.
///
/// The caller guarantees the lines are not parallel.
pub fn intersect_point(p0: DVec2, p1: DVec2, q0: DVec2, q1: DVec2) -> DVec2 {
    let cp = p0.perp_dot(p1);
    let cq = q0.perp_dot(q1);
    let denom = (p0 - p1).perp_dot(q0 - q1);
    DVec2::new(
        (cp * (q0.x - q1.x) - (p0.x - p1.x) * cq) / denom,
        (cp * (q0.y - q1.y) - (p0.y - p1.y) * cq) / denom,
    )
}

/// Is `p` inside the closed polygon given by `edges`?
///
/// Westward ray-cast: an edge counts when `p.y` lies in the half-open
/// interval `(min(v0.y, v1.y), max(v0.y, v1.y)]` and the edge crosses the
/// ray to the west of `p`.  The half-open rule prevents shared vertices
/// from being counted twice.
pub fn point_in_polygon<I>(p: DVec2, edges: I) -> bool
where
    I: IntoIterator<Item = (DVec2, DVec2)>,
{
    let mut crossings = 0u32;
    for (v0, v1) in edges {
        if p.y > v0.y.max(v1.y) || p.y <= v0.y.min(v1.y) {
            continue;
        }
        let x = v0.x + (v1.x - v0.x) / (v1.y - v0.y) * (p.y - v0.y);
        if x < p.x {
            crossings += 1;
        }
    }
    crossings & 1 == 1
}

/// Project `a` onto `b` (used to slide a blocked move along a wall).
///
/// A degenerate `b` projects everything to zero.
#[inline]
pub fn project_onto(a: DVec2, b: DVec2) -> DVec2 {
    let len_sq = b.length_squared();
    if len_sq < EPS * EPS {
        return DVec2::ZERO;
    }
    b * (a.dot(b) / len_sq)
}

/*====================================================================*/
/*                               Tests                                */
/*====================================================================*/
