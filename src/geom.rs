// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Geometric predicates on sweep coordinates.
//
// The sweep runs over (s, t) pairs: s is the sweep direction, t the position
// along the sweep line. Every "trans" variant is the same predicate evaluated
// with s and t exchanged, which is how the intersection code computes the
// second coordinate with the same numerics as the first.

pub type Real = f64;

/// A position in sweep space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SweepPoint {
    pub s: Real,
    pub t: Real,
}

impl SweepPoint {
    #[inline]
    pub fn new(s: Real, t: Real) -> Self {
        SweepPoint { s, t }
    }

    /// The same point with its coordinates exchanged.
    #[inline]
    pub fn transposed(self) -> Self {
        SweepPoint { s: self.t, t: self.s }
    }
}

/// Sweep order: s first, then t.
#[inline]
pub fn vert_leq(u: SweepPoint, v: SweepPoint) -> bool {
    u.s < v.s || (u.s == v.s && u.t <= v.t)
}

#[inline]
pub fn vert_eq(u: SweepPoint, v: SweepPoint) -> bool {
    u.s == v.s && u.t == v.t
}

/// Order with t first, then s.
#[inline]
pub fn trans_leq(u: SweepPoint, v: SweepPoint) -> bool {
    vert_leq(u.transposed(), v.transposed())
}

/// For `u <= v <= w` in sweep order, the signed t-distance from the segment
/// `uw` to `v`, evaluated at `v.s`. Zero when `uw` is vertical.
pub fn edge_eval(u: SweepPoint, v: SweepPoint, w: SweepPoint) -> Real {
    let gap_l = v.s - u.s;
    let gap_r = w.s - v.s;
    if gap_l + gap_r <= 0.0 {
        return 0.0;
    }
    if gap_l < gap_r {
        (v.t - u.t) + (u.t - w.t) * (gap_l / (gap_l + gap_r))
    } else {
        (v.t - w.t) + (w.t - u.t) * (gap_r / (gap_l + gap_r))
    }
}

/// Same sign as [`edge_eval`] without the division.
pub fn edge_sign(u: SweepPoint, v: SweepPoint, w: SweepPoint) -> Real {
    let gap_l = v.s - u.s;
    let gap_r = w.s - v.s;
    if gap_l + gap_r > 0.0 {
        (v.t - w.t) * gap_l + (v.t - u.t) * gap_r
    } else {
        0.0
    }
}

#[inline]
pub fn trans_eval(u: SweepPoint, v: SweepPoint, w: SweepPoint) -> Real {
    edge_eval(u.transposed(), v.transposed(), w.transposed())
}

#[inline]
pub fn trans_sign(u: SweepPoint, v: SweepPoint, w: SweepPoint) -> Real {
    edge_sign(u.transposed(), v.transposed(), w.transposed())
}

#[inline]
pub fn vert_l1_dist(u: SweepPoint, v: SweepPoint) -> Real {
    (u.s - v.s).abs() + (u.t - v.t).abs()
}

/// Returns `(b*x + a*y) / (a + b)`, or the midpoint when both weights are
/// zero. Negative weights are clamped to zero, so the result always lies
/// between `x` and `y`.
pub fn real_interpolate(a: Real, x: Real, b: Real, y: Real) -> Real {
    let a = a.max(0.0);
    let b = b.max(0.0);
    if a <= b {
        if b == 0.0 {
            x / 2.0 + y / 2.0
        } else {
            x + (y - x) * (a / (a + b))
        }
    } else {
        y + (x - y) * (b / (a + b))
    }
}

/// Intersection of segments `o1 d1` and `o2 d2`.
///
/// The result lies inside the bounding box of the overlap of both segments
/// even when rounding makes them appear not to cross.
pub fn edge_intersect(
    o1: SweepPoint,
    d1: SweepPoint,
    o2: SweepPoint,
    d2: SweepPoint,
) -> SweepPoint {
    let s = intersect_coord(o1, d1, o2, d2);
    let t = intersect_coord(
        o1.transposed(),
        d1.transposed(),
        o2.transposed(),
        d2.transposed(),
    );
    SweepPoint { s, t }
}

/// The s-coordinate of the crossing; called on transposed points for t.
fn intersect_coord(
    mut o1: SweepPoint,
    mut d1: SweepPoint,
    mut o2: SweepPoint,
    mut d2: SweepPoint,
) -> Real {
    if !vert_leq(o1, d1) {
        std::mem::swap(&mut o1, &mut d1);
    }
    if !vert_leq(o2, d2) {
        std::mem::swap(&mut o2, &mut d2);
    }
    if !vert_leq(o1, o2) {
        std::mem::swap(&mut o1, &mut o2);
        std::mem::swap(&mut d1, &mut d2);
    }

    if !vert_leq(o2, d1) {
        // No overlap in this coordinate; split the gap.
        return o2.s / 2.0 + d1.s / 2.0;
    }
    let (mut z1, mut z2, far) = if vert_leq(d1, d2) {
        (edge_eval(o1, o2, d1), edge_eval(o2, d1, d2), d1.s)
    } else {
        (edge_sign(o1, o2, d1), -edge_sign(o1, d2, d1), d2.s)
    };
    if z1 + z2 < 0.0 {
        z1 = -z1;
        z2 = -z2;
    }
    real_interpolate(z1, o2.s, z2, far)
}
