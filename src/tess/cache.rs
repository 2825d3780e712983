// Copyright 2025 Lars Brubaker
// Direct output for a polygon made of one small contour.
//
// A contour that never left the vertex cache is emitted as a single fan
// when every fan triangle around its first vertex turns the same way and
// no two of its edges meet away from their shared vertices. No mesh is
// built and no sweep runs.

use crate::geom::Real;
use crate::sink::{PrimitiveKind, PrimitiveSink};

use super::{CachedVertex, Tessellator, WindingRule};

/// The z component of the contour normal: fan cross products around the
/// first vertex, each added or subtracted to agree with the running total.
fn fan_normal(verts: &[CachedVertex]) -> Real {
    let mut norm = 0.0;
    for cross in fan_crosses(verts) {
        if cross * norm >= 0.0 {
            norm += cross;
        } else {
            norm -= cross;
        }
    }
    norm
}

/// +1 or -1 when every non-degenerate fan triangle agrees with `norm`
/// in that direction, 0 when all are degenerate, `None` when they disagree.
fn fan_sign(verts: &[CachedVertex], norm: Real) -> Option<i32> {
    let mut sign = 0;
    for cross in fan_crosses(verts) {
        let dot = cross * norm;
        if dot > 0.0 {
            if sign < 0 {
                return None;
            }
            sign = 1;
        } else if dot < 0.0 {
            if sign > 0 {
                return None;
            }
            sign = -1;
        }
    }
    Some(sign)
}

fn fan_crosses(verts: &[CachedVertex]) -> impl Iterator<Item = Real> + '_ {
    let [x0, y0, _] = verts[0].coords;
    verts[1..].windows(2).map(move |w| {
        let (xp, yp) = (w[0].coords[0] - x0, w[0].coords[1] - y0);
        let (xc, yc) = (w[1].coords[0] - x0, w[1].coords[1] - y0);
        xp * yc - yp * xc
    })
}

fn orient(a: [Real; 3], b: [Real; 3], c: [Real; 3]) -> Real {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// `r` lies in the bounding box of `p`, `q`. Only meaningful when collinear.
fn within(p: [Real; 3], q: [Real; 3], r: [Real; 3]) -> bool {
    r[0] >= p[0].min(q[0])
        && r[0] <= p[0].max(q[0])
        && r[1] >= p[1].min(q[1])
        && r[1] <= p[1].max(q[1])
}

/// Closed segments `ab` and `cd` share at least one point.
fn segments_meet(a: [Real; 3], b: [Real; 3], c: [Real; 3], d: [Real; 3]) -> bool {
    let (o1, o2) = (orient(c, d, a), orient(c, d, b));
    let (o3, o4) = (orient(a, b, c), orient(a, b, d));
    if o1 * o2 < 0.0 && o3 * o4 < 0.0 {
        return true;
    }
    (o1 == 0.0 && within(c, d, a))
        || (o2 == 0.0 && within(c, d, b))
        || (o3 == 0.0 && within(a, b, c))
        || (o4 == 0.0 && within(a, b, d))
}

/// True when two edges that are not neighbors along the contour cross or
/// touch. Such a contour needs the sweep to split its edges.
fn contour_meets_itself(verts: &[CachedVertex]) -> bool {
    let n = verts.len();
    let edge = |i: usize| (verts[i].coords, verts[(i + 1) % n].coords);
    for i in 0..n {
        let (a, b) = edge(i);
        // Skip the neighbor after `i`, and the closing edge when `i` is 0.
        let last = if i == 0 { n - 1 } else { n };
        for j in i + 2..last {
            let (c, d) = edge(j);
            if segments_meet(a, b, c, d) {
                return true;
            }
        }
    }
    false
}

impl Tessellator {
    /// Emits the cached contour directly. Returns the number of groups
    /// emitted, or `None` when the contour needs the full pipeline.
    pub(super) fn render_cache<S: PrimitiveSink + ?Sized>(&self, sink: &mut S) -> Option<usize> {
        let verts = &self.cache;
        if verts.len() < 3 {
            return Some(0);
        }

        let norm = fan_normal(verts);
        let sign = fan_sign(verts, norm)?;
        if sign == 0 {
            return Some(0);
        }
        if contour_meets_itself(verts) {
            return None;
        }

        let emit = match self.options.winding_rule {
            WindingRule::Odd | WindingRule::NonZero => true,
            WindingRule::Positive => sign > 0,
            WindingRule::Negative => sign < 0,
            WindingRule::AbsGeqTwo => false,
        };
        if !emit {
            return Some(0);
        }

        let kind = if self.options.boundary_only {
            PrimitiveKind::LineLoop
        } else if verts.len() > 3 {
            PrimitiveKind::TriangleFan
        } else {
            PrimitiveKind::Triangles
        };

        sink.begin(kind);
        sink.vertex(verts[0].tag);
        if sign > 0 {
            for v in &verts[1..] {
                sink.vertex(v.tag);
            }
        } else {
            for v in verts[1..].iter().rev() {
                sink.vertex(v.tag);
            }
        }
        sink.end();
        Some(1)
    }
}
