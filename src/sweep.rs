// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Sweep-line pass over the contour mesh.
//
// Vertices are visited left to right (by s, then t). The edges crossing the
// sweep line are kept in a dictionary of active regions ordered bottom to
// top; each region is the strip below its upper edge. As the line advances,
// crossing edges are split at their intersection, coincident vertices and
// overlapping edges are merged, and every face that closes behind the line
// is classified as interior or exterior from its winding number. The result
// is a planar subdivision whose interior faces are monotone.

use log::{debug, trace};

use crate::dict::{Dict, NodeIdx};
use crate::error::TessError;
use crate::geom::{edge_eval, edge_sign, vert_eq, vert_leq, Real, SweepPoint};
use crate::mesh::{sym, EdgeIdx, FaceClass, Mesh, VertIdx, E_HEAD, F_HEAD, INVALID};
use crate::priorityq::{PriorityQ, INVALID_HANDLE};
use crate::sink::PrimitiveSink;
use crate::tess::WindingRule;

mod events;
mod intersect;

/// Index into the region arena.
pub(crate) type RegionIdx = u32;

const NO_REGION: TessError = TessError::Topology("sweep region has no neighbour");

/// The area between an edge crossing the sweep line and the next edge below it.
#[derive(Copy, Clone, Debug, Default)]
struct ActiveRegion {
    /// Upper edge, directed right to left.
    e_up: EdgeIdx,
    node_up: NodeIdx,
    winding: i32,
    inside: bool,
    /// One of the two bounding regions at t = ±infinity.
    sentinel: bool,
    /// An adjacent edge changed; intersections must be rechecked.
    dirty: bool,
    /// `e_up` is a temporary edge to be replaced once the right vertex is known.
    fix_upper_edge: bool,
}

/// Runs the sweep over `mesh`, classifying every face under `rule`.
///
/// Vertices created at edge crossings get their tag from `sink.combine`.
pub(crate) fn compute_interior<S: PrimitiveSink + ?Sized>(
    mesh: &mut Mesh,
    rule: WindingRule,
    sink: &mut S,
) -> Result<(), TessError> {
    let mut sweep = Sweep {
        mesh,
        sink,
        rule,
        dict: Dict::new(),
        pq: PriorityQ::default(),
        regions: Vec::new(),
        free_regions: Vec::new(),
        event: INVALID,
    };
    sweep.run()
}

/// `e1 <= e2` at the current event: is `e1` at or below `e2` where they
/// cross the sweep line?
fn edge_leq(mesh: &Mesh, event: VertIdx, e1: EdgeIdx, e2: EdgeIdx) -> bool {
    let ev = mesh.st(event);
    let (o1, d1) = (mesh.st(mesh.org(e1)), mesh.st(mesh.dst(e1)));
    let (o2, d2) = (mesh.st(mesh.org(e2)), mesh.st(mesh.dst(e2)));

    if mesh.dst(e1) == event {
        if mesh.dst(e2) == event {
            // Both edges end at the event; order them by slope.
            if vert_leq(o1, o2) {
                return edge_sign(d2, o1, o2) <= 0.0;
            }
            return edge_sign(d1, o2, o1) >= 0.0;
        }
        return edge_sign(d2, ev, o2) <= 0.0;
    }
    if mesh.dst(e2) == event {
        return edge_sign(d1, ev, o1) >= 0.0;
    }
    edge_eval(d1, ev, o1) >= edge_eval(d2, ev, o2)
}

fn class_for(inside: bool) -> FaceClass {
    if inside {
        FaceClass::Interior
    } else {
        FaceClass::Exterior
    }
}

struct Sweep<'a, S: PrimitiveSink + ?Sized> {
    mesh: &'a mut Mesh,
    sink: &'a mut S,
    rule: WindingRule,
    dict: Dict<RegionIdx>,
    pq: PriorityQ,
    regions: Vec<ActiveRegion>,
    free_regions: Vec<RegionIdx>,
    event: VertIdx,
}

impl<S: PrimitiveSink + ?Sized> Sweep<'_, S> {
    fn run(&mut self) -> Result<(), TessError> {
        self.remove_degenerate_edges()?;
        self.init_priority_queue();
        self.init_edge_dict();

        let mut events = 0usize;
        while let Some(v) = self.pq.extract_min() {
            self.mesh.verts[v as usize].pq_handle = INVALID_HANDLE;
            // Coincident vertices are merged into one event.
            while let Some(next) = self.pq.minimum() {
                if !vert_eq(self.st(next), self.st(v)) {
                    break;
                }
                self.pq.extract_min();
                self.mesh.verts[next as usize].pq_handle = INVALID_HANDLE;
                let a = self.mesh.verts[v as usize].an_edge;
                let b = self.mesh.verts[next as usize].an_edge;
                self.splice_merge_vertices(a, b)?;
            }
            self.sweep_event(v)?;
            events += 1;
        }

        self.done_edge_dict()?;
        self.remove_degenerate_faces();
        debug!("sweep processed {} events", events);
        Ok(())
    }

    // ─────────────────────────────── Setup ─────────────────────────────────────

    /// Zero-length edges are collapsed and contours of fewer than three
    /// edges are removed.
    fn remove_degenerate_edges(&mut self) -> Result<(), TessError> {
        let mut e = self.mesh.next_pair(E_HEAD);
        while e != E_HEAD {
            let mut e_next = self.mesh.next_pair(e);
            let mut e_lnext = self.mesh.lnext(e);

            let (org, dst) = (self.mesh.org(e), self.mesh.dst(e));
            if vert_eq(self.st(org), self.st(dst)) && self.mesh.lnext(e_lnext) != e {
                self.splice_merge_vertices(e_lnext, e)?;
                self.mesh.delete_edge(e);
                e = e_lnext;
                e_lnext = self.mesh.lnext(e);
            }
            if self.mesh.lnext(e_lnext) == e {
                if e_lnext != e {
                    if e_lnext == e_next || e_lnext == sym(e_next) {
                        e_next = self.mesh.next_pair(e_next);
                    }
                    self.mesh.delete_edge(e_lnext);
                }
                if e == e_next || e == sym(e_next) {
                    e_next = self.mesh.next_pair(e_next);
                }
                self.mesh.delete_edge(e);
            }
            e = e_next;
        }
        Ok(())
    }

    fn init_priority_queue(&mut self) {
        let verts: Vec<VertIdx> = self.mesh.vertices().collect();
        self.pq = PriorityQ::with_capacity(verts.len());
        for v in verts {
            let handle = self.pq.insert(v, self.mesh.st(v));
            self.mesh.verts[v as usize].pq_handle = handle;
        }
        trace!("queued {} sweep events", self.pq.len());
    }

    /// Two sentinel regions bound every real edge from above and below.
    fn init_edge_dict(&mut self) {
        let mut points = self.mesh.vertices().map(|v| self.mesh.st(v));
        let first = points.next().unwrap_or_default();
        let (mut min, mut max) = (first, first);
        for p in points {
            min.s = min.s.min(p.s);
            min.t = min.t.min(p.t);
            max.s = max.s.max(p.s);
            max.t = max.t.max(p.t);
        }
        let w = (max.s - min.s) + 0.01;
        let h = (max.t - min.t) + 0.01;
        self.add_sentinel(min.s - w, max.s + w, min.t - h);
        self.add_sentinel(min.s - w, max.s + w, max.t + h);
    }

    fn add_sentinel(&mut self, smin: Real, smax: Real, t: Real) {
        let e = self.mesh.make_edge();
        let (org, dst) = (self.mesh.org(e), self.mesh.dst(e));
        self.mesh.verts[org as usize].s = smax;
        self.mesh.verts[org as usize].t = t;
        self.mesh.verts[dst as usize].s = smin;
        self.mesh.verts[dst as usize].t = t;
        self.event = dst;

        let reg = self.alloc_region(ActiveRegion {
            e_up: e,
            sentinel: true,
            ..ActiveRegion::default()
        });
        let mesh = &*self.mesh;
        let regions = &self.regions;
        let event = self.event;
        let node = self.dict.insert(reg, |a, b| {
            edge_leq(mesh, event, regions[a as usize].e_up, regions[b as usize].e_up)
        });
        self.regions[reg as usize].node_up = node;
    }

    /// Deletes the remaining regions. Only the sentinels and at most one
    /// temporary edge may be left once every event has been processed.
    fn done_edge_dict(&mut self) -> Result<(), TessError> {
        let mut fixed = 0;
        while let Some(reg) = self.dict.key(self.dict.min()) {
            let region = self.regions[reg as usize];
            if !region.sentinel {
                fixed += 1;
                if !region.fix_upper_edge || fixed > 1 {
                    return Err(TessError::Topology("region left open after the sweep"));
                }
            }
            self.delete_region(reg);
        }
        debug_assert!(self.dict.is_empty());
        Ok(())
    }

    /// Removes faces bounded by only two edges, folding their winding into
    /// the neighbouring edge.
    fn remove_degenerate_faces(&mut self) {
        let mut f = self.mesh.faces[F_HEAD as usize].next;
        while f != F_HEAD {
            let f_next = self.mesh.faces[f as usize].next;
            let e = self.mesh.faces[f as usize].an_edge;
            if self.mesh.lnext(self.mesh.lnext(e)) == e {
                let onext = self.mesh.onext(e);
                self.add_winding(onext, e);
                self.mesh.delete_edge(e);
            }
            f = f_next;
        }
    }

    // ────────────────────────────── Regions ────────────────────────────────────

    #[inline]
    fn st(&self, v: VertIdx) -> SweepPoint {
        self.mesh.st(v)
    }

    #[inline]
    fn e_up(&self, reg: RegionIdx) -> EdgeIdx {
        self.regions[reg as usize].e_up
    }

    fn alloc_region(&mut self, region: ActiveRegion) -> RegionIdx {
        match self.free_regions.pop() {
            Some(idx) => {
                self.regions[idx as usize] = region;
                idx
            }
            None => {
                self.regions.push(region);
                (self.regions.len() - 1) as RegionIdx
            }
        }
    }

    fn region_above(&self, reg: RegionIdx) -> Option<RegionIdx> {
        let node = self.regions[reg as usize].node_up;
        self.dict.key(self.dict.succ(node))
    }

    fn region_below(&self, reg: RegionIdx) -> Result<RegionIdx, TessError> {
        let node = self.regions[reg as usize].node_up;
        self.dict.key(self.dict.pred(node)).ok_or(NO_REGION)
    }

    fn mark_above_dirty(&mut self, reg: RegionIdx) {
        if let Some(above) = self.region_above(reg) {
            self.regions[above as usize].dirty = true;
        }
    }

    /// Adds a region for `e_new_up` just below `reg_above`. The winding is
    /// left for the caller to fill in.
    fn add_region_below(&mut self, reg_above: RegionIdx, e_new_up: EdgeIdx) -> RegionIdx {
        let reg = self.alloc_region(ActiveRegion {
            e_up: e_new_up,
            ..ActiveRegion::default()
        });
        let above_node = self.regions[reg_above as usize].node_up;
        let mesh = &*self.mesh;
        let regions = &self.regions;
        let event = self.event;
        let node = self.dict.insert_before(above_node, reg, |a, b| {
            edge_leq(mesh, event, regions[a as usize].e_up, regions[b as usize].e_up)
        });
        self.regions[reg as usize].node_up = node;
        self.mesh.edges[e_new_up as usize].active_region = reg;
        reg
    }

    fn delete_region(&mut self, reg: RegionIdx) {
        let ActiveRegion { e_up, node_up, .. } = self.regions[reg as usize];
        self.mesh.edges[e_up as usize].active_region = INVALID;
        self.dict.delete(node_up);
        self.free_regions.push(reg);
    }

    /// Replaces the temporary upper edge of `reg` with `new_edge`.
    fn fix_upper_edge(&mut self, reg: RegionIdx, new_edge: EdgeIdx) {
        let old = self.e_up(reg);
        self.mesh.delete_edge(old);
        let region = &mut self.regions[reg as usize];
        region.fix_upper_edge = false;
        region.e_up = new_edge;
        self.mesh.edges[new_edge as usize].active_region = reg;
    }

    fn compute_winding(&mut self, reg: RegionIdx) -> Result<(), TessError> {
        let above = self.region_above(reg).ok_or(NO_REGION)?;
        let winding =
            self.regions[above as usize].winding + self.mesh.edges[self.e_up(reg) as usize].winding;
        let region = &mut self.regions[reg as usize];
        region.winding = winding;
        region.inside = self.rule.is_inside(winding);
        Ok(())
    }

    /// The face left of the upper edge is complete: classify it.
    fn finish_region(&mut self, reg: RegionIdx) {
        let ActiveRegion { e_up, inside, .. } = self.regions[reg as usize];
        let f = self.mesh.lface(e_up);
        let face = &mut self.mesh.faces[f as usize];
        face.class = class_for(inside);
        face.an_edge = e_up;
        self.delete_region(reg);
    }

    fn add_winding(&mut self, dst: EdgeIdx, src: EdgeIdx) {
        let w = self.mesh.edges[src as usize].winding;
        let w_sym = self.mesh.edges[sym(src) as usize].winding;
        self.mesh.edges[dst as usize].winding += w;
        self.mesh.edges[sym(dst) as usize].winding += w_sym;
    }

    /// The region above the topmost one whose upper edge leaves the same
    /// vertex as `reg`'s. A temporary edge found there is fixed on the spot.
    fn top_left_region(&mut self, reg: RegionIdx) -> Result<RegionIdx, TessError> {
        let org = self.mesh.org(self.e_up(reg));
        let mut reg = reg;
        loop {
            reg = self.region_above(reg).ok_or(NO_REGION)?;
            if self.mesh.org(self.e_up(reg)) != org {
                break;
            }
        }

        if self.regions[reg as usize].fix_upper_edge {
            let below = self.region_below(reg)?;
            let a = sym(self.e_up(below));
            let b = self.mesh.lnext(self.e_up(reg));
            let e = self.mesh.connect(a, b);
            self.fix_upper_edge(reg, e);
            reg = self.region_above(reg).ok_or(NO_REGION)?;
        }
        Ok(reg)
    }

    /// The region above the topmost one whose upper edge ends at the same
    /// vertex as `reg`'s.
    fn top_right_region(&self, reg: RegionIdx) -> Result<RegionIdx, TessError> {
        let dst = self.mesh.dst(self.e_up(reg));
        let mut reg = reg;
        loop {
            reg = self.region_above(reg).ok_or(NO_REGION)?;
            if self.mesh.dst(self.e_up(reg)) != dst {
                return Ok(reg);
            }
        }
    }

    /// Finishes the regions from `reg_first` down to (not including)
    /// `reg_last`, or until a region whose upper edge leaves a different
    /// vertex. Temporary edges met on the way are replaced and the left
    /// edges are spliced into order around the event. Returns the upper edge
    /// of the last region visited.
    fn finish_left_regions(
        &mut self,
        reg_first: RegionIdx,
        reg_last: Option<RegionIdx>,
    ) -> Result<EdgeIdx, TessError> {
        let mut reg_prev = reg_first;
        let mut e_prev = self.e_up(reg_first);

        while Some(reg_prev) != reg_last {
            self.regions[reg_prev as usize].fix_upper_edge = false;
            let reg = self.region_below(reg_prev)?;
            let mut e = self.e_up(reg);

            if self.mesh.org(e) != self.mesh.org(e_prev) {
                if !self.regions[reg as usize].fix_upper_edge {
                    self.finish_region(reg_prev);
                    break;
                }
                // The lower edge was temporary: reconnect it to the event.
                let a = self.mesh.lprev(e_prev);
                e = self.mesh.connect(a, sym(e));
                self.fix_upper_edge(reg, e);
            }

            if self.mesh.onext(e_prev) != e {
                let e_oprev = self.mesh.oprev(e);
                self.mesh.splice(e_oprev, e);
                self.mesh.splice(e_prev, e);
            }
            self.finish_region(reg_prev);
            e_prev = self.e_up(reg);
            reg_prev = reg;
        }
        Ok(e_prev)
    }

    /// Inserts the right-going edges `e_first .. e_last` (walking `onext`)
    /// below `reg_up`, computes their windings and merges edges that turn
    /// out to coincide.
    fn add_right_edges(
        &mut self,
        reg_up: RegionIdx,
        e_first: EdgeIdx,
        e_last: EdgeIdx,
        e_top_left: Option<EdgeIdx>,
        clean_up: bool,
    ) -> Result<(), TessError> {
        let mut e = e_first;
        loop {
            self.add_region_below(reg_up, sym(e));
            e = self.mesh.onext(e);
            if e == e_last {
                break;
            }
        }

        let e_top_left = match e_top_left {
            Some(e) => e,
            None => {
                let below = self.region_below(reg_up)?;
                self.mesh.rprev(self.e_up(below))
            }
        };

        let mut reg_prev = reg_up;
        let mut e_prev = e_top_left;
        let mut first_time = true;
        loop {
            let reg = self.region_below(reg_prev)?;
            let e = sym(self.e_up(reg));
            if self.mesh.org(e) != self.mesh.org(e_prev) {
                break;
            }

            if self.mesh.onext(e) != e_prev {
                // Move e so that it follows e_prev around the event.
                let e_oprev = self.mesh.oprev(e);
                self.mesh.splice(e_oprev, e);
                let prev_oprev = self.mesh.oprev(e_prev);
                self.mesh.splice(prev_oprev, e);
            }

            let winding = self.regions[reg_prev as usize].winding - self.mesh.edges[e as usize].winding;
            let region = &mut self.regions[reg as usize];
            region.winding = winding;
            region.inside = self.rule.is_inside(winding);

            self.regions[reg_prev as usize].dirty = true;
            if !first_time && self.check_for_right_splice(reg_prev)? {
                self.add_winding(e, e_prev);
                self.delete_region(reg_prev);
                self.mesh.delete_edge(e_prev);
            }
            first_time = false;
            reg_prev = reg;
            e_prev = e;
        }

        self.regions[reg_prev as usize].dirty = true;
        if clean_up {
            self.walk_dirty_regions(reg_prev)?;
        }
        Ok(())
    }
}
