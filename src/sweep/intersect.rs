// Copyright 2025 Lars Brubaker
// Intersection handling: combine calls, splices at the right and left ends
// of neighboring edges, crossing edges, and the dirty-region walk that
// restores the dictionary order after each change.

use log::{trace, warn};

use super::{class_for, RegionIdx, Sweep, NO_REGION};
use crate::error::TessError;
use crate::geom::{edge_intersect, edge_sign, vert_eq, vert_l1_dist, vert_leq, Real};
use crate::mesh::{sym, EdgeIdx, VertIdx, INVALID};
use crate::priorityq::INVALID_HANDLE;
use crate::sink::PrimitiveSink;

impl<S: PrimitiveSink + ?Sized> Sweep<'_, S> {
    // ──────────────────────────── Combining ────────────────────────────────────

    /// Asks the sink for the tag of vertex `v`. When the sink declines and
    /// the vertex is only a merge of coincident ones, the first tag is kept.
    fn call_combine(
        &mut self,
        v: VertIdx,
        tags: [Option<i32>; 4],
        weights: [Real; 4],
        needed: bool,
    ) -> Result<(), TessError> {
        let coords = self.mesh.verts[v as usize].coords;
        let tag = match self.sink.combine(coords, tags, weights) {
            Some(tag) => {
                trace!("combine at {:?} from {:?} -> {}", coords, tags, tag);
                Some(tag)
            }
            None if !needed => tags[0],
            None => {
                warn!("edges cross at {:?} but the sink refused to combine", coords);
                return Err(TessError::MissingCombine { coords });
            }
        };
        self.mesh.verts[v as usize].tag = tag;
        Ok(())
    }

    /// Merges the origin of `e2` into the origin of `e1`.
    pub(super) fn splice_merge_vertices(&mut self, e1: EdgeIdx, e2: EdgeIdx) -> Result<(), TessError> {
        let (v1, v2) = (self.mesh.org(e1), self.mesh.org(e2));
        let tags = [
            self.mesh.verts[v1 as usize].tag,
            self.mesh.verts[v2 as usize].tag,
            None,
            None,
        ];
        self.call_combine(v1, tags, [0.5, 0.5, 0.0, 0.0], false)?;
        self.mesh.splice(e1, e2);
        Ok(())
    }

    /// Weights of `org` and `dst` for a vertex on the segment between them,
    /// inversely proportional to distance and summing to one half. The
    /// weighted coordinates are added to `isect`.
    fn vertex_weights(&mut self, isect: VertIdx, org: VertIdx, dst: VertIdx) -> [Real; 2] {
        let p = self.st(isect);
        let t1 = vert_l1_dist(self.st(org), p);
        let t2 = vert_l1_dist(self.st(dst), p);
        let sum = t1 + t2;
        let (w0, w1) = if sum > 0.0 {
            (0.5 * t2 / sum, 0.5 * t1 / sum)
        } else {
            (0.25, 0.25)
        };

        let c_org = self.mesh.verts[org as usize].coords;
        let c_dst = self.mesh.verts[dst as usize].coords;
        let coords = &mut self.mesh.verts[isect as usize].coords;
        for i in 0..3 {
            coords[i] += w0 * c_org[i] + w1 * c_dst[i];
        }
        [w0, w1]
    }

    fn get_intersect_data(
        &mut self,
        isect: VertIdx,
        org_up: VertIdx,
        dst_up: VertIdx,
        org_lo: VertIdx,
        dst_lo: VertIdx,
    ) -> Result<(), TessError> {
        self.mesh.verts[isect as usize].coords = [0.0; 3];
        let [w0, w1] = self.vertex_weights(isect, org_up, dst_up);
        let [w2, w3] = self.vertex_weights(isect, org_lo, dst_lo);
        let tag = |v: VertIdx| self.mesh.verts[v as usize].tag;
        let tags = [tag(org_up), tag(dst_up), tag(org_lo), tag(dst_lo)];
        self.call_combine(isect, tags, [w0, w1, w2, w3], true)
    }

    // ─────────────────────────── Intersections ─────────────────────────────────

    /// Handles an upper-edge origin that lies on the lower edge or vice
    /// versa, at the right end of the two edges. Returns true when the mesh
    /// changed.
    pub(super) fn check_for_right_splice(&mut self, reg_up: RegionIdx) -> Result<bool, TessError> {
        let reg_lo = self.region_below(reg_up)?;
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);
        let (org_up, org_lo) = (self.mesh.org(e_up), self.mesh.org(e_lo));
        let (o_up, o_lo) = (self.st(org_up), self.st(org_lo));

        if vert_leq(o_up, o_lo) {
            if edge_sign(self.st(self.mesh.dst(e_lo)), o_up, o_lo) > 0.0 {
                return Ok(false);
            }
            if !vert_eq(o_up, o_lo) {
                // Split e_lo and join the new vertex to org_up.
                self.mesh.split_edge(sym(e_lo));
                let lo_oprev = self.mesh.oprev(e_lo);
                self.mesh.splice(e_up, lo_oprev);
                self.regions[reg_up as usize].dirty = true;
                self.regions[reg_lo as usize].dirty = true;
            } else if org_up != org_lo {
                // Same position: withdraw org_up from the queue and merge.
                let handle = self.mesh.verts[org_up as usize].pq_handle;
                self.pq.delete(handle);
                self.mesh.verts[org_up as usize].pq_handle = INVALID_HANDLE;
                let lo_oprev = self.mesh.oprev(e_lo);
                self.splice_merge_vertices(lo_oprev, e_up)?;
            }
        } else {
            if edge_sign(self.st(self.mesh.dst(e_up)), o_lo, o_up) < 0.0 {
                return Ok(false);
            }
            self.mark_above_dirty(reg_up);
            self.regions[reg_up as usize].dirty = true;
            self.mesh.split_edge(sym(e_up));
            let lo_oprev = self.mesh.oprev(e_lo);
            self.mesh.splice(lo_oprev, e_up);
        }
        Ok(true)
    }

    /// The left-end counterpart of `check_for_right_splice`: a destination
    /// that lies on the other edge is spliced into it.
    fn check_for_left_splice(&mut self, reg_up: RegionIdx) -> Result<bool, TessError> {
        let reg_lo = self.region_below(reg_up)?;
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);
        let (d_up, d_lo) = (self.st(self.mesh.dst(e_up)), self.st(self.mesh.dst(e_lo)));
        let class = class_for(self.regions[reg_up as usize].inside);

        if vert_leq(d_up, d_lo) {
            if edge_sign(d_up, d_lo, self.st(self.mesh.org(e_up))) < 0.0 {
                return Ok(false);
            }
            self.mark_above_dirty(reg_up);
            self.regions[reg_up as usize].dirty = true;
            let e = self.mesh.split_edge(e_up);
            self.mesh.splice(sym(e_lo), e);
            let f = self.mesh.lface(e);
            self.mesh.faces[f as usize].class = class;
        } else {
            if edge_sign(d_lo, d_up, self.st(self.mesh.org(e_lo))) > 0.0 {
                return Ok(false);
            }
            self.regions[reg_up as usize].dirty = true;
            self.regions[reg_lo as usize].dirty = true;
            let e = self.mesh.split_edge(e_lo);
            let up_lnext = self.mesh.lnext(e_up);
            self.mesh.splice(up_lnext, sym(e_lo));
            let f = self.mesh.rface(e);
            self.mesh.faces[f as usize].class = class;
        }
        Ok(true)
    }

    /// Checks the upper and lower edges of `reg_up` for a crossing and, if
    /// they cross right of the sweep line, splits both at a new vertex
    /// queued as a future event. Returns true when the regions around the
    /// event were rebuilt and the caller must stop walking.
    pub(super) fn check_for_intersect(&mut self, reg_up: RegionIdx) -> Result<bool, TessError> {
        let mut reg_up = reg_up;
        let mut reg_lo = self.region_below(reg_up)?;
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);
        let (org_up, dst_up) = (self.mesh.org(e_up), self.mesh.dst(e_up));
        let (org_lo, dst_lo) = (self.mesh.org(e_lo), self.mesh.dst(e_lo));
        let (o_up, d_up) = (self.st(org_up), self.st(dst_up));
        let (o_lo, d_lo) = (self.st(org_lo), self.st(dst_lo));
        let event = self.st(self.event);

        if org_up == org_lo
            || vert_eq(d_up, d_lo)
            || self.regions[reg_up as usize].fix_upper_edge
            || self.regions[reg_lo as usize].fix_upper_edge
        {
            return Ok(false);
        }

        // The t-ranges must overlap.
        if o_up.t.min(d_up.t) > o_lo.t.max(d_lo.t) {
            return Ok(false);
        }
        if vert_leq(o_up, o_lo) {
            if edge_sign(d_lo, o_up, o_lo) > 0.0 {
                return Ok(false);
            }
        } else if edge_sign(d_up, o_lo, o_up) < 0.0 {
            return Ok(false);
        }

        let mut isect = edge_intersect(d_up, o_up, d_lo, o_lo);
        // Rounding may put the crossing left of the sweep line or right of
        // the nearer right endpoint; clamp it back.
        if vert_leq(isect, event) {
            isect = event;
        }
        let org_min = if vert_leq(o_up, o_lo) { o_up } else { o_lo };
        if vert_leq(org_min, isect) {
            isect = org_min;
        }

        if vert_eq(isect, o_up) || vert_eq(isect, o_lo) {
            self.check_for_right_splice(reg_up)?;
            return Ok(false);
        }

        if (!vert_eq(d_up, event) && edge_sign(d_up, event, isect) >= 0.0)
            || (!vert_eq(d_lo, event) && edge_sign(d_lo, event, isect) <= 0.0)
        {
            // The crossing lies on the wrong side of an edge that does not
            // end at the event: the event vertex itself must be spliced in.
            if dst_lo == self.event {
                self.mesh.split_edge(sym(e_up));
                self.mesh.splice(sym(e_lo), e_up);
                reg_up = self.top_left_region(reg_up)?;
                let below = self.region_below(reg_up)?;
                let e_up = self.e_up(below);
                self.finish_left_regions(below, Some(reg_lo))?;
                let e_first = self.mesh.oprev(e_up);
                self.add_right_edges(reg_up, e_first, e_up, Some(e_up), true)?;
                return Ok(true);
            }
            if dst_up == self.event {
                self.mesh.split_edge(sym(e_lo));
                let up_lnext = self.mesh.lnext(e_up);
                let lo_oprev = self.mesh.oprev(e_lo);
                self.mesh.splice(up_lnext, lo_oprev);
                reg_lo = reg_up;
                reg_up = self.top_right_region(reg_up)?;
                let below = self.region_below(reg_up)?;
                let e_top_left = self.mesh.rprev(self.e_up(below));
                let (old_up, new_up) = (self.e_up(reg_lo), self.mesh.oprev(e_lo));
                self.mesh.edges[old_up as usize].active_region = INVALID;
                self.regions[reg_lo as usize].e_up = new_up;
                self.mesh.edges[new_up as usize].active_region = reg_lo;
                let e_lo = self.finish_left_regions(reg_lo, None)?;
                let e_first = self.mesh.onext(e_lo);
                let e_last = self.mesh.rprev(e_up);
                self.add_right_edges(reg_up, e_first, e_last, Some(e_top_left), true)?;
                return Ok(true);
            }
            // Split whichever edge passes on the wrong side at the event and
            // let the caller splice the pieces together.
            if edge_sign(d_up, event, isect) >= 0.0 {
                self.mark_above_dirty(reg_up);
                self.regions[reg_up as usize].dirty = true;
                self.mesh.split_edge(sym(e_up));
                let v = self.mesh.org(e_up);
                self.place_at_event(v);
            }
            if edge_sign(d_lo, event, isect) <= 0.0 {
                self.regions[reg_up as usize].dirty = true;
                self.regions[reg_lo as usize].dirty = true;
                self.mesh.split_edge(sym(e_lo));
                let v = self.mesh.org(e_lo);
                self.place_at_event(v);
            }
            return Ok(false);
        }

        // General case: split both edges and join them at the crossing.
        self.mesh.split_edge(sym(e_up));
        self.mesh.split_edge(sym(e_lo));
        let lo_oprev = self.mesh.oprev(e_lo);
        self.mesh.splice(lo_oprev, e_up);

        let v = self.mesh.org(e_up);
        self.mesh.verts[v as usize].s = isect.s;
        self.mesh.verts[v as usize].t = isect.t;
        let handle = self.pq.insert(v, isect);
        self.mesh.verts[v as usize].pq_handle = handle;
        self.get_intersect_data(v, org_up, dst_up, org_lo, dst_lo)?;

        self.mark_above_dirty(reg_up);
        self.regions[reg_up as usize].dirty = true;
        self.regions[reg_lo as usize].dirty = true;
        Ok(false)
    }

    /// Moves a vertex created by a split onto the event it will be merged with.
    fn place_at_event(&mut self, v: VertIdx) {
        let ev = self.mesh.verts[self.event as usize].clone();
        let vert = &mut self.mesh.verts[v as usize];
        vert.s = ev.s;
        vert.t = ev.t;
        vert.coords = ev.coords;
        vert.tag = ev.tag;
    }

    /// Restores the dictionary invariants around every dirty region,
    /// starting at `reg_up` and moving up and down as far as regions stay
    /// dirty.
    pub(super) fn walk_dirty_regions(&mut self, reg_up: RegionIdx) -> Result<(), TessError> {
        let mut reg_up = reg_up;
        let mut reg_lo = self.region_below(reg_up)?;

        loop {
            // Find the lowest dirty region (it may be below the start).
            while self.regions[reg_lo as usize].dirty {
                reg_up = reg_lo;
                reg_lo = self.region_below(reg_lo)?;
            }
            if !self.regions[reg_up as usize].dirty {
                reg_lo = reg_up;
                match self.region_above(reg_up) {
                    Some(above) if self.regions[above as usize].dirty => reg_up = above,
                    _ => return Ok(()),
                }
            }
            self.regions[reg_up as usize].dirty = false;
            let mut e_up = self.e_up(reg_up);
            let mut e_lo = self.e_up(reg_lo);

            if self.mesh.dst(e_up) != self.mesh.dst(e_lo) && self.check_for_left_splice(reg_up)? {
                // A temporary edge that just became redundant is removed.
                if self.regions[reg_lo as usize].fix_upper_edge {
                    self.delete_region(reg_lo);
                    self.mesh.delete_edge(e_lo);
                    reg_lo = self.region_below(reg_up)?;
                    e_lo = self.e_up(reg_lo);
                } else if self.regions[reg_up as usize].fix_upper_edge {
                    self.delete_region(reg_up);
                    self.mesh.delete_edge(e_up);
                    reg_up = self.region_above(reg_lo).ok_or(NO_REGION)?;
                    e_up = self.e_up(reg_up);
                }
            }

            if self.mesh.org(e_up) != self.mesh.org(e_lo) {
                let either_ends_at_event =
                    self.mesh.dst(e_up) == self.event || self.mesh.dst(e_lo) == self.event;
                if self.mesh.dst(e_up) != self.mesh.dst(e_lo)
                    && !self.regions[reg_up as usize].fix_upper_edge
                    && !self.regions[reg_lo as usize].fix_upper_edge
                    && either_ends_at_event
                {
                    if self.check_for_intersect(reg_up)? {
                        return Ok(());
                    }
                } else {
                    self.check_for_right_splice(reg_up)?;
                }
            }

            if self.mesh.org(e_up) == self.mesh.org(e_lo) && self.mesh.dst(e_up) == self.mesh.dst(e_lo) {
                // Coincident edges: keep the lower one with both windings.
                self.add_winding(e_lo, e_up);
                self.delete_region(reg_up);
                self.mesh.delete_edge(e_up);
                reg_up = self.region_above(reg_lo).ok_or(NO_REGION)?;
            }
        }
    }
}
