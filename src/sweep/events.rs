// Copyright 2025 Lars Brubaker
// Vertex events: left-going edges are finished, right-going edges are
// inserted, and temporary edges keep every region monotone.

use log::trace;

use super::{edge_leq, RegionIdx, Sweep, NO_REGION};
use crate::error::TessError;
use crate::geom::{edge_sign, vert_eq, vert_leq};
use crate::mesh::{sym, EdgeIdx, VertIdx, INVALID};
use crate::sink::PrimitiveSink;

impl<S: PrimitiveSink + ?Sized> Sweep<'_, S> {
    // ─────────────────────────────── Events ────────────────────────────────────

    pub(super) fn sweep_event(&mut self, v_event: VertIdx) -> Result<(), TessError> {
        self.event = v_event;
        trace!("sweep event {} at {:?}", v_event, self.st(v_event));

        // Look for an edge of this vertex already in the dictionary.
        let start = self.mesh.verts[v_event as usize].an_edge;
        let mut e = start;
        while self.mesh.edges[e as usize].active_region == INVALID {
            e = self.mesh.onext(e);
            if e == start {
                return self.connect_left_vertex(v_event);
            }
        }

        let active = self.mesh.edges[e as usize].active_region;
        let reg_up = self.top_left_region(active)?;
        let reg = self.region_below(reg_up)?;
        let e_top_left = self.e_up(reg);
        let e_bottom_left = self.finish_left_regions(reg, None)?;

        let e_first = self.mesh.onext(e_bottom_left);
        if e_first == e_top_left {
            // No right-going edges.
            self.connect_right_vertex(reg_up, e_bottom_left)
        } else {
            self.add_right_edges(reg_up, e_first, e_top_left, Some(e_top_left), true)
        }
    }

    /// The event has left-going edges but no right-going ones. A temporary
    /// edge is added toward the right so the region below it stays monotone.
    fn connect_right_vertex(
        &mut self,
        reg_up: RegionIdx,
        e_bottom_left: EdgeIdx,
    ) -> Result<(), TessError> {
        let mut reg_up = reg_up;
        let mut e_bottom_left = e_bottom_left;
        let mut e_top_left = self.mesh.onext(e_bottom_left);
        let reg_lo = self.region_below(reg_up)?;
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);
        let mut degenerate = false;

        if self.mesh.dst(e_up) != self.mesh.dst(e_lo) {
            self.check_for_intersect(reg_up)?;
        }

        // The event may now lie on either bounding edge.
        let event = self.st(self.event);
        if vert_eq(self.st(self.mesh.org(e_up)), event) {
            let a = self.mesh.oprev(e_top_left);
            self.mesh.splice(a, e_up);
            reg_up = self.top_left_region(reg_up)?;
            let below = self.region_below(reg_up)?;
            e_top_left = self.e_up(below);
            self.finish_left_regions(below, Some(reg_lo))?;
            degenerate = true;
        }
        if vert_eq(self.st(self.mesh.org(e_lo)), event) {
            let b = self.mesh.oprev(e_lo);
            self.mesh.splice(e_bottom_left, b);
            e_bottom_left = self.finish_left_regions(reg_lo, None)?;
            degenerate = true;
        }
        if degenerate {
            let e_first = self.mesh.onext(e_bottom_left);
            return self.add_right_edges(reg_up, e_first, e_top_left, Some(e_top_left), true);
        }

        // Connect to the leftmost of the two right endpoints.
        let target = if vert_leq(self.st(self.mesh.org(e_lo)), self.st(self.mesh.org(e_up))) {
            self.mesh.oprev(e_lo)
        } else {
            e_up
        };
        let from = self.mesh.lprev(e_bottom_left);
        let e_new = self.mesh.connect(from, target);
        let e_next = self.mesh.onext(e_new);
        self.add_right_edges(reg_up, e_new, e_next, Some(e_next), false)?;

        let reg_new = self.mesh.edges[sym(e_new) as usize].active_region;
        if reg_new == INVALID {
            return Err(TessError::Topology("temporary edge has no region"));
        }
        self.regions[reg_new as usize].fix_upper_edge = true;
        self.walk_dirty_regions(reg_up)
    }

    /// The event lies on the upper edge of `reg_up` (or on one of its ends).
    fn connect_left_degenerate(
        &mut self,
        reg_up: RegionIdx,
        v_event: VertIdx,
    ) -> Result<(), TessError> {
        let e = self.e_up(reg_up);
        let p = self.st(v_event);

        if vert_eq(self.st(self.mesh.org(e)), p) {
            // An unprocessed vertex: merge and let the queue deliver it.
            let an_edge = self.mesh.verts[v_event as usize].an_edge;
            return self.splice_merge_vertices(e, an_edge);
        }

        if !vert_eq(self.st(self.mesh.dst(e)), p) {
            // The event is in the middle of the edge: split it there.
            self.mesh.split_edge(sym(e));
            if self.regions[reg_up as usize].fix_upper_edge {
                let extra = self.mesh.onext(e);
                self.mesh.delete_edge(extra);
                self.regions[reg_up as usize].fix_upper_edge = false;
            }
            let an_edge = self.mesh.verts[v_event as usize].an_edge;
            self.mesh.splice(an_edge, e);
            return self.sweep_event(v_event);
        }

        // The event coincides with the already processed destination.
        let reg_up = self.top_right_region(reg_up)?;
        let reg = self.region_below(reg_up)?;
        let mut e_top_right = sym(self.e_up(reg));
        let e_last = self.mesh.onext(e_top_right);
        if self.regions[reg as usize].fix_upper_edge {
            self.delete_region(reg);
            self.mesh.delete_edge(e_top_right);
            e_top_right = self.mesh.oprev(e_last);
        }
        let an_edge = self.mesh.verts[v_event as usize].an_edge;
        self.mesh.splice(an_edge, e_top_right);

        let e_top_left = self.mesh.edge_goes_left(e_last).then_some(e_last);
        let e_first = self.mesh.onext(e_top_right);
        self.add_right_edges(reg_up, e_first, e_last, e_top_left, true)
    }

    /// The event has only right-going edges. If it lies inside the polygon
    /// it is connected to a processed vertex on the left, so that every
    /// interior face stays monotone.
    fn connect_left_vertex(&mut self, v_event: VertIdx) -> Result<(), TessError> {
        let an_edge = self.mesh.verts[v_event as usize].an_edge;
        let probe = sym(an_edge);
        let node = {
            let mesh = &*self.mesh;
            let regions = &self.regions;
            let event = self.event;
            self.dict
                .search(|reg| edge_leq(mesh, event, probe, regions[reg as usize].e_up))
        };
        let reg_up = self.dict.key(node).ok_or(NO_REGION)?;
        let reg_lo = self.region_below(reg_up)?;
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);

        let (o_up, d_up) = (self.st(self.mesh.org(e_up)), self.st(self.mesh.dst(e_up)));
        if edge_sign(d_up, self.st(v_event), o_up) == 0.0 {
            return self.connect_left_degenerate(reg_up, v_event);
        }

        // Connect to the nearer of the two left endpoints.
        let reg = if vert_leq(self.st(self.mesh.dst(e_lo)), d_up) {
            reg_up
        } else {
            reg_lo
        };

        if self.regions[reg_up as usize].inside || self.regions[reg as usize].fix_upper_edge {
            let e_new = if reg == reg_up {
                let b = self.mesh.lnext(e_up);
                self.mesh.connect(sym(an_edge), b)
            } else {
                let a = self.mesh.dnext(e_lo);
                sym(self.mesh.connect(a, an_edge))
            };
            if self.regions[reg as usize].fix_upper_edge {
                self.fix_upper_edge(reg, e_new);
            } else {
                let reg_new = self.add_region_below(reg_up, e_new);
                self.compute_winding(reg_new)?;
            }
            // The event now has a left-going edge.
            self.sweep_event(v_event)
        } else {
            // Outside: no connection needed, just insert the right edges.
            self.add_right_edges(reg_up, an_edge, an_edge, None, true)
        }
    }
}
