// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Half-edge mesh stored in index arenas.
//
// Layout:
//   - INVALID (u32::MAX) stands for "no element".
//   - Half-edges are allocated in pairs: edges[2k] and edges[2k + 1] are twins,
//     so sym(e) = e ^ 1. The pair list (`links`) threads the even halves.
//   - Index 0 of every arena is a list head: V_HEAD, F_HEAD, E_HEAD.
//   - Deleted elements are unlinked but never reused; the arenas are released
//     together when the mesh is dropped.

mod mono;
#[cfg(test)]
mod tests;

use crate::error::TessError;
use crate::geom::{vert_leq, Real, SweepPoint};

pub const INVALID: u32 = u32::MAX;

/// Index into the vertex arena.
pub type VertIdx = u32;
/// Index into the face arena.
pub type FaceIdx = u32;
/// Index into the half-edge arena.
pub type EdgeIdx = u32;

pub const V_HEAD: VertIdx = 0;
pub const F_HEAD: FaceIdx = 0;
pub const E_HEAD: EdgeIdx = 0;

/// The twin of a half-edge.
#[inline(always)]
pub fn sym(e: EdgeIdx) -> EdgeIdx {
    e ^ 1
}

/// Classification of a face relative to the configured winding rule.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FaceClass {
    #[default]
    Unclassified,
    Exterior,
    Interior,
}

#[derive(Clone, Debug)]
pub struct Vertex {
    pub(crate) next: VertIdx,
    pub(crate) prev: VertIdx,
    pub(crate) an_edge: EdgeIdx,
    pub(crate) coords: [Real; 3],
    pub(crate) s: Real,
    pub(crate) t: Real,
    /// Event queue handle while the vertex is waiting to be swept.
    pub(crate) pq_handle: u32,
    /// Caller tag; `None` only for vertices the sweep adds on its own.
    pub(crate) tag: Option<i32>,
}

impl Default for Vertex {
    fn default() -> Self {
        Vertex {
            next: INVALID,
            prev: INVALID,
            an_edge: INVALID,
            coords: [0.0; 3],
            s: 0.0,
            t: 0.0,
            pq_handle: INVALID,
            tag: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Face {
    pub(crate) next: FaceIdx,
    pub(crate) prev: FaceIdx,
    pub(crate) an_edge: EdgeIdx,
    /// Next face on the packer's trail of temporarily marked faces.
    pub(crate) trail: FaceIdx,
    pub(crate) marked: bool,
    pub(crate) class: FaceClass,
}

impl Default for Face {
    fn default() -> Self {
        Face {
            next: INVALID,
            prev: INVALID,
            an_edge: INVALID,
            trail: INVALID,
            marked: false,
            class: FaceClass::Unclassified,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HalfEdge {
    /// Next edge counter-clockwise around the origin.
    pub(crate) onext: EdgeIdx,
    /// Next edge counter-clockwise around the left face.
    pub(crate) lnext: EdgeIdx,
    pub(crate) org: VertIdx,
    pub(crate) lface: FaceIdx,
    /// Sweep region whose upper edge this is, if any.
    pub(crate) active_region: u32,
    /// Change in winding number when crossing from the right face to the left.
    pub(crate) winding: i32,
}

impl Default for HalfEdge {
    fn default() -> Self {
        HalfEdge {
            onext: INVALID,
            lnext: INVALID,
            org: INVALID,
            lface: INVALID,
            active_region: INVALID,
            winding: 0,
        }
    }
}

/// Position of an edge pair in the global pair list (even halves only).
#[derive(Copy, Clone, Debug)]
struct PairLink {
    next: EdgeIdx,
    prev: EdgeIdx,
}

/// A planar subdivision built from contours and rewritten by the sweep.
///
/// Values of this type reach callers through
/// [`PrimitiveSink::mesh`](crate::sink::PrimitiveSink::mesh), after every
/// exterior face has been removed.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub(crate) verts: Vec<Vertex>,
    pub(crate) faces: Vec<Face>,
    pub(crate) edges: Vec<HalfEdge>,
    links: Vec<PairLink>,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh {
    pub fn new() -> Self {
        let v_head = Vertex {
            next: V_HEAD,
            prev: V_HEAD,
            ..Vertex::default()
        };
        let f_head = Face {
            next: F_HEAD,
            prev: F_HEAD,
            ..Face::default()
        };
        Mesh {
            verts: vec![v_head],
            faces: vec![f_head],
            edges: vec![HalfEdge::default(), HalfEdge::default()],
            links: vec![PairLink {
                next: E_HEAD,
                prev: E_HEAD,
            }],
        }
    }

    // ─────────────────────────────── Navigation ────────────────────────────────

    #[inline]
    pub fn org(&self, e: EdgeIdx) -> VertIdx {
        self.edges[e as usize].org
    }

    #[inline]
    pub fn dst(&self, e: EdgeIdx) -> VertIdx {
        self.edges[sym(e) as usize].org
    }

    #[inline]
    pub fn onext(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[e as usize].onext
    }

    #[inline]
    pub fn lnext(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[e as usize].lnext
    }

    #[inline]
    pub fn lface(&self, e: EdgeIdx) -> FaceIdx {
        self.edges[e as usize].lface
    }

    #[inline]
    pub fn rface(&self, e: EdgeIdx) -> FaceIdx {
        self.edges[sym(e) as usize].lface
    }

    /// Previous edge around the origin: `sym.lnext`.
    #[inline]
    pub fn oprev(&self, e: EdgeIdx) -> EdgeIdx {
        self.lnext(sym(e))
    }

    /// Previous edge around the left face: `onext.sym`.
    #[inline]
    pub fn lprev(&self, e: EdgeIdx) -> EdgeIdx {
        sym(self.onext(e))
    }

    /// `lnext.sym`
    #[inline]
    pub fn dprev(&self, e: EdgeIdx) -> EdgeIdx {
        sym(self.lnext(e))
    }

    /// `sym.onext.sym`
    #[inline]
    pub fn dnext(&self, e: EdgeIdx) -> EdgeIdx {
        sym(self.onext(sym(e)))
    }

    /// `sym.onext`
    #[inline]
    pub fn rprev(&self, e: EdgeIdx) -> EdgeIdx {
        self.onext(sym(e))
    }

    #[inline]
    pub(crate) fn st(&self, v: VertIdx) -> SweepPoint {
        let vert = &self.verts[v as usize];
        SweepPoint::new(vert.s, vert.t)
    }

    #[inline]
    pub(crate) fn edge_goes_left(&self, e: EdgeIdx) -> bool {
        vert_leq(self.st(self.dst(e)), self.st(self.org(e)))
    }

    #[inline]
    pub(crate) fn edge_goes_right(&self, e: EdgeIdx) -> bool {
        vert_leq(self.st(self.org(e)), self.st(self.dst(e)))
    }

    #[inline]
    pub(crate) fn face_inside(&self, f: FaceIdx) -> bool {
        f != INVALID && self.faces[f as usize].class == FaceClass::Interior
    }

    /// Next pair in the global edge list, as its even half.
    #[inline]
    pub(crate) fn next_pair(&self, e: EdgeIdx) -> EdgeIdx {
        self.links[(e >> 1) as usize].next
    }

    // ─────────────────────────────── Public reads ──────────────────────────────

    /// Faces in list order.
    pub fn faces(&self) -> impl Iterator<Item = FaceIdx> + '_ {
        let first = self.faces[F_HEAD as usize].next;
        std::iter::successors((first != F_HEAD).then_some(first), move |&f| {
            let next = self.faces[f as usize].next;
            (next != F_HEAD).then_some(next)
        })
    }

    /// Vertices in list order.
    pub fn vertices(&self) -> impl Iterator<Item = VertIdx> + '_ {
        let first = self.verts[V_HEAD as usize].next;
        std::iter::successors((first != V_HEAD).then_some(first), move |&v| {
            let next = self.verts[v as usize].next;
            (next != V_HEAD).then_some(next)
        })
    }

    /// One half-edge of every edge pair.
    pub fn edges(&self) -> impl Iterator<Item = EdgeIdx> + '_ {
        let first = self.next_pair(E_HEAD);
        std::iter::successors((first != E_HEAD).then_some(first), move |&e| {
            let next = self.next_pair(e);
            (next != E_HEAD).then_some(next)
        })
    }

    /// The half-edges bounding `f`, walking `lnext`.
    pub fn face_edges(&self, f: FaceIdx) -> impl Iterator<Item = EdgeIdx> + '_ {
        let start = self.faces[f as usize].an_edge;
        std::iter::successors(Some(start), move |&e| {
            let next = self.lnext(e);
            (next != start).then_some(next)
        })
    }

    /// The vertices of `f` in boundary order.
    pub fn face_vertices(&self, f: FaceIdx) -> impl Iterator<Item = VertIdx> + '_ {
        self.face_edges(f).map(move |e| self.org(e))
    }

    pub fn face_count(&self) -> usize {
        self.faces().count()
    }

    pub fn face_class(&self, f: FaceIdx) -> FaceClass {
        self.faces[f as usize].class
    }

    pub fn vertex_tag(&self, v: VertIdx) -> Option<i32> {
        self.verts[v as usize].tag
    }

    pub fn vertex_coords(&self, v: VertIdx) -> [Real; 3] {
        self.verts[v as usize].coords
    }

    /// True when exactly one side of `e` is interior.
    pub fn is_boundary_edge(&self, e: EdgeIdx) -> bool {
        self.face_inside(self.lface(e)) != self.face_inside(self.rface(e))
    }

    // ─────────────────────────── Arena primitives ──────────────────────────────

    /// Allocates a twin pair forming an isolated loop, linked before `e_next`.
    fn alloc_pair(&mut self, e_next: EdgeIdx) -> EdgeIdx {
        let e_next = e_next & !1;
        let e = self.edges.len() as EdgeIdx;
        self.edges.push(HalfEdge {
            onext: e,
            lnext: e + 1,
            ..HalfEdge::default()
        });
        self.edges.push(HalfEdge {
            onext: e + 1,
            lnext: e,
            ..HalfEdge::default()
        });

        let prev = self.links[(e_next >> 1) as usize].prev;
        self.links.push(PairLink { next: e_next, prev });
        self.links[(prev >> 1) as usize].next = e;
        self.links[(e_next >> 1) as usize].prev = e;
        e
    }

    fn free_pair(&mut self, e: EdgeIdx) {
        let PairLink { next, prev } = self.links[(e >> 1) as usize];
        self.links[(next >> 1) as usize].prev = prev;
        self.links[(prev >> 1) as usize].next = next;
    }

    /// New vertex before `v_next`, becoming the origin of every edge in the
    /// ring of `e_orig`.
    fn make_vertex(&mut self, e_orig: EdgeIdx, v_next: VertIdx) -> VertIdx {
        let v = self.verts.len() as VertIdx;
        let v_prev = self.verts[v_next as usize].prev;
        self.verts.push(Vertex {
            next: v_next,
            prev: v_prev,
            an_edge: e_orig,
            ..Vertex::default()
        });
        self.verts[v_prev as usize].next = v;
        self.verts[v_next as usize].prev = v;

        let mut e = e_orig;
        loop {
            self.edges[e as usize].org = v;
            e = self.onext(e);
            if e == e_orig {
                break;
            }
        }
        v
    }

    /// New face before `f_next`, becoming the left face of the loop of
    /// `e_orig`. The class is copied from `f_next`.
    fn make_face(&mut self, e_orig: EdgeIdx, f_next: FaceIdx) -> FaceIdx {
        let f = self.faces.len() as FaceIdx;
        let f_prev = self.faces[f_next as usize].prev;
        let class = self.faces[f_next as usize].class;
        self.faces.push(Face {
            next: f_next,
            prev: f_prev,
            an_edge: e_orig,
            class,
            ..Face::default()
        });
        self.faces[f_prev as usize].next = f;
        self.faces[f_next as usize].prev = f;

        let mut e = e_orig;
        loop {
            self.edges[e as usize].lface = f;
            e = self.lnext(e);
            if e == e_orig {
                break;
            }
        }
        f
    }

    fn kill_vertex(&mut self, v_del: VertIdx, new_org: VertIdx) {
        let e_start = self.verts[v_del as usize].an_edge;
        let mut e = e_start;
        loop {
            self.edges[e as usize].org = new_org;
            e = self.onext(e);
            if e == e_start {
                break;
            }
        }
        let Vertex { next, prev, .. } = self.verts[v_del as usize];
        self.verts[next as usize].prev = prev;
        self.verts[prev as usize].next = next;
    }

    fn kill_face(&mut self, f_del: FaceIdx, new_lface: FaceIdx) {
        let e_start = self.faces[f_del as usize].an_edge;
        let mut e = e_start;
        loop {
            self.edges[e as usize].lface = new_lface;
            e = self.lnext(e);
            if e == e_start {
                break;
            }
        }
        let Face { next, prev, .. } = self.faces[f_del as usize];
        self.faces[next as usize].prev = prev;
        self.faces[prev as usize].next = next;
    }

    /// Exchanges the origin rings of `a` and `b` (and with them the left
    /// face loops of their predecessors).
    fn swap_rings(&mut self, a: EdgeIdx, b: EdgeIdx) {
        let a_onext = self.onext(a);
        let b_onext = self.onext(b);
        self.edges[sym(a_onext) as usize].lnext = b;
        self.edges[sym(b_onext) as usize].lnext = a;
        self.edges[a as usize].onext = b_onext;
        self.edges[b as usize].onext = a_onext;
    }

    // ─────────────────────────── Topology operators ────────────────────────────

    /// A new edge with two new vertices and one new face: an isolated loop.
    pub fn make_edge(&mut self) -> EdgeIdx {
        let e = self.alloc_pair(E_HEAD);
        self.make_vertex(e, V_HEAD);
        self.make_vertex(sym(e), V_HEAD);
        self.make_face(e, F_HEAD);
        e
    }

    /// The basic connectivity operator.
    ///
    /// If `e_org` and `e_dst` have different origins they are merged into
    /// one (keeping `e_org`'s), otherwise that vertex is split in two. In
    /// the same way distinct left faces are joined and a shared one is split.
    pub fn splice(&mut self, e_org: EdgeIdx, e_dst: EdgeIdx) {
        if e_org == e_dst {
            return;
        }

        let joining_vertices = self.org(e_dst) != self.org(e_org);
        if joining_vertices {
            self.kill_vertex(self.org(e_dst), self.org(e_org));
        }
        let joining_loops = self.lface(e_dst) != self.lface(e_org);
        if joining_loops {
            self.kill_face(self.lface(e_dst), self.lface(e_org));
        }

        self.swap_rings(e_dst, e_org);

        if !joining_vertices {
            let org = self.org(e_org);
            self.make_vertex(e_dst, org);
            self.verts[org as usize].an_edge = e_org;
        }
        if !joining_loops {
            let lface = self.lface(e_org);
            self.make_face(e_dst, lface);
            self.faces[lface as usize].an_edge = e_org;
        }
    }

    /// Removes the edge pair of `e_del`, joining or splitting faces and
    /// dropping vertices left without edges.
    pub fn delete_edge(&mut self, e_del: EdgeIdx) {
        let e_del_sym = sym(e_del);

        let joining_loops = self.lface(e_del) != self.rface(e_del);
        if joining_loops {
            self.kill_face(self.lface(e_del), self.rface(e_del));
        }

        if self.onext(e_del) == e_del {
            self.kill_vertex(self.org(e_del), INVALID);
        } else {
            let rface = self.rface(e_del);
            self.faces[rface as usize].an_edge = self.oprev(e_del);
            let org = self.org(e_del);
            self.verts[org as usize].an_edge = self.onext(e_del);

            self.swap_rings(e_del, self.oprev(e_del));
            if !joining_loops {
                let lface = self.lface(e_del);
                self.make_face(e_del, lface);
            }
        }

        if self.onext(e_del_sym) == e_del_sym {
            self.kill_vertex(self.org(e_del_sym), INVALID);
            self.kill_face(self.lface(e_del_sym), INVALID);
        } else {
            let lface = self.lface(e_del);
            self.faces[lface as usize].an_edge = self.oprev(e_del_sym);
            let org = self.org(e_del_sym);
            self.verts[org as usize].an_edge = self.onext(e_del_sym);
            self.swap_rings(e_del_sym, self.oprev(e_del_sym));
        }

        self.free_pair(e_del & !1);
    }

    /// A new edge from `dst(e_org)` to a new vertex, so that
    /// `lnext(e_org)` is the new edge. Returns the new edge.
    pub fn add_edge_vertex(&mut self, e_org: EdgeIdx) -> EdgeIdx {
        let e_new = self.alloc_pair(e_org);
        let e_new_sym = sym(e_new);

        self.swap_rings(e_new, self.lnext(e_org));

        self.edges[e_new as usize].org = self.dst(e_org);
        let v_next = self.org(e_new);
        self.make_vertex(e_new_sym, v_next);

        let lface = self.lface(e_org);
        self.edges[e_new as usize].lface = lface;
        self.edges[e_new_sym as usize].lface = lface;
        e_new
    }

    /// Splits `e_org` in two at a new vertex. `e_org` keeps its origin and
    /// ends at the new vertex; the returned edge runs from the new vertex to
    /// the old destination and inherits the windings.
    pub fn split_edge(&mut self, e_org: EdgeIdx) -> EdgeIdx {
        let temp = self.add_edge_vertex(e_org);
        let e_new = sym(temp);

        let e_org_sym = sym(e_org);
        self.swap_rings(e_org_sym, self.oprev(e_org_sym));
        self.swap_rings(e_org_sym, e_new);

        self.edges[e_org_sym as usize].org = self.org(e_new);
        let new_dst = self.dst(e_new);
        self.verts[new_dst as usize].an_edge = sym(e_new);
        self.edges[sym(e_new) as usize].lface = self.rface(e_org);
        self.edges[e_new as usize].winding = self.edges[e_org as usize].winding;
        self.edges[sym(e_new) as usize].winding = self.edges[e_org_sym as usize].winding;
        e_new
    }

    /// A new edge from `dst(e_org)` to `org(e_dst)`. If the two edges share
    /// a left face it is split and the new face lies left of the new edge.
    pub fn connect(&mut self, e_org: EdgeIdx, e_dst: EdgeIdx) -> EdgeIdx {
        let e_new = self.alloc_pair(e_org);
        let e_new_sym = sym(e_new);

        let joining_loops = self.lface(e_dst) != self.lface(e_org);
        if joining_loops {
            self.kill_face(self.lface(e_dst), self.lface(e_org));
        }

        self.swap_rings(e_new, self.lnext(e_org));
        self.swap_rings(e_new_sym, e_dst);

        self.edges[e_new as usize].org = self.dst(e_org);
        self.edges[e_new_sym as usize].org = self.org(e_dst);
        let lface = self.lface(e_org);
        self.edges[e_new as usize].lface = lface;
        self.edges[e_new_sym as usize].lface = lface;
        self.faces[lface as usize].an_edge = e_new_sym;

        if !joining_loops {
            self.make_face(e_new, lface);
        }
        e_new
    }

    /// Removes face `f_zap`: its edges lose their left face, and edges with
    /// no face on either side are deleted along with isolated vertices.
    pub fn zap_face(&mut self, f_zap: FaceIdx) {
        let e_start = self.faces[f_zap as usize].an_edge;
        let mut e_next = self.lnext(e_start);
        loop {
            let e = e_next;
            e_next = self.lnext(e);

            self.edges[e as usize].lface = INVALID;
            if self.rface(e) == INVALID {
                if self.onext(e) == e {
                    self.kill_vertex(self.org(e), INVALID);
                } else {
                    let org = self.org(e);
                    self.verts[org as usize].an_edge = self.onext(e);
                    self.swap_rings(e, self.oprev(e));
                }
                let e_sym = sym(e);
                if self.onext(e_sym) == e_sym {
                    self.kill_vertex(self.org(e_sym), INVALID);
                } else {
                    let org = self.org(e_sym);
                    self.verts[org as usize].an_edge = self.onext(e_sym);
                    self.swap_rings(e_sym, self.oprev(e_sym));
                }
                self.free_pair(e & !1);
            }
            if e == e_start {
                break;
            }
        }

        let Face { next, prev, .. } = self.faces[f_zap as usize];
        self.faces[next as usize].prev = prev;
        self.faces[prev as usize].next = next;
    }

    // ──────────────────────────── Whole-mesh passes ────────────────────────────

    /// Gives every boundary edge winding `value` (positive on its interior
    /// side) and clears or deletes the others.
    pub fn set_winding_number(&mut self, value: i32, keep_only_boundary: bool) {
        let mut e = self.next_pair(E_HEAD);
        while e != E_HEAD {
            let e_next = self.next_pair(e);
            let left_inside = self.face_inside(self.lface(e));
            if left_inside != self.face_inside(self.rface(e)) {
                let w = if left_inside { value } else { -value };
                self.edges[e as usize].winding = w;
                self.edges[sym(e) as usize].winding = -w;
            } else if keep_only_boundary {
                self.delete_edge(e);
            } else {
                self.edges[e as usize].winding = 0;
                self.edges[sym(e) as usize].winding = 0;
            }
            e = e_next;
        }
    }

    /// Zaps every face that is not interior.
    pub fn discard_exterior(&mut self) {
        let mut f = self.faces[F_HEAD as usize].next;
        while f != F_HEAD {
            let next = self.faces[f as usize].next;
            if self.faces[f as usize].class != FaceClass::Interior {
                self.zap_face(f);
            }
            f = next;
        }
    }

    /// Verifies the twin, ring and loop invariants of every live element.
    pub fn check(&self) -> Result<(), TessError> {
        let edge_ok = |e: EdgeIdx| {
            sym(sym(e)) == e
                && sym(self.onext(self.lnext(e))) == e
                && self.lnext(sym(self.onext(e))) == e
        };

        let mut f_prev = F_HEAD;
        let mut f = self.faces[F_HEAD as usize].next;
        while f != F_HEAD {
            if self.faces[f as usize].prev != f_prev {
                return Err(TessError::Topology("face list is not doubly linked"));
            }
            for e in self.face_edges(f) {
                if !edge_ok(e) {
                    return Err(TessError::Topology("face loop edge is inconsistent"));
                }
                if self.lface(e) != f {
                    return Err(TessError::Topology("edge does not point at its left face"));
                }
            }
            f_prev = f;
            f = self.faces[f as usize].next;
        }

        let mut v_prev = V_HEAD;
        let mut v = self.verts[V_HEAD as usize].next;
        while v != V_HEAD {
            if self.verts[v as usize].prev != v_prev {
                return Err(TessError::Topology("vertex list is not doubly linked"));
            }
            let start = self.verts[v as usize].an_edge;
            let mut e = start;
            loop {
                if !edge_ok(e) {
                    return Err(TessError::Topology("vertex ring edge is inconsistent"));
                }
                if self.org(e) != v {
                    return Err(TessError::Topology("edge does not point at its origin"));
                }
                e = self.onext(e);
                if e == start {
                    break;
                }
            }
            v_prev = v;
            v = self.verts[v as usize].next;
        }

        let mut e_prev = E_HEAD;
        let mut e = self.next_pair(E_HEAD);
        while e != E_HEAD {
            if self.links[(e >> 1) as usize].prev != e_prev {
                return Err(TessError::Topology("edge list is not doubly linked"));
            }
            if self.org(e) == INVALID || self.dst(e) == INVALID || !edge_ok(e) {
                return Err(TessError::Topology("edge pair is inconsistent"));
            }
            e_prev = e;
            e = self.next_pair(e);
        }
        Ok(())
    }
}
