// Copyright 2025 Lars Brubaker
// Emits a triangulated mesh as fans, strips and loose triangles.
//
// Faces are grouped greedily: starting from any unrendered interior
// triangle, the largest fan or strip through one of its three edges wins.
// Triangles that join no larger group are collected and emitted together
// as one triangle list at the end.

use crate::error::TessError;
use crate::mesh::{sym, EdgeIdx, FaceIdx, Mesh, VertIdx, INVALID};
use crate::sink::{PrimitiveKind, PrimitiveSink};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum GroupKind {
    Fan,
    Strip,
    Lonely,
}

/// A candidate group of triangles starting at `start`.
#[derive(Copy, Clone, Debug)]
struct FaceGroup {
    size: usize,
    start: EdgeIdx,
    kind: GroupKind,
}

struct Renderer<'a, S: ?Sized> {
    mesh: &'a mut Mesh,
    sink: &'a mut S,
    /// Caller tag per vertex index, filled for every interior vertex.
    tags: Vec<i32>,
    edge_flags: bool,
    /// Trail of lonely triangles, most recent first.
    lonely: FaceIdx,
    groups: usize,
}

/// Emits the interior faces of a triangulated mesh. Returns the number of
/// `begin .. end` groups sent to the sink. Nothing is emitted when an
/// interior vertex has no tag.
pub(crate) fn render_mesh<S: PrimitiveSink + ?Sized>(
    mesh: &mut Mesh,
    sink: &mut S,
) -> Result<usize, TessError> {
    let tags = interior_tags(mesh)?;
    let edge_flags = sink.wants_edge_flags();
    let faces: Vec<FaceIdx> = mesh.faces().collect();
    for &f in &faces {
        mesh.faces[f as usize].marked = false;
    }

    let mut r = Renderer {
        mesh,
        sink,
        tags,
        edge_flags,
        lonely: INVALID,
        groups: 0,
    };
    for &f in &faces {
        if r.mesh.face_inside(f) && !r.mesh.faces[f as usize].marked {
            r.render_maximum_group(f);
            debug_assert!(r.mesh.faces[f as usize].marked);
        }
    }
    if r.lonely != INVALID {
        r.render_lonely_triangles();
    }
    Ok(r.groups)
}

/// One line loop per interior face.
pub(crate) fn render_boundary<S: PrimitiveSink + ?Sized>(
    mesh: &Mesh,
    sink: &mut S,
) -> Result<usize, TessError> {
    let tags = interior_tags(mesh)?;
    let mut groups = 0;
    for f in mesh.faces() {
        if !mesh.face_inside(f) {
            continue;
        }
        sink.begin(PrimitiveKind::LineLoop);
        for v in mesh.face_vertices(f) {
            sink.vertex(tags[v as usize]);
        }
        sink.end();
        groups += 1;
    }
    Ok(groups)
}

/// Tags of every vertex on an interior face, indexed by vertex. Only the
/// sweep sentinels are untagged and they never bound an interior face.
fn interior_tags(mesh: &Mesh) -> Result<Vec<i32>, TessError> {
    let mut tags = vec![0; mesh.verts.len()];
    for f in mesh.faces().filter(|&f| mesh.face_inside(f)) {
        for v in mesh.face_vertices(f) {
            tags[v as usize] = mesh
                .vertex_tag(v)
                .ok_or(TessError::Topology("interior vertex without a tag"))?;
        }
    }
    Ok(tags)
}

impl<S: PrimitiveSink + ?Sized> Renderer<'_, S> {
    // ─────── Trail marks ──────────────────────────────────────────────────────

    #[inline]
    fn marked(&self, f: FaceIdx) -> bool {
        !self.mesh.face_inside(f) || self.mesh.faces[f as usize].marked
    }

    fn add_to_trail(&mut self, f: FaceIdx, trail: &mut FaceIdx) {
        let face = &mut self.mesh.faces[f as usize];
        face.trail = *trail;
        face.marked = true;
        *trail = f;
    }

    fn free_trail(&mut self, mut trail: FaceIdx) {
        while trail != INVALID {
            let face = &mut self.mesh.faces[trail as usize];
            face.marked = false;
            trail = face.trail;
        }
    }

    // ─────── Group search ─────────────────────────────────────────────────────

    fn render_maximum_group(&mut self, f: FaceIdx) {
        let e = self.mesh.faces[f as usize].an_edge;
        let mut best = FaceGroup {
            size: 1,
            start: e,
            kind: GroupKind::Lonely,
        };

        if !self.edge_flags {
            let candidates = [e, self.mesh.lnext(e), self.mesh.lprev(e)];
            for start in candidates {
                let fan = self.maximum_fan(start);
                if fan.size > best.size {
                    best = fan;
                }
            }
            for start in candidates {
                let strip = self.maximum_strip(start);
                if strip.size > best.size {
                    best = strip;
                }
            }
        }

        match best.kind {
            GroupKind::Fan => self.render_fan(best),
            GroupKind::Strip => self.render_strip(best),
            GroupKind::Lonely => {
                let lface = self.mesh.lface(best.start);
                let mut trail = self.lonely;
                self.add_to_trail(lface, &mut trail);
                self.lonely = trail;
            }
        }
    }

    /// Counts the unmarked faces around the origin of `e_orig`, first
    /// turning counter-clockwise then clockwise.
    fn maximum_fan(&mut self, e_orig: EdgeIdx) -> FaceGroup {
        let mut trail = INVALID;
        let mut size = 0;

        let mut e = e_orig;
        while !self.marked(self.mesh.lface(e)) {
            let f = self.mesh.lface(e);
            self.add_to_trail(f, &mut trail);
            size += 1;
            e = self.mesh.onext(e);
        }
        e = e_orig;
        while !self.marked(self.mesh.rface(e)) {
            let f = self.mesh.rface(e);
            self.add_to_trail(f, &mut trail);
            size += 1;
            e = self.mesh.oprev(e);
        }

        self.free_trail(trail);
        FaceGroup {
            size,
            start: e,
            kind: GroupKind::Fan,
        }
    }

    /// Counts the faces of the longest strip through `e_orig`, extending the
    /// tail through left faces and the head through right faces.
    fn maximum_strip(&mut self, e_orig: EdgeIdx) -> FaceGroup {
        let mut trail = INVALID;

        let mut tail_size = 0;
        let mut e = e_orig;
        while !self.marked(self.mesh.lface(e)) {
            let f = self.mesh.lface(e);
            self.add_to_trail(f, &mut trail);
            tail_size += 1;
            e = self.mesh.dprev(e);
            let f = self.mesh.lface(e);
            if self.marked(f) {
                break;
            }
            self.add_to_trail(f, &mut trail);
            tail_size += 1;
            e = self.mesh.onext(e);
        }
        let e_tail = e;

        let mut head_size = 0;
        e = e_orig;
        while !self.marked(self.mesh.rface(e)) {
            let f = self.mesh.rface(e);
            self.add_to_trail(f, &mut trail);
            head_size += 1;
            e = self.mesh.oprev(e);
            let f = self.mesh.rface(e);
            if self.marked(f) {
                break;
            }
            self.add_to_trail(f, &mut trail);
            head_size += 1;
            e = self.mesh.dnext(e);
        }
        let e_head = e;

        // A strip must start on an even boundary; with both ends odd the
        // last triangle is left for a later group.
        let mut size = tail_size + head_size;
        let start = if tail_size % 2 == 0 {
            sym(e_tail)
        } else if head_size % 2 == 0 {
            e_head
        } else {
            size -= 1;
            self.mesh.onext(e_head)
        };

        self.free_trail(trail);
        FaceGroup {
            size,
            start,
            kind: GroupKind::Strip,
        }
    }

    // ─────── Emission ─────────────────────────────────────────────────────────

    fn emit(&mut self, v: VertIdx) {
        self.sink.vertex(self.tags[v as usize]);
    }

    fn render_fan(&mut self, group: FaceGroup) {
        let mut e = group.start;
        let mut size = group.size;
        self.sink.begin(PrimitiveKind::TriangleFan);
        self.emit(self.mesh.org(e));
        self.emit(self.mesh.dst(e));
        while !self.marked(self.mesh.lface(e)) {
            let f = self.mesh.lface(e);
            self.mesh.faces[f as usize].marked = true;
            size -= 1;
            e = self.mesh.onext(e);
            self.emit(self.mesh.dst(e));
        }
        debug_assert_eq!(size, 0);
        self.sink.end();
        self.groups += 1;
    }

    fn render_strip(&mut self, group: FaceGroup) {
        let mut e = group.start;
        self.sink.begin(PrimitiveKind::TriangleStrip);
        self.emit(self.mesh.org(e));
        self.emit(self.mesh.dst(e));
        while !self.marked(self.mesh.lface(e)) {
            let f = self.mesh.lface(e);
            self.mesh.faces[f as usize].marked = true;
            e = self.mesh.dprev(e);
            self.emit(self.mesh.org(e));

            let f = self.mesh.lface(e);
            if self.marked(f) {
                break;
            }
            self.mesh.faces[f as usize].marked = true;
            e = self.mesh.onext(e);
            self.emit(self.mesh.dst(e));
        }
        self.sink.end();
        self.groups += 1;
    }

    /// All lonely triangles as one list. With edge flags on, a flag is sent
    /// whenever the boundary status changes from one edge to the next.
    fn render_lonely_triangles(&mut self) {
        self.sink.begin(PrimitiveKind::Triangles);
        let mut flag: Option<bool> = None;
        let mut f = self.lonely;
        while f != INVALID {
            let an = self.mesh.faces[f as usize].an_edge;
            let mut e = an;
            loop {
                if self.edge_flags {
                    let boundary = !self.mesh.face_inside(self.mesh.rface(e));
                    if flag != Some(boundary) {
                        flag = Some(boundary);
                        self.sink.edge_flag(boundary);
                    }
                }
                self.emit(self.mesh.org(e));
                e = self.mesh.lnext(e);
                if e == an {
                    break;
                }
            }
            f = self.mesh.faces[f as usize].trail;
        }
        self.lonely = INVALID;
        self.sink.end();
        self.groups += 1;
    }
}
