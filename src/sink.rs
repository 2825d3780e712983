// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Output side of the tessellator: the sink trait and a recording sink.

use crate::mesh::Mesh;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// How the vertices between a `begin` and its `end` are grouped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum PrimitiveKind {
    /// Independent triangles, three vertices each.
    Triangles,
    /// The first vertex is shared by every triangle.
    TriangleFan,
    /// Every vertex after the second completes a triangle with the two before it.
    TriangleStrip,
    /// A closed boundary loop.
    LineLoop,
}

/// Receives the output of [`Tessellator::end_polygon`](crate::Tessellator::end_polygon).
///
/// Every method has a default, so an implementation only overrides what it
/// uses. The `wants_*` probes and the `combine` return value tell the
/// tessellator which optional behaviours the sink takes part in.
pub trait PrimitiveSink {
    fn begin(&mut self, _kind: PrimitiveKind) {}

    /// One vertex of the current primitive, by caller tag.
    fn vertex(&mut self, _tag: i32) {}

    fn end(&mut self) {}

    /// When true, fan and strip packing is disabled and every triangle edge
    /// is reported through [`edge_flag`](Self::edge_flag).
    fn wants_edge_flags(&self) -> bool {
        false
    }

    /// Called before a vertex whenever the boundary status of the edge that
    /// starts at it differs from the previous edge.
    fn edge_flag(&mut self, _is_boundary: bool) {}

    /// Produces a tag for a vertex the tessellator had to create.
    ///
    /// `tags` lists the vertices the new one is built from, with `weights`
    /// summing to one; unused slots have weight zero. Returning `None` means
    /// the sink cannot combine vertices: where two edges cross this aborts
    /// the polygon with [`TessError::MissingCombine`](crate::TessError::MissingCombine),
    /// where two vertices merely coincide the first tag is kept.
    fn combine(
        &mut self,
        _coords: [f64; 3],
        _tags: [Option<i32>; 4],
        _weights: [f64; 4],
    ) -> Option<i32> {
        None
    }

    /// When true, the interior mesh is handed to [`mesh`](Self::mesh)
    /// instead of being triangulated and emitted.
    fn wants_mesh(&self) -> bool {
        false
    }

    fn mesh(&mut self, _mesh: Mesh) {}
}

impl<S: PrimitiveSink + ?Sized> PrimitiveSink for &mut S {
    fn begin(&mut self, kind: PrimitiveKind) {
        (**self).begin(kind)
    }
    fn vertex(&mut self, tag: i32) {
        (**self).vertex(tag)
    }
    fn end(&mut self) {
        (**self).end()
    }
    fn wants_edge_flags(&self) -> bool {
        (**self).wants_edge_flags()
    }
    fn edge_flag(&mut self, is_boundary: bool) {
        (**self).edge_flag(is_boundary)
    }
    fn combine(
        &mut self,
        coords: [f64; 3],
        tags: [Option<i32>; 4],
        weights: [f64; 4],
    ) -> Option<i32> {
        (**self).combine(coords, tags, weights)
    }
    fn wants_mesh(&self) -> bool {
        (**self).wants_mesh()
    }
    fn mesh(&mut self, mesh: Mesh) {
        (**self).mesh(mesh)
    }
}

// ────────────────────────────── Recording sink ────────────────────────────────

/// One recorded `begin .. end` group.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Primitive {
    pub kind: PrimitiveKind,
    pub tags: Vec<i32>,
    /// Boundary flag in effect at each vertex; empty unless edge flags were requested.
    pub edge_flags: Vec<bool>,
}

impl Primitive {
    /// The triangles of this primitive, each in the winding of the group.
    pub fn triangles(&self) -> Vec<[i32; 3]> {
        let t = &self.tags;
        match self.kind {
            PrimitiveKind::Triangles => t.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect(),
            PrimitiveKind::TriangleFan => t
                .windows(2)
                .skip(1)
                .map(|w| [t[0], w[0], w[1]])
                .collect(),
            PrimitiveKind::TriangleStrip => t
                .windows(3)
                .enumerate()
                .map(|(i, w)| {
                    if i % 2 == 0 {
                        [w[0], w[1], w[2]]
                    } else {
                        [w[1], w[0], w[2]]
                    }
                })
                .collect(),
            PrimitiveKind::LineLoop => Vec::new(),
        }
    }
}

/// A vertex created during the sweep, as reported to [`PrimitiveBuffer`].
#[derive(Clone, Debug, PartialEq)]
pub struct CombineCall {
    pub coords: [f64; 3],
    pub tags: [Option<i32>; 4],
    pub weights: [f64; 4],
    pub new_tag: i32,
}

/// A sink that records everything it receives.
///
/// Out of the box it refuses to combine vertices and ignores edge flags and
/// meshes; the builder methods opt into each of those.
#[derive(Clone, Debug, Default)]
pub struct PrimitiveBuffer {
    pub primitives: Vec<Primitive>,
    pub combines: Vec<CombineCall>,
    pub mesh: Option<Mesh>,
    next_tag: Option<i32>,
    record_edge_flags: bool,
    capture_mesh: bool,
    boundary: bool,
}

impl PrimitiveBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers combine requests with `first_tag`, `first_tag + 1`, ...
    pub fn with_combine_base(mut self, first_tag: i32) -> Self {
        self.next_tag = Some(first_tag);
        self
    }

    pub fn recording_edge_flags(mut self) -> Self {
        self.record_edge_flags = true;
        self
    }

    pub fn capturing_mesh(mut self) -> Self {
        self.capture_mesh = true;
        self
    }

    /// Drops recorded output, keeping the configuration.
    pub fn clear(&mut self) {
        self.primitives.clear();
        self.combines.clear();
        self.mesh = None;
    }

    pub fn triangles(&self) -> Vec<[i32; 3]> {
        self.primitives.iter().flat_map(|p| p.triangles()).collect()
    }

    pub fn triangle_count(&self) -> usize {
        self.primitives.iter().map(|p| p.triangles().len()).sum()
    }

    /// Boundary loops, for output produced in boundary-only mode.
    pub fn loops(&self) -> impl Iterator<Item = &[i32]> + '_ {
        self.primitives
            .iter()
            .filter(|p| p.kind == PrimitiveKind::LineLoop)
            .map(|p| p.tags.as_slice())
    }
}

impl PrimitiveSink for PrimitiveBuffer {
    fn begin(&mut self, kind: PrimitiveKind) {
        self.primitives.push(Primitive {
            kind,
            tags: Vec::new(),
            edge_flags: Vec::new(),
        });
    }

    fn vertex(&mut self, tag: i32) {
        let boundary = self.boundary;
        let record = self.record_edge_flags;
        if let Some(p) = self.primitives.last_mut() {
            p.tags.push(tag);
            if record {
                p.edge_flags.push(boundary);
            }
        }
    }

    fn wants_edge_flags(&self) -> bool {
        self.record_edge_flags
    }

    fn edge_flag(&mut self, is_boundary: bool) {
        self.boundary = is_boundary;
    }

    fn combine(
        &mut self,
        coords: [f64; 3],
        tags: [Option<i32>; 4],
        weights: [f64; 4],
    ) -> Option<i32> {
        let new_tag = self.next_tag?;
        self.next_tag = Some(new_tag + 1);
        self.combines.push(CombineCall {
            coords,
            tags,
            weights,
            new_tag,
        });
        Some(new_tag)
    }

    fn wants_mesh(&self) -> bool {
        self.capture_mesh
    }

    fn mesh(&mut self, mesh: Mesh) {
        self.mesh = Some(mesh);
    }
}
