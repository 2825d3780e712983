// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// The tessellator facade: the polygon/contour state machine, the vertex
// cache for small single-contour polygons, and the end-of-polygon pipeline
// (project, sweep, triangulate, emit).

mod cache;
mod geometry;
mod render;

use std::cmp::Ordering;

use log::debug;
#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

use crate::error::{TessError, UsageError};
use crate::geom::Real;
use crate::mesh::{sym, EdgeIdx, Mesh};
use crate::sink::PrimitiveSink;
use crate::sweep::compute_interior;

// ─────────────────────────────── Public types ──────────────────────────────────

/// Decides from a region's winding number whether it is inside the polygon.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum WindingRule {
    Odd,
    #[default]
    NonZero,
    Positive,
    Negative,
    AbsGeqTwo,
}

impl WindingRule {
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            WindingRule::Odd => winding & 1 != 0,
            WindingRule::NonZero => winding != 0,
            WindingRule::Positive => winding > 0,
            WindingRule::Negative => winding < 0,
            WindingRule::AbsGeqTwo => winding.unsigned_abs() >= 2,
        }
    }
}

/// Per-polygon settings. They can only change between polygons.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct TessellatorOptions {
    pub winding_rule: WindingRule,
    /// Emit the boundary loops of the interior instead of triangles.
    pub boundary_only: bool,
}

impl TessellatorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_winding_rule(mut self, rule: WindingRule) -> Self {
        self.winding_rule = rule;
        self
    }

    pub fn with_boundary_only(mut self, boundary_only: bool) -> Self {
        self.boundary_only = boundary_only;
        self
    }
}

/// Largest accepted coordinate magnitude.
pub const MAX_COORD: Real = 1.0e150;

/// Vertices of the first contour held back before a mesh is built.
pub const MAX_CACHE_SIZE: usize = 100;

/// Ordered so that a later state is "deeper" in the polygon.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum State {
    Dormant,
    InPolygon,
    InContour,
}

#[derive(Copy, Clone, Debug)]
struct CachedVertex {
    coords: [Real; 3],
    tag: i32,
}

// ─────────────────────────── Tessellator ──────────────────────────────────────

/// Streams contours in and primitives out.
///
/// ```
/// use polytess::{PrimitiveBuffer, Tessellator};
///
/// let mut tess = Tessellator::new();
/// let mut out = PrimitiveBuffer::new();
/// tess.begin_polygon().unwrap();
/// tess.begin_contour().unwrap();
/// for (tag, (x, y)) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)].into_iter().enumerate() {
///     tess.add_vertex(x, y, 0.0, tag as i32).unwrap();
/// }
/// tess.end_contour().unwrap();
/// tess.end_polygon(&mut out).unwrap();
/// assert_eq!(out.triangle_count(), 2);
/// ```
#[derive(Debug)]
pub struct Tessellator {
    options: TessellatorOptions,
    state: State,
    mesh: Option<Mesh>,
    /// Trailing edge of the contour being built in the mesh.
    last_edge: Option<EdgeIdx>,
    cache: Vec<CachedVertex>,
    /// A second contour has begun: the cache goes into the mesh on the next vertex.
    empty_cache: bool,
    contours: usize,
    vertices: usize,
}

impl Default for Tessellator {
    fn default() -> Self {
        Self::new()
    }
}

impl Tessellator {
    pub fn new() -> Self {
        Self::with_options(TessellatorOptions::default())
    }

    pub fn with_options(options: TessellatorOptions) -> Self {
        Tessellator {
            options,
            state: State::Dormant,
            mesh: None,
            last_edge: None,
            cache: Vec::with_capacity(MAX_CACHE_SIZE),
            empty_cache: false,
            contours: 0,
            vertices: 0,
        }
    }

    pub fn options(&self) -> TessellatorOptions {
        self.options
    }

    pub fn set_winding_rule(&mut self, rule: WindingRule) -> Result<(), TessError> {
        self.require_unlocked()?;
        self.options.winding_rule = rule;
        Ok(())
    }

    pub fn set_boundary_only(&mut self, boundary_only: bool) -> Result<(), TessError> {
        self.require_unlocked()?;
        self.options.boundary_only = boundary_only;
        Ok(())
    }

    // ─────── Input ────────────────────────────────────────────────────────────

    pub fn begin_polygon(&mut self) -> Result<(), TessError> {
        self.require_state(State::Dormant)?;
        self.state = State::InPolygon;
        self.mesh = None;
        self.last_edge = None;
        self.cache.clear();
        self.empty_cache = false;
        self.contours = 0;
        self.vertices = 0;
        Ok(())
    }

    pub fn begin_contour(&mut self) -> Result<(), TessError> {
        self.require_state(State::InPolygon)?;
        self.state = State::InContour;
        self.last_edge = None;
        if !self.cache.is_empty() {
            self.empty_cache = true;
        }
        Ok(())
    }

    /// Adds a vertex to the current contour. `z` is carried into combined
    /// vertices but plays no part in the tessellation.
    pub fn add_vertex(&mut self, x: Real, y: Real, z: Real, tag: i32) -> Result<(), TessError> {
        self.require_state(State::InContour)?;
        let coords = [x, y, z];
        for value in coords {
            geometry::check_coord(value)?;
        }

        if self.empty_cache {
            self.flush_cache();
            self.last_edge = None;
        }
        self.vertices += 1;
        if self.mesh.is_none() {
            if self.cache.len() < MAX_CACHE_SIZE {
                self.cache.push(CachedVertex { coords, tag });
                return Ok(());
            }
            self.flush_cache();
        }
        self.add_mesh_vertex(coords, tag);
        Ok(())
    }

    pub fn end_contour(&mut self) -> Result<(), TessError> {
        self.require_state(State::InContour)?;
        self.state = State::InPolygon;
        self.contours += 1;
        Ok(())
    }

    /// Tessellates the polygon and sends the result to `sink`.
    ///
    /// Whatever the outcome, the tessellator is ready for the next polygon
    /// afterwards. A polygon that fails emits nothing.
    pub fn end_polygon<S: PrimitiveSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), TessError> {
        self.require_state(State::InPolygon)?;
        self.state = State::Dormant;
        let result = self.finish_polygon(sink);
        self.mesh = None;
        self.last_edge = None;
        self.cache.clear();
        self.empty_cache = false;
        result
    }

    // ─────── State machine ────────────────────────────────────────────────────

    fn require_state(&self, want: State) -> Result<(), UsageError> {
        match self.state.cmp(&want) {
            Ordering::Equal => Ok(()),
            Ordering::Less => Err(match self.state {
                State::Dormant => UsageError::MissingBeginPolygon,
                _ => UsageError::MissingBeginContour,
            }),
            Ordering::Greater => Err(match self.state {
                State::InContour => UsageError::MissingEndContour,
                _ => UsageError::MissingEndPolygon,
            }),
        }
    }

    fn require_unlocked(&self) -> Result<(), UsageError> {
        if self.state == State::Dormant {
            Ok(())
        } else {
            Err(UsageError::OptionsLocked)
        }
    }

    // ─────── Mesh building ────────────────────────────────────────────────────

    /// Moves the cached contour into the mesh.
    fn flush_cache(&mut self) {
        self.mesh.get_or_insert_with(Mesh::new);
        let cached = std::mem::take(&mut self.cache);
        for v in &cached {
            self.add_mesh_vertex(v.coords, v.tag);
        }
        self.cache = cached;
        self.cache.clear();
        self.empty_cache = false;
    }

    /// Extends the current contour by one vertex: the first vertex is a
    /// self-loop, later ones split the trailing edge.
    fn add_mesh_vertex(&mut self, coords: [Real; 3], tag: i32) {
        let mesh = self.mesh.get_or_insert_with(Mesh::new);
        let e = match self.last_edge {
            None => {
                let e = mesh.make_edge();
                mesh.splice(e, sym(e));
                e
            }
            Some(prev) => {
                mesh.split_edge(prev);
                mesh.lnext(prev)
            }
        };

        let org = mesh.org(e) as usize;
        mesh.verts[org].coords = coords;
        mesh.verts[org].tag = Some(tag);
        // The left face of an authored edge gains one winding.
        mesh.edges[e as usize].winding = 1;
        mesh.edges[sym(e) as usize].winding = -1;
        self.last_edge = Some(e);
    }

    // ─────── Pipeline ─────────────────────────────────────────────────────────

    fn finish_polygon<S: PrimitiveSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), TessError> {
        let rule = self.options.winding_rule;
        let boundary_only = self.options.boundary_only;

        if self.mesh.is_none() && !sink.wants_edge_flags() && !sink.wants_mesh() {
            if let Some(groups) = self.render_cache(sink) {
                debug!(
                    "polygon of {} vertices took the single-contour path: {} groups",
                    self.cache.len(),
                    groups
                );
                return Ok(());
            }
        }

        self.flush_cache();
        let mut mesh = self.mesh.take().unwrap_or_default();
        geometry::project(&mut mesh);
        geometry::check_orientation(&mut mesh);

        compute_interior(&mut mesh, rule, sink)?;

        let wants_mesh = sink.wants_mesh();
        if boundary_only {
            mesh.set_winding_number(1, true);
        } else if !wants_mesh {
            mesh.tessellate_interior()?;
        }
        if cfg!(debug_assertions) {
            mesh.check()?;
        }

        if wants_mesh {
            mesh.discard_exterior();
            debug!(
                "polygon of {} contours, {} vertices: handing over a mesh of {} faces",
                self.contours,
                self.vertices,
                mesh.face_count()
            );
            sink.mesh(mesh);
            return Ok(());
        }

        let groups = if boundary_only {
            render::render_boundary(&mesh, sink)?
        } else {
            render::render_mesh(&mut mesh, sink)?
        };
        debug!(
            "polygon of {} contours, {} vertices: {} groups under {:?}",
            self.contours, self.vertices, groups, rule
        );
        Ok(())
    }
}

/// Tessellates `contours` in one go, tagging vertices 0, 1, 2, ... in order.
pub fn tessellate_contours<C, S>(
    options: TessellatorOptions,
    contours: &[C],
    sink: &mut S,
) -> Result<(), TessError>
where
    C: AsRef<[[Real; 2]]>,
    S: PrimitiveSink + ?Sized,
{
    let mut tess = Tessellator::with_options(options);
    tess.begin_polygon()?;
    let mut tag = 0;
    for contour in contours {
        tess.begin_contour()?;
        for &[x, y] in contour.as_ref() {
            tess.add_vertex(x, y, 0.0, tag)?;
            tag += 1;
        }
        tess.end_contour()?;
    }
    tess.end_polygon(sink)
}
