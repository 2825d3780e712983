// Copyright 2025 Lars Brubaker
// Coordinate checks and the projection onto the sweep plane.

use crate::error::UsageError;
use crate::geom::Real;
use crate::mesh::Mesh;

use super::MAX_COORD;

pub(crate) fn check_coord(value: Real) -> Result<(), UsageError> {
    if value.is_finite() && value.abs() <= MAX_COORD {
        Ok(())
    } else {
        Err(UsageError::CoordinateOutOfRange { value })
    }
}

/// Sweep coordinates are the input's x and y.
pub(crate) fn project(mesh: &mut Mesh) {
    let verts: Vec<_> = mesh.vertices().collect();
    for v in verts {
        let vert = &mut mesh.verts[v as usize];
        vert.s = vert.coords[0];
        vert.t = vert.coords[1];
    }
}

/// Twice the signed area enclosed by the positively wound sides of the
/// input contours.
pub(crate) fn signed_area(mesh: &Mesh) -> Real {
    let mut area = 0.0;
    for f in mesh.faces() {
        let an = mesh.faces[f as usize].an_edge;
        if mesh.edges[an as usize].winding <= 0 {
            continue;
        }
        for e in mesh.face_edges(f) {
            let org = mesh.st(mesh.org(e));
            let dst = mesh.st(mesh.dst(e));
            area += (org.s - dst.s) * (org.t + dst.t);
        }
    }
    area
}

/// Mirrors the sweep plane when the contours run clockwise, so the
/// authored orientation always counts as positive winding.
pub(crate) fn check_orientation(mesh: &mut Mesh) -> bool {
    if signed_area(mesh) >= 0.0 {
        return false;
    }
    let verts: Vec<_> = mesh.vertices().collect();
    for v in verts {
        mesh.verts[v as usize].t = -mesh.verts[v as usize].t;
    }
    true
}
