// Copyright 2025 Lars Brubaker
// Unit tests for the half-edge mesh.

use super::*;

/// A closed contour through the given points, as built by the tessellator.
fn contour(mesh: &mut Mesh, pts: &[(Real, Real)]) -> EdgeIdx {
    let mut e = INVALID;
    for (i, &(x, y)) in pts.iter().enumerate() {
        if e == INVALID {
            e = mesh.make_edge();
            mesh.splice(e, sym(e));
        } else {
            mesh.split_edge(e);
            e = mesh.lnext(e);
        }
        let org = mesh.org(e) as usize;
        mesh.verts[org].coords = [x, y, 0.0];
        mesh.verts[org].s = x;
        mesh.verts[org].t = y;
        mesh.verts[org].tag = Some(i as i32);
        mesh.edges[e as usize].winding = 1;
        mesh.edges[sym(e) as usize].winding = -1;
    }
    e
}

#[test]
fn make_edge_creates_isolated_loop() {
    let mut mesh = Mesh::new();
    let e = mesh.make_edge();
    assert_eq!(mesh.vertices().count(), 2);
    assert_eq!(mesh.face_count(), 1);
    assert_eq!(mesh.edges().count(), 1);
    assert_eq!(mesh.lface(e), mesh.rface(e));
    assert_ne!(mesh.org(e), mesh.dst(e));
    mesh.check().unwrap();
}

#[test]
fn self_loop_has_one_vertex_and_two_faces() {
    let mut mesh = Mesh::new();
    let e = mesh.make_edge();
    mesh.splice(e, sym(e));
    assert_eq!(mesh.vertices().count(), 1);
    assert_eq!(mesh.face_count(), 2);
    assert_eq!(mesh.org(e), mesh.dst(e));
    mesh.check().unwrap();
}

#[test]
fn contour_forms_two_faces_with_all_vertices() {
    let mut mesh = Mesh::new();
    let e = contour(&mut mesh, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    mesh.check().unwrap();
    assert_eq!(mesh.vertices().count(), 4);
    assert_eq!(mesh.edges().count(), 4);
    assert_eq!(mesh.face_count(), 2);
    assert_eq!(mesh.face_edges(mesh.lface(e)).count(), 4);

    // Euler: V - E + F = 2 for a connected planar graph.
    let euler = 4 - 4 + mesh.face_count() as i32;
    assert_eq!(euler, 2);
}

#[test]
fn split_edge_keeps_winding_on_both_halves() {
    let mut mesh = Mesh::new();
    let e = contour(&mut mesh, &[(0.0, 0.0), (2.0, 0.0), (1.0, 1.0)]);
    let e_new = mesh.split_edge(e);
    assert_eq!(mesh.lnext(e), e_new);
    assert_eq!(mesh.edges[e_new as usize].winding, 1);
    assert_eq!(mesh.edges[sym(e_new) as usize].winding, -1);
    assert_eq!(mesh.vertices().count(), 4);
    mesh.check().unwrap();
}

#[test]
fn connect_splits_face_and_delete_rejoins_it() {
    let mut mesh = Mesh::new();
    let e = contour(&mut mesh, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    let face = mesh.lface(e);
    let faces_before = mesh.face_count();

    let diag = mesh.connect(mesh.lnext(e), e);
    assert_eq!(mesh.face_count(), faces_before + 1);
    assert_eq!(mesh.face_edges(mesh.lface(diag)).count(), 3);
    assert_eq!(mesh.face_edges(mesh.rface(diag)).count(), 3);
    assert_eq!(mesh.face_edges(face).count(), 3);
    mesh.check().unwrap();

    mesh.delete_edge(diag);
    assert_eq!(mesh.face_count(), faces_before);
    assert_eq!(mesh.face_edges(mesh.lface(e)).count(), 4);
    mesh.check().unwrap();
}

#[test]
fn splice_merges_two_loops_at_one_vertex() {
    let mut mesh = Mesh::new();
    let a = contour(&mut mesh, &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    let b = contour(&mut mesh, &[(0.0, 0.0), (-1.0, 0.0), (0.0, -1.0)]);
    assert_eq!(mesh.vertices().count(), 6);
    mesh.splice(a, b);
    assert_eq!(mesh.vertices().count(), 5);
    assert_eq!(mesh.org(a), mesh.org(b));
    mesh.check().unwrap();
}

#[test]
fn zap_face_removes_unshared_edges() {
    let mut mesh = Mesh::new();
    let e = contour(&mut mesh, &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    let inner = mesh.lface(e);
    let outer = mesh.rface(e);
    mesh.faces[inner as usize].class = FaceClass::Interior;
    mesh.faces[outer as usize].class = FaceClass::Exterior;

    mesh.discard_exterior();
    assert_eq!(mesh.face_count(), 1);
    assert_eq!(mesh.face_edges(inner).count(), 3);
    assert!(mesh.face_edges(inner).all(|e| mesh.is_boundary_edge(e)));

    mesh.zap_face(inner);
    assert_eq!(mesh.face_count(), 0);
    assert_eq!(mesh.vertices().count(), 0);
    assert_eq!(mesh.edges().count(), 0);
}

#[test]
fn set_winding_number_keeps_only_boundary() {
    let mut mesh = Mesh::new();
    let e = contour(&mut mesh, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    let inner = mesh.lface(e);
    let outer = mesh.rface(e);
    mesh.faces[inner as usize].class = FaceClass::Interior;
    mesh.faces[outer as usize].class = FaceClass::Exterior;
    // The second triangle inherits the interior class.
    mesh.connect(mesh.lnext(e), e);
    assert_eq!(mesh.face_count(), 3);

    mesh.set_winding_number(1, true);
    assert_eq!(mesh.edges().count(), 4);
    for e in mesh.edges().collect::<Vec<_>>() {
        let w = mesh.edges[e as usize].winding;
        let inside_left = mesh.face_inside(mesh.lface(e));
        assert_eq!(w, if inside_left { 1 } else { -1 });
    }
    mesh.check().unwrap();
}
