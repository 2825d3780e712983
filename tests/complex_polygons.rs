// Copyright 2025 Lars Brubaker
// Self-intersecting, concave and multi-contour polygons.

mod helpers;

use helpers::{
    assert_area_approx, parse_contours, rect, reversed, tessellate, tessellate_into, Contour,
};
use polytess::{PrimitiveBuffer, TessError, Tessellator, TessellatorOptions, WindingRule};

fn with_rule(rule: WindingRule) -> TessellatorOptions {
    TessellatorOptions::new().with_winding_rule(rule)
}

fn pentagram() -> Contour {
    (0..5)
        .map(|k| {
            let a = (90.0 + 144.0 * k as f64).to_radians();
            [a.cos(), a.sin()]
        })
        .collect()
}

const DIAMOND_WITH_HOLE: &str = "
0 -4
4 0
0 4
-4 0

0, -1
-1, 0
0, 1
1, 0
";

#[test]
fn bowtie_combines_once_at_the_crossing() {
    let bowtie = vec![vec![[0.0, 0.0], [2.0, 2.0], [2.0, 0.0], [0.0, 2.0]]];
    let t = tessellate(&bowtie, with_rule(WindingRule::NonZero));

    assert_eq!(t.out.combines.len(), 1);
    let call = &t.out.combines[0];
    assert!((call.coords[0] - 1.0).abs() < 1e-12 && (call.coords[1] - 1.0).abs() < 1e-12);
    let mut sources: Vec<i32> = call.tags.iter().flatten().copied().collect();
    sources.sort();
    assert_eq!(sources, vec![0, 1, 2, 3]);
    assert!((call.weights.iter().sum::<f64>() - 1.0).abs() < 1e-12);

    assert_eq!(t.triangle_count(), 2);
    assert_area_approx(t.area(), 2.0, 1e-12, "bowtie");
    helpers::verify_valid_output(&t);
}

#[test]
fn bowtie_lobes_have_opposite_windings() {
    let bowtie = vec![vec![[0.0, 0.0], [2.0, 2.0], [2.0, 0.0], [0.0, 2.0]]];
    let positive = tessellate(&bowtie, with_rule(WindingRule::Positive));
    let negative = tessellate(&bowtie, with_rule(WindingRule::Negative));
    assert_area_approx(positive.area(), 1.0, 1e-12, "positive lobe");
    assert_area_approx(negative.area(), 1.0, 1e-12, "negative lobe");
}

#[test]
fn bowtie_without_combine_is_an_error() {
    let bowtie = vec![vec![[0.0, 0.0], [2.0, 2.0], [2.0, 0.0], [0.0, 2.0]]];
    let mut tess = Tessellator::new();
    helpers::feed(&mut tess, &bowtie).unwrap();
    let mut out = PrimitiveBuffer::new();
    match tess.end_polygon(&mut out) {
        Err(TessError::MissingCombine { coords }) => {
            assert!((coords[0] - 1.0).abs() < 1e-12 && (coords[1] - 1.0).abs() < 1e-12);
        }
        other => panic!("expected a missing combine, got {:?}", other),
    }
    assert!(out.primitives.is_empty());
}

#[test]
fn pentagram_center_depends_on_rule() {
    let r_inner = 36f64.to_radians().cos().recip() * 72f64.to_radians().cos();
    let pentagon = 2.5 * r_inner * r_inner * 72f64.to_radians().sin();
    let star = 5.0 * r_inner * 36f64.to_radians().sin();

    let contours = vec![pentagram()];
    for (rule, expected) in [
        (WindingRule::NonZero, star),
        (WindingRule::Odd, star - pentagon),
        (WindingRule::AbsGeqTwo, pentagon),
        (WindingRule::Negative, 0.0),
    ] {
        let t = tessellate(&contours, with_rule(rule));
        assert_area_approx(t.area(), expected, 1e-9, &format!("{:?}", rule));
        helpers::verify_valid_output(&t);
        assert_eq!(t.out.combines.len(), 5, "{:?}", rule);
    }
}

#[test]
fn square_with_hole() {
    let contours = vec![
        rect(0.0, 0.0, 4.0, 4.0),
        reversed(&rect(1.0, 1.0, 3.0, 3.0)),
    ];
    let t = tessellate(&contours, TessellatorOptions::default());
    assert_eq!(t.triangle_count(), 8);
    assert_area_approx(t.area(), 12.0, 1e-9, "square with hole");
    assert!(t.out.combines.is_empty());
}

#[test]
fn parsed_diamond_with_hole_under_odd() {
    let contours = parse_contours(DIAMOND_WITH_HOLE);
    assert_eq!(contours.len(), 2);
    let t = tessellate(&contours, with_rule(WindingRule::Odd));
    assert_area_approx(t.area(), 32.0 - 2.0, 1e-9, "diamond");
    helpers::verify_valid_output(&t);
}

#[test]
fn concave_l_shape() {
    let l = vec![vec![
        [0.0, 0.0],
        [2.0, 0.0],
        [2.0, 1.0],
        [1.0, 1.0],
        [1.0, 2.0],
        [0.0, 2.0],
    ]];
    let t = tessellate(&l, TessellatorOptions::default());
    assert_eq!(t.triangle_count(), 4);
    assert_area_approx(t.area(), 3.0, 1e-12, "L");
}

#[test]
fn comb_with_many_reflex_vertices() {
    // Five teeth pointing up from a 9x1 bar.
    let mut comb = vec![[0.0, 0.0], [9.0, 0.0]];
    for i in (0..5).rev() {
        let x = 2.0 * i as f64;
        comb.push([x + 1.0, 3.0]);
        comb.push([x, 3.0]);
        if i > 0 {
            comb.push([x, 1.0]);
            comb.push([x - 1.0, 1.0]);
        }
    }
    assert_eq!(comb.len(), 20);
    assert_area_approx(helpers::polygon_signed_area(&comb), 19.0, 1e-12, "comb input");

    let t = tessellate(&[comb.clone()], TessellatorOptions::default());
    assert_eq!(t.triangle_count(), comb.len() - 2);
    assert_area_approx(t.area(), 19.0, 1e-9, "comb");
    helpers::verify_valid_output(&t);
}

#[test]
fn disjoint_squares_stay_separate() {
    let contours = vec![rect(0.0, 0.0, 1.0, 1.0), rect(3.0, 0.0, 4.0, 1.0)];
    let t = tessellate(&contours, TessellatorOptions::default());
    assert_eq!(t.triangle_count(), 4);
    assert_area_approx(t.area(), 2.0, 1e-12, "two squares");
    for tri in t.out.triangles() {
        let first = tri.iter().all(|&tag| (0..4).contains(&tag));
        let second = tri.iter().all(|&tag| (4..8).contains(&tag));
        assert!(first || second, "triangle {:?} spans both squares", tri);
    }
}

#[test]
fn vertices_on_edges_and_repeats() {
    let contours = vec![vec![
        [0.0, 0.0],
        [0.5, 0.0],
        [1.0, 0.0],
        [1.0, 0.0],
        [1.0, 1.0],
        [0.5, 1.0],
        [0.0, 1.0],
    ]];
    let t = tessellate(&contours, TessellatorOptions::default());
    assert_area_approx(t.area(), 1.0, 1e-12, "square with extra vertices");
    helpers::verify_valid_output(&t);
}

#[test]
fn contour_touching_itself_at_a_vertex() {
    let eight = vec![vec![
        [0.0, 0.0],
        [1.0, 0.0],
        [1.0, 1.0],
        [2.0, 1.0],
        [2.0, 2.0],
        [1.0, 2.0],
        [1.0, 1.0],
        [0.0, 1.0],
    ]];
    let t = tessellate_into(
        &eight,
        TessellatorOptions::default(),
        PrimitiveBuffer::new(),
    );
    assert_area_approx(t.area(), 2.0, 1e-12, "figure eight");
    assert_eq!(t.triangle_count(), 4);
}

#[test]
fn degenerate_input_emits_nothing() {
    let cases: Vec<Vec<Contour>> = vec![
        vec![],
        vec![vec![]],
        vec![vec![[0.0, 0.0]]],
        vec![vec![[0.0, 0.0], [1.0, 1.0]]],
        vec![vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]],
        vec![vec![[0.0, 0.0], [1.0, 0.0]], vec![[5.0, 5.0], [6.0, 6.0], [7.0, 7.0]]],
    ];
    for contours in cases {
        for out in [
            PrimitiveBuffer::new(),
            PrimitiveBuffer::new().recording_edge_flags(),
        ] {
            let t = tessellate_into(&contours, TessellatorOptions::default(), out);
            assert!(
                t.out.primitives.is_empty(),
                "{:?} produced {:?}",
                contours,
                t.out.primitives
            );
        }
    }
}

#[test]
fn combine_interpolates_z_at_the_crossing() {
    // Both crossing edges climb from z = 0 to z = 4, so the crossing sits at z = 2.
    let corners = [[0.0, 0.0, 0.0], [2.0, 2.0, 4.0], [2.0, 0.0, 0.0], [0.0, 2.0, 4.0]];
    let mut tess = Tessellator::new();
    tess.begin_polygon().unwrap();
    tess.begin_contour().unwrap();
    for (tag, p) in corners.iter().enumerate() {
        tess.add_vertex(p[0], p[1], p[2], tag as i32).unwrap();
    }
    tess.end_contour().unwrap();
    let mut out = PrimitiveBuffer::new().with_combine_base(helpers::COMBINE_BASE);
    tess.end_polygon(&mut out).unwrap();

    assert_eq!(out.combines.len(), 1);
    let [x, y, z] = out.combines[0].coords;
    assert!((x - 1.0).abs() < 1e-12, "x = {}", x);
    assert!((y - 1.0).abs() < 1e-12, "y = {}", y);
    assert!((z - 2.0).abs() < 1e-12, "z = {}", z);
}
