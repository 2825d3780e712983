// Copyright 2025 Lars Brubaker
// Winding rule correctness tests with area verification.

mod helpers;

use helpers::{assert_area_approx, rect, reversed, tessellate, Contour};
use polytess::{TessellatorOptions, WindingRule};

const ALL_RULES: [WindingRule; 5] = [
    WindingRule::Odd,
    WindingRule::NonZero,
    WindingRule::Positive,
    WindingRule::Negative,
    WindingRule::AbsGeqTwo,
];

fn with_rule(rule: WindingRule) -> TessellatorOptions {
    TessellatorOptions::new().with_winding_rule(rule)
}

/// Three nested squares:
/// - Outer: 6x6, CCW
/// - Middle: 4x4, CW
/// - Inner: 2x2, CCW
///
/// Winding numbers from outside to inside: 0, 1, 0, 1.
fn nested_squares() -> Vec<Contour> {
    vec![
        rect(-3.0, -3.0, 3.0, 3.0),
        reversed(&rect(-2.0, -2.0, 2.0, 2.0)),
        rect(-1.0, -1.0, 1.0, 1.0),
    ]
}

#[test]
fn ccw_square_under_every_rule() {
    let square = vec![rect(0.0, 0.0, 1.0, 1.0)];
    for (rule, expected) in ALL_RULES.into_iter().zip([1.0, 1.0, 1.0, 0.0, 0.0]) {
        let t = tessellate(&square, with_rule(rule));
        assert_area_approx(t.area(), expected, 1e-12, &format!("{:?}", rule));
        helpers::verify_valid_output(&t);
    }
}

#[test]
fn cw_square_counts_as_positive() {
    let square = vec![reversed(&rect(0.0, 0.0, 1.0, 1.0))];
    for (rule, expected) in ALL_RULES.into_iter().zip([1.0, 1.0, 1.0, 0.0, 0.0]) {
        let t = tessellate(&square, with_rule(rule));
        assert_area_approx(t.area(), expected, 1e-12, &format!("{:?}", rule));
    }
}

#[test]
fn nested_squares_alternate() {
    // Rings of area 20 and 4 have winding 1, the ring between them 0.
    for (rule, expected) in ALL_RULES.into_iter().zip([24.0, 24.0, 24.0, 0.0, 0.0]) {
        let t = tessellate(&nested_squares(), with_rule(rule));
        assert_area_approx(t.area(), expected, 1e-9, &format!("{:?}", rule));
        helpers::verify_valid_output(&t);
    }
}

#[test]
fn same_direction_nesting_accumulates() {
    // Both CCW: winding 1 in the outer ring, 2 in the inner square.
    let contours = vec![rect(0.0, 0.0, 4.0, 4.0), rect(1.0, 1.0, 3.0, 3.0)];
    let expected = [12.0, 16.0, 16.0, 0.0, 4.0];
    for (rule, expected) in ALL_RULES.into_iter().zip(expected) {
        let t = tessellate(&contours, with_rule(rule));
        assert_area_approx(t.area(), expected, 1e-9, &format!("{:?}", rule));
    }
}

#[test]
fn overlapping_loops_under_every_rule() {
    // Two CCW squares sharing a unit square of winding 2.
    let contours = vec![rect(0.0, 0.0, 2.0, 2.0), rect(1.0, 1.0, 3.0, 3.0)];
    let expected = [6.0, 7.0, 7.0, 0.0, 1.0];
    for (rule, expected) in ALL_RULES.into_iter().zip(expected) {
        let t = tessellate(&contours, with_rule(rule));
        assert_area_approx(t.area(), expected, 1e-9, &format!("{:?}", rule));
        helpers::verify_valid_output(&t);
    }

    // The boundaries cross at (2, 1) and (1, 2).
    let t = tessellate(&contours, with_rule(WindingRule::AbsGeqTwo));
    let mut crossings: Vec<[i64; 2]> = t
        .out
        .combines
        .iter()
        .map(|c| [c.coords[0].round() as i64, c.coords[1].round() as i64])
        .collect();
    crossings.sort();
    assert_eq!(crossings, vec![[1, 2], [2, 1]]);
}

#[test]
fn negative_rule_selects_clockwise_regions() {
    // A CCW square with a CW square beside it: after normalization the
    // larger CCW area stays positive, so only the CW one is negative.
    let contours = vec![
        rect(0.0, 0.0, 3.0, 3.0),
        reversed(&rect(5.0, 0.0, 6.0, 1.0)),
    ];
    let t = tessellate(&contours, with_rule(WindingRule::Negative));
    assert_area_approx(t.area(), 1.0, 1e-9, "negative");
    let t = tessellate(&contours, with_rule(WindingRule::Positive));
    assert_area_approx(t.area(), 9.0, 1e-9, "positive");
    let t = tessellate(&contours, with_rule(WindingRule::NonZero));
    assert_area_approx(t.area(), 10.0, 1e-9, "nonzero");
}
