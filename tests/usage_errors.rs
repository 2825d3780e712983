// Copyright 2025 Lars Brubaker
// Call-order and input validation through the public API.

mod helpers;

use helpers::rect;
use polytess::{
    tessellate_contours, PrimitiveBuffer, PrimitiveSink, TessError, Tessellator,
    TessellatorOptions, UsageError, WindingRule, MAX_COORD,
};

fn usage(err: UsageError) -> Result<(), TessError> {
    Err(TessError::Usage(err))
}

#[test]
fn full_call_sequence_is_enforced() {
    helpers::init_logging();
    let mut tess = Tessellator::new();
    let mut out = PrimitiveBuffer::new();

    assert_eq!(tess.end_contour(), usage(UsageError::MissingBeginPolygon));
    tess.begin_polygon().unwrap();
    assert_eq!(tess.end_contour(), usage(UsageError::MissingBeginContour));
    tess.begin_contour().unwrap();
    assert_eq!(tess.begin_polygon(), usage(UsageError::MissingEndContour));
    for (i, p) in rect(0.0, 0.0, 1.0, 1.0).iter().enumerate() {
        tess.add_vertex(p[0], p[1], 0.0, i as i32).unwrap();
    }
    tess.end_contour().unwrap();
    assert_eq!(tess.begin_polygon(), usage(UsageError::MissingEndPolygon));
    tess.end_polygon(&mut out).unwrap();
    assert_eq!(out.triangle_count(), 2);
    assert_eq!(tess.end_polygon(&mut out), usage(UsageError::MissingBeginPolygon));
}

#[test]
fn coordinate_bounds() {
    let mut tess = Tessellator::new();
    tess.begin_polygon().unwrap();
    tess.begin_contour().unwrap();
    tess.add_vertex(MAX_COORD, -MAX_COORD, 0.0, 0).unwrap();
    for bad in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN, MAX_COORD * 2.0] {
        assert!(
            matches!(
                tess.add_vertex(0.0, 0.0, bad, 1),
                Err(TessError::Usage(UsageError::CoordinateOutOfRange { .. }))
            ),
            "z = {} accepted",
            bad
        );
    }
}

#[test]
fn options_change_only_between_polygons() {
    let mut tess = Tessellator::with_options(
        TessellatorOptions::new().with_winding_rule(WindingRule::Positive),
    );
    tess.begin_polygon().unwrap();
    assert_eq!(
        tess.set_winding_rule(WindingRule::Odd),
        usage(UsageError::OptionsLocked)
    );
    let mut out = PrimitiveBuffer::new();
    tess.end_polygon(&mut out).unwrap();
    tess.set_winding_rule(WindingRule::Odd).unwrap();
    tess.set_boundary_only(true).unwrap();
    assert_eq!(
        tess.options(),
        TessellatorOptions::new()
            .with_winding_rule(WindingRule::Odd)
            .with_boundary_only(true)
    );
}

#[test]
fn failed_polygon_leaves_the_tessellator_usable() {
    let bowtie = [[0.0, 0.0], [2.0, 2.0], [2.0, 0.0], [0.0, 2.0]];
    let mut out = PrimitiveBuffer::new();
    let err = tessellate_contours(TessellatorOptions::default(), &[bowtie], &mut out)
        .expect_err("crossing without combine");
    assert!(matches!(err, TessError::MissingCombine { .. }));
    assert!(err.to_string().contains("intersect"));

    let mut tess = Tessellator::new();
    helpers::feed(&mut tess, &[bowtie.to_vec()]).unwrap();
    assert!(tess.end_polygon(&mut out).is_err());
    helpers::feed(&mut tess, &[rect(0.0, 0.0, 1.0, 1.0)]).unwrap();
    tess.end_polygon(&mut out).unwrap();
    assert_eq!(out.triangle_count(), 2);
}

/// A sink that only counts what it receives.
#[derive(Default)]
struct Counter {
    begins: usize,
    vertices: usize,
    ends: usize,
}

impl PrimitiveSink for Counter {
    fn begin(&mut self, _kind: polytess::PrimitiveKind) {
        self.begins += 1;
    }
    fn vertex(&mut self, _tag: i32) {
        self.vertices += 1;
    }
    fn end(&mut self) {
        self.ends += 1;
    }
}

#[test]
fn custom_sink_through_a_trait_object() {
    let mut counter = Counter::default();
    {
        let sink: &mut dyn PrimitiveSink = &mut counter;
        tessellate_contours(
            TessellatorOptions::default(),
            &[rect(0.0, 0.0, 2.0, 2.0), rect(5.0, 0.0, 6.0, 1.0)],
            sink,
        )
        .unwrap();
    }
    assert!(counter.begins >= 1);
    assert_eq!(counter.begins, counter.ends);
    assert!(counter.vertices >= 6);
}
