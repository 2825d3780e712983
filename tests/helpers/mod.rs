// Copyright 2025 Lars Brubaker
// Shared test utilities for the polytess integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use polytess::{PrimitiveBuffer, TessError, Tessellator, TessellatorOptions};

/// Tags handed out for vertices created at edge crossings.
pub const COMBINE_BASE: i32 = 1_000_000;

pub type Contour = Vec<[f64; 2]>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parse a contour listing: one vertex per line as `x y` or `x, y`.
/// Blank lines separate contours.
pub fn parse_contours(data: &str) -> Vec<Contour> {
    let mut contours = Vec::new();
    let mut current = Vec::new();

    for line in data.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !current.is_empty() {
                contours.push(std::mem::take(&mut current));
            }
            continue;
        }
        let values: Vec<f64> = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse::<f64>().ok())
            .collect();
        if let [x, y, ..] = values[..] {
            current.push([x, y]);
        }
    }
    if !current.is_empty() {
        contours.push(current);
    }
    contours
}

/// Axis-aligned rectangle, counter-clockwise.
pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Contour {
    vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]]
}

pub fn reversed(contour: &[[f64; 2]]) -> Contour {
    contour.iter().rev().copied().collect()
}

pub fn regular_polygon(n: usize, radius: f64) -> Contour {
    (0..n)
        .map(|i| {
            let a = i as f64 * std::f64::consts::TAU / n as f64;
            [radius * a.cos(), radius * a.sin()]
        })
        .collect()
}

/// Signed area of a triangle (positive when counter-clockwise).
pub fn triangle_area(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    0.5 * ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]))
}

/// Signed area of a simple polygon.
pub fn polygon_signed_area(points: &[[f64; 2]]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i][0] * points[j][1] - points[j][0] * points[i][1];
    }
    area * 0.5
}

pub fn feed(tess: &mut Tessellator, contours: &[Contour]) -> Result<(), TessError> {
    tess.begin_polygon()?;
    let mut tag = 0;
    for contour in contours {
        tess.begin_contour()?;
        for p in contour {
            tess.add_vertex(p[0], p[1], 0.0, tag)?;
            tag += 1;
        }
        tess.end_contour()?;
    }
    Ok(())
}

/// The recorded output of one polygon plus the position behind every tag.
pub struct Tessellation {
    pub out: PrimitiveBuffer,
    pub points: HashMap<i32, [f64; 2]>,
}

impl Tessellation {
    pub fn new(contours: &[Contour], out: PrimitiveBuffer) -> Self {
        let mut points = HashMap::new();
        for (tag, p) in contours.iter().flatten().enumerate() {
            points.insert(tag as i32, *p);
        }
        for call in &out.combines {
            points.insert(call.new_tag, [call.coords[0], call.coords[1]]);
        }
        Tessellation { out, points }
    }

    pub fn point(&self, tag: i32) -> [f64; 2] {
        match self.points.get(&tag) {
            Some(p) => *p,
            None => panic!("tag {} was never defined", tag),
        }
    }

    /// Total unsigned area of the output triangles.
    pub fn area(&self) -> f64 {
        self.out
            .triangles()
            .iter()
            .map(|t| {
                let [a, b, c] = t.map(|tag| self.point(tag));
                triangle_area(a, b, c).abs()
            })
            .sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.out.triangle_count()
    }

    /// Boundary loops as coordinates.
    pub fn loops(&self) -> Vec<Contour> {
        self.out
            .loops()
            .map(|l| l.iter().map(|&tag| self.point(tag)).collect())
            .collect()
    }

    /// Triangles with each rotated to start at its smallest tag, sorted.
    pub fn triangle_set(&self) -> Vec<[i32; 3]> {
        let mut tris: Vec<[i32; 3]> = self
            .out
            .triangles()
            .into_iter()
            .map(|mut t| {
                let min = (0..3).min_by_key(|&i| t[i]).unwrap_or(0);
                t.rotate_left(min);
                t
            })
            .collect();
        tris.sort();
        tris
    }
}

/// Tessellates with a sink that answers combine requests.
pub fn tessellate(contours: &[Contour], options: TessellatorOptions) -> Tessellation {
    tessellate_into(
        contours,
        options,
        PrimitiveBuffer::new().with_combine_base(COMBINE_BASE),
    )
}

pub fn tessellate_into(
    contours: &[Contour],
    options: TessellatorOptions,
    mut out: PrimitiveBuffer,
) -> Tessellation {
    init_logging();
    let mut tess = Tessellator::with_options(options);
    feed(&mut tess, contours).expect("contours are well formed");
    if let Err(err) = tess.end_polygon(&mut out) {
        panic!("tessellation failed under {:?}: {}", options, err);
    }
    Tessellation::new(contours, out)
}

/// Every referenced tag is known, every position finite, and no triangle
/// repeats a vertex.
pub fn verify_valid_output(t: &Tessellation) {
    for p in &t.out.primitives {
        for &tag in &p.tags {
            let [x, y] = t.point(tag);
            assert!(x.is_finite() && y.is_finite(), "tag {} at ({}, {})", tag, x, y);
        }
    }
    for tri in t.out.triangles() {
        assert!(
            tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2],
            "triangle {:?} repeats a vertex",
            tri
        );
    }
}

pub fn assert_area_approx(actual: f64, expected: f64, tolerance: f64, label: &str) {
    assert!(
        (actual - expected).abs() < tolerance,
        "{}: expected area ~{}, got {} (diff={})",
        label,
        expected,
        actual,
        (actual - expected).abs()
    );
}
