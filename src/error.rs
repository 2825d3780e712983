// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Error types returned by the tessellator.

/// A call made in the wrong order or with input the engine cannot accept.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum UsageError {
    #[error("begin_polygon must be called first")]
    MissingBeginPolygon,
    #[error("begin_contour must be called first")]
    MissingBeginContour,
    #[error("end_contour must be called first")]
    MissingEndContour,
    #[error("end_polygon must be called first")]
    MissingEndPolygon,
    #[error("coordinate {value} is outside the supported range")]
    CoordinateOutOfRange { value: f64 },
    #[error("options cannot change while a polygon is open")]
    OptionsLocked,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TessError {
    #[error("usage error: {0}")]
    Usage(#[from] UsageError),
    /// The sweep reached a state it cannot reconcile with a valid subdivision.
    #[error("topology error: {0}")]
    Topology(&'static str),
    /// Two edges cross and the sink did not supply a tag for the new vertex.
    #[error("edges intersect at ({}, {}) and no combine callback produced a vertex", coords[0], coords[1])]
    MissingCombine { coords: [f64; 3] },
}
