//! 2D sketch geometry consumed by the path planner.
//!
//! Geometry is expressed in the sketch's source unit (see
//! [`LengthUnit`](crate::units::LengthUnit)); conversion to inches happens
//! when motion instructions are emitted.

use crate::error::GeometryError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Fewest chords used when stroking a circle, however loose the tolerance.
const MIN_CIRCLE_SEGMENTS: usize = 8;

/// Most chords a single circle may be stroked into.
const MAX_CIRCLE_SEGMENTS: usize = 1 << 20;

/// A point on the sketch plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A single curve primitive.
///
/// Circles never appear here directly: they are stroked into a
/// [`Curve::Polyline`] by [`Circle::to_polyline`] before planning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Curve {
    /// Straight segment, part of a line chain.
    Line { start: Point2D, end: Point2D },
    /// Ordered vertices of a flattened closed curve.
    Polyline { vertices: Vec<Point2D> },
}

impl Curve {
    pub fn line(start: Point2D, end: Point2D) -> Self {
        Curve::Line { start, end }
    }

    pub fn polyline(vertices: Vec<Point2D>) -> Self {
        Curve::Polyline { vertices }
    }

    /// Total length of the curve in source units.
    pub fn length(&self) -> f64 {
        match self {
            Curve::Line { start, end } => start.distance_to(end),
            Curve::Polyline { vertices } => vertices
                .windows(2)
                .map(|pair| pair[0].distance_to(&pair[1]))
                .sum(),
        }
    }
}

/// The curves of one sketch-like source, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveGroup {
    pub name: String,
    pub curves: Vec<Curve>,
}

impl CurveGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            curves: Vec::new(),
        }
    }

    /// Builder-style helper to append a curve.
    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curves.push(curve);
        self
    }

    pub fn push(&mut self, curve: Curve) {
        self.curves.push(curve);
    }

    /// Line segments in traversal order as `(start, end)` pairs.
    pub fn line_segments(&self) -> impl Iterator<Item = (Point2D, Point2D)> + '_ {
        self.curves.iter().filter_map(|curve| match curve {
            Curve::Line { start, end } => Some((*start, *end)),
            Curve::Polyline { .. } => None,
        })
    }

    /// Polylines in traversal order.
    pub fn polylines(&self) -> impl Iterator<Item = &[Point2D]> + '_ {
        self.curves.iter().filter_map(|curve| match curve {
            Curve::Polyline { vertices } => Some(vertices.as_slice()),
            Curve::Line { .. } => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

/// A full circle on the sketch plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2D,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point2D, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Number of chords needed so no chord strays further than
    /// `tolerance` from the arc.
    pub fn segment_count(&self, tolerance: f64) -> Result<usize, GeometryError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(GeometryError::InvalidRadius {
                radius: self.radius,
            });
        }
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(GeometryError::InvalidTolerance { tolerance });
        }

        // Sagitta of a chord spanning angle t is 2r * sin^2(t / 4). Solving
        // through asin avoids the cancellation in 1 - cos for tiny ratios.
        let ratio = (tolerance / (2.0 * self.radius)).min(1.0);
        let half_angle = 2.0 * ratio.sqrt().asin();
        let count = (PI / half_angle).ceil();
        if count > MAX_CIRCLE_SEGMENTS as f64 {
            return Err(GeometryError::InvalidTolerance { tolerance });
        }
        Ok((count as usize).max(MIN_CIRCLE_SEGMENTS))
    }

    /// Strokes the circle into a closed polyline.
    ///
    /// Starts at angle zero and runs counter-clockwise; the last vertex is
    /// an exact copy of the first.
    pub fn to_polyline(&self, tolerance: f64) -> Result<Curve, GeometryError> {
        if !self.center.is_finite() {
            return Err(GeometryError::NonFiniteCoordinate {
                context: "circle center".to_string(),
            });
        }
        let segments = self.segment_count(tolerance)?;
        let step = 2.0 * PI / segments as f64;

        let mut vertices = Vec::with_capacity(segments + 1);
        for i in 0..segments {
            let angle = step * i as f64;
            vertices.push(Point2D::new(
                self.center.x + self.radius * angle.cos(),
                self.center.y + self.radius * angle.sin(),
            ));
        }
        vertices.push(vertices[0]);

        Ok(Curve::Polyline { vertices })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_length() {
        let line = Curve::line(Point2D::new(0.0, 0.0), Point2D::new(3.0, 4.0));
        assert_eq!(line.length(), 5.0);

        let poly = Curve::polyline(vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(1.0, 1.0),
        ]);
        assert_eq!(poly.length(), 2.0);
    }

    #[test]
    fn test_group_partitions_curves() {
        let group = CurveGroup::new("seat")
            .with_curve(Curve::line(Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0)))
            .with_curve(Curve::polyline(vec![Point2D::new(2.0, 2.0)]))
            .with_curve(Curve::line(Point2D::new(1.0, 0.0), Point2D::new(1.0, 1.0)));

        let lines: Vec<_> = group.line_segments().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].0, Point2D::new(1.0, 0.0));
        assert_eq!(group.polylines().count(), 1);
    }

    #[test]
    fn test_circle_segment_count() {
        let circle = Circle::new(Point2D::new(0.0, 0.0), 1.0);
        assert_eq!(circle.segment_count(0.005).unwrap(), 32);
        // Very loose tolerance still yields a usable polygon.
        assert_eq!(circle.segment_count(5.0).unwrap(), MIN_CIRCLE_SEGMENTS);
    }

    #[test]
    fn test_tight_tolerance_refines_instead_of_coarsening() {
        let circle = Circle::new(Point2D::new(0.0, 0.0), 100.0);

        // 1e-9 / 100 is far below f64 epsilon relative to 1.0.
        let count = circle.segment_count(1e-9).unwrap();
        assert!(count > 100_000, "count {count}");
        assert!(count <= MAX_CIRCLE_SEGMENTS);

        let Curve::Polyline { vertices } = circle.to_polyline(1e-6).unwrap() else {
            panic!("expected polyline");
        };
        for pair in vertices.windows(2) {
            let mid = Point2D::new((pair[0].x + pair[1].x) / 2.0, (pair[0].y + pair[1].y) / 2.0);
            let deviation = circle.radius - mid.distance_to(&circle.center);
            assert!(deviation <= 1e-6 + 1e-10, "deviation {deviation}");
        }
    }

    #[test]
    fn test_unreachable_tolerance_is_rejected() {
        let circle = Circle::new(Point2D::new(0.0, 0.0), 100.0);
        assert_eq!(
            circle.to_polyline(1e-15),
            Err(GeometryError::InvalidTolerance { tolerance: 1e-15 })
        );
    }

    #[test]
    fn test_circle_polyline_is_closed_and_within_tolerance() {
        let circle = Circle::new(Point2D::new(2.0, -1.0), 1.5);
        let tolerance = 0.005;
        let Curve::Polyline { vertices } = circle.to_polyline(tolerance).unwrap() else {
            panic!("expected polyline");
        };

        assert_eq!(vertices.first(), vertices.last());
        assert_eq!(vertices[0], Point2D::new(3.5, -1.0));

        for pair in vertices.windows(2) {
            let mid = Point2D::new((pair[0].x + pair[1].x) / 2.0, (pair[0].y + pair[1].y) / 2.0);
            let deviation = circle.radius - mid.distance_to(&circle.center);
            assert!(deviation <= tolerance + 1e-12, "deviation {deviation}");
        }
    }

    #[test]
    fn test_circle_rejects_bad_input() {
        let circle = Circle::new(Point2D::new(0.0, 0.0), 0.0);
        assert_eq!(
            circle.to_polyline(0.01),
            Err(GeometryError::InvalidRadius { radius: 0.0 })
        );

        let circle = Circle::new(Point2D::new(0.0, 0.0), 1.0);
        assert!(matches!(
            circle.to_polyline(-0.1),
            Err(GeometryError::InvalidTolerance { .. })
        ));

        let circle = Circle::new(Point2D::new(f64::NAN, 0.0), 1.0);
        assert!(matches!(
            circle.to_polyline(0.1),
            Err(GeometryError::NonFiniteCoordinate { .. })
        ));
    }

    #[test]
    fn test_curve_serde_tagging() {
        let json = r#"{"kind":"line","start":{"x":0.0,"y":0.0},"end":{"x":1.0,"y":2.0}}"#;
        let curve: Curve = serde_json::from_str(json).unwrap();
        assert_eq!(curve, Curve::line(Point2D::new(0.0, 0.0), Point2D::new(1.0, 2.0)));
    }
}
