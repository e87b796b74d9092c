//! Sketch file loading
//!
//! A sketch file is the flattened export of the seat sketches drawn in the
//! CAD host. Only visible sketches are cut; circles are stroked into
//! polylines with the configured chord tolerance.
//!
//! ```json
//! {
//!   "sketches": [
//!     {
//!       "name": "Seat Mesh",
//!       "lines": [{ "start": { "x": 0, "y": 0 }, "end": { "x": 1, "y": 0 } }],
//!       "circles": [{ "center": { "x": 5, "y": 5 }, "radius": 1.5 }]
//!     }
//!   ]
//! }
//! ```

use crate::error::{GeometryError, Result};
use crate::geometry::{Circle, Curve, CurveGroup, Point2D};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A straight sketch line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SketchLine {
    pub start: Point2D,
    pub end: Point2D,
}

/// One sketch as exported from the host document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sketch {
    pub name: String,
    /// Hidden sketches are kept in the file but never cut
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub lines: Vec<SketchLine>,
    #[serde(default)]
    pub circles: Vec<Circle>,
}

fn default_visible() -> bool {
    true
}

impl Sketch {
    /// Convert into a curve group: lines first in file order, then the
    /// stroked circles.
    pub fn to_curve_group(&self, stroke_tolerance: f64) -> Result<CurveGroup> {
        let mut group = CurveGroup::new(self.name.clone());

        for (idx, line) in self.lines.iter().enumerate() {
            if !line.start.is_finite() || !line.end.is_finite() {
                return Err(GeometryError::NonFiniteCoordinate {
                    context: format!("sketch '{}' line {}", self.name, idx),
                }
                .into());
            }
            group.push(Curve::line(line.start, line.end));
        }

        for circle in &self.circles {
            group.push(circle.to_polyline(stroke_tolerance)?);
        }

        Ok(group)
    }
}

/// Top-level sketch file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SketchFile {
    pub sketches: Vec<Sketch>,
}

impl SketchFile {
    /// Parse a sketch file from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a sketch file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file = Self::from_json(&content)?;
        tracing::debug!(
            path = %path.display(),
            sketches = file.sketches.len(),
            "Loaded sketch file"
        );
        Ok(file)
    }

    /// Curve groups for every visible sketch, in file order
    pub fn curve_groups(&self, stroke_tolerance: f64) -> Result<Vec<CurveGroup>> {
        self.sketches
            .iter()
            .filter(|sketch| sketch.visible)
            .map(|sketch| sketch.to_curve_group(stroke_tolerance))
            .collect()
    }
}
