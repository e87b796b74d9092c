//! # SeatCut Core
//!
//! Core types and utilities for SeatCut.
//! Provides the sketch geometry model, unit conversion, and the shared
//! error types used by the planner and submitter crates.

pub mod error;
pub mod geometry;
pub mod sketch;
pub mod units;

pub use error::{Error, GeometryError, Result};
pub use geometry::{Circle, Curve, CurveGroup, Point2D};
pub use sketch::{Sketch, SketchFile, SketchLine};
pub use units::{format_inches, LengthUnit};
