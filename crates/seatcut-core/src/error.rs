//! Error handling for SeatCut core
//!
//! Provides the error types shared by the geometry and sketch-loading layers.
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry error type
///
/// Represents invalid geometry handed to the core by a geometry source.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Circle radius is zero, negative, or not finite
    #[error("Invalid circle radius: {radius}")]
    InvalidRadius {
        /// The offending radius.
        radius: f64,
    },

    /// Chord tolerance is zero, negative, or not finite
    #[error("Invalid chord tolerance: {tolerance}")]
    InvalidTolerance {
        /// The offending tolerance.
        tolerance: f64,
    },

    /// A coordinate is NaN or infinite
    #[error("Non-finite coordinate in {context}")]
    NonFiniteCoordinate {
        /// Where the coordinate was found.
        context: String,
    },
}

/// Main error type for SeatCut core
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Sketch file could not be parsed
    #[error("Invalid sketch file: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
