//! Unit conversion utilities
//!
//! Sketch geometry arrives in the sketch's native linear unit, while motion
//! programs are always emitted in inches with four fixed decimals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;

/// Decimal places used for every emitted coordinate
pub const COORDINATE_DECIMALS: usize = 4;

/// Linear unit of incoming sketch geometry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Inches
    Inch,
    /// Centimeters (the host CAD application's internal unit)
    #[default]
    Centimeter,
    /// Millimeters
    Millimeter,
}

impl LengthUnit {
    /// Convert a value expressed in this unit to inches
    pub fn to_inches(self, value: f64) -> f64 {
        match self {
            Self::Inch => value,
            Self::Centimeter => value / CM_PER_INCH,
            Self::Millimeter => value / MM_PER_INCH,
        }
    }

    /// Short label ("in", "cm", "mm")
    pub fn label(self) -> &'static str {
        match self {
            Self::Inch => "in",
            Self::Centimeter => "cm",
            Self::Millimeter => "mm",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inch => write!(f, "Inch"),
            Self::Centimeter => write!(f, "Centimeter"),
            Self::Millimeter => write!(f, "Millimeter"),
        }
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inch" | "inches" | "in" => Ok(Self::Inch),
            "centimeter" | "centimeters" | "cm" => Ok(Self::Centimeter),
            "millimeter" | "millimeters" | "mm" => Ok(Self::Millimeter),
            _ => Err(format!("Unknown length unit: {}", s)),
        }
    }
}

/// Format an inch value with exactly four fixed decimals
///
/// Rust's float formatting is correctly rounded, so the output only depends
/// on the input bits. Negative zero is printed as `0.0000`.
pub fn format_inches(value: f64) -> String {
    let text = format!("{:.*}", COORDINATE_DECIMALS, value);
    if text.starts_with('-') && text[1..].bytes().all(|b| b == b'0' || b == b'.') {
        text[1..].to_string()
    } else {
        text
    }
}
