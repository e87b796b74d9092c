//! Motion instructions and programs.
//!
//! A [`MotionProgram`] is the ordered instruction list produced by the path
//! planner. Coordinates are stored in inches; only the axes that change are
//! carried, so omitted axes keep their previous position on the controller.

use crate::error::CamToolResult;
use seatcut_core::units::format_inches;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Spindle rotation direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpindleDirection {
    /// M3
    Clockwise,
    /// M4
    #[default]
    CounterClockwise,
}

impl SpindleDirection {
    pub fn code(self) -> &'static str {
        match self {
            Self::Clockwise => "M3",
            Self::CounterClockwise => "M4",
        }
    }
}

/// A single motion-program instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionInstruction {
    /// G20
    SelectInches,
    /// Modal feed rate in inches per minute
    SetFeedRate { rate: f64 },
    /// G0
    RapidMove {
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
    },
    /// G1
    LinearMove {
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
    },
    SpindleOn { direction: SpindleDirection },
    SpindleOff,
    /// G4 pause
    Dwell { seconds: f64 },
    /// M30
    EndProgram,
}

impl MotionInstruction {
    pub fn rapid_z(z: f64) -> Self {
        Self::RapidMove {
            x: None,
            y: None,
            z: Some(z),
        }
    }

    pub fn rapid_xy(x: f64, y: f64) -> Self {
        Self::RapidMove {
            x: Some(x),
            y: Some(y),
            z: None,
        }
    }

    pub fn linear_z(z: f64) -> Self {
        Self::LinearMove {
            x: None,
            y: None,
            z: Some(z),
        }
    }

    pub fn linear_xy(x: f64, y: f64) -> Self {
        Self::LinearMove {
            x: Some(x),
            y: Some(y),
            z: None,
        }
    }

    /// Z-only feed move into the material.
    pub fn is_plunge(&self) -> bool {
        matches!(
            self,
            Self::LinearMove {
                x: None,
                y: None,
                z: Some(_)
            }
        )
    }

    /// Z-only rapid move, i.e. a retract.
    pub fn is_retract(&self) -> bool {
        matches!(
            self,
            Self::RapidMove {
                x: None,
                y: None,
                z: Some(_)
            }
        )
    }

    /// Feed move in the XY plane.
    pub fn is_cutting_move(&self) -> bool {
        matches!(self, Self::LinearMove { x, y, .. } if x.is_some() || y.is_some())
    }

    /// Render the instruction as one line of G-code.
    pub fn to_gcode(&self) -> String {
        match self {
            Self::SelectInches => "G20".to_string(),
            Self::SetFeedRate { rate } => format!("G1 F{}", rate),
            Self::RapidMove { x, y, z } => format_move("G0", *x, *y, *z),
            Self::LinearMove { x, y, z } => format_move("G1", *x, *y, *z),
            Self::SpindleOn { direction } => direction.code().to_string(),
            Self::SpindleOff => "M5".to_string(),
            Self::Dwell { seconds } => format!("G4 P{}", seconds),
            Self::EndProgram => "M30".to_string(),
        }
    }
}

fn format_move(code: &str, x: Option<f64>, y: Option<f64>, z: Option<f64>) -> String {
    let mut line = code.to_string();
    for (axis, value) in [('X', x), ('Y', y), ('Z', z)] {
        if let Some(v) = value {
            line.push(' ');
            line.push(axis);
            line.push_str(&format_inches(v));
        }
    }
    line
}

impl fmt::Display for MotionInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_gcode())
    }
}

/// Ordered instruction sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionProgram {
    pub instructions: Vec<MotionInstruction>,
}

impl MotionProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instruction: MotionInstruction) {
        self.instructions.push(instruction);
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MotionInstruction> {
        self.instructions.iter()
    }

    pub fn plunge_count(&self) -> usize {
        self.iter().filter(|i| i.is_plunge()).count()
    }

    pub fn retract_count(&self) -> usize {
        self.iter().filter(|i| i.is_retract()).count()
    }

    pub fn cutting_move_count(&self) -> usize {
        self.iter().filter(|i| i.is_cutting_move()).count()
    }

    /// Program text, one instruction per line, newline terminated.
    pub fn to_gcode(&self) -> String {
        let mut gcode = String::new();
        for instruction in &self.instructions {
            gcode.push_str(&instruction.to_gcode());
            gcode.push('\n');
        }
        gcode
    }

    pub fn write_to_file(&self, path: &Path) -> CamToolResult<()> {
        std::fs::write(path, self.to_gcode())?;
        tracing::info!(
            path = %path.display(),
            lines = self.len(),
            "Wrote motion program"
        );
        Ok(())
    }
}

impl fmt::Display for MotionProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_gcode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_rendering() {
        assert_eq!(MotionInstruction::SelectInches.to_gcode(), "G20");
        assert_eq!(MotionInstruction::SetFeedRate { rate: 60.0 }.to_gcode(), "G1 F60");
        assert_eq!(MotionInstruction::rapid_z(0.25).to_gcode(), "G0 Z0.2500");
        assert_eq!(
            MotionInstruction::rapid_xy(1.0, -2.5).to_gcode(),
            "G0 X1.0000 Y-2.5000"
        );
        assert_eq!(MotionInstruction::linear_z(-0.0625).to_gcode(), "G1 Z-0.0625");
        assert_eq!(
            MotionInstruction::SpindleOn {
                direction: SpindleDirection::CounterClockwise
            }
            .to_gcode(),
            "M4"
        );
        assert_eq!(
            MotionInstruction::SpindleOn {
                direction: SpindleDirection::Clockwise
            }
            .to_gcode(),
            "M3"
        );
        assert_eq!(MotionInstruction::Dwell { seconds: 2.0 }.to_gcode(), "G4 P2");
        assert_eq!(MotionInstruction::SpindleOff.to_gcode(), "M5");
        assert_eq!(MotionInstruction::EndProgram.to_gcode(), "M30");
    }

    #[test]
    fn test_full_axis_move() {
        let m = MotionInstruction::LinearMove {
            x: Some(0.5),
            y: None,
            z: Some(-0.1),
        };
        assert_eq!(m.to_gcode(), "G1 X0.5000 Z-0.1000");
        assert!(m.is_cutting_move());
        assert!(!m.is_plunge());
    }

    #[test]
    fn test_classification() {
        assert!(MotionInstruction::linear_z(-0.1).is_plunge());
        assert!(MotionInstruction::rapid_z(0.2).is_retract());
        assert!(!MotionInstruction::rapid_xy(0.0, 0.0).is_retract());
        assert!(MotionInstruction::linear_xy(1.0, 1.0).is_cutting_move());
    }

    #[test]
    fn test_program_text() {
        let mut program = MotionProgram::new();
        program.push(MotionInstruction::SelectInches);
        program.push(MotionInstruction::linear_z(-0.1));
        program.push(MotionInstruction::EndProgram);

        assert_eq!(program.to_gcode(), "G20\nG1 Z-0.1000\nM30\n");
        assert_eq!(program.to_string(), program.to_gcode());
        assert_eq!(program.plunge_count(), 1);
        assert_eq!(program.len(), 3);
    }

    #[test]
    fn test_iter_searches_from_both_ends() {
        let mut program = MotionProgram::new();
        program.push(MotionInstruction::linear_xy(0.0, 1.0));
        program.push(MotionInstruction::rapid_z(0.5));
        program.push(MotionInstruction::linear_xy(1.0, 1.0));
        program.push(MotionInstruction::EndProgram);

        assert_eq!(program.iter().position(|i| i.is_cutting_move()), Some(0));
        assert_eq!(program.iter().rposition(|i| i.is_cutting_move()), Some(2));
        assert_eq!(program.iter().rev().next(), Some(&MotionInstruction::EndProgram));
        assert_eq!(program.iter().len(), 4);
    }

    #[test]
    fn test_default_spindle_direction() {
        assert_eq!(SpindleDirection::default(), SpindleDirection::CounterClockwise);
        assert_eq!(SpindleDirection::default().code(), "M4");
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seat.nc");
        let mut program = MotionProgram::new();
        program.push(MotionInstruction::EndProgram);

        program.write_to_file(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "M30\n");
    }
}
