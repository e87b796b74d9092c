//! Tool-path planning for seat sketches.
//!
//! Walks each curve group once per cutting depth and emits the motion
//! program that cuts it: connected line chains are cut without lifting the
//! tool, every discontinuity is bridged by a retract, a rapid traverse and a
//! plunge, and stroked circles are cut vertex by vertex.

use crate::error::{ParameterError, ParameterResult};
use crate::motion::{MotionInstruction, MotionProgram, SpindleDirection};
use seatcut_core::{CurveGroup, LengthUnit, Point2D};
use serde::{Deserialize, Serialize};

/// Parameters for the path planner.
///
/// Lengths are in `source_units`; the feed rate is always inches per minute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Unit the sketch geometry and the lengths below are expressed in
    pub source_units: LengthUnit,
    /// Safe Z for travel between cuts
    pub retract_height: f64,
    /// Cutting depths, one full pass each, in the given order
    pub depths: Vec<f64>,
    /// Maximum chordal deviation when stroking circles
    pub stroke_tolerance: f64,
    /// Smallest decorative feature the layout generators may produce
    pub min_feature_size: f64,
    /// Feed rate for cutting moves (in/min)
    pub feed_rate: f64,
    pub spindle_direction: SpindleDirection,
    /// Pause after starting the spindle so it can spin up
    pub spindle_dwell_seconds: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            source_units: LengthUnit::Centimeter,
            retract_height: 0.5,
            depths: vec![-0.09, -0.1],
            stroke_tolerance: 0.005,
            min_feature_size: 2.54,
            feed_rate: 60.0,
            spindle_direction: SpindleDirection::CounterClockwise,
            spindle_dwell_seconds: 2.0,
        }
    }
}

impl PlannerConfig {
    /// Validate the parameters.
    ///
    /// An empty depth list is allowed and produces a program that only
    /// starts and stops the spindle.
    pub fn validate(&self) -> ParameterResult<()> {
        if !self.retract_height.is_finite() {
            return Err(ParameterError::InvalidValue {
                name: "retract_height".to_string(),
                reason: "must be finite".to_string(),
            });
        }

        for (idx, depth) in self.depths.iter().enumerate() {
            if !depth.is_finite() {
                return Err(ParameterError::InvalidValue {
                    name: format!("depths[{}]", idx),
                    reason: "must be finite".to_string(),
                });
            }
            if *depth >= self.retract_height {
                return Err(ParameterError::Incompatible(format!(
                    "depth {} is not below retract height {}",
                    depth, self.retract_height
                )));
            }
        }

        if !(self.stroke_tolerance.is_finite() && self.stroke_tolerance > 0.0) {
            return Err(ParameterError::OutOfRange {
                name: "stroke_tolerance".to_string(),
                value: self.stroke_tolerance,
                min: 0.0,
                max: f64::INFINITY,
            });
        }

        if !(self.min_feature_size.is_finite() && self.min_feature_size > 0.0) {
            return Err(ParameterError::OutOfRange {
                name: "min_feature_size".to_string(),
                value: self.min_feature_size,
                min: 0.0,
                max: f64::INFINITY,
            });
        }

        if !(self.feed_rate.is_finite() && self.feed_rate > 0.0) {
            return Err(ParameterError::OutOfRange {
                name: "feed_rate".to_string(),
                value: self.feed_rate,
                min: 0.0,
                max: f64::INFINITY,
            });
        }

        if !(self.spindle_dwell_seconds.is_finite() && self.spindle_dwell_seconds >= 0.0) {
            return Err(ParameterError::OutOfRange {
                name: "spindle_dwell_seconds".to_string(),
                value: self.spindle_dwell_seconds,
                min: 0.0,
                max: f64::INFINITY,
            });
        }

        Ok(())
    }
}

/// Converts curve groups into a motion program.
#[derive(Debug, Clone)]
pub struct PathPlanner {
    config: PlannerConfig,
}

impl PathPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan the whole program. Never fails; identical inputs always give
    /// identical programs.
    pub fn plan(&self, groups: &[CurveGroup]) -> MotionProgram {
        let mut program = MotionProgram::new();

        self.emit_header(&mut program);
        for group in groups {
            tracing::debug!(
                group = %group.name,
                curves = group.curves.len(),
                passes = self.config.depths.len(),
                "Planning curve group"
            );
            self.emit_line_chains(&mut program, group);
            self.emit_polylines(&mut program, group);
        }
        self.emit_footer(&mut program);

        tracing::debug!(
            instructions = program.len(),
            plunges = program.plunge_count(),
            "Planned motion program"
        );
        program
    }

    /// Plan and render to text.
    pub fn generate_gcode(&self, groups: &[CurveGroup]) -> String {
        self.plan(groups).to_gcode()
    }

    fn inches(&self, value: f64) -> f64 {
        self.config.source_units.to_inches(value)
    }

    fn retract(&self) -> MotionInstruction {
        MotionInstruction::rapid_z(self.inches(self.config.retract_height))
    }

    fn emit_header(&self, program: &mut MotionProgram) {
        program.push(MotionInstruction::SelectInches);
        program.push(MotionInstruction::SetFeedRate {
            rate: self.config.feed_rate,
        });
        program.push(self.retract());
        program.push(MotionInstruction::SpindleOn {
            direction: self.config.spindle_direction,
        });
        program.push(MotionInstruction::Dwell {
            seconds: self.config.spindle_dwell_seconds,
        });
    }

    fn emit_footer(&self, program: &mut MotionProgram) {
        program.push(MotionInstruction::SpindleOff);
        program.push(MotionInstruction::rapid_xy(0.0, 0.0));
        program.push(MotionInstruction::EndProgram);
    }

    fn emit_line_chains(&self, program: &mut MotionProgram, group: &CurveGroup) {
        if group.line_segments().next().is_none() {
            return;
        }

        for &depth in &self.config.depths {
            let mut cursor: Option<Point2D> = None;

            for (start, end) in group.line_segments() {
                if cursor != Some(start) {
                    program.push(self.retract());
                    program.push(MotionInstruction::rapid_xy(
                        self.inches(start.x),
                        self.inches(start.y),
                    ));
                    program.push(MotionInstruction::linear_z(self.inches(depth)));
                }
                program.push(MotionInstruction::linear_xy(
                    self.inches(end.x),
                    self.inches(end.y),
                ));
                cursor = Some(end);
            }

            program.push(self.retract());
        }
    }

    fn emit_polylines(&self, program: &mut MotionProgram, group: &CurveGroup) {
        for vertices in group.polylines() {
            let Some((first, rest)) = vertices.split_first() else {
                continue;
            };

            for &depth in &self.config.depths {
                program.push(MotionInstruction::rapid_xy(
                    self.inches(first.x),
                    self.inches(first.y),
                ));
                program.push(MotionInstruction::linear_z(self.inches(depth)));
                for vertex in rest {
                    program.push(MotionInstruction::linear_xy(
                        self.inches(vertex.x),
                        self.inches(vertex.y),
                    ));
                }
                program.push(self.retract());
            }
        }
    }
}

impl Default for PathPlanner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}
