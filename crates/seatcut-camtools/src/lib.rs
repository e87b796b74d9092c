//! # SeatCut CAM Tools
//!
//! This crate turns seat sketch geometry into CNC motion programs.
//!
//! - **Path Planner**: walks line chains and stroked circles once per cutting
//!   depth, bridging every discontinuity with a retract, rapid and plunge
//! - **Motion Program**: typed instructions rendered as inch G-code with
//!   four fixed decimals

pub mod error;
pub mod motion;
pub mod path_planner;

pub use error::{CamToolError, CamToolResult, ParameterError, ParameterResult};
pub use motion::{MotionInstruction, MotionProgram, SpindleDirection};
pub use path_planner::{PathPlanner, PlannerConfig};
