//! End-to-end "cut a seat" workflow.
//!
//! Plans the sketches into a motion program, finds the single tool on the
//! network and queues the program on it under the requester's name.

use anyhow::Context;
use seatcut_camtools::{MotionProgram, PathPlanner};
use seatcut_communication::{
    discover_single_tool, HttpTransport, JobHandle, JobSubmission, JobSubmitter, ToolEndpoint,
    ToolStatus,
};
use seatcut_core::SketchFile;
use seatcut_settings::Config;
use std::path::Path;

/// The person the seat is cut for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub name: String,
    pub email: String,
}

impl Requester {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// A job accepted by a tool
#[derive(Debug, Clone)]
pub struct SubmittedJob {
    pub tool: ToolEndpoint,
    pub handle: JobHandle,
}

impl SubmittedJob {
    /// Where the requester can watch the job
    pub fn job_manager_url(&self) -> String {
        self.tool.job_manager_url()
    }
}

/// Load a sketch file and plan it with the configured parameters
pub fn plan_sketch_file(config: &Config, path: &Path) -> anyhow::Result<MotionProgram> {
    config.planner.validate().context("Invalid planner settings")?;

    let sketches = SketchFile::load(path)
        .with_context(|| format!("Failed to load sketches from {}", path.display()))?;
    let groups = sketches
        .curve_groups(config.planner.stroke_tolerance)
        .context("Failed to prepare sketch geometry")?;

    let program = PathPlanner::new(config.planner.clone()).plan(&groups);
    tracing::info!(
        groups = groups.len(),
        instructions = program.len(),
        plunges = program.plunge_count(),
        "Planned motion program"
    );
    Ok(program)
}

/// The submission for a requester's seat
pub fn build_submission(
    program: &MotionProgram,
    requester: &Requester,
    filename: &str,
) -> JobSubmission {
    JobSubmission::new(program.to_gcode())
        .with_filename(filename)
        .with_name(format!("Stool for {}", requester.name))
        .with_description(format!(
            "Submitted by: {}, Email: {}",
            requester.name, requester.email
        ))
}

/// Queue `program` on the single tool on the network
pub fn cut_seat<T: HttpTransport>(
    transport: &T,
    config: &Config,
    program: &MotionProgram,
    requester: &Requester,
) -> anyhow::Result<SubmittedJob> {
    let tool = discover_single_tool(transport, &config.discovery.to_options())
        .context("Failed to select a tool")?;
    tracing::info!(tool = %tool, "Selected tool");

    let submission = build_submission(program, requester, &config.job.filename);
    let handle = JobSubmitter::new(transport)
        .submit(&submission, &tool)
        .with_context(|| format!("Failed to submit job to {}", tool))?;

    Ok(SubmittedJob { tool, handle })
}

/// Status of the single tool on the network
pub fn tool_status<T: HttpTransport>(
    transport: &T,
    config: &Config,
) -> anyhow::Result<(ToolEndpoint, ToolStatus)> {
    let tool = discover_single_tool(transport, &config.discovery.to_options())
        .context("Failed to select a tool")?;
    let status = JobSubmitter::new(transport)
        .get_status(&tool)
        .with_context(|| format!("Failed to read status of {}", tool))?;
    Ok((tool, status))
}
