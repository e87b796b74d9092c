//! # SeatCut
//!
//! Turns decorative seat sketches into CNC motion programs and queues them
//! on a FabMo tool.
//!
//! ## Architecture
//!
//! SeatCut is organized as a workspace with multiple crates:
//!
//! 1. **seatcut-core** - Sketch geometry, units, shared errors
//! 2. **seatcut-camtools** - Path planner and motion programs
//! 3. **seatcut-communication** - Tool discovery and job submission over HTTP
//! 4. **seatcut-settings** - Configuration files
//! 5. **seatcut** - Workflow glue and the command-line binary

pub mod workflow;

pub use seatcut_camtools::{
    MotionInstruction, MotionProgram, PathPlanner, PlannerConfig, SpindleDirection,
};
pub use seatcut_communication::{
    FabmoError, HttpTransport, JobHandle, JobSubmission, JobSubmitter, ReqwestTransport,
    ToolEndpoint, ToolStatus,
};
pub use seatcut_core::{CurveGroup, Point2D, SketchFile};
pub use seatcut_settings::Config;
pub use workflow::{build_submission, cut_seat, plan_sketch_file, tool_status, Requester, SubmittedJob};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Build the log filter.
///
/// A non-empty `RUST_LOG` value is used as given. Without one the base level
/// is INFO. Each `-v` raises the global level on top of either.
pub fn log_filter(verbosity: u8, rust_log: Option<&str>) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    let level = match verbosity {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    match rust_log.map(str::trim).filter(|d| !d.is_empty()) {
        Some(directives) if verbosity == 0 => EnvFilter::new(directives),
        Some(directives) => EnvFilter::new(directives).add_directive(level.into()),
        None => EnvFilter::new(level.as_str()),
    }
}

/// Initialize logging
///
/// Sets up structured logging with:
/// - Pretty console output on stderr, so stdout can carry G-code
/// - RUST_LOG environment variable support
/// - A base level of INFO, raised to DEBUG or TRACE by `verbosity`
pub fn init_logging(verbosity: u8) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = log_filter(verbosity, rust_log.as_deref());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(verbosity > 0)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
