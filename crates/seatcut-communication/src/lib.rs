//! # SeatCut Communication
//!
//! Talks to FabMo tools over HTTP: finds tools through the local discovery
//! helper, queues jobs with the two-phase `/job` upload and reads tool
//! status. All network access goes through the [`HttpTransport`] trait.

pub mod discovery;
pub mod endpoint;
pub mod error;
pub mod multipart;
pub mod submitter;
pub mod transport;

pub use discovery::{discover_single_tool, find_tools, select_single_tool, DiscoveryOptions};
pub use endpoint::ToolEndpoint;
pub use error::{FabmoError, FabmoResult, Phase, TransportError, TransportResult};
pub use multipart::{FilePart, MultipartFormdataEncoder};
pub use submitter::{JobHandle, JobSubmission, JobSubmitter, ToolStatus};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportOptions};
