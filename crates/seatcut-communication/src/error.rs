//! Error types for tool discovery and job submission.
//!
//! Network-level failures (the request never got an answer) are kept apart
//! from application-level rejections (the tool answered "no") so callers
//! can tell "service not running" from "job invalid".

use std::fmt;
use thiserror::Error;

/// Step of the conversation with the tool (or the discovery helper)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Query to the local discovery helper
    Discovery,
    /// Job metadata registration
    Metadata,
    /// Multipart payload upload
    Payload,
    /// Status query
    Status,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discovery => write!(f, "discovery"),
            Self::Metadata => write!(f, "metadata registration"),
            Self::Payload => write!(f, "payload upload"),
            Self::Status => write!(f, "status query"),
        }
    }
}

/// Transport failure: no usable HTTP response was received
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Nothing is listening, or the host could not be reached
    #[error("Connection refused: {reason}")]
    ConnectionRefused {
        /// The underlying error text.
        reason: String,
    },

    /// Connect or read timeout elapsed
    #[error("Request timed out: {reason}")]
    Timeout {
        /// The underlying error text.
        reason: String,
    },

    /// Any other failure (reset, invalid URL, unreadable body)
    #[error("Transport error: {reason}")]
    Other {
        /// The underlying error text.
        reason: String,
    },
}

impl TransportError {
    pub fn other(reason: impl Into<String>) -> Self {
        Self::Other {
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by discovery, submission and status queries
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FabmoError {
    /// The discovery helper is not running
    #[error("Could not find any tools on the network: the tool minder service does not appear to be running at {url}")]
    DiscoveryUnavailable {
        /// The helper URL that refused the connection.
        url: String,
    },

    /// Discovery failed for any other reason
    #[error("Could not find any tools on the network: {reason}")]
    DiscoveryFailed {
        /// What went wrong.
        reason: String,
    },

    /// Discovery returned no tools
    #[error("No tools were found on the network")]
    NoToolFound,

    /// Discovery returned more than one tool
    #[error("There is more than one tool on the network ({count} found)")]
    MultipleToolsFound {
        /// Number of tools discovered.
        count: usize,
    },

    /// The tool refused the job
    #[error("Job rejected by tool: {message}")]
    SubmissionRejected {
        /// The tool's message, verbatim.
        message: String,
    },

    /// The tool answered a status query with an error
    #[error("Tool reported an error: {message}")]
    ToolReportedError {
        /// The tool's message, verbatim.
        message: String,
    },

    /// A response could not be parsed or lacked an expected field
    #[error("Malformed response during {phase}: {reason}")]
    MalformedResponse {
        /// Where the response came from.
        phase: Phase,
        /// What was wrong with it.
        reason: String,
    },

    /// The request did not complete
    #[error("Network error during {phase}: {source}")]
    Network {
        /// The step that failed.
        phase: Phase,
        /// The transport failure.
        source: TransportError,
    },
}

impl FabmoError {
    pub(crate) fn malformed(phase: Phase, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            phase,
            reason: reason.into(),
        }
    }

    /// The request never got an answer
    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::DiscoveryUnavailable { .. }
        )
    }

    /// The remote side answered and said no
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::SubmissionRejected { .. } | Self::ToolReportedError { .. }
        )
    }

    /// Phase the error belongs to, when known
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::DiscoveryUnavailable { .. }
            | Self::DiscoveryFailed { .. }
            | Self::NoToolFound
            | Self::MultipleToolsFound { .. } => Some(Phase::Discovery),
            Self::MalformedResponse { phase, .. } | Self::Network { phase, .. } => Some(*phase),
            Self::SubmissionRejected { .. } | Self::ToolReportedError { .. } => None,
        }
    }
}

/// Result type for discovery and submission
pub type FabmoResult<T> = Result<T, FabmoError>;

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;
