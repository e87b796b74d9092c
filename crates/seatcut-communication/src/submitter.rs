//! Two-phase job submission to a FabMo tool.
//!
//! Phase one registers job metadata with `POST /job` and receives an upload
//! key. Phase two posts the program as a multipart body carrying that key.
//! The key is moved from the first phase into the second and cannot be
//! reused.

use crate::endpoint::ToolEndpoint;
use crate::error::{FabmoError, FabmoResult, Phase};
use crate::multipart::{FilePart, MultipartFormdataEncoder};
use crate::transport::{HttpResponse, HttpTransport};
use serde::Serialize;
use serde_json::Value;

/// Filename used when the submission does not name one
pub const DEFAULT_JOB_FILENAME: &str = "job.nc";

const JOB_PATH: &str = "/job";
const STATUS_PATH: &str = "/status";

/// A program to queue on a tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSubmission {
    /// Program text
    pub code: String,
    /// Filename reported to the tool
    pub filename: String,
    /// Short display name, defaults to the filename
    pub name: Option<String>,
    /// Longer description, defaults to empty
    pub description: Option<String>,
}

impl JobSubmission {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            filename: DEFAULT_JOB_FILENAME.to_string(),
            name: None,
            description: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.filename)
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// The tool's record of a queued job
#[derive(Debug, Clone, PartialEq)]
pub struct JobHandle {
    /// Job identifier
    pub job_id: String,
    /// Queue state as reported by the tool
    pub status: String,
    /// Full job object
    pub raw: Value,
}

impl JobHandle {
    fn from_job(job: Value) -> Self {
        let job_id = job
            .get("_id")
            .or_else(|| job.get("id"))
            .map(value_to_string)
            .unwrap_or_default();
        let status = job
            .get("state")
            .or_else(|| job.get("status"))
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        Self {
            job_id,
            status,
            raw: job,
        }
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The `data` object of a `GET /status` response
#[derive(Debug, Clone, PartialEq)]
pub struct ToolStatus(pub Value);

impl ToolStatus {
    /// Machine state, e.g. `idle` or `running`
    pub fn state(&self) -> Option<&str> {
        self.0.get("state").and_then(Value::as_str)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }
}

/// Upload key returned by the metadata phase
#[derive(Debug)]
struct UploadSession {
    key: String,
}

#[derive(Serialize)]
struct JobMetadata<'a> {
    files: [FileMetadata<'a>; 1],
    meta: serde_json::Map<String, Value>,
}

#[derive(Serialize)]
struct FileMetadata<'a> {
    filename: &'a str,
    name: &'a str,
    description: &'a str,
}

/// Submits jobs and queries tool status over an [`HttpTransport`]
#[derive(Debug)]
pub struct JobSubmitter<T: HttpTransport> {
    transport: T,
}

impl<T: HttpTransport> JobSubmitter<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Queue a job on the tool
    pub fn submit(&self, job: &JobSubmission, tool: &ToolEndpoint) -> FabmoResult<JobHandle> {
        tracing::info!(
            tool = %tool,
            filename = %job.filename,
            name = %job.display_name(),
            "Submitting job"
        );

        let handle = self
            .register(job, tool)
            .and_then(|session| self.upload(session, job, tool))
            .inspect_err(|e| tracing::warn!(tool = %tool, "Job submission failed: {}", e))?;

        tracing::info!(job_id = %handle.job_id, status = %handle.status, "Job queued");
        Ok(handle)
    }

    fn register(&self, job: &JobSubmission, tool: &ToolEndpoint) -> FabmoResult<UploadSession> {
        let metadata = JobMetadata {
            files: [FileMetadata {
                filename: &job.filename,
                name: job.display_name(),
                description: job.description(),
            }],
            meta: serde_json::Map::new(),
        };
        let body = serde_json::to_vec(&metadata)
            .map_err(|e| FabmoError::malformed(Phase::Metadata, e.to_string()))?;

        let response = self.post(tool, Phase::Metadata, "application/json", body)?;
        let reply = parse_json(Phase::Metadata, &response)?;

        match reply.pointer("/data/key") {
            Some(key) => {
                let key = value_to_string(key);
                tracing::debug!("Received upload key");
                Ok(UploadSession { key })
            }
            None => match status_of(&reply) {
                Some(status) if status != "success" => Err(FabmoError::SubmissionRejected {
                    message: message_of(&reply),
                }),
                _ => Err(FabmoError::malformed(
                    Phase::Metadata,
                    "response has no data.key",
                )),
            },
        }
    }

    fn upload(
        &self,
        session: UploadSession,
        job: &JobSubmission,
        tool: &ToolEndpoint,
    ) -> FabmoResult<JobHandle> {
        let encoder = MultipartFormdataEncoder::new();
        let body = encoder.encode(
            &[("key", session.key.as_str()), ("index", "0")],
            &[FilePart::new("file", &job.filename, job.code.as_bytes())],
        );

        let response = self.post(tool, Phase::Payload, &encoder.content_type(), body)?;
        let reply = parse_json(Phase::Payload, &response)?;

        if status_of(&reply) != Some("success") {
            return Err(FabmoError::SubmissionRejected {
                message: message_of(&reply),
            });
        }

        let job = reply
            .pointer("/data/data/jobs/0")
            .cloned()
            .ok_or_else(|| FabmoError::malformed(Phase::Payload, "response has no data.data.jobs[0]"))?;
        Ok(JobHandle::from_job(job))
    }

    /// Current status of the tool
    pub fn get_status(&self, tool: &ToolEndpoint) -> FabmoResult<ToolStatus> {
        let response = self
            .transport
            .get(&tool.url(STATUS_PATH))
            .map_err(|source| FabmoError::Network {
                phase: Phase::Status,
                source,
            })?;
        let reply = parse_json(Phase::Status, &response)?;

        if status_of(&reply) == Some("error") {
            tracing::warn!(tool = %tool, "Tool reported an error on status query");
            return Err(FabmoError::ToolReportedError {
                message: message_of(&reply),
            });
        }

        reply
            .pointer("/data/status")
            .cloned()
            .map(ToolStatus)
            .ok_or_else(|| FabmoError::malformed(Phase::Status, "response has no data.status"))
    }

    fn post(
        &self,
        tool: &ToolEndpoint,
        phase: Phase,
        content_type: &str,
        body: Vec<u8>,
    ) -> FabmoResult<HttpResponse> {
        self.transport
            .post(&tool.url(JOB_PATH), content_type, body)
            .map_err(|source| FabmoError::Network { phase, source })
    }
}

fn parse_json(phase: Phase, response: &HttpResponse) -> FabmoResult<Value> {
    serde_json::from_str(&response.body).map_err(|e| {
        FabmoError::malformed(
            phase,
            format!("HTTP {} with unparseable body: {}", response.status, e),
        )
    })
}

fn status_of(reply: &Value) -> Option<&str> {
    reply.get("status").and_then(Value::as_str)
}

fn message_of(reply: &Value) -> String {
    match reply.get("message") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "no message given".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_submission_defaults() {
        let job = JobSubmission::new("G20\n");
        assert_eq!(job.filename, "job.nc");
        assert_eq!(job.display_name(), "job.nc");
        assert_eq!(job.description(), "");

        let job = job.with_filename("stool.nc").with_name("Stool for Ada");
        assert_eq!(job.display_name(), "Stool for Ada");
    }

    #[test]
    fn test_job_handle_fields() {
        let handle = JobHandle::from_job(json!({"_id": 42, "state": "pending", "name": "x"}));
        assert_eq!(handle.job_id, "42");
        assert_eq!(handle.status, "pending");
        assert_eq!(handle.raw["name"], "x");

        let handle = JobHandle::from_job(json!({"id": "j-7", "status": "queued"}));
        assert_eq!(handle.job_id, "j-7");
        assert_eq!(handle.status, "queued");

        let handle = JobHandle::from_job(json!({}));
        assert_eq!(handle.job_id, "");
        assert_eq!(handle.status, "unknown");
    }

    #[test]
    fn test_metadata_body_shape() {
        let metadata = JobMetadata {
            files: [FileMetadata {
                filename: "stool.nc",
                name: "Stool for Ada",
                description: "",
            }],
            meta: serde_json::Map::new(),
        };
        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(
            value,
            json!({
                "files": [{"filename": "stool.nc", "name": "Stool for Ada", "description": ""}],
                "meta": {}
            })
        );
    }

    #[test]
    fn test_message_of() {
        assert_eq!(message_of(&json!({"message": "disk full"})), "disk full");
        assert_eq!(message_of(&json!({"message": {"code": 3}})), r#"{"code":3}"#);
        assert_eq!(message_of(&json!({})), "no message given");
    }

    #[test]
    fn test_tool_status_state() {
        let status = ToolStatus(json!({"state": "idle", "posx": 0.0}));
        assert_eq!(status.state(), Some("idle"));
        assert_eq!(ToolStatus(json!("idle")).state(), None);
    }
}
