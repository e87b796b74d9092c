//! `multipart/form-data` body encoding for job payload uploads.

use uuid::Uuid;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// One file part of a multipart body
#[derive(Debug, Clone, Copy)]
pub struct FilePart<'a> {
    /// Form field name
    pub field: &'a str,
    /// Filename reported to the server
    pub filename: &'a str,
    /// Raw file bytes
    pub content: &'a [u8],
}

impl<'a> FilePart<'a> {
    pub fn new(field: &'a str, filename: &'a str, content: &'a [u8]) -> Self {
        Self {
            field,
            filename,
            content,
        }
    }
}

/// Encodes form fields and files into a single multipart body.
///
/// Plain fields are written before files. Every part is framed by
/// `--<boundary>\r\n` and the body ends with `--<boundary>--\r\n`.
#[derive(Debug, Clone)]
pub struct MultipartFormdataEncoder {
    boundary: String,
}

impl MultipartFormdataEncoder {
    /// Encoder with a fresh random boundary (UUIDv4, hex without hyphens)
    pub fn new() -> Self {
        Self::with_boundary(Uuid::new_v4().simple().to_string())
    }

    /// Encoder with a fixed boundary
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's `Content-Type` header
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Build the request body
    pub fn encode(&self, fields: &[(&str, &str)], files: &[FilePart<'_>]) -> Vec<u8> {
        let mut body = Vec::new();

        for (name, value) in fields {
            body.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
            body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n", name).as_bytes(),
            );
            body.extend_from_slice(b"\r\n");
            body.extend_from_slice(value.as_bytes());
            body.extend_from_slice(b"\r\n");
        }

        for file in files {
            body.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    file.field, file.filename
                )
                .as_bytes(),
            );
            body.extend_from_slice(
                format!("Content-Type: {}\r\n", guess_mime_type(file.filename)).as_bytes(),
            );
            body.extend_from_slice(b"\r\n");
            body.extend_from_slice(file.content);
            body.extend_from_slice(b"\r\n");
        }

        body.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        body
    }
}

impl Default for MultipartFormdataEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// MIME type guessed from the filename extension
pub fn guess_mime_type(filename: &str) -> &'static str {
    mime_guess::from_path(filename)
        .first_raw()
        .unwrap_or(FALLBACK_MIME_TYPE)
}
