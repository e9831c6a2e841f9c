//! Resume uploads to the hosted media service.
//!
//! A resume travels as an in-memory buffer: the handler reads the multipart
//! field, the uploader validates it and makes exactly one signed HTTP call
//! to the media API. There is no retry; a transport or API failure surfaces
//! as an upload error and the submission aborts before anything is
//! persisted.

use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::StorageSettings;

/// Maximum accepted resume size.
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

/// MIME types accepted for resumes: PDF, DOC, DOCX, and TXT.
pub const ALLOWED_MIME_TYPES: [&str; 4] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

/// Folder grouping all resume uploads in the media service.
pub const RESUME_FOLDER: &str = "careers/resumes";

/// Failures raised by the uploader.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid file type. Only PDF, DOC, DOCX, and TXT files are allowed.")]
    InvalidFileType,

    #[error("File size exceeds 5MB limit.")]
    FileTooLarge,

    /// Transport or API failure from the media service.
    #[error("upload failed: {0}")]
    Upload(String),
}

/// An uploaded file as received from the multipart form.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Result of a successful upload.
#[derive(Debug, Clone)]
pub struct StoredAttachment {
    pub url: String,
    pub public_id: String,
    pub format: Option<String>,
    pub bytes: u64,
    pub created_at: DateTime<Utc>,
}

/// Check a resume against the MIME allow-list and size limit.
pub fn validate_resume(content_type: &str, len: usize) -> Result<(), StorageError> {
    if !ALLOWED_MIME_TYPES.contains(&content_type) {
        return Err(StorageError::InvalidFileType);
    }
    if len > MAX_RESUME_BYTES {
        return Err(StorageError::FileTooLarge);
    }
    Ok(())
}

/// Adapter for the media storage HTTP API.
#[derive(Clone)]
pub struct CloudStorage {
    client: reqwest::Client,
    settings: StorageSettings,
}

/// Subset of the upload response we keep.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    format: Option<String>,
    bytes: u64,
    created_at: Option<String>,
}

/// Error body returned by the media API on failure.
#[derive(Debug, Deserialize)]
struct UploadErrorResponse {
    error: UploadErrorDetail,
}

#[derive(Debug, Deserialize)]
struct UploadErrorDetail {
    message: String,
}

impl CloudStorage {
    pub fn new(settings: StorageSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    /// Upload a resume buffer, returning the public URL and storage id.
    ///
    /// Re-validates type and size even though the pipeline checks first.
    pub async fn upload(
        &self,
        file: ResumeUpload,
        folder: &str,
    ) -> Result<StoredAttachment, StorageError> {
        validate_resume(&file.content_type, file.data.len())?;

        let now = Utc::now();
        let public_id = derive_public_id(&file.file_name, now.timestamp_millis());
        let timestamp = now.timestamp().to_string();

        let signature = sign_upload(
            &[
                ("folder", folder),
                ("public_id", &public_id),
                ("timestamp", &timestamp),
            ],
            &self.settings.api_secret,
        );

        let endpoint = format!(
            "https://api.cloudinary.com/v1_1/{}/auto/upload",
            self.settings.cloud_name
        );

        info!(
            public_id = %public_id,
            folder = folder,
            bytes = file.data.len(),
            content_type = %file.content_type,
            "resume_upload_starting"
        );

        let file_part = Part::bytes(file.data)
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        let form = Form::new()
            .text("api_key", self.settings.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("public_id", public_id)
            .text("signature", signature)
            .text("signature_algorithm", "sha256")
            .part("file", file_part);

        let response = self
            .client
            .post(&endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<UploadErrorResponse>().await {
                Ok(body) => body.error.message,
                Err(_) => format!("media API returned status {}", status.as_u16()),
            };
            warn!(status = status.as_u16(), detail = %detail, "resume_upload_rejected");
            return Err(StorageError::Upload(detail));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        info!(
            public_id = %body.public_id,
            bytes = body.bytes,
            "resume_upload_complete"
        );

        let created_at = body
            .created_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(now);

        Ok(StoredAttachment {
            url: body.secure_url,
            public_id: body.public_id,
            format: body.format,
            bytes: body.bytes,
            created_at,
        })
    }
}

/// Derive a unique-enough storage key from the upload time and filename.
///
/// Collisions are accepted as negligible; there is no retry on conflict.
fn derive_public_id(file_name: &str, timestamp_millis: i64) -> String {
    let sanitized = sanitize_file_name(file_name);
    format!("{}_{}", timestamp_millis, strip_document_extension(&sanitized))
}

/// Sanitize an original filename: whitespace becomes `_`, anything outside
/// `[A-Za-z0-9._-]` is dropped, and the result is lowercased.
fn sanitize_file_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect::<String>()
        .to_lowercase()
}

/// Strip a trailing document extension so the storage key stays format-free.
fn strip_document_extension(name: &str) -> &str {
    for ext in [".pdf", ".doc", ".docx", ".txt"] {
        if let Some(stem) = name.strip_suffix(ext) {
            return stem;
        }
    }
    name
}

/// Sign the upload request: SHA-256 hex over the alphabetically ordered
/// parameters concatenated with the API secret.
fn sign_upload(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.to_vec();
    sorted.sort_by_key(|(key, _)| *key);

    let payload = sorted
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
