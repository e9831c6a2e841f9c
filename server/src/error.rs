//! Request-level error taxonomy.
//!
//! Validation-kind errors are caller mistakes and map to 400; upload and
//! persistence failures are infrastructure errors and map to 500 with a
//! generic message (details go to the log, not the response). Delivery
//! failures never appear here: once a record is saved, a failed email is
//! logged and, for the contact workflow, surfaced as a response warning.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::storage::StorageError;
use crate::store::StoreError;

/// Everything that can fail a submission request.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// One or more required form fields were absent.
    #[error("{0}")]
    MissingFields(&'static str),

    #[error("Resume file is required.")]
    MissingAttachment,

    #[error("Please provide a valid email address.")]
    InvalidEmail,

    #[error("Invalid file type. Only PDF, DOC, DOCX, and TXT files are allowed.")]
    InvalidFileType,

    #[error("File size exceeds 5MB limit.")]
    FileTooLarge,

    /// The multipart body could not be read.
    #[error("Error uploading file.")]
    MalformedUpload(String),

    /// The media service rejected or failed the upload. Inner detail is
    /// logged at the call site.
    #[error("Failed to upload resume.")]
    UploadFailed(String),

    /// Field-level schema validation messages from the record store.
    #[error("{0}")]
    Validation(String),

    /// The record store could not durably save the submission.
    #[error("Failed to process submission.")]
    Persistence(String),
}

impl SubmissionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SubmissionError::MissingFields(_)
            | SubmissionError::MissingAttachment
            | SubmissionError::InvalidEmail
            | SubmissionError::InvalidFileType
            | SubmissionError::FileTooLarge
            | SubmissionError::MalformedUpload(_)
            | SubmissionError::Validation(_) => StatusCode::BAD_REQUEST,
            SubmissionError::UploadFailed(_) | SubmissionError::Persistence(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        // The response body stays generic for infrastructure failures;
        // the detail goes to the log here.
        match &self {
            SubmissionError::UploadFailed(detail) => {
                error!(detail = %detail, "upload_failed");
            }
            SubmissionError::Persistence(detail) => {
                error!(detail = %detail, "persistence_failed");
            }
            SubmissionError::MalformedUpload(detail) => {
                warn!(detail = %detail, "malformed_upload_body");
            }
            _ => {}
        }

        let body = Json(json!({
            "success": false,
            "message": self.to_string(),
        }));

        (self.status_code(), body).into_response()
    }
}

impl From<StorageError> for SubmissionError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidFileType => SubmissionError::InvalidFileType,
            StorageError::FileTooLarge => SubmissionError::FileTooLarge,
            StorageError::Upload(detail) => SubmissionError::UploadFailed(detail),
        }
    }
}

impl From<StoreError> for SubmissionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(messages) => SubmissionError::Validation(messages.join(" ")),
            StoreError::Database(e) => SubmissionError::Persistence(e.to_string()),
        }
    }
}
