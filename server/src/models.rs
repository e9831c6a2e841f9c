//! Persisted document models for the two submission collections.
//!
//! Field names serialize in camelCase to match the existing collections,
//! so stored data and the lookup indexes keep working.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

/// Review status of a stored job application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Shortlisted,
    Rejected,
    Accepted,
}

/// Triage status of a stored contact inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    #[default]
    New,
    Read,
    Replied,
    Archived,
}

/// Reference to a resume stored in the media service.
///
/// A resume record exists fully populated or not at all: the upload
/// completes before the application document is ever written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub url: String,

    /// Opaque identifier assigned by the media service
    pub public_id: String,

    #[serde(rename = "uploadedAt", with = "chrono_datetime_as_bson_datetime")]
    pub uploaded_at: DateTime<Utc>,
}

/// A persisted job application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,

    pub email: String,

    pub phone: Option<String>,

    pub position: String,

    pub cover_letter: Option<String>,

    pub resume: ResumeRecord,

    #[serde(default)]
    pub status: ApplicationStatus,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub submitted_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// A persisted contact inquiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInquiry {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,

    pub email: String,

    pub company: Option<String>,

    pub project_type: Option<String>,

    pub budget: Option<String>,

    pub timeline: Option<String>,

    pub message: String,

    #[serde(default)]
    pub status: InquiryStatus,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub submitted_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Validated application fields ready for persistence.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: String,
    pub cover_letter: Option<String>,
    pub resume: ResumeRecord,
}

/// Validated inquiry fields ready for persistence.
#[derive(Debug, Clone)]
pub struct NewInquiry {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub project_type: Option<String>,
    pub budget: Option<String>,
    pub timeline: Option<String>,
    pub message: String,
}
