//! MongoDB record store for submission documents.
//!
//! The store exclusively owns persisted documents: it normalizes and
//! validates incoming fields, assigns defaults (status, timestamps), and
//! writes to the two independent collections. The secondary indexes it
//! creates are read-path optimizations for the administrative tooling and
//! carry no invariants.

use chrono::Utc;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::{Client, Collection, IndexModel};
use thiserror::Error;
use tracing::info;

use crate::models::{
    ApplicationStatus, ContactInquiry, InquiryStatus, JobApplication, NewApplication, NewInquiry,
};
use crate::util::is_valid_email;

/// Collection holding job applications.
pub const APPLICATIONS_COLLECTION: &str = "career_applications";

/// Collection holding contact inquiries.
pub const CONTACTS_COLLECTION: &str = "contacts";

/// Failures raised by the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Field-level schema violations; the request is a caller mistake.
    #[error("validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),

    /// Connectivity or write failure; the submission was not saved.
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

/// Handle on the two submission collections.
#[derive(Clone)]
pub struct RecordStore {
    applications: Collection<JobApplication>,
    inquiries: Collection<ContactInquiry>,
}

impl RecordStore {
    /// Connect to MongoDB and verify the deployment is reachable.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, mongodb::error::Error> {
        info!(db = db_name, "mongodb_connecting");

        let client = Client::with_uri_str(uri).await?;
        let db = client.database(db_name);
        db.run_command(doc! { "ping": 1 }).await?;

        info!(db = db_name, "mongodb_connected");

        Ok(Self::new(&db))
    }

    /// Build a store on an existing database handle.
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            applications: db.collection(APPLICATIONS_COLLECTION),
            inquiries: db.collection(CONTACTS_COLLECTION),
        }
    }

    /// Create the secondary lookup indexes (idempotent).
    pub async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        self.applications
            .create_indexes(vec![
                IndexModel::builder()
                    .keys(doc! { "email": 1, "submittedAt": -1 })
                    .build(),
                IndexModel::builder().keys(doc! { "position": 1 }).build(),
                IndexModel::builder().keys(doc! { "status": 1 }).build(),
            ])
            .await?;

        self.inquiries
            .create_indexes(vec![
                IndexModel::builder()
                    .keys(doc! { "email": 1, "submittedAt": -1 })
                    .build(),
                IndexModel::builder().keys(doc! { "status": 1 }).build(),
                IndexModel::builder().keys(doc! { "projectType": 1 }).build(),
            ])
            .await?;

        info!("mongodb_indexes_ensured");

        Ok(())
    }

    /// Validate and persist a job application, assigning id and timestamps.
    pub async fn create_application(
        &self,
        input: NewApplication,
    ) -> Result<JobApplication, StoreError> {
        let input = normalize_application(input);

        let violations = validate_application(&input);
        if !violations.is_empty() {
            return Err(StoreError::Validation(violations));
        }

        let now = Utc::now();
        let record = JobApplication {
            id: ObjectId::new(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            position: input.position,
            cover_letter: input.cover_letter,
            resume: input.resume,
            status: ApplicationStatus::default(),
            submitted_at: now,
            created_at: now,
            updated_at: now,
        };

        self.applications.insert_one(&record).await?;

        info!(
            application_id = %record.id,
            position = %record.position,
            "application_persisted"
        );

        Ok(record)
    }

    /// Validate and persist a contact inquiry, assigning id and timestamps.
    pub async fn create_inquiry(&self, input: NewInquiry) -> Result<ContactInquiry, StoreError> {
        let input = normalize_inquiry(input);

        let violations = validate_inquiry(&input);
        if !violations.is_empty() {
            return Err(StoreError::Validation(violations));
        }

        let now = Utc::now();
        let record = ContactInquiry {
            id: ObjectId::new(),
            name: input.name,
            email: input.email,
            company: input.company,
            project_type: input.project_type,
            budget: input.budget,
            timeline: input.timeline,
            message: input.message,
            status: InquiryStatus::default(),
            submitted_at: now,
            created_at: now,
            updated_at: now,
        };

        self.inquiries.insert_one(&record).await?;

        info!(contact_id = %record.id, "inquiry_persisted");

        Ok(record)
    }
}

fn normalize_application(mut input: NewApplication) -> NewApplication {
    input.name = input.name.trim().to_string();
    input.email = input.email.trim().to_lowercase();
    input.position = input.position.trim().to_string();
    input
}

fn normalize_inquiry(mut input: NewInquiry) -> NewInquiry {
    input.name = input.name.trim().to_string();
    input.email = input.email.trim().to_lowercase();
    input.message = input.message.trim().to_string();
    input
}

fn validate_application(input: &NewApplication) -> Vec<String> {
    let mut violations = Vec::new();

    if input.name.is_empty() {
        violations.push("Name is required.".to_string());
    }
    if input.email.is_empty() {
        violations.push("Email is required.".to_string());
    } else if !is_valid_email(&input.email) {
        violations.push("Please provide a valid email address.".to_string());
    }
    if input.position.is_empty() {
        violations.push("Position is required.".to_string());
    }

    violations
}

fn validate_inquiry(input: &NewInquiry) -> Vec<String> {
    let mut violations = Vec::new();

    if input.name.is_empty() {
        violations.push("Name is required.".to_string());
    }
    if input.email.is_empty() {
        violations.push("Email is required.".to_string());
    } else if !is_valid_email(&input.email) {
        violations.push("Please provide a valid email address.".to_string());
    }
    if input.message.is_empty() {
        violations.push("Message is required.".to_string());
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResumeRecord;

    fn application() -> NewApplication {
        NewApplication {
            name: "Jane Doe".to_string(),
            email: "JANE@Example.com".to_string(),
            phone: None,
            position: "Backend Engineer".to_string(),
            cover_letter: None,
            resume: ResumeRecord {
                url: "https://cdn.example.com/resume.pdf".to_string(),
                public_id: "careers/resumes/123_resume".to_string(),
                uploaded_at: Utc::now(),
            },
        }
    }

    #[test]
    fn test_normalize_application_lowercases_email() {
        let normalized = normalize_application(application());
        assert_eq!(normalized.email, "jane@example.com");
    }

    #[test]
    fn test_validate_application_accepts_normalized_input() {
        let input = normalize_application(application());
        assert!(validate_application(&input).is_empty());
    }

    #[test]
    fn test_validate_application_collects_field_messages() {
        let mut input = application();
        input.name = "".to_string();
        input.email = "not-an-address".to_string();

        let violations = validate_application(&input);
        assert_eq!(violations.len(), 2);
        assert!(violations[0].contains("Name"));
        assert!(violations[1].contains("valid email"));
    }

    #[test]
    fn test_validate_inquiry_requires_message() {
        let input = NewInquiry {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            company: None,
            project_type: None,
            budget: None,
            timeline: None,
            message: "   ".to_string(),
        };

        let violations = validate_inquiry(&normalize_inquiry(input));
        assert_eq!(violations, vec!["Message is required.".to_string()]);
    }
}
