//! Job application workflow: validate, upload the resume, persist, notify.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::SubmissionError;
use crate::models::{NewApplication, ResumeRecord};
use crate::storage::{validate_resume, ResumeUpload, RESUME_FOLDER};
use crate::submit::{ApplicationRecords, Notify, StoreResume};
use crate::util::clean_optional;

const REQUIRED_FIELDS: &str = "Name, email, and position are required fields.";

/// Raw application fields as collected from the multipart form.
///
/// Everything is optional here; presence is a workflow decision, not a
/// deserialization one, so missing fields produce the domain error.
#[derive(Debug, Default)]
pub struct ApplicationForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    /// Cover letter; the form field is named `message`
    pub message: Option<String>,
    pub resume: Option<ResumeUpload>,
}

/// Success payload echoed back to the applicant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationReceipt {
    pub application_id: String,
    pub resume_url: String,
    pub submitted_at: DateTime<Utc>,
}

/// Run the job application pipeline.
///
/// The resume upload must resolve before persistence is attempted; a
/// record without a usable resume never exists. The uploaded object is
/// not rolled back if persistence fails afterwards (accepted orphan).
pub async fn submit_application<U, R, N>(
    uploader: &U,
    records: &R,
    mailer: Option<&N>,
    form: ApplicationForm,
) -> Result<ApplicationReceipt, SubmissionError>
where
    U: StoreResume,
    R: ApplicationRecords,
    N: Notify,
{
    let name = clean_optional(form.name);
    let email = clean_optional(form.email);
    let position = clean_optional(form.position);

    let (Some(name), Some(email), Some(position)) = (name, email, position) else {
        return Err(SubmissionError::MissingFields(REQUIRED_FIELDS));
    };

    let Some(resume) = form.resume else {
        return Err(SubmissionError::MissingAttachment);
    };

    validate_resume(&resume.content_type, resume.data.len())?;

    // Upload strictly precedes persistence: a failed upload aborts the
    // submission with no record written.
    let stored = uploader.store_resume(resume, RESUME_FOLDER).await?;

    let input = NewApplication {
        name,
        email,
        phone: clean_optional(form.phone),
        position,
        cover_letter: clean_optional(form.message),
        resume: ResumeRecord {
            url: stored.url.clone(),
            public_id: stored.public_id.clone(),
            uploaded_at: Utc::now(),
        },
    };

    let saved = match records.create_application(input).await {
        Ok(saved) => saved,
        Err(e) => {
            // The stored object now has no referencing record; operators
            // can reap it by this id.
            warn!(public_id = %stored.public_id, error = %e, "resume_orphaned");
            return Err(e.into());
        }
    };

    match mailer {
        Some(mailer) => {
            if let Err(e) = mailer.send_application_confirmation(&saved).await {
                // Record is durably saved; the response stays successful.
                warn!(application_id = %saved.id, error = %e, "application_confirmation_failed");
            }
        }
        None => debug!(application_id = %saved.id, "mail_disabled_confirmation_skipped"),
    }

    Ok(ApplicationReceipt {
        application_id: saved.id.to_hex(),
        resume_url: saved.resume.url.clone(),
        submitted_at: saved.submitted_at,
    })
}
