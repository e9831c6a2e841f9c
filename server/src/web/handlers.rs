//! HTTP endpoint handlers.
//!
//! Handlers only shape transport concerns: they collect the form payload,
//! hand it to the submission pipeline, and wrap the receipt in the
//! `{success, message, data, warning?}` envelope the frontend expects.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::SubmissionError;
use crate::storage::ResumeUpload;
use crate::submit::{
    submit_application, submit_inquiry, ApplicationForm, ApplicationReceipt, InquiryForm,
    MailOutcome,
};
use crate::web::AppState;

/// Standard response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: Some(data),
            warning: None,
        }
    }
}

// =============================================================================
// Liveness
// =============================================================================

/// Liveness probe response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
}

/// Liveness probe endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Server is up and running",
    })
}

// =============================================================================
// Careers
// =============================================================================

/// Job application endpoint: multipart form with a `resume` file field.
pub async fn apply_for_job(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ApplicationReceipt>>, SubmissionError> {
    let form = read_application_form(multipart).await?;

    info!(
        has_resume = form.resume.is_some(),
        position = form.position.as_deref().unwrap_or(""),
        "application_received"
    );

    let receipt =
        submit_application(&state.storage, &state.store, state.mailer.as_ref(), form).await?;

    Ok(Json(ApiResponse::ok(
        "Application submitted successfully",
        receipt,
    )))
}

/// Collect the multipart fields into an application form.
async fn read_application_form(
    mut multipart: Multipart,
) -> Result<ApplicationForm, SubmissionError> {
    let mut form = ApplicationForm::default();

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "name" => form.name = Some(field.text().await.map_err(malformed)?),
            "email" => form.email = Some(field.text().await.map_err(malformed)?),
            "phone" => form.phone = Some(field.text().await.map_err(malformed)?),
            "position" => form.position = Some(field.text().await.map_err(malformed)?),
            "message" => form.message = Some(field.text().await.map_err(malformed)?),
            "resume" => {
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(malformed)?.to_vec();
                form.resume = Some(ResumeUpload {
                    file_name,
                    content_type,
                    data,
                });
            }
            // Drain unknown fields so the stream stays consumable.
            _ => {
                let _ = field.bytes().await;
            }
        }
    }

    Ok(form)
}

fn malformed(err: MultipartError) -> SubmissionError {
    warn!(error = %err, "multipart_read_failed");
    SubmissionError::MalformedUpload(err.to_string())
}

// =============================================================================
// Contact
// =============================================================================

/// Success payload echoed back to the inquiry submitter.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactData {
    pub contact_id: String,
    pub submitted_at: DateTime<Utc>,
}

/// Contact inquiry endpoint: JSON body.
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(form): Json<InquiryForm>,
) -> Result<Json<ApiResponse<ContactData>>, SubmissionError> {
    let receipt = submit_inquiry(&state.store, state.mailer.as_ref(), form).await?;

    let data = ContactData {
        contact_id: receipt.contact_id,
        submitted_at: receipt.submitted_at,
    };

    let response = match receipt.mail {
        MailOutcome::Sent => ApiResponse::ok(
            "Contact inquiry submitted successfully. We will get back to you soon!",
            data,
        ),
        MailOutcome::Disabled => ApiResponse::ok(
            "Contact inquiry saved successfully. (Email notification disabled)",
            data,
        ),
        MailOutcome::Failed => {
            let mut response = ApiResponse::ok(
                "Contact inquiry saved successfully. (Email delivery failed, but your inquiry has been recorded)",
                data,
            );
            response.warning = Some(
                "Email notification could not be sent, but your inquiry has been saved."
                    .to_string(),
            );
            response
        }
    };

    Ok(Json(response))
}
