//! Contact inquiry workflow: validate, persist, then notify both sides.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{error, warn};

use crate::error::SubmissionError;
use crate::models::NewInquiry;
use crate::submit::{InquiryRecords, Notify};
use crate::util::{clean_optional, is_valid_email};

const REQUIRED_FIELDS: &str = "Name, email, and message are required fields.";

/// Contact form payload.
///
/// Fields are optional at the deserialization layer so presence checks
/// produce the domain error instead of a body rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// What happened to the notification emails for a saved inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailOutcome {
    /// Both the company notification and the submitter confirmation went out
    Sent,
    /// Relay credentials are absent; nothing was attempted
    Disabled,
    /// A send failed after the record was saved; logged, not fatal
    Failed,
}

/// Success payload for a saved inquiry.
#[derive(Debug, Clone)]
pub struct InquiryReceipt {
    pub contact_id: String,
    pub submitted_at: DateTime<Utc>,
    pub mail: MailOutcome,
}

/// Run the contact inquiry pipeline.
///
/// Persistence failures are fatal; anything that goes wrong with email
/// after the record is saved only downgrades the outcome to a warning.
pub async fn submit_inquiry<R, N>(
    records: &R,
    mailer: Option<&N>,
    form: InquiryForm,
) -> Result<InquiryReceipt, SubmissionError>
where
    R: InquiryRecords,
    N: Notify,
{
    let name = clean_optional(form.name);
    let email = clean_optional(form.email);
    let message = clean_optional(form.message);

    let (Some(name), Some(email), Some(message)) = (name, email, message) else {
        return Err(SubmissionError::MissingFields(REQUIRED_FIELDS));
    };

    if !is_valid_email(&email) {
        return Err(SubmissionError::InvalidEmail);
    }

    let input = NewInquiry {
        name,
        email: email.to_lowercase(),
        company: clean_optional(form.company),
        project_type: clean_optional(form.project_type),
        budget: clean_optional(form.budget),
        timeline: clean_optional(form.timeline),
        message,
    };

    let saved = records.create_inquiry(input).await?;

    let mail = match mailer {
        None => {
            warn!(contact_id = %saved.id, "smtp_not_configured_notification_skipped");
            MailOutcome::Disabled
        }
        Some(mailer) => {
            let delivery = async {
                // Company first; a failure here also skips the confirmation.
                mailer.send_inquiry_notification(&saved).await?;
                mailer.send_inquiry_confirmation(&saved).await
            };

            match delivery.await {
                Ok(()) => MailOutcome::Sent,
                Err(e) => {
                    // The inquiry is saved; the failed delivery becomes a
                    // response warning rather than an error.
                    error!(contact_id = %saved.id, error = %e, "inquiry_email_failed");
                    MailOutcome::Failed
                }
            }
        }
    };

    Ok(InquiryReceipt {
        contact_id: saved.id.to_hex(),
        submitted_at: saved.submitted_at,
        mail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use mongodb::bson::oid::ObjectId;

    use crate::models::{ContactInquiry, InquiryStatus, JobApplication};
    use crate::notify::MailError;
    use crate::store::StoreError;

    type CallLog = Arc<Mutex<Vec<&'static str>>>;

    struct FakeRecords {
        calls: CallLog,
        fail: bool,
        last_input: Arc<Mutex<Option<NewInquiry>>>,
    }

    impl InquiryRecords for FakeRecords {
        async fn create_inquiry(&self, input: NewInquiry) -> Result<ContactInquiry, StoreError> {
            self.calls.lock().unwrap().push("persist");
            if self.fail {
                return Err(StoreError::Database(mongodb::error::Error::custom(
                    "no reachable primary".to_string(),
                )));
            }
            *self.last_input.lock().unwrap() = Some(input.clone());
            let now = Utc::now();
            Ok(ContactInquiry {
                id: ObjectId::new(),
                name: input.name,
                email: input.email,
                company: input.company,
                project_type: input.project_type,
                budget: input.budget,
                timeline: input.timeline,
                message: input.message,
                status: InquiryStatus::New,
                submitted_at: now,
                created_at: now,
                updated_at: now,
            })
        }
    }

    struct FakeMailer {
        calls: CallLog,
        fail: bool,
    }

    impl Notify for FakeMailer {
        async fn send_application_confirmation(
            &self,
            _application: &JobApplication,
        ) -> Result<(), MailError> {
            unreachable!("not used by the inquiry workflow")
        }

        async fn send_inquiry_notification(
            &self,
            _inquiry: &ContactInquiry,
        ) -> Result<(), MailError> {
            self.calls.lock().unwrap().push("notify_company");
            if self.fail {
                return Err(MailError::Delivery("relay refused".to_string()));
            }
            Ok(())
        }

        async fn send_inquiry_confirmation(
            &self,
            _inquiry: &ContactInquiry,
        ) -> Result<(), MailError> {
            self.calls.lock().unwrap().push("notify_submitter");
            if self.fail {
                return Err(MailError::Delivery("relay refused".to_string()));
            }
            Ok(())
        }
    }

    fn harness(persist_fails: bool, mail_fails: bool) -> (FakeRecords, FakeMailer, CallLog) {
        let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
        (
            FakeRecords {
                calls: calls.clone(),
                fail: persist_fails,
                last_input: Arc::new(Mutex::new(None)),
            },
            FakeMailer {
                calls: calls.clone(),
                fail: mail_fails,
            },
            calls,
        )
    }

    fn form() -> InquiryForm {
        InquiryForm {
            name: Some("Jane Doe".to_string()),
            email: Some("JANE@Example.com".to_string()),
            company: Some("   ".to_string()),
            project_type: None,
            budget: None,
            timeline: None,
            message: Some("Hello".to_string()),
        }
    }

    #[tokio::test]
    async fn test_missing_fields_skip_persistence() {
        let (records, mailer, calls) = harness(false, false);

        let mut missing = form();
        missing.message = None;

        let err = submit_inquiry(&records, Some(&mailer), missing)
            .await
            .unwrap_err();

        assert!(matches!(err, SubmissionError::MissingFields(_)));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_email_skips_persistence() {
        let (records, mailer, calls) = harness(false, false);

        let mut bad = form();
        bad.email = Some("not-an-address".to_string());

        let err = submit_inquiry(&records, Some(&mailer), bad)
            .await
            .unwrap_err();

        assert!(matches!(err, SubmissionError::InvalidEmail));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_input_is_normalized_before_persistence() {
        let (records, mailer, _calls) = harness(false, false);

        submit_inquiry(&records, Some(&mailer), form())
            .await
            .unwrap();

        let input = records.last_input.lock().unwrap().clone().unwrap();
        assert_eq!(input.email, "jane@example.com");
        // Blank optional fields become None, never empty strings.
        assert_eq!(input.company, None);
    }

    #[tokio::test]
    async fn test_successful_delivery_sends_both_emails_in_order() {
        let (records, mailer, calls) = harness(false, false);

        let receipt = submit_inquiry(&records, Some(&mailer), form())
            .await
            .unwrap();

        assert_eq!(receipt.mail, MailOutcome::Sent);
        assert_eq!(
            *calls.lock().unwrap(),
            vec!["persist", "notify_company", "notify_submitter"]
        );
    }

    #[tokio::test]
    async fn test_without_mailer_nothing_is_sent() {
        let (records, _mailer, calls) = harness(false, false);
        let mailer: Option<&FakeMailer> = None;

        let receipt = submit_inquiry(&records, mailer, form()).await.unwrap();

        assert_eq!(receipt.mail, MailOutcome::Disabled);
        assert_eq!(*calls.lock().unwrap(), vec!["persist"]);
    }

    #[tokio::test]
    async fn test_delivery_failure_keeps_the_request_successful() {
        let (records, mailer, calls) = harness(false, true);

        let receipt = submit_inquiry(&records, Some(&mailer), form())
            .await
            .unwrap();

        assert_eq!(receipt.mail, MailOutcome::Failed);
        // The first failure also skips the submitter confirmation.
        assert_eq!(*calls.lock().unwrap(), vec!["persist", "notify_company"]);
    }

    #[tokio::test]
    async fn test_persistence_failure_is_fatal() {
        let (records, mailer, calls) = harness(true, false);

        let err = submit_inquiry(&records, Some(&mailer), form())
            .await
            .unwrap_err();

        assert!(matches!(err, SubmissionError::Persistence(_)));
        assert_eq!(*calls.lock().unwrap(), vec!["persist"]);
    }

    #[test]
    fn test_form_accepts_camel_case_field_names() {
        let form: InquiryForm = serde_json::from_str(
            r#"{"name":"Jane","email":"jane@example.com","projectType":"Web app","message":"Hi"}"#,
        )
        .unwrap();

        assert_eq!(form.project_type.as_deref(), Some("Web app"));
    }
}
