//! Outbound notification email via the SMTP relay.
//!
//! The mailer exists only when relay credentials are configured; callers
//! hold an `Option<SmtpMailer>` and skip sending otherwise. A send is one
//! attempt against the relay with no retry. Whether a delivery failure
//! matters is the caller's decision: the submission pipelines log it and
//! keep the request successful once the record is saved.

pub mod templates;

pub use templates::EmailContent;

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::info;

use crate::config::SmtpSettings;
use crate::models::{ContactInquiry, JobApplication};

/// Failures raised by the mailer.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    Address(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// SMTP relay client with the configured sender identity.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    /// Company inbox receiving inquiry notifications (the relay account)
    inbox: Address,
    from_name: String,
}

impl SmtpMailer {
    /// Build a mailer from relay settings.
    ///
    /// Returns `Ok(None)` when credentials are absent so the workflows can
    /// skip notification instead of failing.
    pub fn from_settings(settings: &SmtpSettings) -> Result<Option<Self>, MailError> {
        let (Some(user), Some(pass)) = (settings.user.clone(), settings.pass.clone()) else {
            return Ok(None);
        };
        if user.is_empty() || pass.is_empty() {
            return Ok(None);
        }

        let address = parse_address(&user)?;

        // secure = implicit TLS (465); otherwise STARTTLS on the given port
        let builder = if settings.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        }
        .map_err(|e| MailError::Delivery(e.to_string()))?;

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(user, pass))
            .build();

        Ok(Some(Self {
            transport,
            from: Mailbox::new(Some(settings.from_name.clone()), address.clone()),
            inbox: address,
            from_name: settings.from_name.clone(),
        }))
    }

    /// Notify the company inbox about a new inquiry.
    ///
    /// Reply-To is the submitter so the team can answer in one step.
    pub async fn send_inquiry_notification(&self, inquiry: &ContactInquiry) -> Result<(), MailError> {
        let content = templates::inquiry_notification(inquiry, &self.from_name);
        let reply_to = Mailbox::new(Some(inquiry.name.clone()), parse_address(&inquiry.email)?);

        let message = Message::builder()
            .from(self.from.clone())
            .to(Mailbox::new(None, self.inbox.clone()))
            .reply_to(reply_to)
            .subject(content.subject)
            .multipart(MultiPart::alternative_plain_html(content.text, content.html))
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.send(message).await?;
        info!(contact_id = %inquiry.id, "inquiry_notification_sent");
        Ok(())
    }

    /// Confirm receipt to the inquiry submitter.
    pub async fn send_inquiry_confirmation(&self, inquiry: &ContactInquiry) -> Result<(), MailError> {
        let content = templates::inquiry_confirmation(inquiry, &self.from_name);

        let message = Message::builder()
            .from(self.from.clone())
            .to(Mailbox::new(None, parse_address(&inquiry.email)?))
            .subject(content.subject)
            .multipart(MultiPart::alternative_plain_html(content.text, content.html))
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.send(message).await?;
        info!(contact_id = %inquiry.id, "inquiry_confirmation_sent");
        Ok(())
    }

    /// Confirm receipt to a job applicant.
    pub async fn send_application_confirmation(
        &self,
        application: &JobApplication,
    ) -> Result<(), MailError> {
        let content = templates::application_confirmation(application, &self.from_name);

        let message = Message::builder()
            .from(self.from.clone())
            .to(Mailbox::new(None, parse_address(&application.email)?))
            .subject(content.subject)
            .multipart(MultiPart::alternative_plain_html(content.text, content.html))
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.send(message).await?;
        info!(application_id = %application.id, "application_confirmation_sent");
        Ok(())
    }

    async fn send(&self, message: Message) -> Result<(), MailError> {
        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| MailError::Delivery(e.to_string()))
    }
}

fn parse_address(email: &str) -> Result<Address, MailError> {
    email
        .parse()
        .map_err(|e: lettre::address::AddressError| MailError::Address(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SmtpSettings {
        SmtpSettings {
            host: "smtp.example.com".to_string(),
            port: 587,
            secure: false,
            user: Some("mail@example.com".to_string()),
            pass: Some("secret".to_string()),
            from_name: "Studio".to_string(),
        }
    }

    #[test]
    fn test_mailer_absent_without_credentials() {
        let mut missing_pass = settings();
        missing_pass.pass = None;
        assert!(SmtpMailer::from_settings(&missing_pass).unwrap().is_none());

        let mut blank_user = settings();
        blank_user.user = Some("".to_string());
        assert!(SmtpMailer::from_settings(&blank_user).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mailer_built_with_credentials() {
        assert!(SmtpMailer::from_settings(&settings()).unwrap().is_some());
    }

    #[test]
    fn test_mailer_rejects_invalid_relay_account() {
        let mut bad = settings();
        bad.user = Some("not an address".to_string());
        assert!(matches!(
            SmtpMailer::from_settings(&bad),
            Err(MailError::Address(_))
        ));
    }

    #[test]
    fn test_parse_address() {
        assert!(parse_address("jane@example.com").is_ok());
        assert!(parse_address("nope").is_err());
    }
}
