//! Submission pipelines for the two form types.
//!
//! Both workflows share the same shape: validate, upload the attachment
//! (careers only), persist, then notify. The failure policy is fixed:
//! upload failures abort before anything is persisted, persistence
//! failures are always fatal to the request, and delivery failures are
//! never fatal once the record is saved.
//!
//! The adapters sit behind small trait seams so the workflows can be
//! exercised against in-memory fakes.

pub mod application;
pub mod inquiry;

pub use application::{submit_application, ApplicationForm, ApplicationReceipt};
pub use inquiry::{submit_inquiry, InquiryForm, InquiryReceipt, MailOutcome};

use crate::models::{ContactInquiry, JobApplication, NewApplication, NewInquiry};
use crate::notify::{MailError, SmtpMailer};
use crate::storage::{CloudStorage, ResumeUpload, StorageError, StoredAttachment};
use crate::store::{RecordStore, StoreError};

/// Seam over the attachment uploader.
#[allow(async_fn_in_trait)]
pub trait StoreResume {
    async fn store_resume(
        &self,
        file: ResumeUpload,
        folder: &str,
    ) -> Result<StoredAttachment, StorageError>;
}

/// Seam over application persistence.
#[allow(async_fn_in_trait)]
pub trait ApplicationRecords {
    async fn create_application(&self, input: NewApplication)
        -> Result<JobApplication, StoreError>;
}

/// Seam over inquiry persistence.
#[allow(async_fn_in_trait)]
pub trait InquiryRecords {
    async fn create_inquiry(&self, input: NewInquiry) -> Result<ContactInquiry, StoreError>;
}

/// Seam over the notification mailer.
#[allow(async_fn_in_trait)]
pub trait Notify {
    async fn send_application_confirmation(
        &self,
        application: &JobApplication,
    ) -> Result<(), MailError>;

    async fn send_inquiry_notification(&self, inquiry: &ContactInquiry) -> Result<(), MailError>;

    async fn send_inquiry_confirmation(&self, inquiry: &ContactInquiry) -> Result<(), MailError>;
}

impl StoreResume for CloudStorage {
    async fn store_resume(
        &self,
        file: ResumeUpload,
        folder: &str,
    ) -> Result<StoredAttachment, StorageError> {
        self.upload(file, folder).await
    }
}

impl ApplicationRecords for RecordStore {
    async fn create_application(
        &self,
        input: NewApplication,
    ) -> Result<JobApplication, StoreError> {
        RecordStore::create_application(self, input).await
    }
}

impl InquiryRecords for RecordStore {
    async fn create_inquiry(&self, input: NewInquiry) -> Result<ContactInquiry, StoreError> {
        RecordStore::create_inquiry(self, input).await
    }
}

impl Notify for SmtpMailer {
    async fn send_application_confirmation(
        &self,
        application: &JobApplication,
    ) -> Result<(), MailError> {
        SmtpMailer::send_application_confirmation(self, application).await
    }

    async fn send_inquiry_notification(&self, inquiry: &ContactInquiry) -> Result<(), MailError> {
        SmtpMailer::send_inquiry_notification(self, inquiry).await
    }

    async fn send_inquiry_confirmation(&self, inquiry: &ContactInquiry) -> Result<(), MailError> {
        SmtpMailer::send_inquiry_confirmation(self, inquiry).await
    }
}
