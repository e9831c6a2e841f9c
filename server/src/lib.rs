//! Intake - backend API for careers and contact form submissions.
//!
//! The server accepts two form submissions, persists them to MongoDB,
//! uploads resume attachments to a hosted media service, and dispatches
//! templated notification email over an SMTP relay.
//!
//! ## Architecture
//!
//! ```text
//! HTTP (web) → Submission pipeline (submit) → Uploader (storage)
//!                                           → Record store (store)
//!                                           → Mailer (notify)
//! ```
//!
//! Failure policy: an upload failure aborts before anything is persisted,
//! a persistence failure is fatal to the request, and a delivery failure
//! after a durable save is logged but never fails the request.

pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod storage;
pub mod store;
pub mod submit;
pub mod util;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use error::SubmissionError;
pub use notify::SmtpMailer;
pub use storage::CloudStorage;
pub use store::RecordStore;
pub use web::AppState;
