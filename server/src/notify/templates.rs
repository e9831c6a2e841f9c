//! Notification email templates.
//!
//! Every template renders an HTML body and a plain-text alternative. User
//! supplied values are escaped before they are embedded in HTML; the text
//! body carries them verbatim. Keep that split exact: escaping the text
//! body double-encodes it for clients that prefer plain text.

use chrono::{DateTime, Utc};

use crate::models::{ContactInquiry, JobApplication};

/// A rendered email: subject plus both bodies.
#[derive(Debug, Clone)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Escape a value for embedding in an HTML body.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape a multi-line message and turn newlines into `<br>`.
pub fn format_message(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%A, %B %-d, %Y at %H:%M UTC").to_string()
}

fn labeled_field(label: &str, value: &str) -> String {
    format!(
        "<div style=\"margin-bottom:12px\">\
         <div style=\"font-size:11px;color:#667;text-transform:uppercase;letter-spacing:.5px\">{}</div>\
         <div style=\"font-size:15px;color:#111;padding:8px 10px;background:#f6f7f9;border-radius:6px\">{}</div>\
         </div>",
        label, value
    )
}

fn wrap_html(header: &str, body: &str, footer: &str) -> String {
    format!(
        "<!DOCTYPE html>\
         <html><body style=\"font-family:-apple-system,'Segoe UI',Roboto,Arial,sans-serif;\
         line-height:1.6;color:#111;margin:0;padding:20px\">\
         <div style=\"max-width:650px;margin:0 auto;border:1px solid #e2e5ea;border-radius:12px;overflow:hidden\">\
         <div style=\"background:#17433b;color:#fff;padding:28px 24px;text-align:center\">{}</div>\
         <div style=\"padding:28px 24px\">{}</div>\
         <div style=\"padding:20px 24px;border-top:1px solid #e2e5ea;color:#667;font-size:12px;text-align:center\">{}</div>\
         </div></body></html>",
        header, body, footer
    )
}

/// Inquiry notification sent to the company inbox.
///
/// Reply-To is set to the submitter so the team can answer directly.
pub fn inquiry_notification(inquiry: &ContactInquiry, from_name: &str) -> EmailContent {
    let subject = match &inquiry.company {
        Some(company) => format!("New Contact Inquiry from {} - {}", inquiry.name, company),
        None => format!("New Contact Inquiry from {}", inquiry.name),
    };

    let mut body = String::from("<h2 style=\"font-size:13px;color:#2a8a6f;text-transform:uppercase;letter-spacing:.5px\">Contact Information</h2>");
    body.push_str(&labeled_field("Full Name", &escape_html(&inquiry.name)));
    body.push_str(&labeled_field(
        "Email Address",
        &format!(
            "<a href=\"mailto:{0}\" style=\"color:#2a8a6f\">{0}</a>",
            escape_html(&inquiry.email)
        ),
    ));
    if let Some(company) = &inquiry.company {
        body.push_str(&labeled_field("Company / Organization", &escape_html(company)));
    }

    if inquiry.project_type.is_some() || inquiry.budget.is_some() || inquiry.timeline.is_some() {
        body.push_str("<h2 style=\"font-size:13px;color:#2a8a6f;text-transform:uppercase;letter-spacing:.5px\">Project Details</h2>");
        if let Some(project_type) = &inquiry.project_type {
            body.push_str(&labeled_field("Project Type", &escape_html(project_type)));
        }
        if let Some(budget) = &inquiry.budget {
            body.push_str(&labeled_field("Budget Range", &escape_html(budget)));
        }
        if let Some(timeline) = &inquiry.timeline {
            body.push_str(&labeled_field("Timeline", &escape_html(timeline)));
        }
    }

    body.push_str("<h2 style=\"font-size:13px;color:#2a8a6f;text-transform:uppercase;letter-spacing:.5px\">Message</h2>");
    body.push_str(&format!(
        "<div style=\"padding:14px;border-left:4px solid #2a8a6f;background:#f6f7f9;border-radius:6px;white-space:pre-wrap\">{}</div>",
        format_message(&inquiry.message)
    ));
    body.push_str(&format!(
        "<p style=\"margin-top:18px;font-size:13px;color:#667\"><strong>Submitted:</strong> {}</p>",
        format_timestamp(inquiry.submitted_at)
    ));

    let html = wrap_html(
        "<h1 style=\"margin:0;font-size:22px\">New Contact Inquiry</h1>\
         <p style=\"margin:8px 0 0;opacity:.9;font-size:14px\">You have received a new inquiry from your website</p>",
        &body,
        &format!(
            "<p><strong>{} Website Contact Form</strong></p>\
             <p>This is an automated notification email. The inquiry has been saved to your database.</p>\
             <p>You can reply directly to this email to respond to {}.</p>",
            escape_html(from_name),
            escape_html(&inquiry.name)
        ),
    );

    let mut text = format!(
        "New Contact Inquiry\n\nName: {}\nEmail: {}\n",
        inquiry.name, inquiry.email
    );
    if let Some(company) = &inquiry.company {
        text.push_str(&format!("Company: {}\n", company));
    }
    if let Some(project_type) = &inquiry.project_type {
        text.push_str(&format!("Project Type: {}\n", project_type));
    }
    if let Some(budget) = &inquiry.budget {
        text.push_str(&format!("Budget Range: {}\n", budget));
    }
    if let Some(timeline) = &inquiry.timeline {
        text.push_str(&format!("Timeline: {}\n", timeline));
    }
    text.push_str(&format!(
        "\nMessage:\n{}\n\nSubmitted at: {}",
        inquiry.message,
        format_timestamp(inquiry.submitted_at)
    ));

    EmailContent { subject, html, text }
}

/// Confirmation sent back to the inquiry submitter.
pub fn inquiry_confirmation(inquiry: &ContactInquiry, from_name: &str) -> EmailContent {
    let subject = format!("Thank you for contacting {}", from_name);

    let body = format!(
        "<p style=\"font-size:17px;font-weight:500\">Dear {},</p>\
         <p>Thank you for reaching out to us! We have received your inquiry and our team will review it shortly.</p>\
         <p>We typically respond within 24 hours during business days. If you have any urgent questions, please feel free to contact us directly.</p>\
         <p style=\"margin-top:24px\">Best regards,<br>The {} Team</p>",
        escape_html(&inquiry.name),
        escape_html(from_name)
    );

    let html = wrap_html(
        &format!(
            "<h1 style=\"margin:0;font-size:24px\">Thank You for Contacting {}</h1>\
             <p style=\"margin:8px 0 0;opacity:.9;font-size:15px\">We&#039;ve received your inquiry</p>",
            escape_html(from_name)
        ),
        &body,
        "<p>This is an automated confirmation email. Please do not reply to this message.</p>",
    );

    let text = format!(
        "Thank You for Contacting {0}\n\nDear {1},\n\n\
         Thank you for reaching out to us! We have received your inquiry and our team will review it shortly.\n\n\
         We typically respond within 24 hours during business days. If you have any urgent questions, please feel free to contact us directly.\n\n\
         Best regards,\nThe {0} Team\n\n\
         This is an automated confirmation email. Please do not reply to this message.",
        from_name, inquiry.name
    );

    EmailContent { subject, html, text }
}

/// Confirmation sent to a job applicant after their application is saved.
pub fn application_confirmation(application: &JobApplication, from_name: &str) -> EmailContent {
    let subject = format!("Thank you for applying to {}", from_name);

    let body = format!(
        "<p style=\"font-size:17px;font-weight:500\">Dear {},</p>\
         <p>Thank you for applying for the <strong>{}</strong> position. We have received your application and resume, and our team will review them shortly.</p>\
         <p>If your profile matches the role, we will reach out to schedule the next steps.</p>\
         <p style=\"margin-top:18px;font-size:13px;color:#667\"><strong>Submitted:</strong> {}</p>\
         <p style=\"margin-top:24px\">Best regards,<br>The {} Team</p>",
        escape_html(&application.name),
        escape_html(&application.position),
        format_timestamp(application.submitted_at),
        escape_html(from_name)
    );

    let html = wrap_html(
        &format!(
            "<h1 style=\"margin:0;font-size:24px\">Application Received</h1>\
             <p style=\"margin:8px 0 0;opacity:.9;font-size:15px\">Thank you for your interest in {}</p>",
            escape_html(from_name)
        ),
        &body,
        "<p>This is an automated confirmation email. Please do not reply to this message.</p>",
    );

    let text = format!(
        "Application Received\n\nDear {1},\n\n\
         Thank you for applying for the {2} position. We have received your application and resume, and our team will review them shortly.\n\n\
         If your profile matches the role, we will reach out to schedule the next steps.\n\n\
         Submitted: {3}\n\n\
         Best regards,\nThe {0} Team",
        from_name,
        application.name,
        application.position,
        format_timestamp(application.submitted_at)
    );

    EmailContent { subject, html, text }
}
