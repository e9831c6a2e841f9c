//! Configuration module for environment variable parsing.
//!
//! All settings are read once at startup and passed by reference into the
//! store, uploader, and mailer adapters. Business logic never reads the
//! process environment directly.

use std::env;
use tracing::warn;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// MongoDB connection string
    pub mongodb_uri: String,

    /// Database holding the submission collections
    pub mongodb_db: String,

    /// Media storage credentials for resume uploads
    pub storage: StorageSettings,

    /// Outbound SMTP relay settings
    pub smtp: SmtpSettings,

    /// Allowed cross-origin frontend URL
    pub frontend_url: Option<String>,

    /// Port for the web server to listen on
    pub port: u16,
}

/// Credentials for the hosted media service that stores resumes.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl StorageSettings {
    /// True when every credential is present. Uploads attempted without
    /// credentials fail at the media API and surface as upload errors.
    pub fn is_configured(&self) -> bool {
        !self.cloud_name.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

/// SMTP relay settings for notification email.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,

    pub port: u16,

    /// true = implicit TLS (port 465), false = STARTTLS
    pub secure: bool,

    /// Relay account, also the inbox receiving inquiry notifications
    pub user: Option<String>,

    pub pass: Option<String>,

    /// Display name used on outbound mail
    pub from_name: String,
}

impl SmtpSettings {
    /// Mail is sent only when both credentials are present.
    pub fn is_configured(&self) -> bool {
        self.user.as_deref().is_some_and(|u| !u.is_empty())
            && self.pass.as_deref().is_some_and(|p| !p.is_empty())
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),

            mongodb_db: env::var("MONGODB_DB").unwrap_or_else(|_| "intake".to_string()),

            storage: StorageSettings {
                cloud_name: env::var("CLOUDINARY_CLOUD_NAME").unwrap_or_default(),
                api_key: env::var("CLOUDINARY_API_KEY").unwrap_or_default(),
                api_secret: env::var("CLOUDINARY_API_SECRET").unwrap_or_default(),
            },

            smtp: SmtpSettings {
                host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),

                port: env::var("SMTP_PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(587),

                secure: parse_bool("SMTP_SECURE", false),

                user: env::var("SMTP_USER").ok().filter(|v| !v.is_empty()),

                pass: env::var("SMTP_PASS").ok().filter(|v| !v.is_empty()),

                from_name: env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "Studio".to_string()),
            },

            frontend_url: env::var("FRONTEND_URL").ok().filter(|v| !v.is_empty()),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        }
    }
}

/// Parse a boolean flag like "true" or "0".
fn parse_bool(name: &str, default: bool) -> bool {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => true,
        "false" | "0" | "" => false,
        _ => {
            warn!(env_var = name, value = %raw, "Invalid boolean value, using default");
            default
        }
    }
}
