//! HTTP entry layer.
//!
//! Routes the two form submissions plus the liveness probe, applies the
//! upload body limit and CORS policy, and maps transport-level errors to
//! responses. All business decisions live in the submission pipelines.

pub mod handlers;

pub use handlers::{
    apply_for_job, health, submit_contact, ApiResponse, ContactData, HealthResponse,
};

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::Config;
use crate::notify::SmtpMailer;
use crate::storage::{CloudStorage, MAX_RESUME_BYTES};
use crate::store::RecordStore;

/// Body cap for the multipart route: the 5 MiB resume plus headroom for
/// the text fields and multipart framing, so an oversize resume reaches
/// the domain-level size check instead of a transport rejection.
const UPLOAD_BODY_LIMIT: usize = MAX_RESUME_BYTES + 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: RecordStore,
    pub storage: CloudStorage,
    /// Absent when relay credentials are not configured
    pub mailer: Option<SmtpMailer>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: RecordStore,
        storage: CloudStorage,
        mailer: Option<SmtpMailer>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            storage,
            mailer,
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/", get(health))
        .route(
            "/careers/apply",
            post(apply_for_job).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/contact", post(submit_contact))
        .layer(TraceLayer::new_for_http());

    match cors_layer(state.config.frontend_url.as_deref()) {
        Some(cors) => app = app.layer(cors),
        None => warn!("frontend_url_not_configured_cors_disabled"),
    }

    app.with_state(state)
}

/// CORS policy for the configured frontend origin.
fn cors_layer(frontend_url: Option<&str>) -> Option<CorsLayer> {
    let origin = frontend_url?;

    let origin: HeaderValue = match origin.parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(origin = origin, "invalid_frontend_url_cors_disabled");
            return None;
        }
    };

    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
    use tower::util::ServiceExt;

    use crate::config::{SmtpSettings, StorageSettings};

    async fn test_state() -> AppState {
        let config = Config {
            mongodb_uri: "mongodb://127.0.0.1:27017".to_string(),
            mongodb_db: "intake_test".to_string(),
            storage: StorageSettings {
                cloud_name: String::new(),
                api_key: String::new(),
                api_secret: String::new(),
            },
            smtp: SmtpSettings {
                host: "smtp.example.com".to_string(),
                port: 587,
                secure: false,
                user: None,
                pass: None,
                from_name: "Studio".to_string(),
            },
            frontend_url: Some("http://localhost:5173".to_string()),
            port: 3000,
        };

        // The client is lazy: nothing here touches the network until a
        // collection operation runs, which these tests never do.
        let client = mongodb::Client::with_uri_str(&config.mongodb_uri)
            .await
            .unwrap();
        let store = RecordStore::new(&client.database(&config.mongodb_db));
        let storage = CloudStorage::new(config.storage.clone());

        AppState::new(config, store, storage, None)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn multipart_request(fields: &[(&str, &str)]) -> Request<Body> {
        let boundary = "test-boundary";
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!("--{boundary}--\r\n"));

        Request::builder()
            .method("POST")
            .uri("/careers/apply")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = router(test_state().await);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Server is up and running");
    }

    #[tokio::test]
    async fn test_contact_missing_fields_is_bad_request() {
        let app = router(test_state().await);

        let request = Request::builder()
            .method("POST")
            .uri("/contact")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(
            body["message"],
            "Name, email, and message are required fields."
        );
    }

    #[tokio::test]
    async fn test_contact_invalid_email_is_bad_request() {
        let app = router(test_state().await);

        let request = Request::builder()
            .method("POST")
            .uri("/contact")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"name":"Jane","email":"nope","message":"Hello"}"#,
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Please provide a valid email address.");
    }

    #[tokio::test]
    async fn test_apply_missing_fields_is_bad_request() {
        let app = router(test_state().await);

        let response = app
            .oneshot(multipart_request(&[("name", "Jane Doe")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(
            body["message"],
            "Name, email, and position are required fields."
        );
    }

    #[tokio::test]
    async fn test_apply_missing_resume_is_bad_request() {
        let app = router(test_state().await);

        let response = app
            .oneshot(multipart_request(&[
                ("name", "Jane Doe"),
                ("email", "jane@example.com"),
                ("position", "Backend Engineer"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Resume file is required.");
    }
}
