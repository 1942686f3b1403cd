//! HTTP routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use counsel_core::clock::Clock;
use counsel_core::drafting::SectionDrafter;
use counsel_core::error::{CounselError, SessionFailure};
use counsel_core::models::attestation::AttorneyAttestation;
use counsel_core::models::document::GeneratedDocument;
use counsel_core::models::session::{CreatedSession, SessionId, SessionValidation};
use counsel_core::repository::TemplateRegistry;
use counsel_docgen::GenerateRequest;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::error;

use crate::app::Generator;

/// Request header carrying the session identifier.
pub const SESSION_HEADER: &str = "x-attorney-session";

pub fn router<C, D>(generator: Arc<Generator<C, D>>) -> Router
where
    C: Clock + 'static,
    D: SectionDrafter + 'static,
{
    Router::new()
        .route("/healthz", get(healthz::<C, D>))
        .route("/v1/attorney/sessions", post(create_session::<C, D>))
        .route(
            "/v1/attorney/sessions/current",
            get(validate_session::<C, D>).delete(terminate_session::<C, D>),
        )
        .route("/v1/attorney/documents", post(generate_document::<C, D>))
        .with_state(generator)
}

async fn healthz<C, D>(State(app): State<Arc<Generator<C, D>>>) -> Json<Value>
where
    C: Clock + 'static,
    D: SectionDrafter + 'static,
{
    Json(json!({
        "status": "ok",
        "templates": app.templates().template_ids(),
    }))
}

async fn create_session<C, D>(
    State(app): State<Arc<Generator<C, D>>>,
    Json(attestation): Json<AttorneyAttestation>,
) -> Result<(StatusCode, Json<CreatedSession>), ApiError>
where
    C: Clock + 'static,
    D: SectionDrafter + 'static,
{
    let created = app.sessions().create_session(&attestation).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn validate_session<C, D>(
    State(app): State<Arc<Generator<C, D>>>,
    headers: HeaderMap,
) -> Result<Json<SessionValidation>, ApiError>
where
    C: Clock + 'static,
    D: SectionDrafter + 'static,
{
    let id = session_id(&headers)?;
    Ok(Json(app.sessions().validate_session(&id).await?))
}

async fn terminate_session<C, D>(
    State(app): State<Arc<Generator<C, D>>>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError>
where
    C: Clock + 'static,
    D: SectionDrafter + 'static,
{
    let id = session_id(&headers)?;
    app.sessions().terminate_session(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
struct DocumentResponse {
    #[serde(flatten)]
    document: GeneratedDocument,
    needs_review: Vec<String>,
    full_text: String,
}

async fn generate_document<C, D>(
    State(app): State<Arc<Generator<C, D>>>,
    headers: HeaderMap,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<DocumentResponse>, ApiError>
where
    C: Clock + 'static,
    D: SectionDrafter + 'static,
{
    let id = session_id(&headers)?;
    let document = app.generate_document(&id, request).await?;
    Ok(Json(DocumentResponse {
        needs_review: document
            .needs_review()
            .into_iter()
            .map(String::from)
            .collect(),
        full_text: document.full_text(),
        document,
    }))
}

fn session_id(headers: &HeaderMap) -> Result<SessionId, ApiError> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(SessionId::from)
        .ok_or(ApiError(CounselError::SessionInvalid(SessionFailure::NotFound)))
}

/// Maps engine errors onto HTTP responses. Server-side failures are logged
/// and reported without detail.
#[derive(Debug)]
pub struct ApiError(CounselError);

impl From<CounselError> for ApiError {
    fn from(err: CounselError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, details) = match &self.0 {
            CounselError::AttestationIncomplete { missing } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "attestation_incomplete",
                json!({ "missing": missing }),
            ),
            CounselError::SessionInvalid(reason) => (
                StatusCode::UNAUTHORIZED,
                "session_invalid",
                json!({ "reason": reason.to_string(), "reattest": true }),
            ),
            CounselError::TemplateNotFound { template_id } => (
                StatusCode::NOT_FOUND,
                "template_not_found",
                json!({ "template_id": template_id }),
            ),
            CounselError::ValidationFailed { issues } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_failed",
                json!({ "issues": issues }),
            ),
            CounselError::AlreadyExists { .. }
            | CounselError::Config(_)
            | CounselError::Audit(_)
            | CounselError::Internal(_) => {
                error!(error = %self.0, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    Value::Null,
                )
            }
        };

        let message = if self.0.is_client_error() {
            self.0.to_string()
        } else {
            "internal error".to_string()
        };
        let mut body = json!({ "code": code, "message": message });
        if let (Value::Object(body), Value::Object(details)) = (&mut body, details) {
            body.extend(details);
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use counsel_core::models::validation::{FieldIssue, IssueKind};

    #[test]
    fn missing_or_blank_header_is_not_found() {
        let mut headers = HeaderMap::new();
        assert!(session_id(&headers).is_err());
        headers.insert(SESSION_HEADER, HeaderValue::from_static("  "));
        assert!(session_id(&headers).is_err());
        headers.insert(SESSION_HEADER, HeaderValue::from_static("abc"));
        assert_eq!(session_id(&headers).unwrap().as_str(), "abc");
    }

    #[test]
    fn status_codes() {
        let cases = [
            (
                CounselError::SessionInvalid(SessionFailure::Expired),
                StatusCode::UNAUTHORIZED,
            ),
            (
                CounselError::TemplateNotFound {
                    template_id: "x".into(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                CounselError::ValidationFailed {
                    issues: vec![FieldIssue::new("county", IssueKind::Missing)],
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                CounselError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).into_response().status(), status);
        }
    }
}
