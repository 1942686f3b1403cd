//! Document generation orchestrator.

use std::sync::Arc;

use counsel_auth::AttorneySessionService;
use counsel_core::clock::Clock;
use counsel_core::drafting::SectionDrafter;
use counsel_core::error::{CounselError, CounselResult};
use counsel_core::models::audit::AuditAction;
use counsel_core::models::document::GeneratedDocument;
use counsel_core::models::session::SessionId;
use counsel_core::models::template::FormData;
use counsel_core::repository::{AuditLogSink, SessionStore, TemplateRegistry};
use counsel_template::{get_effective_template, validate};
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::{info, instrument};

use crate::assembler::assemble;
use crate::generator::SectionGenerator;

/// One document generation request.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub template_id: String,
    pub jurisdiction: String,
    #[serde(default)]
    pub form_data: FormData,
}

/// Runs a generation request through session check, template resolution,
/// form validation, drafting, assembly and audit.
///
/// Nothing is drafted unless the session is valid and the form passes
/// validation. Every successful generation is audited.
pub struct DocumentGenerator<S, A, C, R, D>
where
    S: SessionStore,
    A: AuditLogSink,
    C: Clock,
    R: TemplateRegistry,
    D: SectionDrafter,
{
    sessions: Arc<AttorneySessionService<S, A, C>>,
    templates: Arc<R>,
    sections: SectionGenerator<D>,
}

impl<S, A, C, R, D> DocumentGenerator<S, A, C, R, D>
where
    S: SessionStore,
    A: AuditLogSink,
    C: Clock,
    R: TemplateRegistry,
    D: SectionDrafter + 'static,
{
    pub fn new(
        sessions: Arc<AttorneySessionService<S, A, C>>,
        templates: Arc<R>,
        sections: SectionGenerator<D>,
    ) -> Self {
        Self {
            sessions,
            templates,
            sections,
        }
    }

    pub fn sessions(&self) -> &AttorneySessionService<S, A, C> {
        &self.sessions
    }

    pub fn templates(&self) -> &R {
        &self.templates
    }

    #[instrument(
        skip_all,
        fields(
            session = %session_id.prefix(),
            template = %request.template_id,
            jurisdiction = %request.jurisdiction,
        )
    )]
    pub async fn generate_document(
        &self,
        session_id: &SessionId,
        request: GenerateRequest,
    ) -> CounselResult<GeneratedDocument> {
        self.sessions.validate_session(session_id).await?;

        let effective = get_effective_template(
            self.templates.as_ref(),
            &request.template_id,
            &request.jurisdiction,
        )?;
        validate(&effective, &request.form_data)?;

        let drafts = self.sections.draft_all(&effective, &request.form_data).await;
        let document = assemble(
            &effective,
            &request.form_data,
            &drafts,
            session_id.prefix(),
            self.sessions.now(),
        );

        let needs_review = document.needs_review();
        self.sessions
            .record(
                AuditAction::DocumentGenerated,
                session_id,
                Some(json!({
                    "document_id": document.id,
                    "template_id": document.template_id,
                    "jurisdiction": document.jurisdiction,
                    "variant_applied": effective.variant_applied,
                    "sections": document.sections.len(),
                    "placeholder_sections": needs_review,
                    "form_fingerprint": form_fingerprint(&request.form_data)?,
                })),
            )
            .await?;

        info!(
            document = %document.id,
            sections = document.sections.len(),
            placeholders = needs_review.len(),
            "Document generated"
        );
        Ok(document)
    }
}

/// SHA-256 of the canonical form data, so the audit trail can tie a
/// document to its inputs without storing client facts.
pub fn form_fingerprint(form: &FormData) -> CounselResult<String> {
    let bytes = serde_json::to_vec(form)
        .map_err(|e| CounselError::Internal(format!("form serialization: {e}")))?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
