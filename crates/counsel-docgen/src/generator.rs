//! AI section generation with per-section timeout, retry and placeholder
//! fallback.
//!
//! Sections are drafted concurrently. A section whose drafting fails after
//! the retry becomes a placeholder; one failing section never fails the
//! document.

use std::collections::HashMap;
use std::sync::Arc;

use counsel_core::drafting::{DraftError, DraftRequest, SectionDrafter};
use counsel_core::models::template::{EffectiveTemplate, FormData, SectionBody, TemplateSection};
use counsel_template::interpolate::interpolate_fields;
use tokio::task::JoinSet;
use tracing::{debug, error, instrument, warn};

use crate::config::DraftingPolicy;

/// Text put in place of a section that could not be drafted.
pub fn placeholder_text(section_title: &str) -> String {
    format!("[Attorney to complete: {section_title}]")
}

/// Outcome of drafting one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionDraft {
    Drafted(String),
    Placeholder(String),
}

impl SectionDraft {
    pub fn text(&self) -> &str {
        match self {
            Self::Drafted(t) | Self::Placeholder(t) => t,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

pub struct SectionGenerator<D: SectionDrafter> {
    drafter: Arc<D>,
    policy: DraftingPolicy,
}

impl<D: SectionDrafter + 'static> SectionGenerator<D> {
    pub fn new(drafter: D, policy: DraftingPolicy) -> Self {
        Self {
            drafter: Arc::new(drafter),
            policy,
        }
    }

    pub fn policy(&self) -> &DraftingPolicy {
        &self.policy
    }

    /// Build the drafting call for `section`, or `None` for static sections.
    ///
    /// The prompt is interpolated from the form data first, so the drafter
    /// sees the attorney's facts rather than placeholder names.
    pub fn build_request(
        &self,
        effective: &EffectiveTemplate,
        section: &TemplateSection,
        form: &FormData,
    ) -> Option<DraftRequest> {
        let SectionBody::AiDrafted { prompt, max_tokens } = &section.body else {
            return None;
        };
        Some(DraftRequest {
            section_id: section.id.clone(),
            prompt: interpolate_fields(prompt, form, |k| effective.input(k).map(|i| i.input_type)),
            max_tokens: max_tokens.unwrap_or(self.policy.default_max_tokens),
            temperature: self.policy.temperature,
        })
    }

    /// Draft one section, falling back to a placeholder.
    pub async fn draft_section(&self, request: DraftRequest, title: &str) -> SectionDraft {
        draft_with_retry(Arc::clone(&self.drafter), self.policy.clone(), request, title).await
    }

    /// Draft every AI section of `effective` concurrently, keyed by section id.
    ///
    /// Dropping the returned future aborts drafts still in flight.
    #[instrument(skip_all, fields(template = %effective.template_id))]
    pub async fn draft_all(
        &self,
        effective: &EffectiveTemplate,
        form: &FormData,
    ) -> HashMap<String, SectionDraft> {
        let mut tasks = JoinSet::new();
        for section in &effective.sections {
            let Some(request) = self.build_request(effective, section, form) else {
                continue;
            };
            let drafter = Arc::clone(&self.drafter);
            let policy = self.policy.clone();
            let title = section.title.clone();
            tasks.spawn(async move {
                let section_id = request.section_id.clone();
                let draft = draft_with_retry(drafter, policy, request, &title).await;
                (section_id, draft)
            });
        }

        let mut drafts = HashMap::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((section_id, draft)) => {
                    drafts.insert(section_id, draft);
                }
                // The assembler puts a placeholder wherever a draft is missing.
                Err(e) => error!(error = %e, "Drafting task failed"),
            }
        }

        debug!(
            sections = drafts.len(),
            placeholders = drafts.values().filter(|d| d.is_placeholder()).count(),
            "Drafting finished"
        );
        drafts
    }
}

async fn draft_with_retry<D: SectionDrafter>(
    drafter: Arc<D>,
    policy: DraftingPolicy,
    request: DraftRequest,
    title: &str,
) -> SectionDraft {
    let attempts = policy.max_retries.saturating_add(1);

    for attempt in 1..=attempts {
        match attempt_once(drafter.as_ref(), &policy, request.clone()).await {
            Ok(text) => return SectionDraft::Drafted(text),
            Err(e) => {
                warn!(
                    section = %request.section_id,
                    attempt,
                    error = %e,
                    "Section drafting attempt failed"
                );
                if !e.is_transient() || attempt == attempts {
                    break;
                }
                tokio::time::sleep(policy.retry_backoff * attempt).await;
            }
        }
    }

    warn!(section = %request.section_id, "Falling back to attorney placeholder");
    SectionDraft::Placeholder(placeholder_text(title))
}

async fn attempt_once<D: SectionDrafter>(
    drafter: &D,
    policy: &DraftingPolicy,
    request: DraftRequest,
) -> Result<String, DraftError> {
    let text = tokio::time::timeout(policy.timeout, drafter.draft(request))
        .await
        .map_err(|_| DraftError::Timeout)??;
    if text.trim().is_empty() {
        return Err(DraftError::EmptyResponse);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use counsel_core::models::template::{InputType, Requirement, TemplateInput};
    use serde_json::json;

    /// Fails the first `failures` calls, then echoes the prompt.
    struct Flaky {
        failures: u32,
        error: fn() -> DraftError,
        calls: AtomicU32,
    }

    impl Flaky {
        fn new(failures: u32, error: fn() -> DraftError) -> Self {
            Self {
                failures,
                error,
                calls: AtomicU32::new(0),
            }
        }
    }

    impl SectionDrafter for Flaky {
        async fn draft(&self, request: DraftRequest) -> Result<String, DraftError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err((self.error)())
            } else {
                Ok(format!("drafted: {}", request.prompt))
            }
        }
    }

    struct Hangs;

    impl SectionDrafter for Hangs {
        async fn draft(&self, _request: DraftRequest) -> Result<String, DraftError> {
            std::future::pending().await
        }
    }

    fn policy() -> DraftingPolicy {
        DraftingPolicy {
            timeout: Duration::from_secs(5),
            max_retries: 1,
            retry_backoff: Duration::from_millis(100),
            default_max_tokens: 800,
            temperature: 0.2,
        }
    }

    fn request() -> DraftRequest {
        DraftRequest {
            section_id: "facts".into(),
            prompt: "p".into(),
            max_tokens: 100,
            temperature: 0.2,
        }
    }

    fn effective() -> EffectiveTemplate {
        EffectiveTemplate {
            template_id: "t".into(),
            title: "T".into(),
            jurisdiction: "CA".into(),
            variant_applied: false,
            sections: vec![
                TemplateSection {
                    id: "caption".into(),
                    title: "Caption".into(),
                    order: 1,
                    body: SectionBody::Static {
                        content: "IN RE {{client_name}}".into(),
                    },
                },
                TemplateSection {
                    id: "facts".into(),
                    title: "Statement of Facts".into(),
                    order: 2,
                    body: SectionBody::AiDrafted {
                        prompt: "Summarize: {{facts_summary}}".into(),
                        max_tokens: None,
                    },
                },
            ],
            inputs: vec![TemplateInput {
                key: "facts_summary".into(),
                label: "Facts".into(),
                input_type: InputType::Text,
                required: Requirement::Always,
                pattern: None,
                options: Vec::new(),
            }],
        }
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failure_is_retried_once() {
        let generator = SectionGenerator::new(Flaky::new(1, || DraftError::Timeout), policy());
        let draft = generator.draft_section(request(), "Facts").await;
        assert_eq!(draft, SectionDraft::Drafted("drafted: p".into()));
        assert_eq!(generator.drafter.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn two_failures_produce_placeholder() {
        let generator = SectionGenerator::new(
            Flaky::new(2, || DraftError::Unavailable("503".into())),
            policy(),
        );
        let draft = generator.draft_section(request(), "Statement of Facts").await;
        assert_eq!(
            draft,
            SectionDraft::Placeholder("[Attorney to complete: Statement of Facts]".into())
        );
        assert_eq!(generator.drafter.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn rejection_is_not_retried() {
        let generator = SectionGenerator::new(
            Flaky::new(1, || DraftError::Rejected("400".into())),
            policy(),
        );
        let draft = generator.draft_section(request(), "Facts").await;
        assert!(draft.is_placeholder());
        assert_eq!(generator.drafter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_drafter_times_out_into_placeholder() {
        let generator = SectionGenerator::new(Hangs, policy());
        let draft = generator.draft_section(request(), "Facts").await;
        assert_eq!(draft.text(), "[Attorney to complete: Facts]");
    }

    #[test]
    fn request_uses_interpolated_prompt_and_default_length() {
        let generator = SectionGenerator::new(Hangs, policy());
        let tmpl = effective();
        let form = FormData::from([("facts_summary".to_string(), json!("served on May 1"))]);

        assert!(generator.build_request(&tmpl, &tmpl.sections[0], &form).is_none());
        let req = generator.build_request(&tmpl, &tmpl.sections[1], &form).unwrap();
        assert_eq!(req.prompt, "Summarize: served on May 1");
        assert_eq!(req.max_tokens, 800);
    }

    #[tokio::test(start_paused = true)]
    async fn draft_all_covers_only_ai_sections() {
        let generator = SectionGenerator::new(Flaky::new(0, || DraftError::Timeout), policy());
        let tmpl = effective();
        let drafts = generator.draft_all(&tmpl, &FormData::new()).await;
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts["facts"].text(), "drafted: Summarize: ");
    }
}
