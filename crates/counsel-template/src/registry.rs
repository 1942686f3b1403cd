//! Template registry backed by templates loaded at startup.

use std::collections::HashMap;

use counsel_core::error::{CounselError, CounselResult};
use counsel_core::models::template::{DocumentTemplate, EffectiveTemplate};
use counsel_core::repository::TemplateRegistry;

use crate::catalog::check_template;
use crate::error::CatalogError;
use crate::merge::merge;

/// Immutable template lookup. Safe to share across threads without locking.
#[derive(Debug, Clone, Default)]
pub struct StaticTemplateRegistry {
    templates: HashMap<String, DocumentTemplate>,
}

impl StaticTemplateRegistry {
    /// Check and index `templates`. Fails on the first invalid or
    /// duplicated template.
    pub fn from_templates(
        templates: impl IntoIterator<Item = DocumentTemplate>,
    ) -> Result<Self, CatalogError> {
        let mut map = HashMap::new();
        for template in templates {
            check_template(&template)?;
            if map.contains_key(&template.id) {
                return Err(CatalogError::Duplicate {
                    template_id: template.id,
                });
            }
            map.insert(template.id.clone(), template);
        }
        Ok(Self { templates: map })
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateRegistry for StaticTemplateRegistry {
    fn template(&self, template_id: &str) -> Option<&DocumentTemplate> {
        self.templates.get(template_id)
    }

    fn template_ids(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self.templates.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

/// Resolve the effective template for `jurisdiction`.
///
/// Jurisdiction codes are matched case-insensitively; a jurisdiction
/// without a variant falls back to the base template.
pub fn get_effective_template<R: TemplateRegistry + ?Sized>(
    registry: &R,
    template_id: &str,
    jurisdiction: &str,
) -> CounselResult<EffectiveTemplate> {
    let base = registry
        .template(template_id)
        .ok_or_else(|| CounselError::TemplateNotFound {
            template_id: template_id.to_string(),
        })?;
    let jurisdiction = jurisdiction.trim().to_ascii_uppercase();
    Ok(merge(base, base.variants.get(&jurisdiction), &jurisdiction))
}
