//! Template catalog error types and conversions.

use std::path::PathBuf;

use counsel_core::error::CounselError;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("template {template_id} is invalid: {}", .problems.join("; "))]
    Invalid {
        template_id: String,
        problems: Vec<String>,
    },

    #[error("template {template_id} is defined more than once")]
    Duplicate { template_id: String },
}

impl From<CatalogError> for CounselError {
    fn from(err: CatalogError) -> Self {
        CounselError::Config(err.to_string())
    }
}
