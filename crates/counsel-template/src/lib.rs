//! Counsel Template: template catalog, jurisdiction variant merging,
//! form validation and placeholder interpolation.
//!
//! Everything here is pure or read-only: templates are loaded once at
//! startup and never mutated afterwards.

pub mod catalog;
mod error;
pub mod interpolate;
pub mod merge;
pub mod registry;
pub mod validate;

pub use catalog::{CatalogConfig, load_catalog};
pub use error::CatalogError;
pub use merge::merge;
pub use registry::{StaticTemplateRegistry, get_effective_template};
pub use validate::validate;
