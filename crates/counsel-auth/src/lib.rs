//! Counsel Auth: attorney attestation, verification session lifecycle
//! and session identifier generation.

pub mod attestation;
pub mod config;
pub mod error;
pub mod service;
pub mod token;

pub use attestation::validate_attestation;
pub use config::AuthConfig;
pub use error::AuthError;
pub use service::AttorneySessionService;
