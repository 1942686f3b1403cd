//! Domain models for the Counsel engine.
//!
//! These are the core types shared across all crates.

pub mod attestation;
pub mod audit;
pub mod document;
pub mod session;
pub mod template;
pub mod validation;
