//! Counsel Docgen: AI section drafting, document assembly and the
//! generation orchestrator.

pub mod assembler;
pub mod client;
pub mod config;
pub mod generator;
pub mod service;

pub use assembler::assemble;
pub use client::HttpSectionDrafter;
pub use config::{DraftingConfig, DraftingPolicy};
pub use generator::{SectionDraft, SectionGenerator, placeholder_text};
pub use service::{DocumentGenerator, GenerateRequest};
