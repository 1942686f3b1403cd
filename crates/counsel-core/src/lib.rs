//! Counsel Core: domain models, error taxonomy, storage traits and the
//! injected clock shared by every crate of the attorney document engine.

pub mod clock;
pub mod drafting;
pub mod error;
pub mod models;
pub mod repository;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CounselError, CounselResult, SessionFailure};
