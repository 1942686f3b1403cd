//! Counsel Server: configuration, wiring and HTTP transport for the
//! attorney document engine.

pub mod app;
pub mod config;
pub mod routes;

pub use app::{Generator, build_generator, spawn_sweeper};
pub use config::ServerConfig;
pub use routes::router;
