//! Hub Common - Shared utilities for the hub service
//!
//! This crate provides functionality used by the hub server and its CLI:
//!
//! - **Initialization**: [`init_tracing`] for standardized logging setup
//! - **Wire types**: the [`Tool`] model and the response envelopes shared
//!   between the HTTP layer and clients

pub mod init;
pub mod types;

// Re-export commonly used items at crate root
pub use init::init_tracing;
pub use types::{ErrorBody, HealthResponse, Tool, ToolKind};
