//! Oradmin Common - Shared types and utilities
//!
//! This crate provides the foundational types used across all Oradmin components:
//! - Error types
//! - Response envelopes shared by every console endpoint
//! - Timestamp and integer parsing for request payloads

pub mod envelope;
pub mod error;
pub mod macros;
pub mod number;
pub mod time;

// Re-exports for convenience
pub use envelope::{CommandStatus, Envelope, Outcome};
pub use error::{OradminError, Result};
