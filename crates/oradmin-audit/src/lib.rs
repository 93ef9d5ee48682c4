//! Oradmin Audit - Audit trail retrieval and audit configuration
//!
//! This crate provides:
//! - Filtered queries over the session, table-access and privileged-action trails
//! - Statistics folded over exactly the records a query returned
//! - Session, object and action audit configuration
//! - Overall audit state

pub mod aggregate;
pub mod category;
pub mod model;
pub mod query;
pub mod service;

pub use category::{AuditCategory, PrivilegedActions, SessionEvents, TableAccess};
pub use model::*;
pub use service::AuditService;
