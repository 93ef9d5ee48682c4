//! Oradmin Admin - Administrative command services
//!
//! This crate provides:
//! - User, role and privilege management
//! - Tablespace lifecycle and space reporting
//! - Execution plans and index creation
//! - Data Pump exports and imports through an external utility

pub mod model;
pub mod runner;
pub mod service;

pub use model::*;
pub use runner::{CommandOutput, DumpRunner, ProcessRunner};
pub use service::*;
