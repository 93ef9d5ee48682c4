//! Oradmin Persistence - Database gateway for the administered Oracle instance
//!
//! This crate provides:
//! - The `DatabaseGateway`/`Session` abstraction (one connection per operation)
//! - The Oracle implementation backed by the `oracle` driver
//! - A dynamic `Value`/`Row` model decoupled from the driver
//! - Construction of every administrative statement the console emits
//! - A scripted in-memory gateway for tests (`testing` feature)

pub mod model;
pub mod driver;
pub mod settings;
pub mod statement;
pub mod traits;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export gateway traits
pub use traits::{DatabaseGateway, Session};

// Re-export Oracle backend
pub use driver::OracleGateway;

// Re-export model types
pub use model::{Row, SqlParam, Value, param};

pub use settings::DatabaseSettings;
