//! Request and response types for the administrative endpoints
//!
//! - Security: users, roles, privileges
//! - Tablespaces: lifecycle requests and datafile usage
//! - Performance: execution plans and index creation
//! - Backup: dump requests and the shared backup outcome

pub mod backup;
pub mod performance;
pub mod security;
pub mod tablespace;

pub use backup::*;
pub use performance::*;
pub use security::*;
pub use tablespace::*;
