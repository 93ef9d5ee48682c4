//! Administrative command services
//!
//! Each service holds the shared gateway and opens one session per public
//! operation. Operations never return `Err`: failures are folded into the
//! operation's response envelope at the boundary.

pub mod backup;
pub mod performance;
pub mod security;
pub mod tablespace;

pub use backup::BackupService;
pub use performance::PerformanceService;
pub use security::SecurityService;
pub use tablespace::TablespaceService;

use oradmin_common::{OradminError, Result};

/// Reject blank required fields with the operator-facing message
pub(crate) fn require(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(OradminError::validation(message))
    } else {
        Ok(())
    }
}
