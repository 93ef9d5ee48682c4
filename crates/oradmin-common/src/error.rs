//! Error types for Oradmin
//!
//! `OradminError` is the single internal error type. Services convert it into a
//! failure envelope at their boundary, so its `Display` output is what the
//! dashboard finally shows to the operator.

/// Application-specific error types
#[derive(thiserror::Error, Debug)]
pub enum OradminError {
    /// A required request field is missing or out of range
    #[error("{0}")]
    Validation(String),

    /// The database rejected a statement or the connection failed
    #[error("{0}")]
    Database(String),

    /// An external utility could not be started or exited abnormally
    #[error("{0}")]
    Process(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl OradminError {
    pub fn validation(message: impl Into<String>) -> Self {
        OradminError::Validation(message.into())
    }

    pub fn database(message: impl Into<String>) -> Self {
        OradminError::Database(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        OradminError::NotFound(message.into())
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        OradminError::AlreadyExists(message.into())
    }

    /// Failed preconditions are shown to the operator without an operation prefix
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            OradminError::Validation(_) | OradminError::NotFound(_) | OradminError::AlreadyExists(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, OradminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_is_bare_message() {
        let err = OradminError::database("ORA-00942: table or view does not exist");
        assert_eq!(err.to_string(), "ORA-00942: table or view does not exist");
    }

    #[test]
    fn test_is_precondition() {
        assert!(OradminError::not_found("El tablespace TS9 no existe").is_precondition());
        assert!(OradminError::already_exists("dup").is_precondition());
        assert!(OradminError::validation("name required").is_precondition());
        assert!(!OradminError::Process("exit 1".to_string()).is_precondition());
        assert!(!OradminError::database("ORA-01031").is_precondition());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "expdp: not found");
        let err: OradminError = io.into();
        assert!(matches!(err, OradminError::Io(_)));
        assert_eq!(err.to_string(), "expdp: not found");
    }
}
