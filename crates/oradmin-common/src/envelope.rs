//! Response envelopes
//!
//! The console speaks two envelope dialects, both inherited by the dashboard:
//!
//! | Family                         | Shape                                   |
//! |--------------------------------|-----------------------------------------|
//! | audit, performance             | `{exitoso, mensaje, ...payload}`        |
//! | security, tablespace, backup   | `{resultado, errores[], ...payload}`    |
//!
//! Payload structs embed one of them with `#[serde(flatten)]` and implement
//! [`Envelope`] so the HTTP layer can pick the status code without knowing the
//! concrete type.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Anything that can be answered with 200 on success and 400 on failure.
pub trait Envelope {
    fn succeeded(&self) -> bool;
}

/// `{exitoso, mensaje}` envelope used by the audit and performance endpoints
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub exitoso: bool,
    pub mensaje: String,
}

impl Outcome {
    pub fn ok(mensaje: impl Into<String>) -> Self {
        Outcome {
            exitoso: true,
            mensaje: mensaje.into(),
        }
    }

    pub fn fail(mensaje: impl Into<String>) -> Self {
        Outcome {
            exitoso: false,
            mensaje: mensaje.into(),
        }
    }
}

impl Envelope for Outcome {
    fn succeeded(&self) -> bool {
        self.exitoso
    }
}

/// `{resultado, errores}` envelope used by the command-style endpoints
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandStatus {
    pub resultado: bool,
    pub errores: Vec<String>,
}

impl CommandStatus {
    pub fn success() -> Self {
        CommandStatus {
            resultado: true,
            errores: Vec::new(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        CommandStatus {
            resultado: false,
            errores: vec![error.into()],
        }
    }

    /// Build a status from a fallible command. Execution failures are prefixed
    /// with `context`; failed preconditions are reported as they are.
    pub fn from_result<T>(result: &Result<T>, context: &str) -> Self {
        match result {
            Ok(_) => CommandStatus::success(),
            Err(e) if e.is_precondition() => CommandStatus::failure(e.to_string()),
            Err(e) => CommandStatus::failure(format!("{}: {}", context, e)),
        }
    }
}

impl Envelope for CommandStatus {
    fn succeeded(&self) -> bool {
        self.resultado
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OradminError;

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(Outcome::ok("listo")).unwrap();
        assert_eq!(json["exitoso"], true);
        assert_eq!(json["mensaje"], "listo");
    }

    #[test]
    fn test_command_status_from_result() {
        let ok: Result<()> = Ok(());
        assert_eq!(
            CommandStatus::from_result(&ok, "Error al crear rol"),
            CommandStatus::success()
        );

        let err: Result<()> = Err(OradminError::database("ORA-01921"));
        let status = CommandStatus::from_result(&err, "Error al crear rol");
        assert!(!status.succeeded());
        assert_eq!(status.errores, vec!["Error al crear rol: ORA-01921"]);
    }

    #[test]
    fn test_precondition_is_not_prefixed() {
        let err: Result<()> = Err(OradminError::validation("El nombre del tablespace es requerido"));
        let status = CommandStatus::from_result(&err, "Error al crear tablespace");
        assert_eq!(status.errores, vec!["El nombre del tablespace es requerido"]);
    }

    #[test]
    fn test_command_status_shape() {
        let json = serde_json::to_value(CommandStatus::failure("x")).unwrap();
        assert_eq!(json, serde_json::json!({"resultado": false, "errores": ["x"]}));
    }
}
