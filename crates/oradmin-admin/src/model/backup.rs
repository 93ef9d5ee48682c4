//! Data Pump backup types

use std::path::PathBuf;

use serde::Deserialize;

use oradmin_common::CommandStatus;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaBackupRequest {
    #[serde(default)]
    pub nombre_schema: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableBackupRequest {
    #[serde(default)]
    pub nombre_schema: String,
    #[serde(default)]
    pub nombre_tabla: String,
}

/// Result of one export or import run.
///
/// `errors` doubles as the notice list: successful imports put their
/// confirmation message there too, which is what the dashboard displays.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BackupOutcome {
    pub succeeded: bool,
    pub errors: Vec<String>,
}

impl BackupOutcome {
    pub fn success() -> Self {
        BackupOutcome {
            succeeded: true,
            errors: Vec::new(),
        }
    }

    pub fn success_with(notice: impl Into<String>) -> Self {
        BackupOutcome {
            succeeded: true,
            errors: vec![notice.into()],
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        BackupOutcome {
            succeeded: false,
            errors: vec![error.into()],
        }
    }
}

impl From<BackupOutcome> for CommandStatus {
    fn from(outcome: BackupOutcome) -> Self {
        CommandStatus {
            resultado: outcome.succeeded,
            errores: outcome.errors,
        }
    }
}

/// Where dumps are written and which utilities produce them
#[derive(Clone, Debug)]
pub struct BackupSettings {
    /// Server-side directory the Oracle directory alias points to
    pub directory: PathBuf,
    pub directory_alias: String,
    pub export_command: String,
    pub import_command: String,
    /// Net service name used in the utility's connect argument
    pub service_name: String,
    /// Base name of the full-database dump and log files
    pub full_dump_name: String,
}

impl Default for BackupSettings {
    fn default() -> Self {
        BackupSettings {
            directory: PathBuf::from("/var/lib/oradmin/backups"),
            directory_alias: "RESPALDO".to_string(),
            export_command: "expdp".to_string(),
            import_command: "impdp".to_string(),
            service_name: "XE".to_string(),
            full_dump_name: "XE".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oradmin_common::Envelope;

    #[test]
    fn test_outcome_into_status() {
        let status: CommandStatus =
            BackupOutcome::success_with("Importación completada exitosamente.").into();
        assert!(status.succeeded());
        assert_eq!(status.errores, vec!["Importación completada exitosamente."]);

        let status: CommandStatus = BackupOutcome::failure("Error al realizar el respaldo: x").into();
        assert!(!status.succeeded());
    }

    #[test]
    fn test_table_request_payload() {
        let request: TableBackupRequest =
            serde_json::from_str(r#"{"nombreSchema":"HR","nombreTabla":"EMPLOYEES"}"#).unwrap();
        assert_eq!(request.nombre_schema, "HR");
        assert_eq!(request.nombre_tabla, "EMPLOYEES");
    }
}
