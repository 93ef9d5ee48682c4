//! Data Pump exports and imports
//!
//! Dumps are written by the database server into the directory named by the
//! configured alias. Before every run the local directory is created if
//! missing and the alias is (re)pointed at it.

use std::sync::Arc;

use tracing::{info, warn};

use oradmin_common::Result;
use oradmin_persistence::{DatabaseGateway, DatabaseSettings, statement};

use super::require;
use crate::model::*;
use crate::runner::{CommandOutput, DumpRunner};

const EXPORT_FAILED: &str = "Error al realizar el respaldo";
const IMPORT_FAILED: &str = "Error al realizar la importación";
const FULL_IMPORT_FAILED: &str = "Error al realizar la importación completa";

/// What a dump covers, and the file stem its dump and log are named after
enum DumpScope<'a> {
    Schema(&'a str),
    Table { schema: &'a str, table: &'a str },
    Full,
}

impl DumpScope<'_> {
    fn file_stem(&self, settings: &BackupSettings) -> String {
        match self {
            DumpScope::Schema(schema) => schema.to_string(),
            DumpScope::Table { schema, table } => format!("{}_{}", schema, table),
            DumpScope::Full => settings.full_dump_name.clone(),
        }
    }

    fn export_filter(&self) -> String {
        match self {
            DumpScope::Schema(schema) => format!("SCHEMAS={}", schema),
            DumpScope::Table { schema, table } => format!("TABLES={}.{}", schema, table),
            DumpScope::Full => "FULL=Y".to_string(),
        }
    }

    /// Schema dumps are restored whole, the same way full dumps are
    fn import_filter(&self) -> String {
        match self {
            DumpScope::Table { schema, table } => format!("TABLES={}.{}", schema, table),
            DumpScope::Schema(_) | DumpScope::Full => "FULL=Y".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct BackupService {
    gateway: Arc<dyn DatabaseGateway>,
    database: DatabaseSettings,
    settings: BackupSettings,
    runner: Arc<dyn DumpRunner>,
}

impl BackupService {
    pub fn new(
        gateway: Arc<dyn DatabaseGateway>,
        database: DatabaseSettings,
        settings: BackupSettings,
        runner: Arc<dyn DumpRunner>,
    ) -> Self {
        Self {
            gateway,
            database,
            settings,
            runner,
        }
    }

    pub async fn export_schema(&self, request: SchemaBackupRequest) -> BackupOutcome {
        if let Err(e) = require(&request.nombre_schema, "El nombre del schema es requerido") {
            return BackupOutcome::failure(e.to_string());
        }
        self.export(DumpScope::Schema(&request.nombre_schema)).await
    }

    pub async fn export_table(&self, request: TableBackupRequest) -> BackupOutcome {
        if let Err(e) = validate_table(&request) {
            return BackupOutcome::failure(e.to_string());
        }
        self.export(DumpScope::Table {
            schema: &request.nombre_schema,
            table: &request.nombre_tabla,
        })
        .await
    }

    pub async fn export_full(&self) -> BackupOutcome {
        self.export(DumpScope::Full).await
    }

    /// Restore a schema dump. The whole dump file is imported.
    pub async fn import_schema(&self, request: SchemaBackupRequest) -> BackupOutcome {
        if let Err(e) = require(&request.nombre_schema, "El nombre del schema es requerido") {
            return BackupOutcome::failure(e.to_string());
        }
        self.import(
            DumpScope::Schema(&request.nombre_schema),
            "Importación completada exitosamente.",
            IMPORT_FAILED,
        )
        .await
    }

    /// Restore one table, replacing it when it already exists
    pub async fn import_table(&self, request: TableBackupRequest) -> BackupOutcome {
        if let Err(e) = validate_table(&request) {
            return BackupOutcome::failure(e.to_string());
        }
        self.import(
            DumpScope::Table {
                schema: &request.nombre_schema,
                table: &request.nombre_tabla,
            },
            "Importación de la tabla completada exitosamente.",
            IMPORT_FAILED,
        )
        .await
    }

    pub async fn import_full(&self) -> BackupOutcome {
        self.import(
            DumpScope::Full,
            "Importación completa realizada exitosamente.",
            FULL_IMPORT_FAILED,
        )
        .await
    }

    async fn export(&self, scope: DumpScope<'_>) -> BackupOutcome {
        let stem = scope.file_stem(&self.settings);
        let args = self.arguments(scope.export_filter(), &stem);

        let output = match self.run(&self.settings.export_command, &args).await {
            Ok(output) => output,
            Err(e) => {
                warn!(dump = %stem, error = %e, "Export could not run");
                return BackupOutcome::failure(format!("{}: {}", EXPORT_FAILED, e));
            }
        };

        if output.success() {
            info!(dump = %stem, "Export completed");
            BackupOutcome::success()
        } else {
            warn!(dump = %stem, exit_code = output.exit_code, "Export failed");
            BackupOutcome::failure(format!(
                "{}: {} {}",
                EXPORT_FAILED, output.stdout, output.stderr
            ))
        }
    }

    async fn import(
        &self,
        scope: DumpScope<'_>,
        success_notice: &str,
        failure_prefix: &str,
    ) -> BackupOutcome {
        let stem = scope.file_stem(&self.settings);
        let mut args = self.arguments(scope.import_filter(), &stem);
        if matches!(scope, DumpScope::Table { .. }) {
            args.push("TABLE_EXISTS_ACTION=REPLACE".to_string());
        }

        let output = match self.run(&self.settings.import_command, &args).await {
            Ok(output) => output,
            Err(e) => {
                warn!(dump = %stem, error = %e, "Import could not run");
                return BackupOutcome::failure(format!("{}: {}", failure_prefix, e));
            }
        };

        if output.success() {
            info!(dump = %stem, "Import completed");
            BackupOutcome::success_with(success_notice)
        } else {
            warn!(dump = %stem, exit_code = output.exit_code, "Import failed");
            BackupOutcome::failure(format!("{}: {}", failure_prefix, output.stderr))
        }
    }

    /// Prepare the dump directory, then hand over to the utility
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        self.prepare_directory().await?;
        self.runner.run(program, args).await
    }

    async fn prepare_directory(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.settings.directory).await?;

        let session = self.gateway.open().await?;
        session
            .execute_ddl(&statement::create_directory(
                &self.settings.directory_alias,
                &self.settings.directory.to_string_lossy(),
            ))
            .await
    }

    fn arguments(&self, filter: String, stem: &str) -> Vec<String> {
        vec![
            format!(
                "{}/{}@{}",
                self.database.username, self.database.password, self.settings.service_name
            ),
            filter,
            format!("DIRECTORY={}", self.settings.directory_alias),
            format!("DUMPFILE={}.DMP", stem),
            format!("LOGFILE={}.LOG", stem),
        ]
    }
}

fn validate_table(request: &TableBackupRequest) -> Result<()> {
    require(&request.nombre_schema, "El nombre del schema es requerido")?;
    require(&request.nombre_tabla, "El nombre de la tabla es requerido")
}
