//! Shared application state handed to every handler

use std::sync::Arc;

use oradmin_admin::{
    BackupService, BackupSettings, DumpRunner, PerformanceService, ProcessRunner,
    SecurityService, TablespaceService,
};
use oradmin_audit::AuditService;
use oradmin_persistence::{DatabaseGateway, DatabaseSettings, OracleGateway};

use super::config::Configuration;

/// One instance of each console service, all sharing a gateway
pub struct AppState {
    pub gateway: Arc<dyn DatabaseGateway>,
    pub audit: AuditService,
    pub security: SecurityService,
    pub tablespace: TablespaceService,
    pub performance: PerformanceService,
    pub backup: BackupService,
}

impl AppState {
    pub fn new(
        gateway: Arc<dyn DatabaseGateway>,
        database: DatabaseSettings,
        backup: BackupSettings,
        runner: Arc<dyn DumpRunner>,
    ) -> Self {
        Self {
            audit: AuditService::new(gateway.clone()),
            security: SecurityService::new(gateway.clone()),
            tablespace: TablespaceService::new(gateway.clone()),
            performance: PerformanceService::new(gateway.clone()),
            backup: BackupService::new(gateway.clone(), database, backup, runner),
            gateway,
        }
    }

    /// Production wiring: Oracle driver and the real Data Pump utilities
    pub fn from_configuration(configuration: &Configuration) -> Self {
        let database = configuration.database_settings();
        let gateway: Arc<dyn DatabaseGateway> = Arc::new(OracleGateway::new(database.clone()));
        Self::new(
            gateway,
            database,
            configuration.backup_settings(),
            Arc::new(ProcessRunner),
        )
    }
}
