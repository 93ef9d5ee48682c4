//! Audit service
//!
//! Every public operation opens its own session, catches failures at its
//! boundary and answers with its envelope; nothing here returns `Err` to the
//! HTTP layer.

use std::sync::Arc;

use tracing::{debug, info, warn};

use oradmin_common::{Outcome, Result};
use oradmin_persistence::{DatabaseGateway, Row, statement};

use crate::aggregate::{order_and_cap, summarize};
use crate::category::{AuditCategory, PrivilegedActions, SessionEvents, TableAccess};
use crate::model::*;
use crate::query;

const UNIFIED_AUDITING_SQL: &str =
    "SELECT COUNT(*) FROM V$OPTION WHERE PARAMETER = 'Unified Auditing' AND VALUE = 'TRUE'";

const OBJECT_AUDIT_OPTIONS_SQL: &str = "SELECT OWNER, OBJECT_NAME, OBJECT_TYPE, \
     ALT, AUD, COM, DEL, GRA, IND, INS, LOC, REN, SEL, UPD, EXE \
     FROM DBA_OBJ_AUDIT_OPTS WHERE OWNER = 'SYS'";

const RECENT_UNIFIED_RECORDS_SQL: &str = "SELECT COUNT(*) FROM UNIFIED_AUDIT_TRAIL \
     WHERE event_timestamp >= SYSTIMESTAMP - INTERVAL '24' HOUR";

const RECENT_LOGONS_SQL: &str = "SELECT COUNT(*) AS total, \
     COUNT(CASE WHEN returncode = 0 THEN 1 END) AS exitosos, \
     COUNT(CASE WHEN returncode != 0 THEN 1 END) AS fallidos, \
     MAX(CASE WHEN returncode = 0 THEN timestamp END) AS ultima_exitosa, \
     MAX(CASE WHEN returncode != 0 THEN timestamp END) AS ultima_fallida \
     FROM DBA_AUDIT_TRAIL \
     WHERE action_name = 'LOGON' AND timestamp > SYSTIMESTAMP - INTERVAL '1' DAY";

/// Object audit option columns, in reporting order
const AUDIT_OPTION_COLUMNS: &[(&str, &str)] = &[
    ("SEL", "SELECT"),
    ("INS", "INSERT"),
    ("UPD", "UPDATE"),
    ("DEL", "DELETE"),
    ("EXE", "EXECUTE"),
    ("ALT", "ALTER"),
    ("GRA", "GRANT"),
    ("REN", "RENAME"),
];

/// Option value meaning "audited whenever successful / whenever not successful"
const AUDITED_BOTH: &str = "A/A";

#[derive(Clone)]
pub struct AuditService {
    gateway: Arc<dyn DatabaseGateway>,
}

impl AuditService {
    pub fn new(gateway: Arc<dyn DatabaseGateway>) -> Self {
        Self { gateway }
    }

    // -----------------------------------------------------------------------
    // State
    // -----------------------------------------------------------------------

    pub async fn state(&self) -> AuditStateResponse {
        match self.read_state().await {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "Failed to read audit state");
                AuditStateResponse {
                    outcome: Outcome::fail(format!("Error al obtener estado de auditoría: {}", e)),
                    ..Default::default()
                }
            }
        }
    }

    async fn read_state(&self) -> Result<AuditStateResponse> {
        let session = self.gateway.open().await?;

        let unified = session.query_scalar(UNIFIED_AUDITING_SQL, &[]).await?.as_i64();
        let objetos_auditados: Vec<String> = session
            .query(OBJECT_AUDIT_OPTIONS_SQL, &[])
            .await?
            .iter()
            .filter_map(audited_object)
            .collect();
        let recent = session
            .query_scalar(RECENT_UNIFIED_RECORDS_SQL, &[])
            .await?
            .as_i64();

        let enabled = unified > 0 || !objetos_auditados.is_empty();
        debug!(
            unified_auditing = unified > 0,
            audited_objects = objetos_auditados.len(),
            recent,
            "Read audit state"
        );

        Ok(AuditStateResponse {
            outcome: Outcome::ok(format!(
                "Auditoría actualmente {}",
                if enabled { "habilitada" } else { "deshabilitada" }
            )),
            auditoria_habilitada: enabled,
            valor_audit_trail: "DB".to_string(),
            requiere_reinicio: false,
            objetos_auditados,
            registros_ultimas_24_horas: recent,
        })
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    pub async fn configure_connections(
        &self,
        request: ConnectionAuditRequest,
    ) -> ConnectionAuditResponse {
        let Some(settings) = request.config_conexiones else {
            return ConnectionAuditResponse {
                outcome: Outcome::fail("La configuración de conexiones es requerida"),
                ..Default::default()
            };
        };

        match self.apply_connection_audit(settings).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Failed to configure session auditing");
                ConnectionAuditResponse {
                    outcome: Outcome::fail(format!(
                        "Error general al configurar auditoría de conexiones: {}",
                        e
                    )),
                    ..Default::default()
                }
            }
        }
    }

    async fn apply_connection_audit(
        &self,
        settings: ConnectionAuditSettings,
    ) -> Result<ConnectionAuditResponse> {
        let session = self.gateway.open().await?;
        let mut response = ConnectionAuditResponse::default();

        session.execute_ddl(&statement::noaudit_session()).await?;
        if let Some(scope) = settings.scope() {
            session.execute_ddl(&statement::audit_session(scope)).await?;
            response.auditoria_habilitada = true;
            response.auditando_exitosas = settings.registrar_exitosos;
            response.auditando_fallidas = settings.registrar_fallidos;
            response.objetos_auditados.push("SESSION".to_string());
        }
        info!(?settings, "Session auditing updated");

        response.estadisticas = session
            .query(RECENT_LOGONS_SQL, &[])
            .await?
            .first()
            .map(logon_snapshot)
            .unwrap_or_default();

        response.outcome = Outcome::ok(format!(
            "Configuración de auditoría de conexiones actualizada exitosamente. \
             Últimas 24h: {} conexiones exitosas, {} fallidas.",
            response.estadisticas.conexiones_exitosas, response.estadisticas.conexiones_fallidas
        ));
        Ok(response)
    }

    /// Apply AUDIT/NOAUDIT per table. Incomplete rows are skipped; a database
    /// failure stops the whole call.
    pub async fn configure_tables(&self, requests: Vec<TableAuditRequest>) -> TableAuditResponse {
        if requests.is_empty() {
            return TableAuditResponse {
                outcome: Outcome::fail("La configuración de tablas es requerida"),
                ..Default::default()
            };
        }

        let mut configured = Vec::new();
        let outcome = match self.apply_table_audit(&requests, &mut configured).await {
            Ok(()) => Outcome::ok(format!(
                "Se configuró la auditoría para {} tabla(s)",
                configured.len()
            )),
            Err(e) => {
                warn!(error = %e, "Failed to configure table auditing");
                Outcome::fail(format!("Error al configurar auditoría de tablas: {}", e))
            }
        };

        TableAuditResponse {
            outcome,
            tablas_configuradas: configured,
        }
    }

    async fn apply_table_audit(
        &self,
        requests: &[TableAuditRequest],
        configured: &mut Vec<ConfiguredTable>,
    ) -> Result<()> {
        let session = self.gateway.open().await?;

        for request in requests {
            let (Some(table), Some(toggles)) = (&request.nombre_tabla, &request.configuraciones)
            else {
                continue;
            };
            if table.is_empty() || toggles.is_empty() {
                continue;
            }

            let (enabled, disabled): (Vec<&AuditToggle>, Vec<&AuditToggle>) =
                toggles.iter().partition(|t| t.auditar);
            let enabled: Vec<String> = enabled.iter().map(|t| t.accion.to_uppercase()).collect();
            let disabled: Vec<String> = disabled.iter().map(|t| t.accion.to_uppercase()).collect();

            if !enabled.is_empty() {
                session
                    .execute_ddl(&statement::audit_object(&enabled, table))
                    .await?;
            }
            if !disabled.is_empty() {
                session
                    .execute_ddl(&statement::noaudit_object(&disabled, table))
                    .await?;
            }
            debug!(table = %table, audited = ?enabled, "Table auditing updated");

            configured.push(ConfiguredTable {
                nombre_tabla: table.clone(),
                operaciones_auditadas: enabled,
            });
        }
        Ok(())
    }

    /// Apply AUDIT/NOAUDIT per action, continuing past individual failures.
    pub async fn configure_actions(&self, request: ActionAuditRequest) -> ActionAuditResponse {
        if request.configuraciones.is_empty() {
            return ActionAuditResponse {
                outcome: Outcome::fail("La configuración de acciones es requerida"),
                ..Default::default()
            };
        }

        let session = match self.gateway.open().await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Failed to configure action auditing");
                return ActionAuditResponse {
                    outcome: Outcome::fail(format!(
                        "Error general al configurar auditoría de acciones: {}",
                        e
                    )),
                    ..Default::default()
                };
            }
        };

        let mut configured = Vec::new();
        let mut errors = String::new();
        for toggle in &request.configuraciones {
            let sql = if toggle.auditar {
                statement::audit_action(&toggle.accion)
            } else {
                statement::noaudit_action(&toggle.accion)
            };
            match session.execute_ddl(&sql).await {
                Ok(()) => configured.push(ConfiguredAction {
                    accion: toggle.accion.clone(),
                    auditada: toggle.auditar,
                }),
                Err(e) => {
                    warn!(action = %toggle.accion, error = %e, "Failed to apply action auditing");
                    errors.push_str(&format!("\nError en {}: {}", toggle.accion, e));
                }
            }
        }
        drop(session);

        let outcome = if errors.is_empty() {
            Outcome::ok(format!(
                "Se configuró la auditoría para {} accion(es)",
                configured.len()
            ))
        } else if !configured.is_empty() {
            Outcome::ok(format!(
                "Se configuraron {} accion(es) con algunos errores: {}",
                configured.len(),
                errors
            ))
        } else {
            Outcome::fail(errors.trim_start())
        };

        ActionAuditResponse {
            outcome,
            acciones_configuradas: configured,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub async fn query<C: AuditCategory>(&self, filter: &AuditQueryFilter) -> AuditQueryResponse<C> {
        match self.fetch::<C>(filter).await {
            Ok(registros) => {
                let estadisticas = summarize::<C>(&registros);
                AuditQueryResponse {
                    outcome: Outcome::ok(format!(
                        "Se encontraron {} registros de auditoría de {}",
                        registros.len(),
                        C::NAME
                    )),
                    registros,
                    estadisticas,
                }
            }
            Err(e) => {
                warn!(category = C::NAME, error = %e, "Audit trail query failed");
                AuditQueryResponse::failed(format!(
                    "Error al consultar registros de {}: {}",
                    C::NAME,
                    e
                ))
            }
        }
    }

    pub async fn query_sessions(&self, filter: &AuditQueryFilter) -> SessionQueryResponse {
        self.query::<SessionEvents>(filter).await
    }

    pub async fn query_tables(&self, filter: &AuditQueryFilter) -> TableQueryResponse {
        self.query::<TableAccess>(filter).await
    }

    pub async fn query_actions(&self, filter: &AuditQueryFilter) -> ActionQueryResponse {
        self.query::<PrivilegedActions>(filter).await
    }

    async fn fetch<C: AuditCategory>(&self, filter: &AuditQueryFilter) -> Result<Vec<C::Record>> {
        let built = query::build::<C>(filter);
        debug!(category = C::NAME, ?filter, "Querying audit trail");

        let session = self.gateway.open().await?;
        let rows = session.query(&built.sql, &built.params).await?;
        let records = rows.iter().map(C::decode).collect();

        Ok(order_and_cap::<C>(records, filter.limit()))
    }
}

/// `OWNER.OBJECT - OP1, OP2` for objects with at least one fully audited option
fn audited_object(row: &Row) -> Option<String> {
    let operations: Vec<&str> = AUDIT_OPTION_COLUMNS
        .iter()
        .filter(|(column, _)| row.get(column).as_text() == AUDITED_BOTH)
        .map(|(_, operation)| *operation)
        .collect();

    if operations.is_empty() {
        return None;
    }
    Some(format!(
        "{}.{} - {}",
        row.get("OWNER").as_text(),
        row.get("OBJECT_NAME").as_text(),
        operations.join(", ")
    ))
}

fn logon_snapshot(row: &Row) -> SessionStatistics {
    SessionStatistics {
        total_conexiones: row.get("TOTAL").as_i64().max(0) as u64,
        conexiones_exitosas: row.get("EXITOSOS").as_i64().max(0) as u64,
        conexiones_fallidas: row.get("FALLIDOS").as_i64().max(0) as u64,
        ultima_conexion_exitosa: row.get("ULTIMA_EXITOSA").as_timestamp(),
        ultima_conexion_fallida: row.get("ULTIMA_FALLIDA").as_timestamp(),
    }
}
