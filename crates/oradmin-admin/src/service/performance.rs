//! Execution plans and index creation

use std::sync::Arc;

use tracing::{debug, info, warn};

use oradmin_common::{OradminError, Outcome, Result};
use oradmin_persistence::{DatabaseGateway, Row, Session, param, statement};

use crate::model::*;

const PLAN_SQL: &str = "SELECT ID, PARENT_ID, LEVEL AS PLAN_LEVEL, OPERATION, OPTIONS, \
     OBJECT_NAME, COST, CARDINALITY, BYTES \
     FROM PLAN_TABLE \
     START WITH ID = 0 AND PARENT_ID IS NULL \
     CONNECT BY PRIOR ID = PARENT_ID \
     ORDER SIBLINGS BY POSITION";

const PREDICATES_SQL: &str = "SELECT ACCESS_PREDICATES, FILTER_PREDICATES FROM PLAN_TABLE \
     WHERE ACCESS_PREDICATES IS NOT NULL OR FILTER_PREDICATES IS NOT NULL";

const PLAN_HASH_SQL: &str = "SELECT PLAN_HASH_VALUE FROM V$SQL_PLAN \
     WHERE SQL_ID = (SELECT MAX(SQL_ID) FROM V$SQL WHERE SQL_TEXT LIKE :sqlText)";

const INDEX_EXISTS_SQL: &str = "SELECT COUNT(*) FROM ALL_INDEXES WHERE INDEX_NAME = :indexName";

const INDEX_DETAILS_SQL: &str = "SELECT INDEX_TYPE, STATUS, LAST_ANALYZED, UNIQUENESS \
     FROM ALL_INDEXES WHERE INDEX_NAME = :indexName AND TABLE_NAME = :tableName";

/// Characters of the statement used to find it in the shared pool
const SQL_TEXT_PREFIX: usize = 100;

const PLAN_HASH_UNAVAILABLE: &str = "No disponible";

#[derive(Clone)]
pub struct PerformanceService {
    gateway: Arc<dyn DatabaseGateway>,
}

impl PerformanceService {
    pub fn new(gateway: Arc<dyn DatabaseGateway>) -> Self {
        Self { gateway }
    }

    /// Explain `consultaSQL` and return the plan tree with summary figures.
    /// The statement itself is never executed.
    pub async fn query_plan(&self, request: QueryPlanRequest) -> QueryPlanResponse {
        match self.explain(&request.consulta_sql).await {
            Ok((operaciones, estadisticas)) => QueryPlanResponse {
                outcome: Outcome::ok("Plan de ejecución obtenido exitosamente"),
                operaciones,
                estadisticas,
            },
            Err(e) => {
                warn!(error = %e, "Failed to explain statement");
                QueryPlanResponse {
                    outcome: Outcome::fail(format!(
                        "Error al obtener el plan de ejecución: {}",
                        e
                    )),
                    ..Default::default()
                }
            }
        }
    }

    async fn explain(&self, sql_text: &str) -> Result<(Vec<PlanOperation>, PlanStatistics)> {
        if sql_text.trim().is_empty() {
            return Err(OradminError::validation("La consulta SQL no puede estar vacía"));
        }

        let session = self.gateway.open().await?;
        session.execute_ddl(&statement::clear_plan_table()).await?;
        session.execute_ddl(&statement::explain_plan(sql_text)).await?;

        let operations: Vec<PlanOperation> = session
            .query(PLAN_SQL, &[])
            .await?
            .iter()
            .map(plan_operation)
            .collect();
        let predicates = predicate_information(&session.query(PREDICATES_SQL, &[]).await?);
        let plan_hash = plan_hash_value(&*session, sql_text).await?;
        debug!(operations = operations.len(), plan_hash = %plan_hash, "Plan retrieved");

        let mut statistics = summarize_plan(&operations);
        statistics.plan_hash_value = plan_hash;
        statistics.predicate_information = predicates;
        Ok((operations, statistics))
    }

    pub async fn create_index(&self, request: CreateIndexRequest) -> CreateIndexResponse {
        match self.try_create_index(&request).await {
            Ok(detalles) => {
                info!(index = %request.nombre_indice, table = %request.nombre_tabla, "Index created");
                CreateIndexResponse {
                    outcome: Outcome::ok("Índice creado exitosamente"),
                    detalles,
                }
            }
            Err(e) => {
                warn!(index = %request.nombre_indice, error = %e, "Failed to create index");
                CreateIndexResponse {
                    outcome: Outcome::fail(format!("Error al crear el índice: {}", e)),
                    ..Default::default()
                }
            }
        }
    }

    async fn try_create_index(&self, request: &CreateIndexRequest) -> Result<IndexDetails> {
        if request.nombre_indice.trim().is_empty() {
            return Err(OradminError::validation("El nombre del índice no puede estar vacío"));
        }
        if request.nombre_tabla.trim().is_empty() {
            return Err(OradminError::validation("El nombre de la tabla no puede estar vacío"));
        }
        if request.columnas.is_empty() {
            return Err(OradminError::validation(
                "Debe especificar al menos una columna para el índice",
            ));
        }

        let session = self.gateway.open().await?;
        let index_name = param("indexName", request.nombre_indice.to_uppercase());
        let existing = session
            .query_scalar(INDEX_EXISTS_SQL, std::slice::from_ref(&index_name))
            .await?
            .as_i64();
        if existing > 0 {
            return Err(OradminError::already_exists(format!(
                "Ya existe un índice con el nombre {}",
                request.nombre_indice
            )));
        }

        let sql = statement::create_index(
            &request.nombre_indice,
            &request.nombre_tabla,
            &request.columnas,
            request.unico,
        );
        debug!(sql = %sql, "Creating index");
        session.execute_ddl(&sql).await?;

        let details = session
            .query(
                INDEX_DETAILS_SQL,
                &[index_name, param("tableName", request.nombre_tabla.to_uppercase())],
            )
            .await?;
        Ok(details
            .first()
            .map(|row| IndexDetails {
                nombre_indice: request.nombre_indice.clone(),
                nombre_tabla: request.nombre_tabla.clone(),
                columnas: request.columnas.clone(),
                tipo_indice: row.get("INDEX_TYPE").as_text(),
                estado: row.get("STATUS").as_text(),
                fecha_creacion: row.get("LAST_ANALYZED").as_timestamp(),
                es_unico: row.get("UNIQUENESS").as_text() == "UNIQUE",
            })
            .unwrap_or_default())
    }
}

async fn plan_hash_value(session: &dyn Session, sql_text: &str) -> Result<String> {
    let prefix: String = sql_text.chars().take(SQL_TEXT_PREFIX).collect();
    let value = session
        .query_scalar(PLAN_HASH_SQL, &[param("sqlText", format!("%{}%", prefix))])
        .await?;
    Ok(value
        .as_opt_text()
        .unwrap_or_else(|| PLAN_HASH_UNAVAILABLE.to_string()))
}

fn plan_operation(row: &Row) -> PlanOperation {
    PlanOperation {
        id: row.get("ID").as_i64(),
        parent_id: row.get("PARENT_ID").as_i64(),
        nivel: row.get("PLAN_LEVEL").as_i64() - 1,
        tipo_operacion: row.get("OPERATION").as_text(),
        opciones_operacion: row.get("OPTIONS").as_text(),
        objeto_accedido: row.get("OBJECT_NAME").as_text(),
        filas: row.get("CARDINALITY").as_i64(),
        bytes: row.get("BYTES").as_i64(),
        costo: row.get("COST").as_i64(),
    }
}

fn predicate_information(rows: &[Row]) -> Vec<String> {
    let mut predicates = Vec::new();
    for row in rows {
        let access = row.get("ACCESS_PREDICATES").as_text();
        if !access.is_empty() {
            predicates.push(format!("access({})", access));
        }
        let filter = row.get("FILTER_PREDICATES").as_text();
        if !filter.is_empty() {
            predicates.push(format!("filter({})", filter));
        }
    }
    predicates
}

/// Totals over every plan node; the time estimate is only given for a non-empty plan
fn summarize_plan(operations: &[PlanOperation]) -> PlanStatistics {
    if operations.is_empty() {
        return PlanStatistics::default();
    }
    let costo_total = operations.iter().map(|o| o.costo).sum();
    PlanStatistics {
        costo_total,
        tiempo_estimado: Some(estimated_time(costo_total)),
        filas_totales: operations.iter().map(|o| o.filas).sum(),
        ..Default::default()
    }
}

/// Rough elapsed-time bucket for a plan cost
fn estimated_time(cost: i64) -> String {
    match cost {
        c if c < 10 => "00:00:01".to_string(),
        c if c < 100 => "00:00:05".to_string(),
        c if c < 1000 => "00:00:30".to_string(),
        c if c < 5000 => "00:01:00".to_string(),
        c if c < 10000 => "00:02:00".to_string(),
        c => format!("00:{:02}:00", (c / 5000).min(59)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use oradmin_common::Envelope;
    use oradmin_persistence::Value;
    use oradmin_persistence::testing::ScriptedGateway;

    fn scripted() -> (ScriptedGateway, PerformanceService) {
        let gateway = ScriptedGateway::new();
        let service = PerformanceService::new(Arc::new(gateway.clone()));
        (gateway, service)
    }

    fn plan_row(id: i64, parent: Option<i64>, level: i64, op: &str, cost: Option<i64>, rows: i64) -> Row {
        Row::from_pairs([
            ("ID", Value::Integer(id)),
            ("PARENT_ID", Value::from(parent)),
            ("PLAN_LEVEL", Value::Integer(level)),
            ("OPERATION", Value::from(op)),
            ("OPTIONS", Value::Null),
            ("OBJECT_NAME", Value::Null),
            ("COST", Value::from(cost)),
            ("CARDINALITY", Value::Integer(rows)),
            ("BYTES", Value::Null),
        ])
    }

    fn plan_request(sql: &str) -> QueryPlanRequest {
        QueryPlanRequest {
            consulta_sql: sql.to_string(),
        }
    }

    #[test]
    fn test_estimated_time_breakpoints() {
        assert_eq!(estimated_time(0), "00:00:01");
        assert_eq!(estimated_time(9), "00:00:01");
        assert_eq!(estimated_time(10), "00:00:05");
        assert_eq!(estimated_time(999), "00:00:30");
        assert_eq!(estimated_time(4999), "00:01:00");
        assert_eq!(estimated_time(9999), "00:02:00");
        assert_eq!(estimated_time(10000), "00:02:00");
        assert_eq!(estimated_time(50000), "00:10:00");
        assert_eq!(estimated_time(10_000_000), "00:59:00");
    }

    #[tokio::test]
    async fn test_query_plan_tree_and_statistics() {
        let (gateway, service) = scripted();
        gateway
            .on(
                "CONNECT BY PRIOR",
                vec![
                    plan_row(0, None, 1, "SELECT STATEMENT", Some(3), 1),
                    plan_row(1, Some(0), 2, "TABLE ACCESS", None, 14),
                ],
            )
            .on(
                "ACCESS_PREDICATES",
                vec![Row::from_pairs([
                    ("ACCESS_PREDICATES", Value::from("\"DEPTNO\"=10")),
                    ("FILTER_PREDICATES", Value::from("\"SAL\">1000")),
                ])],
            )
            .on_scalar("V$SQL_PLAN", 3956160932i64);

        let response = service.query_plan(plan_request("SELECT * FROM EMP")).await;

        assert!(response.succeeded());
        assert_eq!(response.outcome.mensaje, "Plan de ejecución obtenido exitosamente");
        assert_eq!(response.operaciones.len(), 2);
        let root = &response.operaciones[0];
        assert_eq!((root.id, root.parent_id, root.nivel), (0, 0, 0));
        let child = &response.operaciones[1];
        assert_eq!((child.parent_id, child.nivel, child.costo), (0, 1, 0));
        assert_eq!(child.objeto_accedido, "");

        let stats = &response.estadisticas;
        assert_eq!(stats.costo_total, 3);
        assert_eq!(stats.filas_totales, 15);
        assert_eq!(stats.tiempo_estimado.as_deref(), Some("00:00:01"));
        assert_eq!(stats.plan_hash_value, "3956160932");
        assert_eq!(
            stats.predicate_information,
            vec!["access(\"DEPTNO\"=10)", "filter(\"SAL\">1000)"]
        );

        let statements = gateway.statements();
        assert_eq!(statements[0], "DELETE FROM PLAN_TABLE");
        assert_eq!(statements[1], "EXPLAIN PLAN FOR SELECT * FROM EMP");
        assert_eq!(gateway.sessions_closed(), 1);
    }

    #[tokio::test]
    async fn test_plan_hash_lookup_uses_text_prefix() {
        let (gateway, service) = scripted();
        let long_sql = format!("SELECT {} FROM DUAL", "1 + ".repeat(60));
        let response = service.query_plan(plan_request(&long_sql)).await;

        assert!(response.succeeded());
        assert_eq!(response.estadisticas.plan_hash_value, "No disponible");
        assert_eq!(response.estadisticas.tiempo_estimado, None);

        let lookup = gateway
            .recorded()
            .into_iter()
            .find(|r| r.sql.contains("V$SQL_PLAN"))
            .unwrap();
        let expected: String = long_sql.chars().take(100).collect();
        assert_eq!(lookup.params, vec![param("sqlText", format!("%{}%", expected))]);
    }

    #[tokio::test]
    async fn test_query_plan_rejects_empty_sql() {
        let (gateway, service) = scripted();
        let response = service.query_plan(plan_request("   ")).await;
        assert!(!response.succeeded());
        assert_eq!(
            response.outcome.mensaje,
            "Error al obtener el plan de ejecución: La consulta SQL no puede estar vacía"
        );
        assert_eq!(gateway.sessions_opened(), 0);
    }

    #[tokio::test]
    async fn test_query_plan_invalid_statement() {
        let (gateway, service) = scripted();
        gateway.fail_on("EXPLAIN PLAN", "ORA-00942: table or view does not exist");
        let response = service.query_plan(plan_request("SELECT * FROM NOPE")).await;
        assert!(!response.succeeded());
        assert_eq!(
            response.outcome.mensaje,
            "Error al obtener el plan de ejecución: ORA-00942: table or view does not exist"
        );
        assert!(response.operaciones.is_empty());
        assert!(!gateway.ran("CONNECT BY"));
    }

    fn index_request() -> CreateIndexRequest {
        CreateIndexRequest {
            nombre_tabla: "emp".to_string(),
            nombre_indice: "idx_emp_name".to_string(),
            columnas: vec!["LAST_NAME".to_string(), "FIRST_NAME".to_string()],
            unico: true,
        }
    }

    #[tokio::test]
    async fn test_create_index_reports_details() {
        let (gateway, service) = scripted();
        let analyzed = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        gateway.on_scalar("COUNT(*) FROM ALL_INDEXES", 0).on(
            "INDEX_TYPE",
            vec![Row::from_pairs([
                ("INDEX_TYPE", Value::from("NORMAL")),
                ("STATUS", Value::from("VALID")),
                ("LAST_ANALYZED", Value::Timestamp(analyzed)),
                ("UNIQUENESS", Value::from("UNIQUE")),
            ])],
        );

        let response = service.create_index(index_request()).await;

        assert!(response.succeeded());
        assert_eq!(response.outcome.mensaje, "Índice creado exitosamente");
        assert_eq!(
            response.detalles,
            IndexDetails {
                nombre_indice: "idx_emp_name".to_string(),
                nombre_tabla: "emp".to_string(),
                columnas: vec!["LAST_NAME".to_string(), "FIRST_NAME".to_string()],
                tipo_indice: "NORMAL".to_string(),
                estado: "VALID".to_string(),
                fecha_creacion: Some(analyzed),
                es_unico: true,
            }
        );
        assert!(gateway.ran("CREATE UNIQUE INDEX idx_emp_name ON emp(LAST_NAME, FIRST_NAME)"));

        let recorded = gateway.recorded();
        assert_eq!(recorded[0].params, vec![param("indexName", "IDX_EMP_NAME")]);
        assert_eq!(
            recorded[2].params,
            vec![param("indexName", "IDX_EMP_NAME"), param("tableName", "EMP")]
        );
    }

    #[tokio::test]
    async fn test_create_index_existing_name() {
        let (gateway, service) = scripted();
        gateway.on_scalar("COUNT(*) FROM ALL_INDEXES", 1);
        let response = service.create_index(index_request()).await;
        assert!(!response.succeeded());
        assert_eq!(
            response.outcome.mensaje,
            "Error al crear el índice: Ya existe un índice con el nombre idx_emp_name"
        );
        assert!(!gateway.ran("CREATE UNIQUE INDEX"));
    }

    #[tokio::test]
    async fn test_create_index_validation() {
        let (gateway, service) = scripted();
        let response = service
            .create_index(CreateIndexRequest {
                columnas: Vec::new(),
                ..index_request()
            })
            .await;
        assert_eq!(
            response.outcome.mensaje,
            "Error al crear el índice: Debe especificar al menos una columna para el índice"
        );

        let response = service
            .create_index(CreateIndexRequest {
                nombre_indice: String::new(),
                ..index_request()
            })
            .await;
        assert_eq!(
            response.outcome.mensaje,
            "Error al crear el índice: El nombre del índice no puede estar vacío"
        );
        assert_eq!(gateway.sessions_opened(), 0);
    }
}
