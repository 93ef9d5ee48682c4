//! Execution plan and index types

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use oradmin_common::{Outcome, impl_envelope};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct QueryPlanRequest {
    #[serde(default, rename = "consultaSQL", alias = "consultaSql", alias = "ConsultaSQL")]
    pub consulta_sql: String,
}

/// One row of the plan; `parent_id` links it to its parent, `nivel` 0 is the root.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOperation {
    pub id: i64,
    pub parent_id: i64,
    pub nivel: i64,
    pub tipo_operacion: String,
    pub opciones_operacion: String,
    pub objeto_accedido: String,
    pub filas: i64,
    pub bytes: i64,
    pub costo: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStatistics {
    pub costo_total: i64,
    pub tiempo_estimado: Option<String>,
    pub filas_totales: i64,
    pub plan_hash_value: String,
    pub predicate_information: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPlanResponse {
    #[serde(flatten)]
    pub outcome: Outcome,
    pub operaciones: Vec<PlanOperation>,
    pub estadisticas: PlanStatistics,
}

impl_envelope!(QueryPlanResponse, outcome);

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIndexRequest {
    #[serde(default)]
    pub nombre_tabla: String,
    #[serde(default)]
    pub nombre_indice: String,
    #[serde(default)]
    pub columnas: Vec<String>,
    #[serde(default)]
    pub unico: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDetails {
    pub nombre_indice: String,
    pub nombre_tabla: String,
    pub columnas: Vec<String>,
    pub tipo_indice: String,
    pub estado: String,
    pub fecha_creacion: Option<NaiveDateTime>,
    pub es_unico: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIndexResponse {
    #[serde(flatten)]
    pub outcome: Outcome,
    pub detalles: IndexDetails,
}

impl_envelope!(CreateIndexResponse, outcome);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_plan_request_spellings() {
        for body in [
            r#"{"consultaSQL":"SELECT 1 FROM DUAL"}"#,
            r#"{"consultaSql":"SELECT 1 FROM DUAL"}"#,
            r#"{"ConsultaSQL":"SELECT 1 FROM DUAL"}"#,
        ] {
            let request: QueryPlanRequest = serde_json::from_str(body).unwrap();
            assert_eq!(request.consulta_sql, "SELECT 1 FROM DUAL");
        }
    }

    #[test]
    fn test_plan_wire_names() {
        let response = QueryPlanResponse {
            outcome: Outcome::ok("Plan de ejecución obtenido exitosamente"),
            operaciones: vec![PlanOperation {
                tipo_operacion: "SELECT STATEMENT".to_string(),
                ..Default::default()
            }],
            estadisticas: PlanStatistics {
                plan_hash_value: "No disponible".to_string(),
                ..Default::default()
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["operaciones"][0]["tipoOperacion"], "SELECT STATEMENT");
        assert_eq!(json["operaciones"][0]["parentId"], 0);
        assert_eq!(json["estadisticas"]["planHashValue"], "No disponible");
        assert_eq!(json["estadisticas"]["predicateInformation"], serde_json::json!([]));
    }
}
