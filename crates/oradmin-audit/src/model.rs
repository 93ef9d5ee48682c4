//! Audit request and response types
//!
//! Field names mirror the JSON the dashboard exchanges, so they stay in the
//! console's language; `rename_all` turns them into camelCase on the wire.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use oradmin_common::{Envelope, Outcome, impl_envelope, number, time};
use oradmin_persistence::statement::SessionAuditScope;

use crate::category::{AuditCategory, PrivilegedActions, SessionEvents, TableAccess};

/// Filter shared by the three audit trail queries; every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQueryFilter {
    #[serde(default, deserialize_with = "time::deserialize_optional")]
    pub fecha_inicio: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "time::deserialize_optional")]
    pub fecha_fin: Option<NaiveDateTime>,
    #[serde(default)]
    pub exitoso: Option<bool>,
    #[serde(default, deserialize_with = "number::deserialize_optional")]
    pub limite_registros: Option<i64>,
}

impl AuditQueryFilter {
    /// Effective row cap; zero or negative limits mean "no limit"
    pub fn limit(&self) -> Option<usize> {
        self.limite_registros
            .filter(|n| *n > 0)
            .map(|n| n as usize)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub fecha_evento: NaiveDateTime,
    pub tipo_evento: String,
    pub exitoso: bool,
    pub terminal: String,
    #[serde(rename = "direccionIP")]
    pub direccion_ip: String,
    pub codigo_error: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableAccessRecord {
    pub fecha_evento: NaiveDateTime,
    pub tabla: String,
    pub esquema: String,
    pub operacion: String,
    #[serde(rename = "sentenciaSQL")]
    pub sentencia_sql: String,
    pub exitoso: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    pub fecha_evento: NaiveDateTime,
    pub accion: String,
    pub detalles_accion: String,
    pub objeto_afectado: String,
    pub exitoso: bool,
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatistics {
    pub total_conexiones: u64,
    pub conexiones_exitosas: u64,
    pub conexiones_fallidas: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ultima_conexion_exitosa: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ultima_conexion_fallida: Option<NaiveDateTime>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStatistics {
    pub total_operaciones: u64,
    pub por_operacion: BTreeMap<String, u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionStatistics {
    pub total_acciones: u64,
    pub por_tipo_accion: BTreeMap<String, u64>,
}

/// Records of one audit category together with the statistics folded over them
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct AuditQueryResponse<C: AuditCategory> {
    #[serde(flatten)]
    pub outcome: Outcome,
    pub registros: Vec<C::Record>,
    pub estadisticas: C::Statistics,
}

impl<C: AuditCategory> AuditQueryResponse<C> {
    pub fn failed(mensaje: impl Into<String>) -> Self {
        AuditQueryResponse {
            outcome: Outcome::fail(mensaje),
            registros: Vec::new(),
            estadisticas: C::Statistics::default(),
        }
    }
}

impl<C: AuditCategory> Envelope for AuditQueryResponse<C> {
    fn succeeded(&self) -> bool {
        self.outcome.succeeded()
    }
}

pub type SessionQueryResponse = AuditQueryResponse<SessionEvents>;
pub type TableQueryResponse = AuditQueryResponse<TableAccess>;
pub type ActionQueryResponse = AuditQueryResponse<PrivilegedActions>;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionAuditRequest {
    #[serde(default)]
    pub config_conexiones: Option<ConnectionAuditSettings>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionAuditSettings {
    #[serde(default)]
    pub registrar_exitosos: bool,
    #[serde(default)]
    pub registrar_fallidos: bool,
}

impl ConnectionAuditSettings {
    /// `None` switches session auditing off entirely.
    pub fn scope(&self) -> Option<SessionAuditScope> {
        match (self.registrar_exitosos, self.registrar_fallidos) {
            (true, true) => Some(SessionAuditScope::All),
            (true, false) => Some(SessionAuditScope::SuccessfulOnly),
            (false, true) => Some(SessionAuditScope::FailedOnly),
            (false, false) => None,
        }
    }
}

/// One `{accion, auditar}` switch
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditToggle {
    pub accion: String,
    #[serde(default)]
    pub auditar: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableAuditRequest {
    #[serde(default)]
    pub nombre_tabla: Option<String>,
    #[serde(default)]
    pub configuraciones: Option<Vec<AuditToggle>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionAuditRequest {
    #[serde(default)]
    pub configuraciones: Vec<AuditToggle>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionAuditResponse {
    #[serde(flatten)]
    pub outcome: Outcome,
    pub auditoria_habilitada: bool,
    pub auditando_exitosas: bool,
    pub auditando_fallidas: bool,
    pub objetos_auditados: Vec<String>,
    pub estadisticas: SessionStatistics,
}

impl_envelope!(ConnectionAuditResponse, outcome);

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredTable {
    pub nombre_tabla: String,
    pub operaciones_auditadas: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableAuditResponse {
    #[serde(flatten)]
    pub outcome: Outcome,
    pub tablas_configuradas: Vec<ConfiguredTable>,
}

impl_envelope!(TableAuditResponse, outcome);

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredAction {
    pub accion: String,
    pub auditada: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionAuditResponse {
    #[serde(flatten)]
    pub outcome: Outcome,
    pub acciones_configuradas: Vec<ConfiguredAction>,
}

impl_envelope!(ActionAuditResponse, outcome);

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStateResponse {
    #[serde(flatten)]
    pub outcome: Outcome,
    pub auditoria_habilitada: bool,
    pub valor_audit_trail: String,
    pub requiere_reinicio: bool,
    pub objetos_auditados: Vec<String>,
    #[serde(rename = "registrosUltimas24Horas")]
    pub registros_ultimas_24_horas: i64,
}

impl_envelope!(AuditStateResponse, outcome);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_accepts_dashboard_payload() {
        let filter: AuditQueryFilter = serde_json::from_str(
            r#"{"fechaInicio":"2024-05-01T08:30","fechaFin":"","exitoso":true,"limiteRegistros":5}"#,
        )
        .unwrap();
        assert!(filter.fecha_inicio.is_some());
        assert!(filter.fecha_fin.is_none());
        assert_eq!(filter.exitoso, Some(true));
        assert_eq!(filter.limit(), Some(5));
    }

    #[test]
    fn test_filter_accepts_limit_as_text() {
        let filter: AuditQueryFilter = serde_json::from_str(
            r#"{"fechaInicio":"2024-05-01T13:30:00.000Z","exitoso":false,"limiteRegistros":"50"}"#,
        )
        .unwrap();
        assert_eq!(filter.limit(), Some(50));

        let blank: AuditQueryFilter =
            serde_json::from_str(r#"{"limiteRegistros":""}"#).unwrap();
        assert_eq!(blank.limit(), None);
    }

    #[test]
    fn test_non_positive_limit_means_unlimited() {
        let empty: AuditQueryFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, AuditQueryFilter::default());
        assert_eq!(empty.limit(), None);

        let zero = AuditQueryFilter {
            limite_registros: Some(0),
            ..Default::default()
        };
        assert_eq!(zero.limit(), None);
        let negative = AuditQueryFilter {
            limite_registros: Some(-3),
            ..Default::default()
        };
        assert_eq!(negative.limit(), None);
    }

    #[test]
    fn test_invalid_timestamp_is_rejected() {
        let parsed = serde_json::from_str::<AuditQueryFilter>(r#"{"fechaInicio":"ayer"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_connection_scope() {
        let both = ConnectionAuditSettings {
            registrar_exitosos: true,
            registrar_fallidos: true,
        };
        assert_eq!(both.scope(), Some(SessionAuditScope::All));
        let failed = ConnectionAuditSettings {
            registrar_exitosos: false,
            registrar_fallidos: true,
        };
        assert_eq!(failed.scope(), Some(SessionAuditScope::FailedOnly));
        assert_eq!(ConnectionAuditSettings::default().scope(), None);
    }

    #[test]
    fn test_state_wire_names() {
        let state = AuditStateResponse {
            outcome: Outcome::ok("Auditoría actualmente habilitada"),
            auditoria_habilitada: true,
            valor_audit_trail: "DB".to_string(),
            requiere_reinicio: false,
            objetos_auditados: vec!["SYS.AUD$ - SELECT".to_string()],
            registros_ultimas_24_horas: 12,
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["exitoso"], true);
        assert_eq!(json["auditoriaHabilitada"], true);
        assert_eq!(json["valorAuditTrail"], "DB");
        assert_eq!(json["requiereReinicio"], false);
        assert_eq!(json["registrosUltimas24Horas"], 12);
    }
}
