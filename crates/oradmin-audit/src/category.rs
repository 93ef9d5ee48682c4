//! Audit categories
//!
//! Each category names its audit source, the event names it recognises, how a
//! row decodes into a record and how a record contributes to the statistics.
//! The query builder and the fold are generic over [`AuditCategory`], so the
//! three trails share one retrieval path.

use std::fmt::Debug;

use chrono::NaiveDateTime;
use serde::Serialize;

use oradmin_persistence::Row;

use crate::model::{
    ActionRecord, ActionStatistics, SessionRecord, SessionStatistics, TableAccessRecord,
    TableStatistics,
};

/// How filter timestamps are compared against the trail's time column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBounds {
    /// Bound as given
    Exact,
    /// Widened by one hour each way and compared after UTC extraction
    WidenedUtc,
}

/// Static description of where a category's records come from
#[derive(Debug, Clone, Copy)]
pub struct AuditSource {
    /// SELECT list; aliases are the column names [`AuditCategory::decode`] reads
    pub projection: &'static str,
    pub view: &'static str,
    pub action_column: &'static str,
    pub actions: &'static [&'static str],
    /// Extra fixed predicates ANDed after the action restriction
    pub exclusions: &'static [&'static str],
    pub time_column: &'static str,
    pub return_code_column: &'static str,
    pub bounds: TimeBounds,
}

pub trait AuditCategory: Send + Sync + 'static {
    type Record: Serialize + Debug + Clone + Send;
    type Statistics: Serialize + Debug + Default + Clone + Send;

    /// Plural noun used in messages, e.g. `sesiones`
    const NAME: &'static str;
    const SOURCE: AuditSource;

    fn decode(row: &Row) -> Self::Record;

    fn event_time(record: &Self::Record) -> NaiveDateTime;

    fn accumulate(statistics: &mut Self::Statistics, record: &Self::Record);
}

fn event_time_of(row: &Row) -> NaiveDateTime {
    row.get("FECHA_EVENTO").as_timestamp().unwrap_or_default()
}

fn bump(counter: &mut std::collections::BTreeMap<String, u64>, key: &str) {
    *counter.entry(key.to_string()).or_insert(0) += 1;
}

/// Connect and disconnect events from the classic audit trail
#[derive(Debug, Clone, Copy)]
pub struct SessionEvents;

impl AuditCategory for SessionEvents {
    type Record = SessionRecord;
    type Statistics = SessionStatistics;

    const NAME: &'static str = "sesiones";
    const SOURCE: AuditSource = AuditSource {
        projection: "timestamp AS fecha_evento, \
                     action_name AS tipo_evento, \
                     CASE WHEN returncode = 0 THEN 1 ELSE 0 END AS exitoso, \
                     userhost AS terminal, \
                     terminal AS direccion_ip, \
                     TO_CHAR(returncode) AS codigo_error",
        view: "DBA_AUDIT_TRAIL",
        action_column: "action_name",
        actions: &["LOGON", "LOGOFF"],
        exclusions: &[],
        time_column: "timestamp",
        return_code_column: "returncode",
        bounds: TimeBounds::Exact,
    };

    fn decode(row: &Row) -> SessionRecord {
        SessionRecord {
            fecha_evento: event_time_of(row),
            tipo_evento: row.get("TIPO_EVENTO").as_text(),
            exitoso: row.get("EXITOSO").as_bool(),
            terminal: row.get("TERMINAL").as_text(),
            direccion_ip: row.get("DIRECCION_IP").as_text(),
            codigo_error: row.get("CODIGO_ERROR").as_text(),
        }
    }

    fn event_time(record: &SessionRecord) -> NaiveDateTime {
        record.fecha_evento
    }

    fn accumulate(statistics: &mut SessionStatistics, record: &SessionRecord) {
        statistics.total_conexiones += 1;
        let latest = if record.exitoso {
            statistics.conexiones_exitosas += 1;
            &mut statistics.ultima_conexion_exitosa
        } else {
            statistics.conexiones_fallidas += 1;
            &mut statistics.ultima_conexion_fallida
        };
        if latest.is_none_or(|seen| seen < record.fecha_evento) {
            *latest = Some(record.fecha_evento);
        }
    }
}

/// Object-level data access from the unified audit trail
#[derive(Debug, Clone, Copy)]
pub struct TableAccess;

impl AuditCategory for TableAccess {
    type Record = TableAccessRecord;
    type Statistics = TableStatistics;

    const NAME: &'static str = "tablas";
    const SOURCE: AuditSource = AuditSource {
        projection: "event_timestamp AS fecha_evento, \
                     object_name AS tabla, \
                     object_schema AS esquema, \
                     action_name AS operacion, \
                     sql_text AS sentencia_sql, \
                     CASE WHEN return_code = 0 THEN 1 ELSE 0 END AS exitoso",
        view: "UNIFIED_AUDIT_TRAIL",
        action_column: "action_name",
        actions: &[
            "SELECT", "INSERT", "UPDATE", "DELETE", "EXECUTE", "ALTER", "GRANT", "RENAME",
            "CREATE", "READ", "WRITE",
        ],
        exclusions: &[
            "object_name NOT IN ('UNIFIED_AUDIT_TRAIL', 'DBA_AUDIT_TRAIL', 'AUDIT_TRAIL')",
            "object_schema NOT IN ('AUDSYS', 'SYS')",
        ],
        time_column: "event_timestamp",
        return_code_column: "return_code",
        bounds: TimeBounds::WidenedUtc,
    };

    fn decode(row: &Row) -> TableAccessRecord {
        TableAccessRecord {
            fecha_evento: event_time_of(row),
            tabla: row.get("TABLA").as_text(),
            esquema: row.get("ESQUEMA").as_text(),
            operacion: row.get("OPERACION").as_text(),
            sentencia_sql: row.get("SENTENCIA_SQL").as_text(),
            exitoso: row.get("EXITOSO").as_bool(),
        }
    }

    fn event_time(record: &TableAccessRecord) -> NaiveDateTime {
        record.fecha_evento
    }

    fn accumulate(statistics: &mut TableStatistics, record: &TableAccessRecord) {
        statistics.total_operaciones += 1;
        bump(&mut statistics.por_operacion, &record.operacion);
    }
}

/// Privileged schema and object management actions from the unified audit trail
#[derive(Debug, Clone, Copy)]
pub struct PrivilegedActions;

/// Actions recognised by [`PrivilegedActions`]
pub const PRIVILEGED_ACTIONS: &[&str] = &[
    "CREATE USER",
    "ALTER USER",
    "DROP USER",
    "CREATE ROLE",
    "ALTER ANY ROLE",
    "DROP ANY ROLE",
    "GRANT ANY ROLE",
    "CREATE TABLE",
    "CREATE ANY TABLE",
    "ALTER TABLE",
    "ALTER ANY TABLE",
    "DROP ANY TABLE",
    "CREATE ANY INDEX",
    "ALTER ANY INDEX",
    "DROP ANY INDEX",
    "CREATE VIEW",
    "CREATE ANY VIEW",
    "DROP ANY VIEW",
    "CREATE PROCEDURE",
    "CREATE ANY PROCEDURE",
    "ALTER ANY PROCEDURE",
    "DROP ANY PROCEDURE",
    "CREATE SEQUENCE",
    "CREATE ANY SEQUENCE",
    "ALTER ANY SEQUENCE",
    "DROP ANY SEQUENCE",
];

impl AuditCategory for PrivilegedActions {
    type Record = ActionRecord;
    type Statistics = ActionStatistics;

    const NAME: &'static str = "acciones";
    const SOURCE: AuditSource = AuditSource {
        projection: "event_timestamp AS fecha_evento, \
                     action_name AS accion, \
                     sql_text AS detalles_accion, \
                     object_name AS objeto_afectado, \
                     CASE WHEN return_code = 0 THEN 1 ELSE 0 END AS exitoso",
        view: "UNIFIED_AUDIT_TRAIL",
        action_column: "action_name",
        actions: PRIVILEGED_ACTIONS,
        exclusions: &[],
        time_column: "event_timestamp",
        return_code_column: "return_code",
        bounds: TimeBounds::WidenedUtc,
    };

    fn decode(row: &Row) -> ActionRecord {
        ActionRecord {
            fecha_evento: event_time_of(row),
            accion: row.get("ACCION").as_text(),
            detalles_accion: row.get("DETALLES_ACCION").as_text(),
            objeto_afectado: row.get("OBJETO_AFECTADO").as_text(),
            exitoso: row.get("EXITOSO").as_bool(),
        }
    }

    fn event_time(record: &ActionRecord) -> NaiveDateTime {
        record.fecha_evento
    }

    fn accumulate(statistics: &mut ActionStatistics, record: &ActionRecord) {
        statistics.total_acciones += 1;
        bump(&mut statistics.por_tipo_accion, &record.accion);
    }
}
