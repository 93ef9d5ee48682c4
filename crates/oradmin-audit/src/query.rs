//! Audit trail query construction
//!
//! Filter values always travel as bind variables. Only the fixed parts of an
//! [`AuditSource`] are spliced into the text.

use chrono::{NaiveDateTime, TimeDelta};

use oradmin_persistence::{SqlParam, param};

use crate::category::{AuditCategory, AuditSource, TimeBounds};
use crate::model::AuditQueryFilter;

/// Statement text plus its named binds
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

pub fn build<C: AuditCategory>(filter: &AuditQueryFilter) -> BuiltQuery {
    build_from(&C::SOURCE, filter)
}

pub fn build_from(source: &AuditSource, filter: &AuditQueryFilter) -> BuiltQuery {
    let mut sql = format!(
        "SELECT {} FROM {} WHERE {} IN ({})",
        source.projection,
        source.view,
        source.action_column,
        quoted_list(source.actions)
    );
    for predicate in source.exclusions {
        sql.push_str(" AND ");
        sql.push_str(predicate);
    }

    let mut params = Vec::new();

    if let Some(start) = filter.fecha_inicio {
        sql.push_str(&format!(
            " AND {} >= {}",
            source.time_column,
            bind_expr(source.bounds, "fechaInicio")
        ));
        params.push(param("fechaInicio", widen(source.bounds, start, -1)));
    }

    if let Some(end) = filter.fecha_fin {
        sql.push_str(&format!(
            " AND {} <= {}",
            source.time_column,
            bind_expr(source.bounds, "fechaFin")
        ));
        params.push(param("fechaFin", widen(source.bounds, end, 1)));
    }

    if let Some(succeeded) = filter.exitoso {
        sql.push_str(&format!(" AND {} = :exitoso", source.return_code_column));
        params.push(param("exitoso", if succeeded { 0 } else { 1 }));
    }

    sql.push_str(&format!(" ORDER BY {} DESC", source.time_column));

    if let Some(limit) = filter.limit() {
        sql.push_str(" FETCH FIRST :limite ROWS ONLY");
        params.push(param("limite", limit as i64));
    }

    BuiltQuery { sql, params }
}

fn quoted_list(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("'{}'", v))
        .collect::<Vec<_>>()
        .join(", ")
}

fn bind_expr(bounds: TimeBounds, name: &str) -> String {
    match bounds {
        TimeBounds::Exact => format!(":{}", name),
        TimeBounds::WidenedUtc => format!(
            "SYS_EXTRACT_UTC(CAST(:{} AS TIMESTAMP WITH TIME ZONE))",
            name
        ),
    }
}

/// Move a bound `direction` hours outwards when the source asks for it.
fn widen(bounds: TimeBounds, at: NaiveDateTime, direction: i64) -> NaiveDateTime {
    match bounds {
        TimeBounds::Exact => at,
        TimeBounds::WidenedUtc => at
            .checked_add_signed(TimeDelta::hours(direction))
            .unwrap_or(at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{PrivilegedActions, SessionEvents, TableAccess};
    use chrono::NaiveDate;
    use oradmin_persistence::Value;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn bound(query: &BuiltQuery, name: &str) -> Option<Value> {
        query
            .params
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.clone())
    }

    #[test]
    fn test_unfiltered_session_query() {
        let query = build::<SessionEvents>(&AuditQueryFilter::default());
        assert!(query.sql.contains("FROM DBA_AUDIT_TRAIL"));
        assert!(query.sql.contains("action_name IN ('LOGON', 'LOGOFF')"));
        assert!(query.sql.ends_with(" ORDER BY timestamp DESC"));
        assert!(!query.sql.contains("FETCH FIRST"));
        assert!(query.params.is_empty());
    }

    #[test]
    fn test_session_bounds_are_exact() {
        let filter = AuditQueryFilter {
            fecha_inicio: Some(at(8, 0)),
            fecha_fin: Some(at(18, 30)),
            ..Default::default()
        };
        let query = build::<SessionEvents>(&filter);
        assert!(query.sql.contains(" AND timestamp >= :fechaInicio"));
        assert!(query.sql.contains(" AND timestamp <= :fechaFin"));
        assert_eq!(bound(&query, "fechaInicio"), Some(Value::Timestamp(at(8, 0))));
        assert_eq!(bound(&query, "fechaFin"), Some(Value::Timestamp(at(18, 30))));
    }

    #[test]
    fn test_table_bounds_are_widened() {
        let filter = AuditQueryFilter {
            fecha_inicio: Some(at(8, 0)),
            fecha_fin: Some(at(18, 30)),
            ..Default::default()
        };
        let query = build::<TableAccess>(&filter);
        assert!(query.sql.contains(
            "event_timestamp >= SYS_EXTRACT_UTC(CAST(:fechaInicio AS TIMESTAMP WITH TIME ZONE))"
        ));
        assert!(query.sql.contains(
            "event_timestamp <= SYS_EXTRACT_UTC(CAST(:fechaFin AS TIMESTAMP WITH TIME ZONE))"
        ));
        assert_eq!(bound(&query, "fechaInicio"), Some(Value::Timestamp(at(7, 0))));
        assert_eq!(bound(&query, "fechaFin"), Some(Value::Timestamp(at(19, 30))));
    }

    #[test]
    fn test_table_query_excludes_audit_infrastructure() {
        let query = build::<TableAccess>(&AuditQueryFilter::default());
        assert!(query.sql.contains("FROM UNIFIED_AUDIT_TRAIL"));
        assert!(query.sql.contains(
            "object_name NOT IN ('UNIFIED_AUDIT_TRAIL', 'DBA_AUDIT_TRAIL', 'AUDIT_TRAIL')"
        ));
        assert!(query.sql.contains("object_schema NOT IN ('AUDSYS', 'SYS')"));
        assert!(query.sql.contains("'READ', 'WRITE'"));
    }

    #[test]
    fn test_outcome_and_limit_binds() {
        let filter = AuditQueryFilter {
            exitoso: Some(false),
            limite_registros: Some(5),
            ..Default::default()
        };
        let query = build::<PrivilegedActions>(&filter);
        assert!(query.sql.contains(" AND return_code = :exitoso"));
        assert!(query
            .sql
            .ends_with(" ORDER BY event_timestamp DESC FETCH FIRST :limite ROWS ONLY"));
        assert_eq!(bound(&query, "exitoso"), Some(Value::Integer(1)));
        assert_eq!(bound(&query, "limite"), Some(Value::Integer(5)));

        let succeeded = AuditQueryFilter {
            exitoso: Some(true),
            ..Default::default()
        };
        let query = build::<SessionEvents>(&succeeded);
        assert!(query.sql.contains(" AND returncode = :exitoso"));
        assert_eq!(bound(&query, "exitoso"), Some(Value::Integer(0)));
    }

    #[test]
    fn test_zero_limit_is_not_applied() {
        let filter = AuditQueryFilter {
            limite_registros: Some(0),
            ..Default::default()
        };
        let query = build::<TableAccess>(&filter);
        assert!(!query.sql.contains("FETCH FIRST"));
        assert!(bound(&query, "limite").is_none());
    }
}
