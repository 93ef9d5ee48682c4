//! Oracle implementation of the gateway
//!
//! The `oracle` driver is blocking, so every round trip is moved onto the
//! blocking thread pool. A session owns its connection through an `Arc` that
//! is only cloned for the duration of one round trip; the connection closes
//! when the session is dropped.

use std::sync::Arc;

use async_trait::async_trait;
use oracle::sql_type::{OracleType, ToSql};
use oracle::Connection;
use tracing::{debug, warn};

use oradmin_common::{OradminError, Result};

use crate::model::{Row, SqlParam, Value};
use crate::settings::DatabaseSettings;
use crate::traits::{DatabaseGateway, Session};

static NULL_BIND: Option<String> = None;

/// Gateway that opens one Oracle connection per operation
#[derive(Clone, Debug)]
pub struct OracleGateway {
    settings: DatabaseSettings,
}

impl OracleGateway {
    pub fn new(settings: DatabaseSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &DatabaseSettings {
        &self.settings
    }
}

#[async_trait]
impl DatabaseGateway for OracleGateway {
    async fn open(&self) -> Result<Box<dyn Session>> {
        let settings = self.settings.clone();
        let connection = run_blocking(move || {
            Connection::connect(
                &settings.username,
                &settings.password,
                &settings.connect_string,
            )
        })
        .await
        .inspect_err(|e| {
            warn!(
                connect_string = %self.settings.connect_string,
                error = %e,
                "Failed to open database session"
            )
        })?;

        debug!(
            connect_string = %self.settings.connect_string,
            "Opened database session"
        );

        Ok(Box::new(OracleSession {
            connection: Arc::new(connection),
        }))
    }
}

struct OracleSession {
    connection: Arc<Connection>,
}

#[async_trait]
impl Session for OracleSession {
    async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<u64> {
        let connection = self.connection.clone();
        let sql = sql.to_string();
        let params = params.to_vec();

        run_blocking(move || {
            let binds = bind_list(&params);
            let statement = connection.execute_named(&sql, &binds)?;
            statement.row_count()
        })
        .await
    }

    async fn query(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Row>> {
        let connection = self.connection.clone();
        let sql = sql.to_string();
        let params = params.to_vec();

        run_blocking(move || {
            let binds = bind_list(&params);
            let result_set = connection.query_named(&sql, &binds)?;

            let columns: Arc<[String]> = result_set
                .column_info()
                .iter()
                .map(|c| c.name().to_string())
                .collect();
            let types: Vec<OracleType> = result_set
                .column_info()
                .iter()
                .map(|c| c.oracle_type().clone())
                .collect();

            let mut rows = Vec::new();
            for row in result_set {
                let row = row?;
                let values = types
                    .iter()
                    .enumerate()
                    .map(|(idx, ty)| decode(&row, idx, ty))
                    .collect::<oracle::Result<Vec<Value>>>()?;
                rows.push(Row::new(columns.clone(), values));
            }
            Ok(rows)
        })
        .await
    }
}

fn bind_list(params: &[SqlParam]) -> Vec<(&str, &dyn ToSql)> {
    params
        .iter()
        .map(|p| (p.name.as_str(), bind_value(&p.value)))
        .collect()
}

fn bind_value(value: &Value) -> &dyn ToSql {
    match value {
        Value::Integer(v) => v,
        Value::Float(v) => v,
        Value::Text(v) => v,
        Value::Timestamp(v) => v,
        Value::Null => &NULL_BIND,
    }
}

fn decode(row: &oracle::Row, idx: usize, ty: &OracleType) -> oracle::Result<Value> {
    if row.sql_values()[idx].is_null()? {
        return Ok(Value::Null);
    }

    let value = match ty {
        OracleType::Number(_, 0) | OracleType::Int64 => Value::Integer(row.get(idx)?),
        OracleType::Number(..)
        | OracleType::Float(_)
        | OracleType::BinaryFloat
        | OracleType::BinaryDouble => Value::Float(row.get(idx)?),
        OracleType::Date
        | OracleType::Timestamp(_)
        | OracleType::TimestampTZ(_)
        | OracleType::TimestampLTZ(_) => Value::Timestamp(row.get(idx)?),
        _ => Value::Text(row.get(idx)?),
    };
    Ok(value)
}

async fn run_blocking<T, F>(task: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> oracle::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| OradminError::database(format!("database task aborted: {}", e)))?
        .map_err(driver_error)
}

fn driver_error(err: oracle::Error) -> OradminError {
    OradminError::database(err.to_string())
}
