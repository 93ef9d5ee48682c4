//! Gateway traits
//!
//! Every console operation opens its own [`Session`] through a
//! [`DatabaseGateway`], runs its statements and drops the session before
//! returning. Dropping a session releases the underlying connection, so an
//! early `?` return cannot leak it.

use async_trait::async_trait;

use oradmin_common::Result;

use crate::model::{Row, SqlParam, Value};

/// Factory for per-operation database sessions
#[async_trait]
pub trait DatabaseGateway: Send + Sync {
    /// Open a fresh connection to the administered instance
    async fn open(&self) -> Result<Box<dyn Session>>;

    /// Cheap connectivity check used at startup
    async fn probe(&self) -> Result<()> {
        let session = self.open().await?;
        session.query_scalar("SELECT 1 FROM DUAL", &[]).await?;
        Ok(())
    }
}

/// A single open connection
#[async_trait]
pub trait Session: Send + Sync {
    /// Execute a statement (DDL or DML) and return the affected row count
    async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<u64>;

    /// Run a query and decode all rows
    async fn query(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Row>>;

    /// First column of the first row, NULL when the query returns nothing
    async fn query_scalar(&self, sql: &str, params: &[SqlParam]) -> Result<Value> {
        let rows = self.query(sql, params).await?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.into_values().into_iter().next())
            .unwrap_or(Value::Null))
    }

    /// Execute a parameterless administrative statement
    async fn execute_ddl(&self, sql: &str) -> Result<()> {
        self.execute(sql, &[]).await.map(|_| ())
    }
}
