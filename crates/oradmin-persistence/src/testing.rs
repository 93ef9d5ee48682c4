//! Scripted in-memory gateway for service tests
//!
//! Replies are matched by substring against the statement text, first rule
//! wins. Unmatched queries return no rows and unmatched statements succeed.
//! Every statement is recorded so tests can assert on what was sent.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use oradmin_common::{OradminError, Result};

use crate::model::{Row, SqlParam, Value};
use crate::traits::{DatabaseGateway, Session};

#[derive(Clone, Debug)]
enum Reply {
    Rows(Vec<Row>),
    Fail(String),
}

#[derive(Clone, Debug)]
struct Rule {
    needle: String,
    reply: Reply,
}

/// A statement as it reached the gateway
#[derive(Clone, Debug, PartialEq)]
pub struct Recorded {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

#[derive(Debug, Default)]
struct Script {
    rules: Vec<Rule>,
    recorded: Vec<Recorded>,
    open_failure: Option<String>,
    opened: usize,
    closed: usize,
}

#[derive(Clone, Debug, Default)]
pub struct ScriptedGateway {
    script: Arc<Mutex<Script>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to statements containing `needle` with `rows`
    pub fn on(&self, needle: &str, rows: Vec<Row>) -> &Self {
        self.script.lock().rules.push(Rule {
            needle: needle.to_string(),
            reply: Reply::Rows(rows),
        });
        self
    }

    /// Reply to statements containing `needle` with a one-cell row
    pub fn on_scalar(&self, needle: &str, value: impl Into<Value>) -> &Self {
        self.on(needle, vec![Row::from_pairs([("VALUE", value.into())])])
    }

    /// Fail statements containing `needle` with a database error
    pub fn fail_on(&self, needle: &str, message: &str) -> &Self {
        self.script.lock().rules.push(Rule {
            needle: needle.to_string(),
            reply: Reply::Fail(message.to_string()),
        });
        self
    }

    /// Make every `open()` fail
    pub fn fail_open(&self, message: &str) -> &Self {
        self.script.lock().open_failure = Some(message.to_string());
        self
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.script.lock().recorded.clone()
    }

    /// Statement texts in execution order
    pub fn statements(&self) -> Vec<String> {
        self.script
            .lock()
            .recorded
            .iter()
            .map(|r| r.sql.clone())
            .collect()
    }

    /// True when some recorded statement contains `needle`
    pub fn ran(&self, needle: &str) -> bool {
        self.script
            .lock()
            .recorded
            .iter()
            .any(|r| r.sql.contains(needle))
    }

    pub fn sessions_opened(&self) -> usize {
        self.script.lock().opened
    }

    pub fn sessions_closed(&self) -> usize {
        self.script.lock().closed
    }

    fn reply(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Row>> {
        let mut script = self.script.lock();
        script.recorded.push(Recorded {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        let reply = script
            .rules
            .iter()
            .find(|rule| sql.contains(&rule.needle))
            .map(|rule| rule.reply.clone());
        match reply {
            Some(Reply::Rows(rows)) => Ok(rows),
            Some(Reply::Fail(message)) => Err(OradminError::database(message)),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl DatabaseGateway for ScriptedGateway {
    async fn open(&self) -> Result<Box<dyn Session>> {
        let mut script = self.script.lock();
        if let Some(message) = &script.open_failure {
            return Err(OradminError::database(message.clone()));
        }
        script.opened += 1;
        Ok(Box::new(ScriptedSession {
            gateway: self.clone(),
        }))
    }
}

struct ScriptedSession {
    gateway: ScriptedGateway,
}

impl Drop for ScriptedSession {
    fn drop(&mut self) {
        self.gateway.script.lock().closed += 1;
    }
}

#[async_trait]
impl Session for ScriptedSession {
    async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<u64> {
        self.gateway
            .reply(sql, params)
            .map(|rows| rows.len() as u64)
    }

    async fn query(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Row>> {
        self.gateway.reply(sql, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_replies_and_recording() {
        let gateway = ScriptedGateway::new();
        gateway
            .on_scalar("FROM DUAL", 1)
            .fail_on("DROP USER", "ORA-01918: user does not exist");

        {
            let session = gateway.open().await.unwrap();
            assert_eq!(
                session.query_scalar("SELECT 1 FROM DUAL", &[]).await.unwrap(),
                Value::Integer(1)
            );
            let err = session.execute_ddl("DROP USER nobody").await.unwrap_err();
            assert_eq!(err.to_string(), "ORA-01918: user does not exist");
            assert!(session.query("SELECT * FROM X", &[]).await.unwrap().is_empty());
        }

        assert_eq!(gateway.statements().len(), 3);
        assert!(gateway.ran("DROP USER nobody"));
        assert_eq!(gateway.sessions_opened(), 1);
        assert_eq!(gateway.sessions_closed(), 1);
    }

    #[tokio::test]
    async fn test_probe_uses_dual() {
        let gateway = ScriptedGateway::new();
        gateway.probe().await.unwrap();
        assert!(gateway.ran("SELECT 1 FROM DUAL"));

        let down = ScriptedGateway::new();
        down.fail_open("ORA-12541: TNS:no listener");
        assert!(down.probe().await.is_err());
    }
}
