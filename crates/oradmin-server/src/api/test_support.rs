//! Shared fixtures for handler tests

use std::sync::Arc;

use actix_web::web;
use async_trait::async_trait;
use parking_lot::Mutex;

use oradmin_admin::{BackupSettings, CommandOutput, DumpRunner};
use oradmin_common::Result;
use oradmin_persistence::{DatabaseSettings, testing::ScriptedGateway};

use crate::model::AppState;

/// Records every invocation and exits with a fixed code
#[derive(Default)]
pub(crate) struct FakeRunner {
    pub exit_code: i32,
    pub calls: Mutex<Vec<(String, Vec<String>)>>,
}

#[async_trait]
impl DumpRunner for FakeRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        self.calls.lock().push((program.to_string(), args.to_vec()));
        Ok(CommandOutput {
            stdout: String::new(),
            stderr: if self.exit_code == 0 {
                String::new()
            } else {
                "ORA-39001: invalid argument value".to_string()
            },
            exit_code: self.exit_code,
        })
    }
}

pub(crate) fn app_state(gateway: &ScriptedGateway, runner: Arc<FakeRunner>) -> web::Data<AppState> {
    let backup = BackupSettings {
        directory: std::env::temp_dir().join("oradmin-api-tests"),
        ..BackupSettings::default()
    };
    web::Data::new(AppState::new(
        Arc::new(gateway.clone()),
        DatabaseSettings::new("SYSTEM", "pw", "localhost:1521/XE"),
        backup,
        runner,
    ))
}
