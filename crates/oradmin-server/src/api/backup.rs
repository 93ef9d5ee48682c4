//! Backup API handlers
//!
//! Exports and imports run Data Pump to completion before answering, so these
//! requests last as long as the dump does.

use actix_web::{HttpResponse, Responder, Scope, get, post, route, web};

use oradmin_admin::{BackupOutcome, SchemaBackupRequest, TableBackupRequest};
use oradmin_common::CommandStatus;

use crate::model::AppState;

use super::{respond, status_json_config};

fn reply(outcome: BackupOutcome) -> HttpResponse {
    respond(CommandStatus::from(outcome))
}

#[post("/generarRespaldoSchema")]
async fn export_schema(
    data: web::Data<AppState>,
    body: web::Json<SchemaBackupRequest>,
) -> impl Responder {
    reply(data.backup.export_schema(body.into_inner()).await)
}

#[post("/generarRespaldoTabla")]
async fn export_table(
    data: web::Data<AppState>,
    body: web::Json<TableBackupRequest>,
) -> impl Responder {
    reply(data.backup.export_table(body.into_inner()).await)
}

#[get("/generarRespaldoCompleto")]
async fn export_full(data: web::Data<AppState>) -> impl Responder {
    reply(data.backup.export_full().await)
}

#[post("/ImportarRespaldoSchema")]
async fn import_schema(
    data: web::Data<AppState>,
    body: web::Json<SchemaBackupRequest>,
) -> impl Responder {
    reply(data.backup.import_schema(body.into_inner()).await)
}

#[post("/ImportarRespaldoTabla")]
async fn import_table(
    data: web::Data<AppState>,
    body: web::Json<TableBackupRequest>,
) -> impl Responder {
    reply(data.backup.import_table(body.into_inner()).await)
}

#[route("/ImportarRespaldoCompleto", method = "GET", method = "POST")]
async fn import_full(data: web::Data<AppState>) -> impl Responder {
    reply(data.backup.import_full().await)
}

pub fn routes() -> Scope {
    web::scope("/respaldo")
        .app_data(status_json_config())
        .service(export_schema)
        .service(export_table)
        .service(export_full)
        .service(import_schema)
        .service(import_table)
        .service(import_full)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};

    use oradmin_persistence::testing::ScriptedGateway;

    use crate::api::{
        route::routes,
        test_support::{FakeRunner, app_state},
    };

    #[actix_web::test]
    async fn test_export_schema_runs_expdp() {
        let gateway = ScriptedGateway::new();
        let runner = Arc::new(FakeRunner::default());
        let app = test::init_service(
            App::new()
                .app_data(app_state(&gateway, runner.clone()))
                .service(routes("/api")),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/respaldo/generarRespaldoSchema")
            .set_json(json!({"nombreSchema": "HR"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"resultado": true, "errores": []}));
        assert!(gateway.ran("CREATE OR REPLACE DIRECTORY RESPALDO"));

        let calls = runner.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "expdp");
        assert!(calls[0].1.contains(&"SCHEMAS=HR".to_string()));
        assert!(calls[0].1.contains(&"DUMPFILE=HR.DMP".to_string()));
    }

    #[actix_web::test]
    async fn test_import_full_accepts_get_and_post() {
        let gateway = ScriptedGateway::new();
        let runner = Arc::new(FakeRunner::default());
        let app = test::init_service(
            App::new()
                .app_data(app_state(&gateway, runner.clone()))
                .service(routes("/api")),
        )
        .await;

        for req in [
            test::TestRequest::get(),
            test::TestRequest::post(),
        ] {
            let resp = test::call_service(
                &app,
                req.uri("/api/respaldo/ImportarRespaldoCompleto").to_request(),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["errores"][0], "Importación completa realizada exitosamente.");
        }
        assert_eq!(runner.calls.lock().len(), 2);
    }

    #[actix_web::test]
    async fn test_failed_import_reports_stderr() {
        let gateway = ScriptedGateway::new();
        let runner = Arc::new(FakeRunner {
            exit_code: 5,
            ..FakeRunner::default()
        });
        let app = test::init_service(
            App::new()
                .app_data(app_state(&gateway, runner))
                .service(routes("/api")),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/respaldo/ImportarRespaldoTabla")
            .set_json(json!({"nombreSchema": "HR", "nombreTabla": "EMPLOYEES"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["errores"][0],
            "Error al realizar la importación: ORA-39001: invalid argument value"
        );
    }

    #[actix_web::test]
    async fn test_table_export_requires_table_name() {
        let gateway = ScriptedGateway::new();
        let runner = Arc::new(FakeRunner::default());
        let app = test::init_service(
            App::new()
                .app_data(app_state(&gateway, runner.clone()))
                .service(routes("/api")),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/respaldo/generarRespaldoTabla")
            .set_json(json!({"nombreSchema": "HR"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errores"][0], "El nombre de la tabla es requerido");
        assert!(runner.calls.lock().is_empty());
    }
}
