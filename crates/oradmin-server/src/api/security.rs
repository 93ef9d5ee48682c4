//! Security API handlers: users, roles and privileges

use actix_web::{Responder, Scope, get, post, web};

use oradmin_admin::{CreateRoleRequest, CreateUserRequest, DropUserRequest, ModifyUserRequest};

use crate::model::AppState;

use super::{respond, status_json_config};

#[post("/crearUsuario")]
async fn create_user(
    data: web::Data<AppState>,
    body: web::Json<CreateUserRequest>,
) -> impl Responder {
    respond(data.security.create_user(body.into_inner()).await)
}

#[post("/modificarUsuario")]
async fn modify_user(
    data: web::Data<AppState>,
    body: web::Json<ModifyUserRequest>,
) -> impl Responder {
    respond(data.security.modify_user(body.into_inner()).await)
}

#[post("/eliminarUsuario")]
async fn drop_user(data: web::Data<AppState>, body: web::Json<DropUserRequest>) -> impl Responder {
    respond(data.security.drop_user(body.into_inner()).await)
}

#[post("/crearRol")]
async fn create_role(
    data: web::Data<AppState>,
    body: web::Json<CreateRoleRequest>,
) -> impl Responder {
    respond(data.security.create_role(body.into_inner()).await)
}

#[get("/listarUsuarios")]
async fn list_users(data: web::Data<AppState>) -> impl Responder {
    respond(data.security.list_users().await)
}

#[get("/listarPrivilegios/{nombreUsuario}")]
async fn list_privileges(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    respond(data.security.list_privileges(&path).await)
}

#[get("/listarRoles")]
async fn list_roles(data: web::Data<AppState>) -> impl Responder {
    respond(data.security.list_roles().await)
}

#[get("/obtenerPrivilegios")]
async fn grantable_privileges(data: web::Data<AppState>) -> impl Responder {
    respond(data.security.grantable_privileges().await)
}

pub fn routes() -> Scope {
    web::scope("/seguridad")
        .app_data(status_json_config())
        .service(create_user)
        .service(modify_user)
        .service(drop_user)
        .service(create_role)
        .service(list_users)
        .service(list_privileges)
        .service(list_roles)
        .service(grantable_privileges)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};

    use oradmin_persistence::{Row, Value as DbValue, testing::ScriptedGateway};

    use crate::api::{route::routes, test_support::app_state};

    #[actix_web::test]
    async fn test_create_user_runs_grants() {
        let gateway = ScriptedGateway::new();
        let app = test::init_service(
            App::new()
                .app_data(app_state(&gateway, Arc::default()))
                .service(routes("/api")),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/seguridad/crearUsuario")
            .set_json(json!({
                "nombreUsuario": "ANALISTA",
                "password": "Clave123",
                "roles": ["CONNECT"],
                "descripcion": "ignored by the server"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"resultado": true, "errores": []}));
        assert!(gateway.ran("CREATE USER ANALISTA"));
        assert!(gateway.ran("GRANT CREATE SESSION TO ANALISTA"));
        assert!(gateway.ran("GRANT CONNECT TO ANALISTA"));
    }

    #[actix_web::test]
    async fn test_create_user_database_error() {
        let gateway = ScriptedGateway::new();
        gateway.fail_on("CREATE USER", "ORA-01920: user name 'ANALISTA' conflicts");
        let app = test::init_service(
            App::new()
                .app_data(app_state(&gateway, Arc::default()))
                .service(routes("/api")),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/seguridad/crearUsuario")
            .set_json(json!({"nombreUsuario": "ANALISTA", "password": ""}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["resultado"], false);
        assert_eq!(
            body["errores"][0],
            "Error al crear usuario: ORA-01920: user name 'ANALISTA' conflicts"
        );
        assert!(!gateway.ran("GRANT"));
    }

    #[actix_web::test]
    async fn test_list_users_payload() {
        let gateway = ScriptedGateway::new();
        gateway.on(
            "FROM DBA_USERS",
            vec![Row::from_pairs([
                ("USERNAME", DbValue::from("HR")),
                ("ACCOUNT_STATUS", DbValue::from("OPEN")),
                ("LOCK_DATE", DbValue::Null),
                ("CREATED", DbValue::Null),
                ("PROFILE", DbValue::from("DEFAULT")),
                ("DEFAULT_TABLESPACE", DbValue::from("USERS")),
            ])],
        );
        let app = test::init_service(
            App::new()
                .app_data(app_state(&gateway, Arc::default()))
                .service(routes("/api")),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/seguridad/listarUsuarios").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["resultado"], true);
        assert_eq!(body["usuarios"][0]["nombreUsuario"], "HR");
        assert_eq!(body["usuarios"][0]["estado"], "OPEN");
    }

    #[actix_web::test]
    async fn test_list_privileges_binds_path_user() {
        let gateway = ScriptedGateway::new();
        let app = test::init_service(
            App::new()
                .app_data(app_state(&gateway, Arc::default()))
                .service(routes("/api")),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/seguridad/listarPrivilegios/hr")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let recorded = gateway.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].params[0].value, DbValue::from("HR"));
    }

    #[actix_web::test]
    async fn test_missing_field_is_a_status_envelope() {
        let gateway = ScriptedGateway::new();
        let app = test::init_service(
            App::new()
                .app_data(app_state(&gateway, Arc::default()))
                .service(routes("/api")),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/seguridad/eliminarUsuario")
            .set_json(json!({"includeCascade": "yes"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["resultado"], false);
        assert!(body["errores"][0].as_str().unwrap().starts_with("Solicitud inválida"));
    }
}
