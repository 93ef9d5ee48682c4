//! Audit API handlers
//!
//! - GET  /auditoria/estado
//! - POST /auditoria/configurar/{conexiones,tablas,acciones}
//! - POST /auditoria/consultar/{sesiones,tablas,acciones}

use actix_web::{Responder, Scope, get, post, web};

use oradmin_audit::{
    ActionAuditRequest, AuditQueryFilter, ConnectionAuditRequest, TableAuditRequest,
};

use crate::model::AppState;

use super::{outcome_json_config, respond};

#[get("/estado")]
async fn state(data: web::Data<AppState>) -> impl Responder {
    respond(data.audit.state().await)
}

#[post("/configurar/conexiones")]
async fn configure_connections(
    data: web::Data<AppState>,
    body: web::Json<ConnectionAuditRequest>,
) -> impl Responder {
    respond(data.audit.configure_connections(body.into_inner()).await)
}

#[post("/configurar/tablas")]
async fn configure_tables(
    data: web::Data<AppState>,
    body: web::Json<Vec<TableAuditRequest>>,
) -> impl Responder {
    respond(data.audit.configure_tables(body.into_inner()).await)
}

#[post("/configurar/acciones")]
async fn configure_actions(
    data: web::Data<AppState>,
    body: web::Json<ActionAuditRequest>,
) -> impl Responder {
    respond(data.audit.configure_actions(body.into_inner()).await)
}

#[post("/consultar/sesiones")]
async fn query_sessions(
    data: web::Data<AppState>,
    filter: web::Json<AuditQueryFilter>,
) -> impl Responder {
    respond(data.audit.query_sessions(&filter).await)
}

#[post("/consultar/tablas")]
async fn query_tables(
    data: web::Data<AppState>,
    filter: web::Json<AuditQueryFilter>,
) -> impl Responder {
    respond(data.audit.query_tables(&filter).await)
}

#[post("/consultar/acciones")]
async fn query_actions(
    data: web::Data<AppState>,
    filter: web::Json<AuditQueryFilter>,
) -> impl Responder {
    respond(data.audit.query_actions(&filter).await)
}

pub fn routes() -> Scope {
    web::scope("/auditoria")
        .app_data(outcome_json_config())
        .service(state)
        .service(configure_connections)
        .service(configure_tables)
        .service(configure_actions)
        .service(query_sessions)
        .service(query_tables)
        .service(query_actions)
}
