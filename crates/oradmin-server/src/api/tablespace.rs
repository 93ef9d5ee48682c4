//! Tablespace API handlers

use actix_web::{Responder, Scope, get, post, web};

use oradmin_admin::{
    CompactTablespaceRequest, CreateTablespaceRequest, DropTablespaceRequest,
    ModifyTablespaceRequest,
};

use crate::model::AppState;

use super::{respond, status_json_config};

#[post("/crear")]
async fn create(
    data: web::Data<AppState>,
    body: web::Json<CreateTablespaceRequest>,
) -> impl Responder {
    respond(data.tablespace.create(body.into_inner()).await)
}

#[post("/modificar")]
async fn modify(
    data: web::Data<AppState>,
    body: web::Json<ModifyTablespaceRequest>,
) -> impl Responder {
    respond(data.tablespace.modify(body.into_inner()).await)
}

#[post("/eliminar")]
async fn remove(
    data: web::Data<AppState>,
    body: web::Json<DropTablespaceRequest>,
) -> impl Responder {
    respond(data.tablespace.remove(body.into_inner()).await)
}

#[post("/compactar")]
async fn compact(
    data: web::Data<AppState>,
    body: web::Json<CompactTablespaceRequest>,
) -> impl Responder {
    respond(data.tablespace.compact(body.into_inner()).await)
}

#[get("/obtenerInformacion")]
async fn info(data: web::Data<AppState>) -> impl Responder {
    respond(data.tablespace.info().await)
}

pub fn routes() -> Scope {
    web::scope("/tablespace")
        .app_data(status_json_config())
        .service(create)
        .service(modify)
        .service(remove)
        .service(compact)
        .service(info)
}
