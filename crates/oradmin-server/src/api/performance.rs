//! Performance API handlers: execution plans and index creation

use actix_web::{Responder, Scope, post, web};

use oradmin_admin::{CreateIndexRequest, QueryPlanRequest};

use crate::model::AppState;

use super::{outcome_json_config, respond};

#[post("/query-plan")]
async fn query_plan(
    data: web::Data<AppState>,
    body: web::Json<QueryPlanRequest>,
) -> impl Responder {
    respond(data.performance.query_plan(body.into_inner()).await)
}

#[post("/create-index")]
async fn create_index(
    data: web::Data<AppState>,
    body: web::Json<CreateIndexRequest>,
) -> impl Responder {
    respond(data.performance.create_index(body.into_inner()).await)
}

pub fn routes() -> Scope {
    web::scope("/performance")
        .app_data(outcome_json_config())
        .service(query_plan)
        .service(create_index)
}
