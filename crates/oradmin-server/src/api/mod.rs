//! HTTP API handlers
//!
//! Every endpoint answers with its envelope: 200 when the envelope reports
//! success, 400 otherwise. Malformed bodies are rejected with a 400 carrying
//! an envelope of the endpoint's family.

pub mod audit;
pub mod backup;
pub mod performance;
pub mod route;
pub mod security;
pub mod tablespace;

#[cfg(test)]
pub(crate) mod test_support;

use actix_web::{HttpResponse, error::InternalError, web};
use serde::Serialize;

use oradmin_common::{CommandStatus, Envelope, Outcome};

pub fn respond<T: Envelope + Serialize>(body: T) -> HttpResponse {
    if body.succeeded() {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::BadRequest().json(body)
    }
}

fn invalid_body_message(err: &impl std::fmt::Display) -> String {
    format!("Solicitud inválida: {}", err)
}

/// Body extractor config for the `{exitoso, mensaje}` endpoints
pub fn outcome_json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        tracing::debug!(path = %req.path(), error = %err, "Rejected request body");
        let body = Outcome::fail(invalid_body_message(&err));
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}

/// Body extractor config for the `{resultado, errores}` endpoints
pub fn status_json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        tracing::debug!(path = %req.path(), error = %err, "Rejected request body");
        let body = CommandStatus::failure(invalid_body_message(&err));
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}
