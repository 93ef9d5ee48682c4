//! HTTP server setup

use std::sync::Arc;

use actix_web::{App, HttpServer, dev::Server, middleware::Logger, web};

use crate::{api::route::routes, middleware::cors::Cors, model::AppState};

/// Creates and binds the console API server.
///
/// Every route lives under `context_path`. Shutdown on Ctrl+C/SIGTERM is
/// handled by actix's own signal listener.
pub fn api_server(
    app_state: Arc<AppState>,
    context_path: String,
    address: String,
    port: u16,
    workers: usize,
) -> Result<Server, std::io::Error> {
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(Cors)
            .wrap(Logger::default())
            .app_data(web::Data::from(app_state.clone()))
            .service(routes(&context_path))
    })
    .workers(workers)
    .bind((address, port))?
    .run())
}
