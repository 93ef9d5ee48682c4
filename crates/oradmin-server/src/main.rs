use std::sync::Arc;

use tracing::{info, warn};

use oradmin_server::{AppState, Configuration, startup};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let configuration = Configuration::new()?;

    let logging_config = configuration.logging_config();
    let _logging_guard = startup::init_logging(&logging_config)?;

    let address = configuration.server_address();
    let port = configuration.server_port();
    let context_path = configuration.server_context_path();
    let workers = configuration.server_workers();
    let database = configuration.database_settings();

    info!(
        address = %address,
        port,
        context_path = %context_path,
        workers,
        database = %database.connect_string,
        user = %database.username,
        "Starting Oradmin server"
    );

    let app_state = Arc::new(AppState::from_configuration(&configuration));

    // the console still starts, each request reports the database error
    match app_state.gateway.probe().await {
        Ok(()) => info!("Connected to {}", database.connect_string),
        Err(e) => warn!(error = %e, "Database is not reachable at startup"),
    }

    startup::api_server(app_state, context_path, address, port, workers)?.await?;

    info!("Oradmin server stopped");
    Ok(())
}
