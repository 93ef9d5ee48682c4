// HTTP server for the Oradmin Oracle administration console
// Wires configuration, logging and the console services behind an actix-web API

pub mod api; // API handlers, one module per console area
pub mod middleware; // HTTP middleware
pub mod model; // Configuration and shared application state
pub mod startup; // Logging and HTTP server startup

pub use model::{AppState, Configuration};
