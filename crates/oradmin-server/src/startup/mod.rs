//! Process startup: logging and the HTTP server

mod http;
mod logging;

pub use http::api_server;
pub use logging::{LogRotation, LoggingConfig, LoggingGuard, init_logging};
