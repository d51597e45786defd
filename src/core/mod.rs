pub mod api_doc;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod tracing_init;
