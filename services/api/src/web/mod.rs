pub mod rest;
pub mod state;

// Re-export the router builder and handlers to make them easily accessible
// to the binary that serves the API and to the integration tests.
pub use rest::{create_router, export_handler, generate_handler, health_handler, structure_handler};
