//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use std::sync::Arc;
use studygen_core::ports::{ContentGenerationService, TextExtractionService};

/// The shared application state, created once at startup and passed to all handlers.
///
/// Requests are otherwise stateless: nothing is persisted between calls and
/// no mutable state is shared across them.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub extractor: Arc<dyn TextExtractionService>,
    pub generator: Arc<dyn ContentGenerationService>,
}
