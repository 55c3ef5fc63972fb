//! HTTP API for Incoherent
//!
//! Hosts the skill behind a voice-platform style JSON endpoint.

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::runtime::ProductionRuntime;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<ProductionRuntime>,
}

impl AppState {
    pub fn new(runtime: ProductionRuntime) -> Self {
        Self {
            runtime: Arc::new(runtime),
        }
    }
}
