//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the upload simulator; every clone shares the same records and
//! observer set. Report datasets are `'static` and need no state.

use crate::config::SimulatorConfig;
use crate::services::upload::UploadSimulator;

/// Clone is required by Axum; the simulator is an `Arc` handle.
#[derive(Clone)]
pub struct AppState {
    pub simulator: UploadSimulator,
}

impl AppState {
    #[must_use]
    pub fn new(config: SimulatorConfig) -> Self {
        Self { simulator: UploadSimulator::new(config) }
    }

    #[must_use]
    pub fn with_simulator(simulator: UploadSimulator) -> Self {
        Self { simulator }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
