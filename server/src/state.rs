//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! sink keeps nothing but the most recent submission; every POST replaces it.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

// =============================================================================
// LATEST SUBMISSION
// =============================================================================

/// The last relation set received, and how many sets have arrived so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Latest {
    pub items: Vec<String>,
    pub submissions: u64,
}

impl Latest {
    /// Replace the stored set with a new submission.
    pub fn record(&mut self, items: Vec<String>) {
        self.items = items;
        self.submissions += 1;
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone, Default)]
pub struct AppState {
    pub latest: Arc<RwLock<Latest>>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
