#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared setup for the integration tests, so every test file gets the
//! same tracing behavior without re-initializing the subscriber.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes the tracing subscriber for tests exactly once.
pub fn setup_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt::init();
    });
}
