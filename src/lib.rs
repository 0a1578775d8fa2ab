//! Weekplan: a personal weekly-schedule viewer/editor over a single JSON
//! document. The [`schedule`] module is the normalizer core; [`ui`] and
//! [`web`] are thin shells over its read and write operations.

pub mod config;
pub mod lock;
pub mod schedule;
pub mod ui;
pub mod web;

use tracing_subscriber::EnvFilter;

/// Install the tracing subscriber shared by all three binaries.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
