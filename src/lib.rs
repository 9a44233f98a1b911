//! SaberPro Analytics API
//!
//! Read-only ranking and catalog lookups over historical SaberPro results,
//! backing the prediction/exploration front end:
//! - Dynamic WHERE composition with values always bound, never interpolated
//! - Closed vocabularies for sortable columns and directions
//! - Per-endpoint clamped row limits
//! - Deduplicated catalog lookups for selection UIs

pub mod config;
pub mod db;
pub mod handlers;
pub mod normalize;
pub mod query;
pub mod server;

// Re-exports for convenience
pub use config::Config;
pub use server::AppState;
