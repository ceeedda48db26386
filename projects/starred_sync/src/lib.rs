//! Starred repository sync service
//!
//! - Polls a GitHub starred feed and forwards new stars to Omnivore
//! - New-entry detection and tagging in `utils/`
//! - Last-seen state behind `state::StateStore` (PostgreSQL via `db/`, or a JSON file)
//! - Manual trigger and state inspection endpoints in `endpoints/`
//! - Requires OMNIVORE_API_KEY and GITHUB_USERNAME (or API_URL) env vars

pub mod config;
pub mod db;
pub mod endpoints;
pub mod publisher;
pub mod scheduler;
pub mod state;
pub mod sync;
pub mod utils;
