//! Omnivore read-it-later client
//!
//! - `index::OmnivoreClient::save_url` wraps the `saveUrl` GraphQL mutation
//! - Requires an Omnivore API key, sent as the raw `Authorization` header

pub mod index;
