//! Client for a user's starred-repository feed
//!
//! - `index::FeedEntry` is the validated entry type used downstream
//! - `index::fetch_starred_entries` performs the single GET and validation

pub mod index;
