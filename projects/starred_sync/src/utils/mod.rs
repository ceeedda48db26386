pub mod diff;
pub mod tagging;
