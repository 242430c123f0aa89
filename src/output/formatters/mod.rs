//! Output formatter implementations

pub mod json;
pub mod text;

pub use json::format_all_outcomes_as_json;
pub use text::TextFormatter;
