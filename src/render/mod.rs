//! Rendering of parsed papers.

mod json;
mod outline;

pub use json::{to_json, to_json_value, JsonFormat};
pub use outline::to_outline;
