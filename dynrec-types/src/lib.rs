pub mod errors;
pub mod json;
pub mod value;

pub use json::{json_to_value, value_to_json};
pub use value::{Value, DATE_FORMAT};

// Re-exports
pub use chrono;
pub use indexmap;
pub use ordered_float;
pub use parking_lot;
pub use rust_decimal;
pub use serde;
pub use serde_json;
pub use thiserror;
