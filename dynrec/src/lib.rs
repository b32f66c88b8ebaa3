pub mod args;
pub mod defaults;
pub mod record;
pub mod record_type;
pub mod schema;

pub use args::Args;
pub use defaults::{DefaultFactory, DefaultValue};
pub use record::Record;
pub use record_type::RecordType;
pub use schema::{FieldSpec, Schema};
