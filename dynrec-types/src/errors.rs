use thiserror::Error;

/// Rejections raised while defining a record type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Invalid type name: {0:?}")]
    InvalidTypeName(String),
    #[error("Type name cannot be a keyword: {0:?}")]
    KeywordTypeName(String),
    #[error("Invalid field name: {0:?}")]
    InvalidFieldName(String),
    #[error("Field name cannot start with an underscore: {0:?}")]
    ReservedFieldName(String),
    #[error("Field name cannot be a keyword: {0:?}")]
    KeywordFieldName(String),
    #[error("Duplicate field name: {0:?}")]
    DuplicateFieldName(String),
}

/// Rejections raised while constructing, updating or indexing a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Expected at most {expected} values but got {given}")]
    TooManyValues { expected: usize, given: usize },
    #[error("Field {0:?} is not defined")]
    UnknownField(String),
    #[error("Got multiple values for field {0:?}")]
    MultipleValues(String),
    #[error("Missing value for field {0:?}")]
    MissingValue(String),
    #[error("Index {index} out of range for record of {len} fields")]
    IndexOutOfRange { index: usize, len: usize },
}
