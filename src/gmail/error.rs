use thiserror::Error;

/// Provider records that cannot be turned into the typed model.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("{record} record has no '{field}' field")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },

    #[error("invalid internalDate '{0}' for message {1}")]
    InvalidDate(String, String),
}

pub type Result<T> = std::result::Result<T, ParseError>;
