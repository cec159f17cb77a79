use thiserror::Error;

use crate::option::ValueType;

/// Errors raised while declaring a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("invalid option type \"{0}\" (expected string, integer or float)")]
    InvalidOptionType(String),

    #[error("cannot set an accepted value type without any options")]
    NoOptionDefined,

    #[error("cannot mark required without any options or arguments")]
    NoTargetForRequired,

    #[error("argument '{0}' is declared more than once")]
    DuplicateArgument(String),

    #[error("option token '{0}' maps to more than one option")]
    DuplicateOption(String),
}

/// Errors raised by [`Command::parse`](crate::Command::parse).
///
/// Any of these aborts the parse; no partial result is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("unknown argument: {0}")]
    UnknownArgument(String),

    #[error("invalid value for option {option}: {value} (expected {expected})")]
    InvalidOptionValue {
        option: String,
        value: String,
        expected: ValueType,
    },

    #[error("missing value for option {0}")]
    IncompleteOptionValue(String),

    #[error("missing required option: {0}")]
    MissingRequiredOption(String),

    #[error("missing required argument: {0}")]
    MissingRequiredArgument(String),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}
