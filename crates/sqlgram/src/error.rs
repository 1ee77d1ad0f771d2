//! Error types for sqlgram

use thiserror::Error;

/// Result type alias for sqlgram operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Errors raised while assembling or compiling a query.
///
/// None of these are I/O related: every variant is a deterministic function of
/// the builder calls that produced it.
#[derive(Debug, Error)]
pub enum SqlError {
    /// Operator outside the comparison allow-list
    #[error("Unknown operator: '{0}'")]
    UnknownOperator(String),

    /// Value without a literal SQL representation
    #[error("Unsupported value type: {0}")]
    UnsupportedValueType(String),

    /// Statement type the grammar has no clause pipeline for
    #[error("Unsupported query type: {0}")]
    UnsupportedQueryType(String),

    /// Mutating statement requested on a read-only builder
    #[error("Read-only builder cannot {0}")]
    ReadOnlyViolation(&'static str),

    /// Parallel arrays passed to a batched condition call differ in length
    #[error(
        "Batched condition length mismatch: {columns} columns, {operators} operators, {values} values"
    )]
    BatchLengthMismatch {
        columns: usize,
        operators: usize,
        values: usize,
    },

    /// `on` called before any join was added
    #[error("ON condition requires a preceding join")]
    MissingJoin,

    /// UPDATE compiled without any SET assignment
    #[error("UPDATE requires at least one SET assignment")]
    EmptyUpdate,

    /// Dialect identifier not recognized
    #[error("Unknown dialect: '{0}'")]
    UnknownDialect(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SqlError {
    /// Create an unknown operator error
    pub fn unknown_operator(op: impl Into<String>) -> Self {
        Self::UnknownOperator(op.into())
    }

    /// Create an unsupported value type error
    pub fn unsupported_value(type_name: impl Into<String>) -> Self {
        Self::UnsupportedValueType(type_name.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is an unknown operator error
    pub fn is_unknown_operator(&self) -> bool {
        matches!(self, Self::UnknownOperator(_))
    }

    /// Check if this is a read-only violation
    pub fn is_read_only_violation(&self) -> bool {
        matches!(self, Self::ReadOnlyViolation(_))
    }

    /// Check if this is an unsupported value type error
    pub fn is_unsupported_value(&self) -> bool {
        matches!(self, Self::UnsupportedValueType(_))
    }
}

impl From<serde_json::Error> for SqlError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for SqlError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for SqlError {
    fn from(err: std::io::Error) -> Self {
        Self::Config(err.to_string())
    }
}
