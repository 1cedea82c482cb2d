//! Error types for relsql.
//!
//! Every failure is a construction-time configuration error; rendering never fails.

use thiserror::Error;

/// The main error type for building SQL trees.
#[derive(Debug, Error)]
pub enum SqlError {
    /// Inversion requested on an operator without a negative template.
    #[error("{node}: no invert without INVERT operand")]
    Invert { node: &'static str },

    /// Neither one keyword pair nor two positional terms were given.
    #[error("{node}: need single pair in {keywords:?} or double in {positional}")]
    Pair {
        node: &'static str,
        keywords: Vec<String>,
        positional: usize,
    },

    /// The right side of ANY was not a literal list.
    #[error("{node}: right {right} must be list")]
    NotAList { node: &'static str, right: String },

    /// A VALUES row did not match the column list.
    #[error("VALUES: wrong values {values} for columns {columns:?}")]
    Columns { values: String, columns: Vec<String> },

    /// A keyword VALUES row lacked one of the columns.
    #[error("VALUES: missing column {column} in {row:?}")]
    MissingColumn { column: String, row: Vec<String> },

    /// Positional and keyword forms mixed in one VALUES row.
    #[error("VALUES: add list or dict but not both")]
    MixedRow,

    /// LIMIT already holds as many values as it accepts.
    #[error("LIMIT: cannot add when LIMIT set")]
    LimitSet,

    /// An offset arrived before any row count.
    #[error("LIMIT: offset needs a total")]
    LimitOffset,

    /// LIMIT total or offset was not an integer.
    #[error("LIMIT: LIMIT {part} must be int")]
    LimitType { part: &'static str },

    /// UPDATE and DELETE only take a row count.
    #[error("{node}: LIMIT can only be total")]
    LimitTotal { node: &'static str },

    /// Unknown keyword argument or clause name.
    #[error("'{keyword}' is an invalid keyword argument for {node}")]
    Keyword { keyword: String, node: &'static str },

    /// INSERT was given both row values and a sub-select.
    #[error("INSERT: set VALUES or SELECT but not both")]
    ValuesAndSelect,

    /// Sort direction outside ASC/DESC.
    #[error("ORDER: order {0} must be in [-1, 1] or ASC/DESC")]
    Order(String),

    /// A field name was required but something else was given.
    #[error("{node}: field name must be text, got {value}")]
    Field { node: &'static str, value: String },

    /// Path text that the dialect codec could not read.
    #[error("Path error at position {position}: {message}")]
    Path { position: usize, message: String },

    /// A delegated verb was called on a statement with no model.
    #[error("{verb}: no model bound")]
    NoModel { verb: &'static str },

    /// The bound model does not implement a delegated verb.
    #[error("{verb}: not supported by model")]
    Unsupported { verb: &'static str },

    /// Dialect configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Dialect configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SqlError {
    /// Create an unknown keyword error.
    pub fn keyword(keyword: impl Into<String>, node: &'static str) -> Self {
        Self::Keyword {
            keyword: keyword.into(),
            node,
        }
    }

    /// Create a path decoding error at the given position.
    pub fn path(position: usize, message: impl Into<String>) -> Self {
        Self::Path {
            position,
            message: message.into(),
        }
    }

    /// Create a non-text field name error.
    pub fn field(node: &'static str, value: &serde_json::Value) -> Self {
        Self::Field {
            node,
            value: value.to_string(),
        }
    }
}

/// Result type alias for relsql operations.
pub type SqlResult<T> = Result<T, SqlError>;
