//! Error types for relation-graph.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which of the two input tables an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// The node table (`id`, `label`, optional `module`, `weight`).
    Nodes,
    /// The edge table (`source`, `target`, optional `weight`).
    Edges,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Nodes => f.write_str("node"),
            TableKind::Edges => f.write_str("edge"),
        }
    }
}

/// Top-level error type for graph loading, building and rendering.
#[derive(Debug, Error)]
pub enum GraphError {
    /// One of the input files does not exist.
    #[error("{table} file {} does not exist", path.display())]
    MissingFile {
        /// Table the file was expected to hold.
        table: TableKind,
        /// Location that was checked.
        path: PathBuf,
    },

    /// The table could not be parsed.
    #[error("malformed {table} table {}: {source}", path.display())]
    MalformedTable {
        table: TableKind,
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: csv::Error,
    },

    /// A required column is absent from the header row.
    #[error("malformed {table} table {}: missing required column `{column}`", path.display())]
    MissingColumn {
        table: TableKind,
        path: PathBuf,
        /// Name of the absent column.
        column: &'static str,
    },

    /// A configuration value is outside its accepted range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration file could not be decoded.
    #[error("config format error: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    /// The rendering surface failed.
    #[error("render error: {0}")]
    Render(String),

    /// I/O error wrapper.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GraphError {
    /// True for failures of the table loader (missing or malformed input).
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            GraphError::MissingFile { .. }
                | GraphError::MalformedTable { .. }
                | GraphError::MissingColumn { .. }
        )
    }
}

/// Result type for relation-graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
