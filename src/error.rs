//! Error types for the conversion pipeline.

use thiserror::Error;

/// Errors that abort a conversion run.
///
/// Every variant is fatal: rows already handed to the sink stay there, nothing
/// is retried. A short final batch is not an error and never shows up here.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The decoder failed to produce the next batch for a reason other than end of data.
    #[error("decoder failed: {:#}", .0)]
    Decoder(anyhow::Error),

    /// The decoder returned a batch that breaks the batch shape contract.
    #[error("malformed batch: {0}")]
    MalformedBatch(String),

    /// A column holds a representation the numeric unifier does not know.
    #[error("column {column:?}: unsupported column type {type_name}")]
    UnsupportedColumnType { column: String, type_name: String },

    /// A column could not be classified as numeric, text or temporal.
    #[error("column {column:?}: unknown column representation {type_name}")]
    UnknownColumnRepresentation { column: String, type_name: String },

    /// The sink rejected a row or the final flush.
    #[error("sink write failed: {:#}", .0)]
    SinkWrite(anyhow::Error),
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
