//! Error types for sqlcrud-codegen

use thiserror::Error;

/// Result type alias for sqlcrud-codegen operations
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur during code generation
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Failed to parse SQL schema: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The type catalog has no entry for this SQL Server type name.
    /// Aborts the whole run; no output is produced for the offending table.
    #[error("Unsupported SQL Server data type: {0}")]
    UnsupportedType(String),

    #[error("Invalid {facet} '{value}' for column {column}")]
    InvalidFacet {
        column: String,
        facet: &'static str,
        value: String,
    },
}

impl From<sqlparser::parser::ParserError> for CodegenError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        CodegenError::ParseError(err.to_string())
    }
}

impl From<config::ConfigError> for CodegenError {
    fn from(err: config::ConfigError) -> Self {
        CodegenError::ConfigError(err.to_string())
    }
}

impl From<toml::de::Error> for CodegenError {
    fn from(err: toml::de::Error) -> Self {
        CodegenError::ParseError(err.to_string())
    }
}
