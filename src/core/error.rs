//! Error types for the importer
//!
//! Defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for import runs
///
/// Every variant is fatal: it aborts the current import. Recoverable
/// per-record problems are logged and never surface as an `ImportError`.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Input file could not be opened or its decoder could not be set up
    #[error("Could not open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// VCF parsing errors
    #[error("VCF parse error: {0}")]
    Vcf(#[from] VcfParseError),

    /// Chain file parsing errors
    #[error("Chain parse error: {0}")]
    ChainParse(#[from] ChainParseError),

    /// INFO field with an unusable value
    #[error("Invalid record at {chrom}:{pos}: {source}")]
    Field {
        chrom: String,
        pos: u64,
        #[source]
        source: FieldError,
    },

    /// Position too large for the store
    #[error("Position out of range at {chrom}:{pos}")]
    PositionOutOfRange { chrom: String, pos: u64 },

    /// Variant identifier without a numeric rs suffix
    #[error("Could not parse variant id '{0}'")]
    InvalidVariantId(String),

    /// Storage errors
    #[error("Could not store records: {0}")]
    Store(#[from] StoreError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the typed INFO accessors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Key absent, or present with the VCF missing value `.`
    #[error("INFO field '{key}' is missing")]
    Missing { key: String },

    /// Key present but its value does not decode as the requested type
    #[error("INFO field '{key}' is not a valid {expected}: '{value}'")]
    WrongType {
        key: String,
        expected: &'static str,
        value: String,
    },
}

impl FieldError {
    /// Whether the field was absent rather than malformed
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldError::Missing { .. })
    }
}

/// Errors that can occur while reading VCF data lines
#[derive(Debug, Error)]
pub enum VcfParseError {
    /// Too few tab-separated columns
    #[error("Too few fields at line {line}: expected at least {expected}, found {found}")]
    TooFewFields {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Non-numeric POS column
    #[error("Invalid position '{value}' at line {line}")]
    InvalidPosition { line: usize, value: String },

    /// I/O error from the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during chain file parsing
#[derive(Debug, Error)]
pub enum ChainParseError {
    /// Invalid chain header format
    #[error("Invalid chain header at line {line}: {message}")]
    InvalidHeader { line: usize, message: String },

    /// Invalid data line format
    #[error("Invalid data line at line {line}: {message}")]
    InvalidDataLine { line: usize, message: String },

    /// Strand must be '+' or '-'
    #[error("Strand must be '+' or '-', got '{strand}' at line {line}")]
    InvalidStrand { line: usize, strand: String },

    /// Failed to parse integer
    #[error("Failed to parse {field} '{value}' at line {line}")]
    ParseInt {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// Data line before any chain header
    #[error("Data line outside of a chain at line {0}")]
    OrphanDataLine(usize),

    /// I/O error during parsing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reported by a storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// The run was cancelled before or during a store call
    #[error("Import cancelled")]
    Cancelled,

    /// SQLite failure
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Any other backend failure
    #[error("{0}")]
    Backend(String),
}

/// Result type alias for import operations
pub type Result<T> = std::result::Result<T, ImportError>;

/// Result type alias for chain parsing operations
pub type ChainResult<T> = std::result::Result<T, ChainParseError>;

/// Result type alias for storage operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
