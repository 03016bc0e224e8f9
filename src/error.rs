//! Error types for the point-of-sale core.

use thiserror::Error;

/// Result type alias for shop operations
pub type Result<T> = std::result::Result<T, ShopError>;

/// Errors that can occur while pricing orders or managing the ledger.
#[derive(Error, Debug)]
pub enum ShopError {
    /// Base or add-on identifier not present in the catalog
    #[error("Unknown {kind}: {id}")]
    UnknownItem { kind: &'static str, id: String },

    /// Customer category outside student/staff/community
    #[error("Invalid customer category: {0}")]
    InvalidCategory(String),

    /// Ledger file content could not be parsed
    #[error("Corrupt ledger storage: {0}")]
    CorruptStorage(String),

    /// Order submitted for a name the ledger does not know
    #[error("Unknown customer: {0}")]
    UnknownCustomer(String),

    /// Invalid order record in batch input
    #[error("Invalid order at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Failed to open, read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Missing orders file argument
    #[error("Missing orders file argument. Usage: bubble-tea <orders.csv> [ledger.json]")]
    MissingArgument,
}
