//! Error types for the txscan-core library.
//!
//! Extraction itself never fails: [`CandidateError`] and [`BlockError`]
//! describe why a single candidate or feed block was discarded and are
//! consumed inside the engine. Only configuration handling surfaces a
//! [`TxscanError`] to callers.

use thiserror::Error;

/// Main error type for the txscan library.
#[derive(Error, Debug)]
pub enum TxscanError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a matched candidate is discarded before conflict resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CandidateError {
    /// Date-shaped text that is not a real calendar date.
    #[error("invalid calendar date: {raw}")]
    InvalidDate { raw: String },

    /// Month name missing from the month table.
    #[error("unknown month name: {name}")]
    UnknownMonth { name: String },

    /// Year outside the accepted range.
    #[error("year {year} out of range")]
    YearOutOfRange { year: i32 },

    /// Amount text that does not parse as a decimal.
    #[error("failed to parse amount: {raw}")]
    InvalidAmount { raw: String },

    /// Amount that parses but is zero or negative.
    #[error("amount is not positive: {raw}")]
    NonPositiveAmount { raw: String },

    /// Bare number that is part of a date-shaped token.
    #[error("number is a date fragment: {raw}")]
    DateFragment { raw: String },

    /// Name rejected by the author validity filter.
    #[error("rejected name {raw:?}: {reason}")]
    RejectedName { raw: String, reason: &'static str },

    /// Free text too short to carry information.
    #[error("text too short: {raw:?}")]
    TooShort { raw: String },

    /// Free-text capture empty after cleaning.
    #[error("empty text block")]
    EmptyBlock,
}

/// Reasons a multi-transaction feed block is dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// Amount line reached before a type marker.
    #[error("block for {sender} has no type marker")]
    MissingType { sender: String },

    /// A new header (or end of text) reached before an amount line.
    #[error("block for {sender} has no amount")]
    MissingAmount { sender: String },

    /// Amount line carries a minus sign.
    #[error("block for {sender} has a negative amount")]
    NegativeAmount { sender: String },

    /// Amount line does not parse as a positive decimal.
    #[error("block for {sender} has an invalid amount: {raw}")]
    InvalidAmount { sender: String, raw: String },

    /// Block grew past the line limit without an amount.
    #[error("block for {sender} exceeded {limit} lines")]
    TooManyLines { sender: String, limit: usize },
}

/// Result type for the txscan library.
pub type Result<T> = std::result::Result<T, TxscanError>;
