//! Core library for extracting transaction fields from OCR text.
//!
//! This crate provides:
//! - Text normalization into raw and search views
//! - Declarative, tiered rule tables per field kind
//! - Date, amount, author, bank, line-item and comment extractors
//! - Multi-transaction feed segmentation
//! - Record assembly per transaction polarity

pub mod error;
pub mod extract;
pub mod models;
pub mod text;

pub use error::{BlockError, CandidateError, Result, TxscanError};
pub use extract::{extract, ExtractionResult, RecordAssembler};
pub use models::config::{ExtractionConfig, OutputConfig, TxscanConfig};
pub use models::record::{
    Completeness, DatePeriod, Extraction, MultiTransactionBlock, Polarity, SubTransaction,
    TransactionKind, TransactionRecord, TransferType, DATE_FORMAT,
};
pub use text::{TextView, TextViews};
