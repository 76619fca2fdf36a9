//! Transaction field extraction.
//!
//! Text flows one way: raw text, normalized views, candidates, resolved
//! fields, assembled record. Nothing is kept between calls, so one
//! [`RecordAssembler`] can be shared across threads.

mod assembler;
pub mod rules;
pub mod segmenter;

pub use assembler::{ExtractionResult, RecordAssembler};
pub use rules::{Candidate, FieldExtractor};
pub use segmenter::{extract_period, MultiTransactionSegmenter, SegmentReport};

use crate::models::record::{Extraction, Polarity};

/// Extract with the default configuration.
pub fn extract(text: &str, polarity: Polarity) -> Extraction {
    RecordAssembler::default().assemble(text, polarity).extraction
}
