//! Rule-based field extractors for receipts and banking screenshots.

pub mod amounts;
pub mod author;
pub mod bank;
pub mod comment;
pub mod dates;
pub mod patterns;
pub mod procedure;
pub mod registry;

pub use amounts::{extract_amount, parse_amount, AmountExtractor};
pub use author::{clean_name, extract_author, AuthorExtractor};
pub use bank::{extract_bank, BankExtractor};
pub use comment::{extract_comment, CommentExtractor};
pub use dates::{extract_date, DateExtractor};
pub use procedure::{extract_procedure, ProcedureExtractor};
pub use registry::{DecodeHint, FieldKind, FieldRule, MatchFlags, Resolution, RuleSpec};

use crate::text::TextViews;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Field kind this extractor resolves.
    fn kind(&self) -> FieldKind;

    /// Resolve the winning candidate under the field's resolution policy.
    fn extract(&self, views: &TextViews) -> Option<Candidate<Self::Output>>;

    /// Every decodable candidate, in rule then text order.
    fn extract_all(&self, views: &TextViews) -> Vec<Candidate<Self::Output>>;
}

/// A matched and decoded value proposed for a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<T> {
    pub kind: FieldKind,
    /// Decoded value.
    pub value: T,
    /// Captured source substring.
    pub raw: String,
    /// Tier of the rule that produced it.
    pub tier: u8,
    /// Character offset of the match start in the evaluated view.
    pub offset: usize,
    /// Name of the rule that produced it.
    pub rule: &'static str,
}

impl<T> Candidate<T> {
    pub fn into_value(self) -> T {
        self.value
    }
}
