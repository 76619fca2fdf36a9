//! Amount extraction for Russian receipts and transfer screenshots.

use rust_decimal::Decimal;
use std::str::FromStr;

use regex::Captures;

use super::patterns::AMOUNT_RULES;
use super::registry::{self, FieldKind, FieldRule};
use super::{Candidate, FieldExtractor};
use crate::error::CandidateError;
use crate::text::TextViews;

/// Amount field extractor.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = Decimal;

    fn kind(&self) -> FieldKind {
        FieldKind::Amount
    }

    fn extract(&self, views: &TextViews) -> Option<Candidate<Decimal>> {
        let text = views.get(self.kind().view());
        registry::resolve(&AMOUNT_RULES, text, |rule, caps| decode_amount(rule, caps, text))
    }

    fn extract_all(&self, views: &TextViews) -> Vec<Candidate<Decimal>> {
        let text = views.get(self.kind().view());
        registry::collect_all(&AMOUNT_RULES, text, |rule, caps| decode_amount(rule, caps, text))
    }
}

/// Extract the transaction amount from text.
pub fn extract_amount(text: &str) -> Option<Decimal> {
    AmountExtractor::new()
        .extract(&TextViews::new(text))
        .map(Candidate::into_value)
}

fn decode_amount(rule: &FieldRule, caps: &Captures<'_>, text: &str) -> Result<Decimal, CandidateError> {
    let number = caps.get(1).unwrap_or_else(|| caps.get_match());
    let raw = number.as_str();

    if rule.decode.guards_date_fragments() && is_date_fragment(text, number.start(), number.end()) {
        return Err(CandidateError::DateFragment { raw: raw.to_string() });
    }

    let amount = parse_decimal(raw).ok_or_else(|| CandidateError::InvalidAmount {
        raw: raw.to_string(),
    })?;

    if amount <= Decimal::ZERO {
        return Err(CandidateError::NonPositiveAmount { raw: raw.to_string() });
    }

    Ok(amount)
}

/// Parse a Russian-formatted amount (e.g., "1 500,00" or "350.5").
///
/// Returns `None` unless the result is strictly positive.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    parse_decimal(s).filter(|amount| *amount > Decimal::ZERO)
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    // Keep digits and separators only; the comma is always decimal
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    Decimal::from_str(&cleaned).ok()
}

/// Whether the number at `start..end` continues a date such as `08.10.2025`.
fn is_date_fragment(text: &str, start: usize, end: usize) -> bool {
    continues_number(text[end..].chars()) || continues_number(text[..start].chars().rev())
}

/// Separator followed by a digit.
fn continues_number(mut chars: impl Iterator<Item = char>) -> bool {
    matches!(chars.next(), Some('.' | '/' | '-')) && chars.next().is_some_and(|c| c.is_ascii_digit())
}
