//! Bank detection from alias keywords.

use regex::Captures;

use super::patterns::BANK_RULES;
use super::registry::{self, DecodeHint, FieldKind, FieldRule};
use super::{Candidate, FieldExtractor};
use crate::error::CandidateError;
use crate::text::TextViews;

/// Bank field extractor. Banks are tried in a fixed priority order, so the
/// first bank of that order mentioned anywhere in the text wins.
pub struct BankExtractor;

impl BankExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BankExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for BankExtractor {
    type Output = String;

    fn kind(&self) -> FieldKind {
        FieldKind::Bank
    }

    fn extract(&self, views: &TextViews) -> Option<Candidate<String>> {
        registry::resolve(&BANK_RULES, views.get(self.kind().view()), canonical_name)
    }

    fn extract_all(&self, views: &TextViews) -> Vec<Candidate<String>> {
        registry::collect_all(&BANK_RULES, views.get(self.kind().view()), canonical_name)
    }
}

fn canonical_name(rule: &FieldRule, _caps: &Captures<'_>) -> Result<String, CandidateError> {
    match rule.decode {
        DecodeHint::CanonicalBank(name) => Ok(name.to_string()),
        _ => Ok(rule.name.to_string()),
    }
}

/// Detect the canonical bank name mentioned in text.
pub fn extract_bank(text: &str) -> Option<String> {
    BankExtractor::new()
        .extract(&TextViews::new(text))
        .map(Candidate::into_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_map_to_canonical_name() {
        assert_eq!(extract_bank("Тинькофф"), Some("Т-Банк".to_string()));
        assert_eq!(extract_bank("Перевод в СБЕР"), Some("Сбербанк".to_string()));
        assert_eq!(extract_bank("Альфа-Банк"), Some("Альфа-Банк".to_string()));
        assert_eq!(extract_bank("ozon  bank"), Some("Ozon Банк".to_string()));
    }

    #[test]
    fn test_priority_order_beats_position() {
        let text = "Альфа-Банк\nПеревод через Сбербанк Онлайн";
        assert_eq!(extract_bank(text), Some("Сбербанк".to_string()));
    }

    #[test]
    fn test_alias_must_be_a_whole_word() {
        assert_eq!(extract_bank("Сберегательный счёт"), None);
    }

    #[test]
    fn test_extract_all_lists_every_mention() {
        let all = BankExtractor::new().extract_all(&TextViews::new("ВТБ и Тинькофф"));
        let names: Vec<&str> = all.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(names, vec!["Т-Банк", "ВТБ"]);
    }

    #[test]
    fn test_no_bank() {
        assert_eq!(extract_bank("Перевод выполнен"), None);
    }
}
