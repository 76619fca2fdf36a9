//! Author extraction: the sender of an income or the payee of an expense.

use regex::Captures;

use super::patterns::{
    EXPENSE_AUTHOR_RULES, INCOME_AUTHOR_RULES, LEGAL_FORM_PREFIX, STOP_WORDS, WHITESPACE_RUN,
};
use super::registry::{self, FieldKind, FieldRule};
use super::{Candidate, FieldExtractor};
use crate::error::CandidateError;
use crate::models::record::TransactionKind;
use crate::text::TextViews;

const MIN_NAME_CHARS: usize = 3;
const MAX_NAME_CHARS: usize = 50;

/// Author field extractor for one transaction direction.
pub struct AuthorExtractor {
    direction: TransactionKind,
    stop_words: Vec<String>,
}

impl AuthorExtractor {
    pub fn new(direction: TransactionKind) -> Self {
        Self {
            direction,
            stop_words: STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Extend the built-in stop list.
    pub fn with_stop_words<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stop_words
            .extend(
                extra
                    .into_iter()
                    .map(|w| w.as_ref().trim().to_lowercase())
                    .filter(|w| !w.is_empty()),
            );
        self
    }

    fn rules(&self) -> &'static [FieldRule] {
        match self.direction {
            TransactionKind::Income => INCOME_AUTHOR_RULES.as_slice(),
            TransactionKind::Expense => EXPENSE_AUTHOR_RULES.as_slice(),
        }
    }

    /// Clean a raw capture and apply the validity filter.
    pub fn clean(&self, raw: &str) -> Result<String, CandidateError> {
        let reject = |reason| CandidateError::RejectedName {
            raw: raw.to_string(),
            reason,
        };

        let unprefixed = LEGAL_FORM_PREFIX.replace(trim_name(raw), "");
        let name = WHITESPACE_RUN.replace_all(trim_name(&unprefixed), " ").into_owned();

        let chars = name.chars().count();
        if !(MIN_NAME_CHARS..MAX_NAME_CHARS).contains(&chars) {
            return Err(reject("length"));
        }
        if !name.chars().any(char::is_alphabetic) {
            return Err(reject("no letters"));
        }

        let lower = name.to_lowercase();
        if self.stop_words.iter().any(|w| lower.contains(w.as_str())) {
            return Err(reject("stop word"));
        }

        Ok(name)
    }

    fn decode(&self, _rule: &FieldRule, caps: &Captures<'_>) -> Result<String, CandidateError> {
        let raw = caps.get(1).unwrap_or_else(|| caps.get_match()).as_str();
        self.clean(raw)
    }
}

impl FieldExtractor for AuthorExtractor {
    type Output = String;

    fn kind(&self) -> FieldKind {
        FieldKind::Author
    }

    fn extract(&self, views: &TextViews) -> Option<Candidate<String>> {
        let text = views.get(FieldKind::Author.view());
        registry::resolve(self.rules(), text, |rule, caps| self.decode(rule, caps))
    }

    fn extract_all(&self, views: &TextViews) -> Vec<Candidate<String>> {
        let text = views.get(FieldKind::Author.view());
        registry::collect_all(self.rules(), text, |rule, caps| self.decode(rule, caps))
    }
}

/// Strip whitespace, quotes and punctuation around a name. A trailing period
/// is kept so initials survive.
fn trim_name(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '«' | '»' | ',' | ';' | ':'))
        .trim_start_matches(|c: char| c == '.' || c.is_whitespace())
}

/// Clean a name with the built-in stop list.
pub fn clean_name(raw: &str) -> Option<String> {
    AuthorExtractor::new(TransactionKind::Income).clean(raw).ok()
}

/// Extract the author for the given transaction direction.
pub fn extract_author(text: &str, kind: TransactionKind) -> Option<String> {
    AuthorExtractor::new(kind)
        .extract(&TextViews::new(text))
        .map(Candidate::into_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("  «Ромашка», "), Some("Ромашка".to_string()));
        assert_eq!(clean_name("ООО  «Ромашка»"), Some("Ромашка".to_string()));
        assert_eq!(clean_name("Иванов   И."), Some("Иванов И.".to_string()));
        assert_eq!(clean_name("ИП Петров"), Some("Петров".to_string()));
    }

    #[test]
    fn test_clean_name_rejects() {
        assert_eq!(clean_name("Ан"), None);
        assert_eq!(clean_name("123-45"), None);
        assert_eq!(clean_name("Кассир Смирнова"), None);
        assert_eq!(clean_name(&"А".repeat(50)), None);
    }

    #[test]
    fn test_income_sender_label() {
        let text = "Перевод\nОтправитель: Иванов И.\nСумма 500 ₽";
        assert_eq!(
            extract_author(text, TransactionKind::Income),
            Some("Иванов И.".to_string())
        );
    }

    #[test]
    fn test_income_sender_on_next_line() {
        let text = "Отправитель\nАнна Петрова С.";
        assert_eq!(
            extract_author(text, TransactionKind::Income),
            Some("Анна Петрова С.".to_string())
        );
    }

    #[test]
    fn test_stop_word_candidate_falls_through() {
        let text = "Отправитель: Карта МИР\nПетров П.";
        let found = AuthorExtractor::new(TransactionKind::Income)
            .extract(&TextViews::new(text))
            .unwrap();
        assert_eq!(found.value, "Петров П.");
        assert_eq!(found.tier, 3);
    }

    #[test]
    fn test_extra_stop_words() {
        let text = "Отправитель: Фонд Помощи";
        let views = TextViews::new(text);

        assert!(AuthorExtractor::new(TransactionKind::Income).extract(&views).is_some());
        assert!(AuthorExtractor::new(TransactionKind::Income)
            .with_stop_words(["ФОНД"])
            .extract(&views)
            .is_none());
    }

    #[test]
    fn test_blank_extra_stop_words_are_ignored() {
        let text = "Отправитель: Иванов И.";
        let found = AuthorExtractor::new(TransactionKind::Income)
            .with_stop_words(["", "  ", "\t"])
            .extract(&TextViews::new(text))
            .map(Candidate::into_value);
        assert_eq!(found.as_deref(), Some("Иванов И."));
    }

    #[test]
    fn test_expense_quoted_name() {
        let text = "ООО «Ромашка»\nАдрес: ул. Ленина 1";
        assert_eq!(
            extract_author(text, TransactionKind::Expense),
            Some("Ромашка".to_string())
        );
    }

    #[test]
    fn test_expense_line_above_address() {
        let text = "Клиника Здоровье\nАдрес: пр. Мира 1\nИтого 1500 Р";
        assert_eq!(
            extract_author(text, TransactionKind::Expense),
            Some("Клиника Здоровье".to_string())
        );
    }

    #[test]
    fn test_no_author() {
        assert_eq!(extract_author("Итого 1500", TransactionKind::Income), None);
    }
}
