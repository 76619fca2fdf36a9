//! Free-text comment extraction.

use regex::Captures;

use super::patterns::COMMENT_RULES;
use super::registry::{self, FieldKind, FieldRule};
use super::{Candidate, FieldExtractor};
use crate::error::CandidateError;
use crate::text::TextViews;

/// Comments this short are treated as noise.
const MIN_COMMENT_CHARS: usize = 3;

const ELLIPSIS: &str = "...";

/// Comment field extractor.
pub struct CommentExtractor {
    max_chars: usize,
}

impl CommentExtractor {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    /// Normalize a captured comment, truncating it to `max_chars`.
    pub fn clean(&self, raw: &str) -> Result<String, CandidateError> {
        let text = raw.trim().replace(['\r', '\n'], " ");

        if text.chars().count() < MIN_COMMENT_CHARS {
            return Err(CandidateError::TooShort { raw: raw.to_string() });
        }

        if text.chars().count() > self.max_chars {
            let truncated: String = text.chars().take(self.max_chars).collect();
            return Ok(format!("{}{}", truncated, ELLIPSIS));
        }

        Ok(text)
    }

    fn decode(&self, _rule: &FieldRule, caps: &Captures<'_>) -> Result<String, CandidateError> {
        self.clean(caps.get(1).unwrap_or_else(|| caps.get_match()).as_str())
    }
}

impl Default for CommentExtractor {
    fn default() -> Self {
        Self::new(200)
    }
}

impl FieldExtractor for CommentExtractor {
    type Output = String;

    fn kind(&self) -> FieldKind {
        FieldKind::Comment
    }

    fn extract(&self, views: &TextViews) -> Option<Candidate<String>> {
        let text = views.get(self.kind().view());
        registry::resolve(&COMMENT_RULES, text, |rule, caps| self.decode(rule, caps))
    }

    fn extract_all(&self, views: &TextViews) -> Vec<Candidate<String>> {
        let text = views.get(self.kind().view());
        registry::collect_all(&COMMENT_RULES, text, |rule, caps| self.decode(rule, caps))
    }
}

/// Extract a comment with the default length limit.
pub fn extract_comment(text: &str) -> Option<String> {
    CommentExtractor::default()
        .extract(&TextViews::new(text))
        .map(Candidate::into_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_comment_same_line() {
        let text = "Сумма 500 ₽\nКомментарий: На лечение Барсика";
        assert_eq!(extract_comment(text), Some("На лечение Барсика".to_string()));
    }

    #[test]
    fn test_comment_next_line() {
        let text = "Сообщение\nДля приюта";
        assert_eq!(extract_comment(text), Some("Для приюта".to_string()));
    }

    #[test]
    fn test_short_comment_is_noise() {
        assert_eq!(extract_comment("Комментарий: ок"), None);
    }

    #[test]
    fn test_truncation() {
        let extractor = CommentExtractor::new(5);
        assert_eq!(extractor.clean("Спасибо вам"), Ok("Спаси...".to_string()));
        assert_eq!(extractor.clean("Ура!!"), Ok("Ура!!".to_string()));
    }

    #[test]
    fn test_default_limit() {
        let long = "х".repeat(250);
        let text = format!("Назначение платежа: {long}");
        let comment = extract_comment(&text).unwrap();

        assert_eq!(comment.chars().count(), 203);
        assert!(comment.ends_with("..."));
    }

    #[test]
    fn test_no_comment() {
        assert_eq!(extract_comment("Итого 1500"), None);
    }
}
