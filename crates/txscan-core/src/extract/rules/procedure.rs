//! Line-items ("procedure") extraction for expense receipts.
//!
//! The rules capture the block between a table header and the totals line;
//! each line is stripped of quantities and prices and the descriptive parts
//! are joined with `"; "`.

use regex::Captures;

use super::patterns::{CYRILLIC, PARENTHETICAL, PROCEDURE_RULES, TRAILING_NUMBERS, WHITESPACE_RUN};
use super::registry::{self, FieldKind, FieldRule};
use super::{Candidate, FieldExtractor};
use crate::error::CandidateError;
use crate::text::TextViews;

const ITEM_SEPARATOR: &str = "; ";

/// Procedure field extractor.
pub struct ProcedureExtractor;

impl ProcedureExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProcedureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ProcedureExtractor {
    type Output = String;

    fn kind(&self) -> FieldKind {
        FieldKind::Procedure
    }

    fn extract(&self, views: &TextViews) -> Option<Candidate<String>> {
        registry::resolve(&PROCEDURE_RULES, views.get(self.kind().view()), decode_block)
    }

    fn extract_all(&self, views: &TextViews) -> Vec<Candidate<String>> {
        registry::collect_all(&PROCEDURE_RULES, views.get(self.kind().view()), decode_block)
    }
}

fn decode_block(_rule: &FieldRule, caps: &Captures<'_>) -> Result<String, CandidateError> {
    let block = caps.get(1).map_or("", |m| m.as_str());
    let items = clean_line_items(block);

    if items.is_empty() {
        return Err(CandidateError::EmptyBlock);
    }
    Ok(items.join(ITEM_SEPARATOR))
}

/// Descriptive part of every line item in a block.
pub fn clean_line_items(block: &str) -> Vec<String> {
    block
        .lines()
        .filter_map(|line| {
            let line = PARENTHETICAL.replace_all(line, " ");
            let line = TRAILING_NUMBERS.replace(&line, "");
            let line = WHITESPACE_RUN.replace_all(&line, " ");
            let line = line.trim();

            CYRILLIC.is_match(line).then(|| line.to_string())
        })
        .collect()
}

/// Extract the line-items description from a receipt.
pub fn extract_procedure(text: &str) -> Option<String> {
    ProcedureExtractor::new()
        .extract(&TextViews::new(text))
        .map(Candidate::into_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_with_price_column() {
        let text = "Наименование Кол-во Ст-ть\n\
                    Прием врача 1 1500,00 1500,00 Р\n\
                    Анализ крови (общий) 1 500,00\n\
                    Итого 2000,00";
        assert_eq!(
            extract_procedure(text),
            Some("Прием врача; Анализ крови".to_string())
        );
    }

    #[test]
    fn test_services_section() {
        let text = "Услуги:\nМассаж спины\nСумма 3000";
        let found = ProcedureExtractor::new().extract(&TextViews::new(text)).unwrap();
        assert_eq!(found.value, "Массаж спины");
        assert_eq!(found.tier, 1);
    }

    #[test]
    fn test_block_end_is_required() {
        assert_eq!(extract_procedure("Наименование\nПрием врача"), None);
    }

    #[test]
    fn test_empty_block() {
        assert_eq!(extract_procedure("Наименование Сумма\nИтого 100"), None);
    }

    #[test]
    fn test_clean_line_items_drops_numeric_lines() {
        let items = clean_line_items("\n1 500,00\nКорм для кошек 2 шт\n***\n");
        assert_eq!(items, vec!["Корм для кошек".to_string()]);
    }
}
