//! Text normalization.
//!
//! Extractors see the input through one of two views: the raw text, where
//! line layout carries meaning, and a search view with whitespace runs
//! collapsed for keyword-anchored single-line lookups. Case is never
//! changed in either view.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HORIZONTAL_WS: Regex = Regex::new(r"[\t\p{Zs}]+").unwrap();
    static ref BLANK_LINES: Regex = Regex::new(r"\n(?: ?\r?\n)+").unwrap();
}

/// Which view of the input a rule is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextView {
    Raw,
    Search,
}

/// The two normalized views of one input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextViews {
    raw: String,
    search: String,
}

impl TextViews {
    pub fn new(text: &str) -> Self {
        Self {
            raw: text.to_string(),
            search: normalize_for_search(text),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn get(&self, view: TextView) -> &str {
        match view {
            TextView::Raw => &self.raw,
            TextView::Search => &self.search,
        }
    }
}

/// Collapse horizontal whitespace runs to one space and blank-line runs to
/// one newline, then trim.
pub fn normalize_for_search(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    let collapsed = HORIZONTAL_WS.replace_all(&text, " ");
    let collapsed = BLANK_LINES.replace_all(&collapsed, "\n");
    collapsed.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_horizontal_whitespace() {
        assert_eq!(normalize_for_search("Сумма:\t 1\u{a0}500  ₽"), "Сумма: 1 500 ₽");
    }

    #[test]
    fn test_collapses_blank_lines() {
        let text = "  Отправитель\n\n\n  \nИванов И.\n\n";
        assert_eq!(normalize_for_search(text), "Отправитель\nИванов И.");
    }

    #[test]
    fn test_raw_view_keeps_layout() {
        let text = "Наименование\n\n  Прием   врача";
        let views = TextViews::new(text);
        assert_eq!(views.raw(), text);
        assert_eq!(views.get(TextView::Search), "Наименование\n Прием врача");
    }

    #[test]
    fn test_case_is_preserved() {
        assert_eq!(normalize_for_search("СБЕР  банк"), "СБЕР банк");
    }
}
