//! Date extraction.
//!
//! Every date rule runs and every valid candidate is kept; the most
//! contextually anchored one wins, with the leftmost breaking ties.

use chrono::NaiveDate;
use regex::Captures;

use super::patterns::{DATE_RULES, MONTHS};
use super::registry::{self, DecodeHint, FieldKind, FieldRule};
use super::{Candidate, FieldExtractor};
use crate::error::CandidateError;
use crate::text::TextViews;

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2100;

/// Date field extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = NaiveDate;

    fn kind(&self) -> FieldKind {
        FieldKind::Date
    }

    fn extract(&self, views: &TextViews) -> Option<Candidate<NaiveDate>> {
        registry::resolve(&DATE_RULES, views.get(self.kind().view()), decode_date)
    }

    fn extract_all(&self, views: &TextViews) -> Vec<Candidate<NaiveDate>> {
        registry::collect_all(&DATE_RULES, views.get(self.kind().view()), decode_date)
    }
}

/// Extract the best date from text.
pub fn extract_date(text: &str) -> Option<NaiveDate> {
    DateExtractor::new()
        .extract(&TextViews::new(text))
        .map(Candidate::into_value)
}

fn decode_date(rule: &FieldRule, caps: &Captures<'_>) -> Result<NaiveDate, CandidateError> {
    let raw = caps.get_match().as_str();
    let day: u32 = caps[1].parse().unwrap_or(0);

    let month = match rule.decode {
        DecodeHint::TextualDate => month_number(&caps[2]).ok_or_else(|| {
            CandidateError::UnknownMonth {
                name: caps[2].to_string(),
            }
        })?,
        _ => caps[2].parse().unwrap_or(0),
    };

    let year = parse_year(&caps[3]);
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(CandidateError::YearOutOfRange { year });
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| CandidateError::InvalidDate {
        raw: raw.to_string(),
    })
}

/// Expand a two-digit year: 00-68 map to 2000s, 69-99 to 1900s.
fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if s.len() == 2 {
        if year <= 68 { 2000 + year } else { 1900 + year }
    } else {
        year
    }
}

/// Month number for a Russian genitive month name.
pub fn month_number(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    MONTHS
        .iter()
        .find(|(month, _)| *month == name)
        .map(|&(_, number)| number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_extract_date_dmy() {
        assert_eq!(extract_date("15.01.2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(extract_date("15/01/2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(extract_date("15-01-2024"), Some(ymd(2024, 1, 15)));
    }

    #[test]
    fn test_extract_date_russian_long() {
        assert_eq!(extract_date("Перевод выполнен 8 октября 2025 в 14:32"), Some(ymd(2025, 10, 8)));
        assert_eq!(extract_date("8 ОКТЯБРЯ 2025"), Some(ymd(2025, 10, 8)));
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(extract_date("15.01.24"), Some(ymd(2024, 1, 15)));
        assert_eq!(extract_date("15.01.99"), Some(ymd(1999, 1, 15)));
    }

    #[test]
    fn test_anchored_date_beats_earlier_bare_date() {
        let text = "Чек от 01.09.2025\nДата операции: 08.10.2025";
        assert_eq!(extract_date(text), Some(ymd(2025, 10, 8)));
    }

    #[test]
    fn test_anchored_textual_date() {
        let text = "01.01.2025\nЗачисление от 3 марта 2025";
        let found = DateExtractor::new().extract(&TextViews::new(text)).unwrap();
        assert_eq!(found.value, ymd(2025, 3, 3));
        assert_eq!(found.tier, 0);
    }

    #[test]
    fn test_invalid_anchored_date_is_discarded() {
        let text = "Дата операции: 31.02.2025\nПлатёж выполнен 05.03.2025";
        assert_eq!(extract_date(text), Some(ymd(2025, 3, 5)));
    }

    #[test]
    fn test_equal_tier_leftmost_wins() {
        assert_eq!(extract_date("05.03.2025 и 01.01.2025"), Some(ymd(2025, 3, 5)));
    }

    #[test]
    fn test_extract_all_keeps_every_valid_candidate() {
        let text = "Дата операции: 08.10.2025\n31.04.2025\n8 октября 2025";
        let all = DateExtractor::new().extract_all(&TextViews::new(text));

        // anchored numeric, bare numeric (same date), bare textual; 31.04 is invalid
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|c| c.value == ymd(2025, 10, 8)));
    }

    #[test]
    fn test_year_out_of_range() {
        assert_eq!(extract_date("01.01.1850"), None);
    }

    #[test]
    fn test_no_date() {
        assert_eq!(extract_date("Сумма 1 500 ₽"), None);
    }

    #[test]
    fn test_month_number() {
        assert_eq!(month_number("Января"), Some(1));
        assert_eq!(month_number("декабря"), Some(12));
        assert_eq!(month_number("январь"), None);
    }
}
