//! Rule tables and lookup data for Russian receipts and banking screenshots.
//!
//! Each `*_RULE_SPECS` table is declared in tier order and compiled once into
//! the matching `*_RULES` static.

use lazy_static::lazy_static;
use regex::Regex;

use super::registry::{compile_table, DecodeHint, FieldKind, FieldRule, MatchFlags, RuleSpec};
use crate::models::record::TransferType;

// Shared pattern fragments. These expand to literals so they can be used
// inside `concat!`.

/// Horizontal whitespace.
macro_rules! hws {
    () => {
        r"[^\S\n]"
    };
}

/// Start of a number: not inside a longer digit run or decimal.
macro_rules! number_start {
    () => {
        r"(?:^|[^\d.,])"
    };
}

/// Number with optional space-grouped thousands and up to two decimals.
macro_rules! amount {
    () => {
        r"(\d{1,3}(?: \d{3})+(?:[,.]\d{1,2})?|\d+(?:[,.]\d{1,2})?)"
    };
}

macro_rules! currency {
    () => {
        r"(?:₽|руб\.?|RUB|Р\b)"
    };
}

macro_rules! months {
    () => {
        r"января|февраля|марта|апреля|мая|июня|июля|августа|сентября|октября|ноября|декабря"
    };
}

macro_rules! date_anchor {
    () => {
        concat!(
            r"(?:Дата\s+и\s+время\s+операции|Дата\s+операции|Дата\s+платежа|Дата\s+перевода",
            r"|Операция\s+совершена|(?:Перевод|Зачисление|Списание|Платёж|Платеж)\s+от)"
        )
    };
}

/// Rest of a line made of name characters, ending at the line break.
macro_rules! name_line {
    () => {
        concat!(
            r#"([А-ЯЁа-яёA-Za-z][А-ЯЁа-яёA-Za-z .«»"-]*?)"#,
            hws!(),
            r"*(?:\n|$)"
        )
    };
}

/// "Surname I." or "Name Surname I. O."
macro_rules! person {
    () => {
        concat!(
            r"([А-ЯЁ][а-яё]+(?:",
            hws!(),
            r"+[А-ЯЁ][а-яё]+)?",
            hws!(),
            r"+[А-ЯЁ]\.(?:",
            hws!(),
            r"*[А-ЯЁ]\.)?)"
        )
    };
}

macro_rules! block_end {
    () => {
        concat!(r"\n", hws!(), r"*(?:Итого|Всего|Сумма|Продавец)")
    };
}

pub const DATE_RULE_SPECS: &[RuleSpec] = &[
    RuleSpec {
        kind: FieldKind::Date,
        tier: 0,
        name: "anchored numeric date",
        pattern: concat!(
            date_anchor!(),
            r"[\s:,-]*(\d{1,2})[./-](\d{1,2})[./-](\d{4}|\d{2})\b"
        ),
        decode: DecodeHint::NumericDate,
        flags: MatchFlags::CASE_INSENSITIVE,
    },
    RuleSpec {
        kind: FieldKind::Date,
        tier: 0,
        name: "anchored textual date",
        pattern: concat!(
            date_anchor!(),
            r"[\s:,-]*(\d{1,2})\s+(",
            months!(),
            r")\s+(\d{4})"
        ),
        decode: DecodeHint::TextualDate,
        flags: MatchFlags::CASE_INSENSITIVE,
    },
    RuleSpec {
        kind: FieldKind::Date,
        tier: 1,
        name: "numeric date DD.MM.YYYY",
        pattern: r"\b(\d{2})[./-](\d{2})[./-](\d{4}|\d{2})\b",
        decode: DecodeHint::NumericDate,
        flags: MatchFlags::NONE,
    },
    RuleSpec {
        kind: FieldKind::Date,
        tier: 2,
        name: "textual date (8 октября 2025)",
        pattern: concat!(r"\b(\d{1,2})\s+(", months!(), r")\s+(\d{4})"),
        decode: DecodeHint::TextualDate,
        flags: MatchFlags::CASE_INSENSITIVE,
    },
];

pub const AMOUNT_RULE_SPECS: &[RuleSpec] = &[
    RuleSpec {
        kind: FieldKind::Amount,
        tier: 0,
        name: "total keyword and number on one line",
        pattern: concat!(
            r"(?:Итого\s+сумма\s+чека|Сумма\s+в\s+валюте\s+операции",
            r"|Сумма\s+(?:операции|перевода|платежа|зачисления|списания)|Сумма|Итого|Всего)",
            hws!(),
            r"*[:.]?",
            hws!(),
            r"*",
            amount!()
        ),
        decode: DecodeHint::KeywordAmount,
        flags: MatchFlags::CASE_INSENSITIVE,
    },
    RuleSpec {
        kind: FieldKind::Amount,
        tier: 1,
        name: "total keyword on the line above",
        pattern: concat!(
            r"(?:Сумма|Итого|Всего|Операция)",
            hws!(),
            r"*:?",
            hws!(),
            r"*\n",
            hws!(),
            r"*",
            amount!()
        ),
        decode: DecodeHint::KeywordAmount,
        flags: MatchFlags::CASE_INSENSITIVE,
    },
    RuleSpec {
        kind: FieldKind::Amount,
        tier: 1,
        name: "payment synonyms",
        pattern: concat!(
            r"(?:К\s+оплате|Начислено|Списано|Зачислено|Получено|Пополнение)",
            hws!(),
            r"*[:.]?\s*",
            amount!()
        ),
        decode: DecodeHint::KeywordAmount,
        flags: MatchFlags::CASE_INSENSITIVE,
    },
    RuleSpec {
        kind: FieldKind::Amount,
        tier: 2,
        name: "price abbreviations",
        pattern: concat!(r"(?:Ст-ть|Стоимость|Стоим-ть|Цена)[:\s]*", amount!()),
        decode: DecodeHint::KeywordAmount,
        flags: MatchFlags::CASE_INSENSITIVE,
    },
    RuleSpec {
        kind: FieldKind::Amount,
        tier: 3,
        name: "english total keywords",
        pattern: concat!(r"\b(?:Amount|Total|Sum|Price)\b[:\s]*", amount!()),
        decode: DecodeHint::KeywordAmount,
        flags: MatchFlags::CASE_INSENSITIVE,
    },
    RuleSpec {
        kind: FieldKind::Amount,
        tier: 4,
        name: "number with currency",
        pattern: concat!(number_start!(), amount!(), hws!(), r"*", currency!()),
        decode: DecodeHint::CurrencyAmount,
        flags: MatchFlags::CASE_INSENSITIVE,
    },
    RuleSpec {
        kind: FieldKind::Amount,
        tier: 5,
        name: "space-grouped large number",
        pattern: r"\b(\d{1,3}(?: \d{3})+(?:[,.]\d{1,2})?)\b",
        decode: DecodeHint::BareAmount,
        flags: MatchFlags::NONE,
    },
    RuleSpec {
        kind: FieldKind::Amount,
        tier: 6,
        name: "number with kopecks",
        pattern: r"\b(\d{1,3}(?: ?\d{3})*[,.]\d{2})\b",
        decode: DecodeHint::BareAmount,
        flags: MatchFlags::NONE,
    },
];

pub const INCOME_AUTHOR_RULE_SPECS: &[RuleSpec] = &[
    RuleSpec {
        kind: FieldKind::Author,
        tier: 0,
        name: "sender label",
        pattern: concat!(
            r"(?:Отправитель|Плательщик|От\s+кого|Источник)",
            hws!(),
            r"*:?\s*",
            name_line!()
        ),
        decode: DecodeHint::PersonName,
        flags: MatchFlags::CASE_INSENSITIVE,
    },
    RuleSpec {
        kind: FieldKind::Author,
        tier: 0,
        name: "english sender label",
        pattern: concat!(r"\b(?:From|Sender)\b", hws!(), r"*:?\s*", name_line!()),
        decode: DecodeHint::PersonName,
        flags: MatchFlags::CASE_INSENSITIVE,
    },
    RuleSpec {
        kind: FieldKind::Author,
        tier: 1,
        name: "name under description label",
        pattern: concat!(
            r"(?i:Описание)",
            hws!(),
            r"*:?",
            hws!(),
            r"*\n\s*",
            person!()
        ),
        decode: DecodeHint::PersonName,
        flags: MatchFlags::NONE,
    },
    RuleSpec {
        kind: FieldKind::Author,
        tier: 2,
        name: "name after amount and currency",
        pattern: concat!(
            r"\d(?:[\d ,.]*\d)?",
            hws!(),
            r"*(?:₽|Р|руб\.?|RUB)\s+",
            person!()
        ),
        decode: DecodeHint::PersonName,
        flags: MatchFlags::NONE,
    },
    RuleSpec {
        kind: FieldKind::Author,
        tier: 3,
        name: "bare name with initial",
        pattern: concat!(r"\b", person!()),
        decode: DecodeHint::PersonName,
        flags: MatchFlags::NONE,
    },
];

pub const EXPENSE_AUTHOR_RULE_SPECS: &[RuleSpec] = &[
    RuleSpec {
        kind: FieldKind::Author,
        tier: 0,
        name: "quoted organization name",
        pattern: r#"[«"]([^»"\n]{3,})[»"]"#,
        decode: DecodeHint::OrganizationName,
        flags: MatchFlags::NONE,
    },
    RuleSpec {
        kind: FieldKind::Author,
        tier: 1,
        name: "legal form prefix",
        pattern: concat!(
            r"\b(?:ООО|ИП|АО|ПАО|ЗАО|ОАО)",
            hws!(),
            r#"+[«"]?([^»"\n]{3,40})[»"]?"#
        ),
        decode: DecodeHint::OrganizationName,
        flags: MatchFlags::CASE_INSENSITIVE,
    },
    RuleSpec {
        kind: FieldKind::Author,
        tier: 2,
        name: "payee label",
        pattern: concat!(
            r"(?:Получатель|Продавец|Поставщик|Организация)",
            hws!(),
            r"*:?\s*",
            name_line!()
        ),
        decode: DecodeHint::OrganizationName,
        flags: MatchFlags::CASE_INSENSITIVE,
    },
    RuleSpec {
        kind: FieldKind::Author,
        tier: 2,
        name: "english payee label",
        pattern: concat!(r"\b(?:Merchant|Payee)\b", hws!(), r"*:?\s*", name_line!()),
        decode: DecodeHint::OrganizationName,
        flags: MatchFlags::CASE_INSENSITIVE,
    },
    RuleSpec {
        kind: FieldKind::Author,
        tier: 3,
        name: "header line above address",
        pattern: concat!(
            r"^",
            hws!(),
            r"*([^\n]+?)",
            hws!(),
            r"*\n",
            hws!(),
            r"*(?i:Адрес)"
        ),
        decode: DecodeHint::OrganizationName,
        flags: MatchFlags::MULTI_LINE,
    },
];

pub const PROCEDURE_RULE_SPECS: &[RuleSpec] = &[
    RuleSpec {
        kind: FieldKind::Procedure,
        tier: 0,
        name: "line-items table with price column",
        pattern: concat!(
            r"Наименование[^\n]*?(?:Ст-ть|Стоимость|Сумма|Цена)[^\n]*((?:\n.*?)??)",
            block_end!()
        ),
        decode: DecodeHint::LineItems,
        flags: MatchFlags::BLOCK,
    },
    RuleSpec {
        kind: FieldKind::Procedure,
        tier: 1,
        name: "line-items section",
        pattern: concat!(
            r"(?:Наименование|Описание\s+услуг|Состав\s+чека|Услуги)[^\n]*((?:\n.*?)??)",
            block_end!()
        ),
        decode: DecodeHint::LineItems,
        flags: MatchFlags::BLOCK,
    },
];

pub const COMMENT_RULE_SPECS: &[RuleSpec] = &[RuleSpec {
    kind: FieldKind::Comment,
    tier: 0,
    name: "comment label",
    pattern: concat!(
        r"\b(?:Комментарий|Примечание|Назначение\s+платежа|Сообщение\s+получателю|Сообщение|Comment|Note)\b",
        hws!(),
        r"*:?",
        hws!(),
        r"*(?:\n",
        hws!(),
        r"*)?([^\n]+)"
    ),
    decode: DecodeHint::FreeText,
    flags: MatchFlags::CASE_INSENSITIVE,
}];

/// Canonical bank names and their aliases. Declaration order is priority.
pub const BANKS: &[(&str, &[&str])] = &[
    ("Т-Банк", &["т-банк", "тбанк", "тинькофф", "tinkoff", "t-bank", "tbank"]),
    ("Сбербанк", &["сбербанк", "сбер", "sber", "sberbank"]),
    ("Альфа-Банк", &["альфа-банк", "альфа", "alfa", "alfabank", "alfa-bank"]),
    ("ВТБ", &["втб", "vtb"]),
    ("Яндекс", &["яндекс", "yandex"]),
    ("Газпромбанк", &["газпромбанк", "gazprombank"]),
    ("Райффайзенбанк", &["райффайзенбанк", "райффайзен", "raiffeisen"]),
    ("Совкомбанк", &["совкомбанк", "sovcombank"]),
    ("Почта Банк", &["почта банк", "pochta bank"]),
    ("Ozon Банк", &["озон банк", "ozon банк", "ozon bank"]),
    ("МТС Банк", &["мтс банк", "мтс-банк", "mts bank"]),
];

/// Genitive month names as printed in Russian dates.
pub const MONTHS: [(&str, u32); 12] = [
    ("января", 1),
    ("февраля", 2),
    ("марта", 3),
    ("апреля", 4),
    ("мая", 5),
    ("июня", 6),
    ("июля", 7),
    ("августа", 8),
    ("сентября", 9),
    ("октября", 10),
    ("ноября", 11),
    ("декабря", 12),
];

/// Tokens that disqualify an author candidate (lower case, substring match).
pub const STOP_WORDS: &[&str] = &[
    "улица",
    "москва",
    "россия",
    "кассир",
    "чек",
    "документ",
    "операция",
    "платеж",
    "платёж",
    "карта",
    "счет",
    "счёт",
    "transaction",
    "успешно",
];

/// Feed type markers (lower case) and the transfer type they denote.
pub const TRANSFER_MARKERS: &[(&str, TransferType)] = &[
    ("transfers", TransferType::Transfer),
    ("transfer", TransferType::Transfer),
    ("переводы", TransferType::Transfer),
    ("перевод", TransferType::Transfer),
    ("top-ups", TransferType::TopUp),
    ("top-up", TransferType::TopUp),
    ("пополнения", TransferType::TopUp),
    ("пополнение", TransferType::TopUp),
];

fn compile_banks() -> Vec<FieldRule> {
    BANKS
        .iter()
        .map(|&(name, aliases)| {
            let alternatives: Vec<String> = aliases.iter().map(|a| regex::escape(a)).collect();
            let pattern = format!(r"\b(?:{})\b", alternatives.join("|"));
            FieldRule::new(
                FieldKind::Bank,
                0,
                name,
                &pattern,
                DecodeHint::CanonicalBank(name),
                MatchFlags::CASE_INSENSITIVE,
            )
            .unwrap_or_else(|e| panic!("invalid alias pattern for bank {name}: {e}"))
        })
        .collect()
}

lazy_static! {
    pub static ref DATE_RULES: Vec<FieldRule> = compile_table(DATE_RULE_SPECS);
    pub static ref AMOUNT_RULES: Vec<FieldRule> = compile_table(AMOUNT_RULE_SPECS);
    pub static ref INCOME_AUTHOR_RULES: Vec<FieldRule> = compile_table(INCOME_AUTHOR_RULE_SPECS);
    pub static ref EXPENSE_AUTHOR_RULES: Vec<FieldRule> = compile_table(EXPENSE_AUTHOR_RULE_SPECS);
    pub static ref PROCEDURE_RULES: Vec<FieldRule> = compile_table(PROCEDURE_RULE_SPECS);
    pub static ref COMMENT_RULES: Vec<FieldRule> = compile_table(COMMENT_RULE_SPECS);
    pub static ref BANK_RULES: Vec<FieldRule> = compile_banks();

    // Author cleaning
    pub static ref LEGAL_FORM_PREFIX: Regex = Regex::new(
        r"(?i)^(?:ООО|ИП|АО|ПАО|ЗАО|ОАО)\s+"
    ).unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    // Line-item cleaning
    pub static ref PARENTHETICAL: Regex = Regex::new(r"\([^)]*\)").unwrap();

    pub static ref TRAILING_NUMBERS: Regex = Regex::new(
        r"(?i)(?:[\s\d,.*×=%/-]|(?:^|[\s\d])(?:₽|Р|руб\.?|RUB|шт\.?|x|х))+$"
    ).unwrap();

    pub static ref CYRILLIC: Regex = Regex::new(r"\p{Cyrillic}").unwrap();

    // Multi-transaction feed lines (matched against trimmed lines)
    pub static ref FEED_HEADER: Regex = Regex::new(
        r"^([А-ЯЁA-Z][а-яёa-z]+(?: [А-ЯЁA-Z][а-яёa-z]+)?(?: ?[А-ЯЁA-Z]\.){1,2})$"
    ).unwrap();

    pub static ref FEED_AMOUNT: Regex = Regex::new(
        r"(?i)^([+−-])\s*(\d{1,3}(?: \d{3})+(?:[,.]\d{1,2})?|\d+(?:[,.]\d{1,2})?)\s*(?:₽|руб\.?|RUB|Р)$"
    ).unwrap();

    pub static ref FEED_CARD: Regex = Regex::new(
        r"(?i)^(?:(?:карта|card|мир|visa|mastercard|maestro|счёт|счет)\s*)?[•*·]+\s*\d{4}$"
    ).unwrap();

    pub static ref DATE_PERIOD: Regex = Regex::new(
        r"(?i)(?:\bс\s+)?(\d{2}\.\d{2}\.\d{4})\s*(?:[–—-]|по)\s*(\d{2}\.\d{2}\.\d{4})"
    ).unwrap();
}
