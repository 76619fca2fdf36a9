//! End-to-end extraction scenarios and engine-wide properties.

use std::str::FromStr;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

use txscan_core::extract::rules::{extract_author, extract_date, AmountExtractor, FieldExtractor};
use txscan_core::{
    extract, Extraction, Polarity, RecordAssembler, TextViews, TransactionKind, TransferType,
    DATE_FORMAT,
};

const CORPUS: &[(&str, Polarity)] = &[
    (
        "Т-Банк\nДата операции: 08.10.2025\nСумма: 1 500,50 Р\nОтправитель: Иванов И.",
        Polarity::Income,
    ),
    (
        "Сбербанк Онлайн\nПеревод от 3 марта 2025\n2 000 ₽\nАнна Петрова С.\nСообщение: Для приюта",
        Polarity::Income,
    ),
    (
        "ООО «Вет Клиника»\nНаименование Ст-ть\nПрием врача 1500,00\nИтого сумма чека 1500,00",
        Polarity::Expense,
    ),
    ("Дата операции: 31.02.2025\nЧек 0,00\n15.13.2025", Polarity::Expense),
    ("Иван И.\nTransfers\n+200 Р\nОлег О.\nTop-ups\n+350 Р", Polarity::Aggregate),
    ("", Polarity::Income),
];

fn assembler() -> RecordAssembler {
    RecordAssembler::default().with_reference_date(NaiveDate::from_ymd_opt(2025, 10, 8).unwrap())
}

#[test]
fn test_scenario_labeled_income() {
    let text = "Перевод выполнен\n\
                Дата операции: 08.10.2025\n\
                Сумма: 1 500,50 Р\n\
                Отправитель: Иванов И.";

    let Extraction::Record(record) = extract(text, Polarity::Income) else {
        panic!("income polarity must yield a record");
    };

    assert_eq!(record.date_string().as_deref(), Some("08.10.2025"));
    assert_eq!(record.amount, Some(Decimal::from_str("1500.50").unwrap()));
    assert_eq!(record.author.as_deref(), Some("Иванов И."));
}

#[test]
fn test_scenario_invalid_anchored_date_is_discarded() {
    let text = "Дата операции: 31.02.2025\nЧек сформирован 14.02.2025";
    assert_eq!(extract_date(text), NaiveDate::from_ymd_opt(2025, 2, 14));
}

#[test]
fn test_scenario_feed_with_two_blocks() {
    let text = "Т-Банк\nИван И.\nTransfers\n+200 Р\nОлег О.\nTop-ups\n+350 Р";
    let result = assembler().assemble(text, Polarity::Aggregate);
    let block = result.extraction.as_aggregate().unwrap();

    let summary: Vec<(&str, Decimal, TransferType)> = block
        .transactions
        .iter()
        .map(|t| (t.sender.as_str(), t.amount, t.transfer_type))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("Иван И.", Decimal::from(200), TransferType::Transfer),
            ("Олег О.", Decimal::from(350), TransferType::TopUp),
        ]
    );
    assert_eq!(block.bank.as_deref(), Some("Т-Банк"));
}

#[test]
fn test_scenario_no_amount_keeps_other_fields() {
    let text = "ВТБ\nДата операции: 08.10.2025\nОтправитель: Иванов И.\nКомментарий: Спасибо";
    let Extraction::Record(record) = extract(text, Polarity::Income) else {
        panic!("income polarity must yield a record");
    };

    assert_eq!(record.amount, None);
    assert_eq!(record.date_string().as_deref(), Some("08.10.2025"));
    assert_eq!(record.author.as_deref(), Some("Иванов И."));
    assert_eq!(record.bank.as_deref(), Some("ВТБ"));
    assert_eq!(record.comment.as_deref(), Some("Спасибо"));
}

#[test]
fn test_scenario_expense_receipt() {
    let text = "«Вет Клиника»\n\
                Кассовый чек\n\
                Наименование Кол-во Цена Ст-ть\n\
                Осмотр кошки 1 800,00 800,00 Р\n\
                Чистка зубов (ультразвук) 1 2 500,00 2 500,00 Р\n\
                Итого сумма чека 3 300,00";

    let Extraction::Record(record) = extract(text, Polarity::Expense) else {
        panic!("expense polarity must yield a record");
    };

    assert_eq!(record.kind, TransactionKind::Expense);
    assert_eq!(record.author.as_deref(), Some("Вет Клиника"));
    assert_eq!(record.procedure.as_deref(), Some("Осмотр кошки; Чистка зубов"));
    assert_eq!(record.amount, Some(Decimal::from(3300)));
}

#[test]
fn test_extraction_is_idempotent() {
    let assembler = assembler();
    for (text, polarity) in CORPUS {
        let first = assembler.assemble(text, *polarity);
        let second = assembler.assemble(text, *polarity);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first.extraction).unwrap(),
            serde_json::to_string(&second.extraction).unwrap()
        );
    }
}

#[test]
fn test_dates_are_canonical_and_valid() {
    let assembler = assembler();
    for (text, polarity) in CORPUS {
        let result = assembler.assemble(text, *polarity);
        let date = match &result.extraction {
            Extraction::Record(r) => r.date_string(),
            Extraction::Aggregate(b) => b.date_string(),
        };
        if let Some(date) = date {
            assert_eq!(date.len(), 10, "{date}");
            assert!(NaiveDate::parse_from_str(&date, DATE_FORMAT).is_ok(), "{date}");
        }
    }
}

#[test]
fn test_amounts_are_positive() {
    let assembler = assembler();
    for (text, polarity) in CORPUS {
        match assembler.assemble(text, *polarity).extraction {
            Extraction::Record(r) => {
                if let Some(amount) = r.amount {
                    assert!(amount > Decimal::ZERO);
                }
            }
            Extraction::Aggregate(b) => {
                assert!(b.transactions.iter().all(|t| t.amount > Decimal::ZERO));
            }
        }
    }
}

#[test]
fn test_date_tier_beats_position() {
    let text = "15.09.2025\nДата платежа: 01.10.2025";
    assert_eq!(extract_date(text), NaiveDate::from_ymd_opt(2025, 10, 1));

    let text = "20.09.2025\n15.09.2025";
    assert_eq!(extract_date(text), NaiveDate::from_ymd_opt(2025, 9, 20));
}

#[test]
fn test_amount_first_valid_tier_wins() {
    // a currency-suffixed number comes first in the text, the keyword wins
    let text = "Кешбэк 50 ₽\nИтого: 1 200";
    let found = AmountExtractor::new().extract(&TextViews::new(text)).unwrap();

    assert_eq!(found.value, Decimal::from(1200));
    assert_eq!(found.tier, 0);
}

#[test]
fn test_stop_word_rejection_moves_on() {
    let text = "Отправитель: Чек по операции\nПолучено 500 ₽ Смирнова А.";
    assert_eq!(
        extract_author(text, TransactionKind::Income),
        Some("Смирнова А.".to_string())
    );
}
