//! Transaction data models produced by the extraction engine.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Canonical output format for every extracted date.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Declared polarity of an input text; selects which extractors run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Incoming donation or transfer.
    Income,
    /// Purchase receipt.
    Expense,
    /// Screenshot listing several incoming transfers.
    Aggregate,
}

impl Polarity {
    /// Parse a polarity name (English or Russian).
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "приход" => Some(Self::Income),
            "expense" | "расход" => Some(Self::Expense),
            "aggregate" | "multi" | "лента" => Some(Self::Aggregate),
            _ => None,
        }
    }

    /// Record kind produced for this polarity, if it yields a single record.
    pub fn record_kind(&self) -> Option<TransactionKind> {
        match self {
            Self::Income => Some(TransactionKind::Income),
            Self::Expense => Some(TransactionKind::Expense),
            Self::Aggregate => None,
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Aggregate => "aggregate",
        };
        f.write_str(name)
    }
}

/// Direction of a single transaction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// A single extracted transaction. Every field is independently optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction date, serialized as `DD.MM.YYYY`.
    #[serde(with = "date_format", default)]
    pub date: Option<NaiveDate>,

    /// Strictly positive amount.
    pub amount: Option<Decimal>,

    /// Canonical bank name (income only).
    pub bank: Option<String>,

    /// Payee (expense) or sender (income).
    pub author: Option<String>,

    /// Line-items description (expense only).
    pub procedure: Option<String>,

    /// Free-text comment.
    pub comment: Option<String>,

    pub kind: TransactionKind,
}

impl TransactionRecord {
    /// Create a record with every field absent.
    pub fn empty(kind: TransactionKind) -> Self {
        Self {
            date: None,
            amount: None,
            bank: None,
            author: None,
            procedure: None,
            comment: None,
            kind,
        }
    }

    /// Date in canonical `DD.MM.YYYY` form.
    pub fn date_string(&self) -> Option<String> {
        self.date.map(|d| d.format(DATE_FORMAT).to_string())
    }

    /// Whether no field could be extracted.
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.amount.is_none()
            && self.bank.is_none()
            && self.author.is_none()
            && self.procedure.is_none()
            && self.comment.is_none()
    }
}

/// Kind of an entry in a multi-transaction feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferType {
    #[serde(rename = "Перевод")]
    Transfer,
    #[serde(rename = "Пополнение")]
    TopUp,
}

impl TransferType {
    /// Russian display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Transfer => "Перевод",
            Self::TopUp => "Пополнение",
        }
    }
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry of a multi-transaction feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTransaction {
    pub sender: String,
    pub amount: Decimal,
    pub transfer_type: TransferType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Inclusive date range printed on a feed screenshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatePeriod {
    #[serde(with = "date_format::required")]
    pub start: NaiveDate,
    #[serde(with = "date_format::required")]
    pub end: NaiveDate,
}

/// Several transfers parsed from one screenshot with shared context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiTransactionBlock {
    pub bank: Option<String>,

    #[serde(with = "date_format", default)]
    pub date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<DatePeriod>,

    pub comment: Option<String>,

    pub transactions: Vec<SubTransaction>,
}

impl MultiTransactionBlock {
    /// Sum of all sub-transaction amounts.
    pub fn total(&self) -> Decimal {
        self.transactions.iter().map(|t| t.amount).sum()
    }

    pub fn date_string(&self) -> Option<String> {
        self.date.map(|d| d.format(DATE_FORMAT).to_string())
    }
}

/// Output of one assembler call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Extraction {
    Record(TransactionRecord),
    Aggregate(MultiTransactionBlock),
}

impl Extraction {
    pub fn as_record(&self) -> Option<&TransactionRecord> {
        match self {
            Self::Record(r) => Some(r),
            Self::Aggregate(_) => None,
        }
    }

    pub fn as_aggregate(&self) -> Option<&MultiTransactionBlock> {
        match self {
            Self::Aggregate(b) => Some(b),
            Self::Record(_) => None,
        }
    }
}

/// Diagnostic count of non-absent fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completeness {
    pub filled: usize,
    pub total: usize,
}

impl Completeness {
    pub fn ratio(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.filled as f32 / self.total as f32
        }
    }
}

impl fmt::Display for Completeness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.filled, self.total)
    }
}

/// Serde adapter for `Option<NaiveDate>` in `DD.MM.YYYY` form.
mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.format(DATE_FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let value: Option<String> = Option::deserialize(d)?;
        value
            .map(|v| NaiveDate::parse_from_str(&v, DATE_FORMAT).map_err(serde::de::Error::custom))
            .transpose()
    }

    pub mod required {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer};

        use super::DATE_FORMAT;

        pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
            s.serialize_str(&date.format(DATE_FORMAT).to_string())
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
            let value = String::deserialize(d)?;
            NaiveDate::parse_from_str(&value, DATE_FORMAT).map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_polarity_parsing() {
        assert_eq!(Polarity::from_name("income"), Some(Polarity::Income));
        assert_eq!(Polarity::from_name("Расход"), Some(Polarity::Expense));
        assert_eq!(Polarity::from_name("aggregate"), Some(Polarity::Aggregate));
        assert_eq!(Polarity::from_name("unknown"), None);
    }

    #[test]
    fn test_record_serializes_date_in_canonical_form() {
        let mut record = TransactionRecord::empty(TransactionKind::Income);
        record.date = NaiveDate::from_ymd_opt(2025, 10, 8);
        record.amount = Some(Decimal::from_str("1500.50").unwrap());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["date"], "08.10.2025");
        assert_eq!(json["kind"], "income");
        assert!(json["bank"].is_null());

        let back: TransactionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_empty_record() {
        let record = TransactionRecord::empty(TransactionKind::Expense);
        assert!(record.is_empty());
        assert_eq!(record.date_string(), None);
    }

    #[test]
    fn test_block_total() {
        let block = MultiTransactionBlock {
            bank: None,
            date: None,
            period: None,
            comment: None,
            transactions: vec![
                SubTransaction {
                    sender: "Иван И.".to_string(),
                    amount: Decimal::from(200),
                    transfer_type: TransferType::Transfer,
                    card: None,
                    tag: None,
                },
                SubTransaction {
                    sender: "Олег О.".to_string(),
                    amount: Decimal::from(350),
                    transfer_type: TransferType::TopUp,
                    card: None,
                    tag: None,
                },
            ],
        };
        assert_eq!(block.total(), Decimal::from(550));

        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["transactions"][1]["transfer_type"], "Пополнение");
    }

    #[test]
    fn test_completeness_display() {
        let c = Completeness { filled: 3, total: 5 };
        assert_eq!(c.to_string(), "3/5");
        assert!((c.ratio() - 0.6).abs() < f32::EPSILON);
    }
}
