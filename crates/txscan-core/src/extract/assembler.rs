//! Record assembly: runs the extractors a polarity needs and builds one
//! output value.

use std::time::Instant;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

use super::rules::{
    AmountExtractor, AuthorExtractor, BankExtractor, Candidate, CommentExtractor, DateExtractor,
    FieldExtractor, ProcedureExtractor,
};
use super::segmenter::{extract_period, MultiTransactionSegmenter};
use crate::models::config::ExtractionConfig;
use crate::models::record::{
    Completeness, Extraction, MultiTransactionBlock, Polarity, TransactionKind, TransactionRecord,
};
use crate::text::TextViews;

/// Result of one assembler call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    /// Extracted record or feed block.
    pub extraction: Extraction,
    /// Non-absent fields among the fields the polarity runs.
    pub completeness: Completeness,
    /// Names of the fields that came out absent.
    pub missing_fields: Vec<String>,
}

/// Orchestrates the field extractors for a declared polarity.
pub struct RecordAssembler {
    config: ExtractionConfig,
    /// Date used as "today"; `None` reads the local clock.
    reference_date: Option<NaiveDate>,
}

impl RecordAssembler {
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            config,
            reference_date: None,
        }
    }

    /// Pin the date substituted for aggregate screenshots without one.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract one record or feed block from OCR text.
    pub fn assemble(&self, text: &str, polarity: Polarity) -> ExtractionResult {
        let start = Instant::now();
        let views = TextViews::new(text);

        info!(
            "Assembling {} extraction from {} characters of text",
            polarity,
            text.chars().count()
        );

        let (extraction, fields) = match polarity.record_kind() {
            Some(kind) => {
                let record = self.assemble_record(&views, kind);
                let fields = record_fields(&record);
                (Extraction::Record(record), fields)
            }
            None => {
                let block = self.assemble_aggregate(&views);
                let fields = aggregate_fields(&block);
                (Extraction::Aggregate(block), fields)
            }
        };

        let completeness = Completeness {
            filled: fields.iter().filter(|(_, present)| *present).count(),
            total: fields.len(),
        };
        let missing_fields: Vec<String> = fields
            .iter()
            .filter(|(_, present)| !present)
            .map(|(name, _)| name.to_string())
            .collect();

        info!(
            "Extracted {} fields for {} in {} ms",
            completeness,
            polarity,
            start.elapsed().as_millis()
        );
        if !missing_fields.is_empty() {
            debug!("Missing fields: {}", missing_fields.join(", "));
        }

        ExtractionResult {
            extraction,
            completeness,
            missing_fields,
        }
    }

    fn assemble_record(&self, views: &TextViews, kind: TransactionKind) -> TransactionRecord {
        let mut record = TransactionRecord::empty(kind);

        record.date = DateExtractor::new().extract(views).map(Candidate::into_value);
        record.amount = AmountExtractor::new().extract(views).map(Candidate::into_value);
        record.author = AuthorExtractor::new(kind)
            .with_stop_words(&self.config.extra_stop_words)
            .extract(views)
            .map(Candidate::into_value);

        match kind {
            TransactionKind::Income => {
                record.bank = BankExtractor::new().extract(views).map(Candidate::into_value);
            }
            TransactionKind::Expense => {
                record.procedure = ProcedureExtractor::new()
                    .extract(views)
                    .map(Candidate::into_value);
            }
        }

        record.comment = self.comment(views);
        record
    }

    fn assemble_aggregate(&self, views: &TextViews) -> MultiTransactionBlock {
        let transactions = MultiTransactionSegmenter::new().segment(views.raw());

        let mut date = DateExtractor::new().extract(views).map(Candidate::into_value);
        if date.is_none() && self.config.fill_aggregate_date {
            let today = self.reference_date.unwrap_or_else(|| Local::now().date_naive());
            debug!("No date in feed, using {}", today);
            date = Some(today);
        }

        MultiTransactionBlock {
            bank: BankExtractor::new().extract(views).map(Candidate::into_value),
            date,
            period: extract_period(views.search()),
            comment: self.comment(views),
            transactions,
        }
    }

    fn comment(&self, views: &TextViews) -> Option<String> {
        CommentExtractor::new(self.config.comment_max_chars)
            .extract(views)
            .map(Candidate::into_value)
    }
}

impl Default for RecordAssembler {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

fn record_fields(record: &TransactionRecord) -> Vec<(&'static str, bool)> {
    let mut fields = vec![
        ("date", record.date.is_some()),
        ("amount", record.amount.is_some()),
        ("author", record.author.is_some()),
    ];
    match record.kind {
        TransactionKind::Income => fields.push(("bank", record.bank.is_some())),
        TransactionKind::Expense => fields.push(("procedure", record.procedure.is_some())),
    }
    fields.push(("comment", record.comment.is_some()));
    fields
}

fn aggregate_fields(block: &MultiTransactionBlock) -> Vec<(&'static str, bool)> {
    vec![
        ("transactions", !block.transactions.is_empty()),
        ("bank", block.bank.is_some()),
        ("date", block.date.is_some()),
        ("comment", block.comment.is_some()),
    ]
}
