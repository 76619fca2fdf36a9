//! Extract command - extract a transaction from a single OCR text file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use tracing::{debug, info};

use txscan_core::{
    Extraction, MultiTransactionBlock, Polarity, RecordAssembler, TransactionKind,
    TransactionRecord,
};

use super::{load_config, parse_date, parse_polarity, read_input};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input text file ("-" for stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Transaction polarity: income, expense or aggregate
    #[arg(short, long, default_value = "income", value_parser = parse_polarity)]
    polarity: Polarity,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show how many fields were extracted
    #[arg(long)]
    show_completeness: bool,

    /// Date used for feeds without one (DD.MM.YYYY, default: today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    info!("Processing file: {}", args.input.display());
    let text = read_input(&args.input)?;

    let mut assembler = RecordAssembler::new(config.extraction.clone());
    if let Some(today) = args.today {
        assembler = assembler.with_reference_date(today);
    }

    let result = assembler.assemble(&text, args.polarity);

    // Format output
    let output = format_extraction(&result.extraction, args.format, config.output.pretty_json)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_completeness {
        eprintln!(
            "{} Extracted fields: {} ({:.0}%)",
            style("ℹ").blue(),
            result.completeness,
            result.completeness.ratio() * 100.0
        );
        if !result.missing_fields.is_empty() {
            eprintln!(
                "{} Missing: {}",
                style("ℹ").blue(),
                result.missing_fields.join(", ")
            );
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_extraction(
    extraction: &Extraction,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(extraction)?),
        OutputFormat::Json => Ok(serde_json::to_string(extraction)?),
        OutputFormat::Csv => format_csv(extraction),
        OutputFormat::Text => Ok(format_text(extraction)),
    }
}

fn format_csv(extraction: &Extraction) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    match extraction {
        Extraction::Record(record) => {
            wtr.write_record(["kind", "date", "amount", "bank", "author", "procedure", "comment"])?;
            wtr.write_record([
                kind_name(record.kind),
                &record.date_string().unwrap_or_default(),
                &record.amount.map(|a| a.to_string()).unwrap_or_default(),
                record.bank.as_deref().unwrap_or(""),
                record.author.as_deref().unwrap_or(""),
                record.procedure.as_deref().unwrap_or(""),
                record.comment.as_deref().unwrap_or(""),
            ])?;
        }
        Extraction::Aggregate(block) => {
            wtr.write_record(["date", "bank", "sender", "amount", "type", "card", "tag"])?;
            let date = block.date_string().unwrap_or_default();
            let bank = block.bank.as_deref().unwrap_or("");
            for tx in &block.transactions {
                wtr.write_record([
                    date.as_str(),
                    bank,
                    &tx.sender,
                    &tx.amount.to_string(),
                    tx.transfer_type.label(),
                    tx.card.as_deref().unwrap_or(""),
                    tx.tag.as_deref().unwrap_or(""),
                ])?;
            }
        }
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(extraction: &Extraction) -> String {
    match extraction {
        Extraction::Record(record) => format_record_text(record),
        Extraction::Aggregate(block) => format_block_text(block),
    }
}

fn format_record_text(record: &TransactionRecord) -> String {
    let mut output = String::new();

    let title = match record.kind {
        TransactionKind::Income => "Income",
        TransactionKind::Expense => "Expense",
    };
    output.push_str(&format!("{}\n", title));
    output.push_str(&format!("  Date:      {}\n", or_dash(record.date_string().as_deref())));
    output.push_str(&format!(
        "  Amount:    {}\n",
        record.amount.map(|a| format!("{} ₽", a)).unwrap_or_else(|| "-".to_string())
    ));
    output.push_str(&format!("  Author:    {}\n", or_dash(record.author.as_deref())));

    match record.kind {
        TransactionKind::Income => {
            output.push_str(&format!("  Bank:      {}\n", or_dash(record.bank.as_deref())));
        }
        TransactionKind::Expense => {
            output.push_str(&format!("  Procedure: {}\n", or_dash(record.procedure.as_deref())));
        }
    }

    output.push_str(&format!("  Comment:   {}\n", or_dash(record.comment.as_deref())));
    output
}

fn format_block_text(block: &MultiTransactionBlock) -> String {
    let mut output = String::new();

    output.push_str(&format!("Feed: {} transactions\n", block.transactions.len()));
    output.push_str(&format!("  Bank:    {}\n", or_dash(block.bank.as_deref())));
    output.push_str(&format!("  Date:    {}\n", or_dash(block.date_string().as_deref())));
    if let Some(period) = &block.period {
        output.push_str(&format!(
            "  Period:  {} - {}\n",
            period.start.format(txscan_core::DATE_FORMAT),
            period.end.format(txscan_core::DATE_FORMAT)
        ));
    }
    output.push_str(&format!("  Comment: {}\n", or_dash(block.comment.as_deref())));
    output.push('\n');

    for tx in &block.transactions {
        output.push_str(&format!("  {} {} ₽ ({})", tx.sender, tx.amount, tx.transfer_type));
        if let Some(card) = &tx.card {
            output.push_str(&format!(" [{}]", card));
        }
        if let Some(tag) = &tx.tag {
            output.push_str(&format!(" {}", tag));
        }
        output.push('\n');
    }
    output.push_str(&format!("  Total: {} ₽\n", block.total()));

    output
}

fn kind_name(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "income",
        TransactionKind::Expense => "expense",
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}
