//! Explain command - list every candidate the rules produced and which one won.

use std::fmt::Display;
use std::path::PathBuf;

use clap::Args;
use console::style;

use txscan_core::extract::rules::{
    AmountExtractor, AuthorExtractor, BankExtractor, CommentExtractor, DateExtractor,
    FieldExtractor, ProcedureExtractor,
};
use txscan_core::extract::{extract_period, Candidate, MultiTransactionSegmenter};
use txscan_core::{Polarity, TextViews, TransactionKind, DATE_FORMAT};

use super::{load_config, parse_polarity, read_input};

/// Arguments for the explain command.
#[derive(Args)]
pub struct ExplainArgs {
    /// Input text file ("-" for stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Transaction polarity: income, expense or aggregate
    #[arg(short, long, default_value = "income", value_parser = parse_polarity)]
    polarity: Polarity,
}

pub async fn run(args: ExplainArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let text = read_input(&args.input)?;
    let views = TextViews::new(&text);

    println!("{} {} extraction", style("Explaining").bold(), args.polarity);

    explain_field(&DateExtractor::new(), &views);
    if args.polarity == Polarity::Aggregate {
        explain_feed(&views);
        explain_field(&BankExtractor::new(), &views);
    } else {
        let kind = args.polarity.record_kind().unwrap_or(TransactionKind::Income);
        explain_field(&AmountExtractor::new(), &views);
        explain_field(
            &AuthorExtractor::new(kind).with_stop_words(&config.extraction.extra_stop_words),
            &views,
        );
        match kind {
            TransactionKind::Income => explain_field(&BankExtractor::new(), &views),
            TransactionKind::Expense => explain_field(&ProcedureExtractor::new(), &views),
        }
    }
    explain_field(&CommentExtractor::new(config.extraction.comment_max_chars), &views);

    Ok(())
}

fn explain_field<E>(extractor: &E, views: &TextViews)
where
    E: FieldExtractor,
    E::Output: Display,
{
    println!();
    println!("{}", style(extractor.kind()).cyan().bold());

    let candidates = extractor.extract_all(views);
    if candidates.is_empty() {
        println!("  {}", style("no candidates").dim());
        return;
    }

    let winner = extractor.extract(views);
    for candidate in &candidates {
        let marker = if is_winner(candidate, winner.as_ref()) {
            style("→").green().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "  {} tier {} @{:<4} {:<22} {:?} => {}",
            marker, candidate.tier, candidate.offset, candidate.rule, candidate.raw, candidate.value
        );
    }
}

fn is_winner<T>(candidate: &Candidate<T>, winner: Option<&Candidate<T>>) -> bool {
    winner.is_some_and(|w| w.rule == candidate.rule && w.offset == candidate.offset)
}

fn explain_feed(views: &TextViews) {
    println!();
    println!("{}", style("transactions").cyan().bold());

    let report = MultiTransactionSegmenter::new().scan(views.raw());
    for tx in &report.transactions {
        println!(
            "  {} {} {} ({})",
            style("+").green(),
            tx.sender,
            tx.amount,
            tx.transfer_type
        );
    }
    for dropped in &report.dropped {
        println!("  {} {}", style("✗").red(), dropped);
    }
    if report.transactions.is_empty() && report.dropped.is_empty() {
        println!("  {}", style("no blocks").dim());
    }

    if let Some(period) = extract_period(views.search()) {
        println!(
            "  period: {} - {}",
            period.start.format(DATE_FORMAT),
            period.end.format(DATE_FORMAT)
        );
    }
}
