//! Rules command - list the extraction rule tables.

use clap::Args;
use console::style;

use txscan_core::extract::rules::patterns::{
    AMOUNT_RULES, BANK_RULES, COMMENT_RULES, DATE_RULES, EXPENSE_AUTHOR_RULES,
    INCOME_AUTHOR_RULES, PROCEDURE_RULES,
};
use txscan_core::extract::rules::{FieldKind, FieldRule};

/// Arguments for the rules command.
#[derive(Args)]
pub struct RulesArgs {
    /// Only list rules for one field (date, amount, bank, author, procedure, comment)
    #[arg(short, long, value_parser = parse_field)]
    field: Option<FieldKind>,

    /// Print the regular expression of each rule
    #[arg(long)]
    patterns: bool,
}

fn parse_field(s: &str) -> Result<FieldKind, String> {
    FieldKind::from_name(s).ok_or_else(|| {
        format!("unknown field '{}', expected date, amount, bank, author, procedure or comment", s)
    })
}

pub async fn run(args: RulesArgs) -> anyhow::Result<()> {
    for kind in FieldKind::ALL {
        if args.field.is_some_and(|f| f != kind) {
            continue;
        }

        for (title, rules) in tables(kind) {
            println!(
                "{} {}",
                style(title).cyan().bold(),
                style(format!("({:?})", kind.resolution())).dim()
            );
            for rule in rules {
                print_rule(rule, args.patterns);
            }
            println!();
        }
    }

    Ok(())
}

fn tables(kind: FieldKind) -> Vec<(&'static str, &'static [FieldRule])> {
    match kind {
        FieldKind::Date => vec![("date", DATE_RULES.as_slice())],
        FieldKind::Amount => vec![("amount", AMOUNT_RULES.as_slice())],
        FieldKind::Bank => vec![("bank", BANK_RULES.as_slice())],
        FieldKind::Author => vec![
            ("author (income)", INCOME_AUTHOR_RULES.as_slice()),
            ("author (expense)", EXPENSE_AUTHOR_RULES.as_slice()),
        ],
        FieldKind::Procedure => vec![("procedure", PROCEDURE_RULES.as_slice())],
        FieldKind::Comment => vec![("comment", COMMENT_RULES.as_slice())],
    }
}

fn print_rule(rule: &FieldRule, show_pattern: bool) {
    println!("  tier {}  {:<24} {}", rule.tier, rule.name, rule.decode);
    if show_pattern {
        println!("          {}", style(rule.pattern()).dim());
    }
}
