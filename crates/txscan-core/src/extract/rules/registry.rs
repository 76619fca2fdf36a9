//! Declarative rule tables and the generic rule-engine loop.
//!
//! Every field kind owns an ordered table of [`FieldRule`]s. A single loop
//! evaluates a table against a text; the field kind's [`Resolution`] decides
//! whether the first valid candidate wins or the best of all candidates.

use std::fmt;

use regex::{Captures, Regex, RegexBuilder};
use tracing::debug;

use super::Candidate;
use crate::error::CandidateError;
use crate::text::TextView;

/// Field a rule produces candidates for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Date,
    Amount,
    Bank,
    Author,
    Procedure,
    Comment,
}

impl FieldKind {
    pub const ALL: [FieldKind; 6] = [
        Self::Date,
        Self::Amount,
        Self::Bank,
        Self::Author,
        Self::Procedure,
        Self::Comment,
    ];

    /// How competing candidates of this field are resolved.
    pub fn resolution(&self) -> Resolution {
        match self {
            Self::Date => Resolution::BestOfAll,
            _ => Resolution::FirstValid,
        }
    }

    /// Text view the field's rules are evaluated against.
    pub fn view(&self) -> TextView {
        match self {
            Self::Date | Self::Procedure => TextView::Raw,
            Self::Amount | Self::Bank | Self::Author | Self::Comment => TextView::Search,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Bank => "bank",
            Self::Author => "author",
            Self::Procedure => "procedure",
            Self::Comment => "comment",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Conflict resolution policy of a field family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Collect every valid candidate; lowest `(tier, offset)` wins.
    BestOfAll,
    /// Walk rules in tier order; the first valid candidate wins.
    FirstValid,
}

/// How a rule's captures are turned into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeHint {
    /// Day, month and two- or four-digit year groups.
    NumericDate,
    /// Day, Russian genitive month name and year groups.
    TextualDate,
    /// Number anchored to a keyword.
    KeywordAmount,
    /// Number followed by a currency marker.
    CurrencyAmount,
    /// Number with no context at all.
    BareAmount,
    /// Person name in "Surname I." shape.
    PersonName,
    /// Organization or free-form payee name.
    OrganizationName,
    /// Any alias of the given canonical bank.
    CanonicalBank(&'static str),
    /// Multi-line block of receipt line items.
    LineItems,
    /// Single-line free text.
    FreeText,
}

impl DecodeHint {
    /// Whether a bare numeric match must be checked against date-shaped
    /// surroundings.
    pub fn guards_date_fragments(&self) -> bool {
        matches!(self, Self::CurrencyAmount | Self::BareAmount)
    }
}

impl fmt::Display for DecodeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NumericDate => f.write_str("numeric date"),
            Self::TextualDate => f.write_str("textual Russian month date"),
            Self::KeywordAmount => f.write_str("keyword-anchored decimal"),
            Self::CurrencyAmount => f.write_str("currency-suffixed decimal"),
            Self::BareAmount => f.write_str("bare decimal"),
            Self::PersonName => f.write_str("person name"),
            Self::OrganizationName => f.write_str("organization name"),
            Self::CanonicalBank(name) => write!(f, "bank alias -> {name}"),
            Self::LineItems => f.write_str("line-items block"),
            Self::FreeText => f.write_str("free text"),
        }
    }
}

/// Regex flags applied when a rule is compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchFlags {
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_all: bool,
}

impl MatchFlags {
    pub const NONE: Self = Self {
        case_insensitive: false,
        multi_line: false,
        dot_all: false,
    };

    pub const CASE_INSENSITIVE: Self = Self {
        case_insensitive: true,
        multi_line: false,
        dot_all: false,
    };

    pub const MULTI_LINE: Self = Self {
        case_insensitive: false,
        multi_line: true,
        dot_all: false,
    };

    pub const BLOCK: Self = Self {
        case_insensitive: true,
        multi_line: false,
        dot_all: true,
    };
}

/// Static description of a rule, compiled once into a [`FieldRule`].
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    pub kind: FieldKind,
    pub tier: u8,
    pub name: &'static str,
    pub pattern: &'static str,
    pub decode: DecodeHint,
    pub flags: MatchFlags,
}

/// A compiled, immutable extraction rule.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub kind: FieldKind,
    /// 0 is the most contextual; larger values are more generic fallbacks.
    pub tier: u8,
    pub name: &'static str,
    pub decode: DecodeHint,
    pub flags: MatchFlags,
    regex: Regex,
}

impl FieldRule {
    pub fn new(
        kind: FieldKind,
        tier: u8,
        name: &'static str,
        pattern: &str,
        decode: DecodeHint,
        flags: MatchFlags,
    ) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(flags.case_insensitive)
            .multi_line(flags.multi_line)
            .dot_matches_new_line(flags.dot_all)
            .build()?;

        Ok(Self {
            kind,
            tier,
            name,
            decode,
            flags,
            regex,
        })
    }

    pub fn compile(spec: &RuleSpec) -> Result<Self, regex::Error> {
        Self::new(spec.kind, spec.tier, spec.name, spec.pattern, spec.decode, spec.flags)
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

/// Compile a static rule table. Patterns are literals covered by tests, so a
/// failure here is a programming error.
pub fn compile_table(specs: &[RuleSpec]) -> Vec<FieldRule> {
    specs
        .iter()
        .map(|spec| {
            FieldRule::compile(spec)
                .unwrap_or_else(|e| panic!("invalid pattern for rule {:?}: {e}", spec.name))
        })
        .collect()
}

/// Rules in tier order; declaration order breaks ties.
fn in_tier_order(rules: &[FieldRule]) -> Vec<&FieldRule> {
    let mut ordered: Vec<&FieldRule> = rules.iter().collect();
    ordered.sort_by_key(|rule| rule.tier);
    ordered
}

fn candidate<T>(rule: &FieldRule, caps: &Captures<'_>, text: &str, value: T) -> Candidate<T> {
    let full = caps.get_match();
    let raw = if caps.len() == 2 {
        caps.get(1).map_or(full.as_str(), |m| m.as_str())
    } else {
        full.as_str()
    };

    Candidate {
        kind: rule.kind,
        value,
        raw: raw.to_string(),
        tier: rule.tier,
        offset: text[..full.start()].chars().count(),
        rule: rule.name,
    }
}

/// Walk rules in tier order and return the first candidate that decodes.
pub fn first_valid<T, F>(rules: &[FieldRule], text: &str, mut decode: F) -> Option<Candidate<T>>
where
    F: FnMut(&FieldRule, &Captures<'_>) -> Result<T, CandidateError>,
{
    for rule in in_tier_order(rules) {
        for caps in rule.regex.captures_iter(text) {
            match decode(rule, &caps) {
                Ok(value) => {
                    let found = candidate(rule, &caps, text, value);
                    debug!(
                        "{} accepted (tier {}, rule '{}'): {:?}",
                        rule.kind, rule.tier, rule.name, found.raw
                    );
                    return Some(found);
                }
                Err(e) => {
                    debug!("{} candidate discarded (rule '{}'): {}", rule.kind, rule.name, e);
                }
            }
        }
    }
    None
}

/// Evaluate every rule and return every candidate that decodes, in rule
/// then text order.
pub fn collect_all<T, F>(rules: &[FieldRule], text: &str, mut decode: F) -> Vec<Candidate<T>>
where
    F: FnMut(&FieldRule, &Captures<'_>) -> Result<T, CandidateError>,
{
    let mut results = Vec::new();

    for rule in in_tier_order(rules) {
        for caps in rule.regex.captures_iter(text) {
            match decode(rule, &caps) {
                Ok(value) => results.push(candidate(rule, &caps, text, value)),
                Err(e) => {
                    debug!("{} candidate discarded (rule '{}'): {}", rule.kind, rule.name, e);
                }
            }
        }
    }

    results
}

/// Pick the lowest `(tier, offset)` candidate; the earlier one wins ties.
pub fn best_of<T>(candidates: Vec<Candidate<T>>) -> Option<Candidate<T>> {
    candidates.into_iter().min_by_key(|c| (c.tier, c.offset))
}

/// Run a table under its field kind's resolution policy.
pub fn resolve<T, F>(rules: &[FieldRule], text: &str, decode: F) -> Option<Candidate<T>>
where
    F: FnMut(&FieldRule, &Captures<'_>) -> Result<T, CandidateError>,
{
    let Some(kind) = rules.first().map(|r| r.kind) else {
        return None;
    };

    let winner = match kind.resolution() {
        Resolution::FirstValid => first_valid(rules, text, decode),
        Resolution::BestOfAll => best_of(collect_all(rules, text, decode)),
    };

    if let Some(found) = &winner {
        debug!(
            "{} resolved by rule '{}' (tier {}, offset {})",
            kind, found.rule, found.tier, found.offset
        );
    }

    winner
}
