//! Multi-transaction feed segmentation.
//!
//! A banking activity feed repeats the same small block for every transfer:
//!
//! ```text
//! Иван И.          <- header (sender)
//! Transfers        <- type marker
//! Карта •• 1234    <- optional card label
//! На корм          <- optional free-text tag
//! +200 ₽           <- signed amount, closes the block
//! ```
//!
//! The segmenter walks the lines once with an explicit block state. A
//! malformed block is dropped on its own and scanning resumes at the next
//! header.

use chrono::NaiveDate;
use tracing::debug;

use super::rules::parse_amount;
use super::rules::patterns::{DATE_PERIOD, FEED_AMOUNT, FEED_CARD, FEED_HEADER, TRANSFER_MARKERS};
use crate::error::BlockError;
use crate::models::record::{DatePeriod, SubTransaction, TransferType, DATE_FORMAT};
use crate::text::normalize_for_search;

/// Lines a block may hold, header included, before its amount line.
pub const MAX_BLOCK_LINES: usize = 6;

/// Block being assembled.
#[derive(Debug)]
struct PendingBlock {
    sender: String,
    transfer_type: Option<TransferType>,
    card: Option<String>,
    tag: Option<String>,
    lines: usize,
}

impl PendingBlock {
    fn new(sender: &str) -> Self {
        Self {
            sender: sender.to_string(),
            transfer_type: None,
            card: None,
            tag: None,
            lines: 1,
        }
    }

    /// Record a card or tag line; only the first of each is kept.
    fn absorb(&mut self, line: &str) {
        if FEED_CARD.is_match(line) {
            self.card.get_or_insert_with(|| line.to_string());
        } else {
            self.tag.get_or_insert_with(|| line.to_string());
        }
    }

    fn unfinished(self) -> BlockError {
        match self.transfer_type {
            Some(_) => BlockError::MissingAmount { sender: self.sender },
            None => BlockError::MissingType { sender: self.sender },
        }
    }
}

#[derive(Debug)]
enum State {
    ExpectHeader,
    ExpectType(PendingBlock),
    ExpectAmount(PendingBlock),
}

/// Outcome of one segmentation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentReport {
    /// Well-formed blocks, in text order.
    pub transactions: Vec<SubTransaction>,
    /// Why each malformed block was dropped, in text order.
    pub dropped: Vec<BlockError>,
}

impl SegmentReport {
    fn drop_block(&mut self, error: BlockError) {
        debug!("feed block dropped: {}", error);
        self.dropped.push(error);
    }
}

/// Splits a feed screenshot into sub-transactions.
pub struct MultiTransactionSegmenter {
    max_block_lines: usize,
}

impl MultiTransactionSegmenter {
    pub fn new() -> Self {
        Self {
            max_block_lines: MAX_BLOCK_LINES,
        }
    }

    pub fn with_max_block_lines(mut self, max_block_lines: usize) -> Self {
        self.max_block_lines = max_block_lines;
        self
    }

    /// Well-formed sub-transactions of the feed.
    pub fn segment(&self, text: &str) -> Vec<SubTransaction> {
        self.scan(text).transactions
    }

    /// Segment the feed, keeping the reason every dropped block was rejected.
    pub fn scan(&self, text: &str) -> SegmentReport {
        let mut report = SegmentReport::default();
        let mut state = State::ExpectHeader;

        let search = normalize_for_search(text);
        for line in search.lines().map(str::trim).filter(|l| !l.is_empty()) {
            state = self.step(state, line, &mut report);
        }

        match state {
            State::ExpectHeader => {}
            State::ExpectType(block) | State::ExpectAmount(block) => {
                report.drop_block(block.unfinished());
            }
        }

        debug!(
            "feed segmented: {} transactions, {} dropped blocks",
            report.transactions.len(),
            report.dropped.len()
        );
        report
    }

    fn step(&self, state: State, line: &str, report: &mut SegmentReport) -> State {
        if FEED_HEADER.is_match(line) {
            if let State::ExpectType(block) | State::ExpectAmount(block) = state {
                report.drop_block(block.unfinished());
            }
            return State::ExpectType(PendingBlock::new(line));
        }

        match state {
            // Text outside any block (titles, balances, dates)
            State::ExpectHeader => State::ExpectHeader,

            State::ExpectType(mut block) => {
                if let Some(transfer_type) = transfer_marker(line) {
                    block.transfer_type = Some(transfer_type);
                    return self.grow(block, State::ExpectAmount, report);
                }
                if FEED_AMOUNT.is_match(line) {
                    report.drop_block(block.unfinished());
                    return State::ExpectHeader;
                }
                block.absorb(line);
                self.grow(block, State::ExpectType, report)
            }

            State::ExpectAmount(mut block) => match FEED_AMOUNT.captures(line) {
                Some(caps) => {
                    self.close(block, &caps[1], &caps[2], report);
                    State::ExpectHeader
                }
                None => {
                    block.absorb(line);
                    self.grow(block, State::ExpectAmount, report)
                }
            },
        }
    }

    /// Count one more line into the block, dropping it past the limit.
    fn grow(
        &self,
        mut block: PendingBlock,
        next: fn(PendingBlock) -> State,
        report: &mut SegmentReport,
    ) -> State {
        block.lines += 1;
        if block.lines > self.max_block_lines {
            report.drop_block(BlockError::TooManyLines {
                sender: block.sender,
                limit: self.max_block_lines,
            });
            return State::ExpectHeader;
        }
        next(block)
    }

    fn close(&self, block: PendingBlock, sign: &str, number: &str, report: &mut SegmentReport) {
        if sign != "+" {
            report.drop_block(BlockError::NegativeAmount { sender: block.sender });
            return;
        }

        let Some(amount) = parse_amount(number) else {
            report.drop_block(BlockError::InvalidAmount {
                sender: block.sender,
                raw: number.to_string(),
            });
            return;
        };

        let Some(transfer_type) = block.transfer_type else {
            report.drop_block(BlockError::MissingType { sender: block.sender });
            return;
        };

        debug!("feed block accepted: {} {} {}", block.sender, transfer_type, amount);
        report.transactions.push(SubTransaction {
            sender: block.sender,
            amount,
            transfer_type,
            card: block.card,
            tag: block.tag,
        });
    }
}

impl Default for MultiTransactionSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Transfer type of a type-marker line.
///
/// The marker must be the whole line or its first word.
pub fn transfer_marker(line: &str) -> Option<TransferType> {
    let lower = line.trim().to_lowercase();
    TRANSFER_MARKERS
        .iter()
        .find(|(marker, _)| {
            lower == *marker
                || lower
                    .strip_prefix(*marker)
                    .is_some_and(|rest| rest.starts_with(' '))
        })
        .map(|&(_, transfer_type)| transfer_type)
}

/// Shared reporting period such as `01.10.2025 – 07.10.2025`.
pub fn extract_period(text: &str) -> Option<DatePeriod> {
    DATE_PERIOD.captures_iter(text).find_map(|caps| {
        let start = NaiveDate::parse_from_str(&caps[1], DATE_FORMAT).ok()?;
        let end = NaiveDate::parse_from_str(&caps[2], DATE_FORMAT).ok()?;
        (start <= end).then_some(DatePeriod { start, end })
    })
}
