use serde::Serialize;
use tracing::warn;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::record::{TradeRecord, TradeStatus};
use crate::types::{ClassifyPolicy, ExitedWithoutPnl, UnclassifiablePolicy};

/// Bucket a record lands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Open,
    Win,
    Loss,
}

/// Ledger split into disjoint buckets, each in original ledger order.
#[derive(Clone, Debug, Default)]
pub struct ClassifiedLedger<'a> {
    pub open: Vec<&'a TradeRecord>,
    pub wins: Vec<&'a TradeRecord>,
    pub losses: Vec<&'a TradeRecord>,
    /// Records dropped under [`UnclassifiablePolicy::Skip`].
    pub excluded: Vec<&'a TradeRecord>,
}

impl<'a> ClassifiedLedger<'a> {
    /// Closed records, wins first.
    pub fn closed(&self) -> impl Iterator<Item = &'a TradeRecord> + '_ {
        self.wins.iter().chain(self.losses.iter()).copied()
    }

    /// Every classified record, excluded ones left out.
    pub fn classified(&self) -> impl Iterator<Item = &'a TradeRecord> + '_ {
        self.open.iter().copied().chain(self.closed())
    }

    pub fn classified_len(&self) -> usize {
        self.open.len() + self.wins.len() + self.losses.len()
    }
}

fn by_pnl_sign(pnl: f64) -> Outcome {
    // Break-even is not a win.
    if pnl > 0.0 {
        Outcome::Win
    } else {
        Outcome::Loss
    }
}

fn unclassifiable(record: &TradeRecord, reason: impl Into<String>) -> LedgerError {
    LedgerError::UnclassifiableRecord {
        index: record.index,
        origin: record.source,
        market: record.market.clone(),
        reason: reason.into(),
    }
}

/// Map one record onto OPEN/WIN/LOSS.
///
/// WIN and LOSS tags are trusted as-is; every other closed record is decided by
/// the sign of its PnL, with zero counting as a loss.
pub fn classify(record: &TradeRecord, policy: &ClassifyPolicy) -> LedgerResult<Outcome> {
    let pnl = record.known_pnl();
    match &record.status {
        TradeStatus::Open => Ok(Outcome::Open),
        TradeStatus::Win => Ok(Outcome::Win),
        TradeStatus::Loss => Ok(Outcome::Loss),
        TradeStatus::Exited => match (pnl, policy.exited_without_pnl) {
            (Some(p), _) => Ok(by_pnl_sign(p)),
            (None, ExitedWithoutPnl::Open) => Ok(Outcome::Open),
            (None, ExitedWithoutPnl::Unclassifiable) => {
                Err(unclassifiable(record, "EXITED record has no numeric PnL"))
            }
        },
        TradeStatus::Settled => pnl
            .map(by_pnl_sign)
            .ok_or_else(|| unclassifiable(record, "closed record has no numeric PnL")),
        TradeStatus::Unrecognized(tag) => pnl.map(by_pnl_sign).ok_or_else(|| {
            unclassifiable(record, format!("unknown status {tag:?} and no numeric PnL"))
        }),
    }
}

/// Classify every record into a [`ClassifiedLedger`], applying the unclassifiable policy.
pub fn partition<'a>(
    records: &'a [TradeRecord],
    policy: &ClassifyPolicy,
) -> LedgerResult<ClassifiedLedger<'a>> {
    let mut ledger = ClassifiedLedger::default();

    for record in records {
        match classify(record, policy) {
            Ok(Outcome::Open) => ledger.open.push(record),
            Ok(Outcome::Win) => ledger.wins.push(record),
            Ok(Outcome::Loss) => ledger.losses.push(record),
            Err(err) => match policy.on_unclassifiable {
                UnclassifiablePolicy::Abort => return Err(err),
                UnclassifiablePolicy::Skip => {
                    warn!(
                        target: "ledger",
                        index = record.index,
                        source = %record.source,
                        market = %record.market,
                        error = %err,
                        "skipping unclassifiable record"
                    );
                    ledger.excluded.push(record);
                }
            },
        }
    }

    Ok(ledger)
}
