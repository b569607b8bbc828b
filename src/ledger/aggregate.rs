use serde::Serialize;

use crate::error::LedgerResult;
use crate::ledger::classify::{partition, ClassifiedLedger};
use crate::ledger::record::TradeRecord;
use crate::types::ClassifyPolicy;
use crate::utils::math::{mean, percent_of, ratio_pct, sum};

/// Entry-price band used for the per-price breakdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBucket {
    Low,
    MidLow,
    Mid,
    MidHigh,
    High,
}

impl PriceBucket {
    pub const ALL: [PriceBucket; 5] = [
        PriceBucket::Low,
        PriceBucket::MidLow,
        PriceBucket::Mid,
        PriceBucket::MidHigh,
        PriceBucket::High,
    ];

    pub fn for_price(price: f64) -> Option<Self> {
        if !price.is_finite() {
            return None;
        }
        let bucket = if price < 0.15 {
            PriceBucket::Low
        } else if price < 0.30 {
            PriceBucket::MidLow
        } else if price < 0.50 {
            PriceBucket::Mid
        } else if price < 0.70 {
            PriceBucket::MidHigh
        } else {
            PriceBucket::High
        };
        Some(bucket)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriceBucket::Low => "< 0.15",
            PriceBucket::MidLow => "0.15-0.30",
            PriceBucket::Mid => "0.30-0.50",
            PriceBucket::MidHigh => "0.50-0.70",
            PriceBucket::High => ">= 0.70",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PriceBucketStats {
    pub bucket: PriceBucket,
    pub trades: usize,
    pub closed: usize,
    pub wins: usize,
    pub realized_pnl: f64,
    pub win_rate: Option<f64>,
}

/// Win/loss figures for one group of records (a side, a strategy).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupStats {
    pub key: String,
    pub trades: usize,
    pub closed: usize,
    pub wins: usize,
    pub losses: usize,
    pub realized_pnl: f64,
    pub win_rate: Option<f64>,
}

impl GroupStats {
    fn new(key: String) -> Self {
        Self {
            key,
            trades: 0,
            closed: 0,
            wins: 0,
            losses: 0,
            realized_pnl: 0.0,
            win_rate: None,
        }
    }
}

/// Strategy label used when a record names none.
pub const UNKNOWN_STRATEGY: &str = "unknown";

/// Performance figures recomputed from the raw records.
///
/// Percentages are `None` whenever their denominator is zero; they are never NaN
/// or infinite.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatsSummary {
    pub total_trades: usize,
    pub open_positions: usize,
    pub closed_trades: usize,
    pub wins: usize,
    pub losses: usize,
    /// Closed records with a PnL of exactly zero. Already counted in `losses`.
    pub breakeven: usize,
    /// Records dropped as unclassifiable; not part of `total_trades`.
    pub excluded: usize,
    pub win_rate: Option<f64>,
    pub total_invested: f64,
    pub realized_pnl: f64,
    pub unrealized_pnl: f64,
    pub total_pnl: f64,
    pub pnl_pct: Option<f64>,
    pub roi_realized: Option<f64>,
    pub avg_trade_size: Option<f64>,
    pub best_trade: Option<f64>,
    pub worst_trade: Option<f64>,
    /// Only bands that hold at least one record, low to high.
    pub by_entry_price: Vec<PriceBucketStats>,
    /// Per held side (YES/NO), alphabetical. Records without a side are left out.
    pub by_side: Vec<GroupStats>,
    /// Per strategy, best realized PnL first.
    pub by_strategy: Vec<GroupStats>,
}

/// Classify `records` and reduce them to a [`StatsSummary`].
///
/// Stats blocks stored in the snapshot are never an input here.
pub fn aggregate(records: &[TradeRecord], policy: &ClassifyPolicy) -> LedgerResult<StatsSummary> {
    let ledger = partition(records, policy)?;
    Ok(summarize(&ledger))
}

/// Reduce an already classified ledger.
pub fn summarize(ledger: &ClassifiedLedger<'_>) -> StatsSummary {
    let open_positions = ledger.open.len();
    let wins = ledger.wins.len();
    let losses = ledger.losses.len();
    let closed_trades = wins + losses;
    let total_trades = open_positions + closed_trades;

    let closed_pnls: Vec<f64> = ledger.closed().filter_map(|r| r.known_pnl()).collect();
    let realized_pnl = sum(closed_pnls.iter().copied());
    let unrealized_pnl = sum(ledger.open.iter().filter_map(|r| r.known_pnl()));
    let total_pnl = realized_pnl + unrealized_pnl;

    let total_invested = sum(
        ledger
            .classified()
            .filter_map(|r| r.amount)
            .filter(|a| a.is_finite()),
    );

    let breakeven = ledger
        .losses
        .iter()
        .filter(|r| r.known_pnl() == Some(0.0))
        .count();

    let best_trade = closed_pnls.iter().copied().reduce(f64::max);
    let worst_trade = closed_pnls.iter().copied().reduce(f64::min);

    StatsSummary {
        total_trades,
        open_positions,
        closed_trades,
        wins,
        losses,
        breakeven,
        excluded: ledger.excluded.len(),
        win_rate: ratio_pct(wins, closed_trades),
        total_invested,
        realized_pnl,
        unrealized_pnl,
        total_pnl,
        pnl_pct: percent_of(total_pnl, total_invested),
        roi_realized: percent_of(realized_pnl, total_invested),
        avg_trade_size: mean(total_invested, total_trades),
        best_trade,
        worst_trade,
        by_entry_price: price_breakdown(ledger),
        by_side: side_breakdown(ledger),
        by_strategy: strategy_breakdown(ledger),
    }
}

/// Up to `n` closed records with the lowest PnL, worst first. Records without a
/// PnL are left out; ties keep ledger bucket order.
pub fn worst_trades<'a>(ledger: &ClassifiedLedger<'a>, n: usize) -> Vec<&'a TradeRecord> {
    let mut closed: Vec<(&'a TradeRecord, f64)> = ledger
        .closed()
        .filter_map(|r| r.known_pnl().map(|p| (r, p)))
        .collect();
    closed.sort_by(|a, b| a.1.total_cmp(&b.1));
    closed.into_iter().take(n).map(|(r, _)| r).collect()
}

fn group_breakdown<F>(ledger: &ClassifiedLedger<'_>, key_of: F) -> Vec<GroupStats>
where
    F: Fn(&TradeRecord) -> Option<String>,
{
    let mut rows: Vec<GroupStats> = Vec::new();

    let buckets = [
        (&ledger.open, None),
        (&ledger.wins, Some(true)),
        (&ledger.losses, Some(false)),
    ];
    for (records, won) in buckets {
        for record in records.iter().copied() {
            let Some(key) = key_of(record) else {
                continue;
            };
            let idx = match rows.iter().position(|row| row.key == key) {
                Some(idx) => idx,
                None => {
                    rows.push(GroupStats::new(key));
                    rows.len() - 1
                }
            };
            let row = &mut rows[idx];
            row.trades += 1;
            if let Some(won) = won {
                row.closed += 1;
                row.realized_pnl += record.known_pnl().unwrap_or(0.0);
                if won {
                    row.wins += 1;
                } else {
                    row.losses += 1;
                }
            }
        }
    }

    for row in &mut rows {
        row.win_rate = ratio_pct(row.wins, row.closed);
    }
    rows
}

fn side_breakdown(ledger: &ClassifiedLedger<'_>) -> Vec<GroupStats> {
    let mut rows = group_breakdown(ledger, |r| {
        r.side
            .as_deref()
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty())
    });
    rows.sort_by(|a, b| a.key.cmp(&b.key));
    rows
}

fn strategy_breakdown(ledger: &ClassifiedLedger<'_>) -> Vec<GroupStats> {
    let mut rows = group_breakdown(ledger, |r| {
        let name = r.strategy.as_deref().map(str::trim).unwrap_or_default();
        Some(if name.is_empty() {
            UNKNOWN_STRATEGY.to_string()
        } else {
            name.to_string()
        })
    });
    rows.sort_by(|a, b| {
        b.realized_pnl
            .total_cmp(&a.realized_pnl)
            .then_with(|| a.key.cmp(&b.key))
    });
    rows
}

fn price_breakdown(ledger: &ClassifiedLedger<'_>) -> Vec<PriceBucketStats> {
    let mut rows: Vec<PriceBucketStats> = PriceBucket::ALL
        .iter()
        .map(|&bucket| PriceBucketStats {
            bucket,
            trades: 0,
            closed: 0,
            wins: 0,
            realized_pnl: 0.0,
            win_rate: None,
        })
        .collect();

    let mut tally = |record: &TradeRecord, closed: bool, won: bool| {
        let Some(bucket) = record.entry_price.and_then(PriceBucket::for_price) else {
            return;
        };
        let Some(row) = rows.iter_mut().find(|row| row.bucket == bucket) else {
            return;
        };
        row.trades += 1;
        if closed {
            row.closed += 1;
            row.realized_pnl += record.known_pnl().unwrap_or(0.0);
            if won {
                row.wins += 1;
            }
        }
    };

    for r in &ledger.open {
        tally(*r, false, false);
    }
    for r in &ledger.wins {
        tally(*r, true, true);
    }
    for r in &ledger.losses {
        tally(*r, true, false);
    }

    rows.retain(|row| row.trades > 0);
    for row in &mut rows {
        row.win_rate = ratio_pct(row.wins, row.closed);
    }
    rows
}
