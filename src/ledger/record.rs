use std::fmt;

use serde::Serialize;

/// Which list of the snapshot a record came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    /// `trades` list of a status-tagged snapshot.
    Trades,
    /// `closed_positions` list of a position snapshot.
    ClosedPositions,
    /// `positions` list of a position snapshot.
    OpenPositions,
}

impl fmt::Display for RecordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordSource::Trades => "trades",
            RecordSource::ClosedPositions => "closed_positions",
            RecordSource::OpenPositions => "positions",
        };
        f.write_str(name)
    }
}

/// Lifecycle tag of a record after normalization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum TradeStatus {
    Open,
    Win,
    Loss,
    /// Closed early; the outcome follows from the PnL sign.
    Exited,
    /// Closed with no outcome tag at all (`RESOLVED`, `CLOSED`, or a closed position).
    Settled,
    /// A tag this crate does not know about.
    Unrecognized(String),
}

impl TradeStatus {
    /// Maps a raw status tag. Matching ignores case and surrounding whitespace.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "OPEN" | "PENDING" => TradeStatus::Open,
            "WIN" => TradeStatus::Win,
            "LOSS" => TradeStatus::Loss,
            "EXITED" => TradeStatus::Exited,
            "RESOLVED" | "CLOSED" => TradeStatus::Settled,
            _ => TradeStatus::Unrecognized(tag.to_string()),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, TradeStatus::Open)
    }
}

/// One normalized ledger row, whichever snapshot schema it was read from.
#[derive(Clone, Debug, Serialize)]
pub struct TradeRecord {
    /// Position of the record inside its source list.
    pub index: usize,
    pub source: RecordSource,
    pub market: String,
    pub status: TradeStatus,
    pub entry_price: Option<f64>,
    pub exit_price: Option<f64>,
    /// Signed PnL in USD; realized for closed records, mark-to-market for open ones.
    pub pnl: Option<f64>,
    /// Capital put into the trade.
    pub amount: Option<f64>,
    /// Direction held, e.g. YES/NO. Taken from `outcome` when the bot wrote one.
    pub side: Option<String>,
    /// Strategy or opportunity type that opened the trade.
    pub strategy: Option<String>,
}

impl TradeRecord {
    /// PnL usable for classification and sums. NaN is treated as missing.
    pub fn known_pnl(&self) -> Option<f64> {
        self.pnl.filter(|p| p.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tags_map_case_insensitively() {
        assert_eq!(TradeStatus::from_tag("win"), TradeStatus::Win);
        assert_eq!(TradeStatus::from_tag(" LOSS "), TradeStatus::Loss);
        assert_eq!(TradeStatus::from_tag("Exited"), TradeStatus::Exited);
        assert_eq!(TradeStatus::from_tag("PENDING"), TradeStatus::Open);
        assert_eq!(TradeStatus::from_tag("RESOLVED"), TradeStatus::Settled);
        assert_eq!(TradeStatus::from_tag("closed"), TradeStatus::Settled);
        assert_eq!(
            TradeStatus::from_tag("LIQUIDATED"),
            TradeStatus::Unrecognized("LIQUIDATED".to_string())
        );
    }

    #[test]
    fn nan_pnl_is_not_known() {
        let record = TradeRecord {
            index: 0,
            source: RecordSource::Trades,
            market: "X".to_string(),
            status: TradeStatus::Exited,
            entry_price: None,
            exit_price: None,
            pnl: Some(f64::NAN),
            amount: None,
            side: None,
            strategy: None,
        };
        assert!(record.known_pnl().is_none());
    }
}
