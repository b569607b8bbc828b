use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::record::{RecordSource, TradeRecord, TradeStatus};

/// The two snapshot layouts produced by the trading bots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotSchema {
    /// `{"trades": [...]}` with an explicit status tag per trade.
    StatusTagged,
    /// `{"closed_positions": [...], "positions": [...]}` where outcome follows PnL sign.
    PositionBased,
}

/// Pre-computed summary stored by the bot. Shown as a cross-check only.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct EmbeddedStats {
    #[serde(default)]
    pub total_trades: Option<u64>,
    #[serde(default)]
    pub open_positions: Option<u64>,
    #[serde(default)]
    pub closed_trades: Option<u64>,
    #[serde(default)]
    pub wins: Option<u64>,
    #[serde(default)]
    pub losses: Option<u64>,
    #[serde(default)]
    pub win_rate: Option<f64>,
    #[serde(default)]
    pub total_invested: Option<f64>,
    #[serde(default)]
    pub realized_pnl: Option<f64>,
    #[serde(default)]
    pub unrealized_pnl: Option<f64>,
    #[serde(default)]
    pub total_pnl: Option<f64>,
    #[serde(default)]
    pub pnl_pct: Option<f64>,
}

/// A fully materialized snapshot, normalized into one record shape.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub schema: SnapshotSchema,
    pub records: Vec<TradeRecord>,
    pub embedded_stats: Option<EmbeddedStats>,
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    trades: Option<Vec<RawTrade>>,
    #[serde(default)]
    closed_positions: Option<Vec<RawPosition>>,
    #[serde(default)]
    positions: Option<Vec<RawPosition>>,
    #[serde(default)]
    stats: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawTrade {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    pnl_usd: Option<f64>,
    #[serde(default)]
    entry_price: Option<f64>,
    #[serde(default)]
    exit_price: Option<f64>,
    #[serde(default)]
    market: Option<String>,
    #[serde(default)]
    side: Option<String>,
    #[serde(default)]
    outcome: Option<String>,
    #[serde(default)]
    strategy: Option<String>,
    #[serde(default)]
    amount_usd: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawPosition {
    #[serde(default)]
    pnl: Option<f64>,
    #[serde(default)]
    unrealized_pnl: Option<f64>,
    #[serde(default)]
    market_question: Option<String>,
    #[serde(default)]
    entry_price: Option<f64>,
    #[serde(default)]
    exit_price: Option<f64>,
    #[serde(default)]
    side: Option<String>,
    #[serde(default, alias = "strategy")]
    opportunity_type: Option<String>,
    #[serde(default)]
    amount: Option<f64>,
}

/// Read and normalize a snapshot file.
pub fn load_ledger(path: &Path) -> LedgerResult<Snapshot> {
    let name = path.display().to_string();
    let contents = fs::read_to_string(path)
        .map_err(|e| LedgerError::malformed(&name, format!("failed to read file: {e}")))?;
    parse_snapshot(&name, &contents)
}

/// Normalize snapshot JSON held in memory. `source_name` only feeds diagnostics.
pub fn parse_snapshot(source_name: &str, contents: &str) -> LedgerResult<Snapshot> {
    if contents.trim().is_empty() {
        return Err(LedgerError::malformed(source_name, "snapshot is empty"));
    }

    let raw: RawSnapshot = serde_json::from_str(contents)
        .map_err(|e| LedgerError::malformed(source_name, format!("invalid JSON: {e}")))?;

    let embedded_stats = raw.stats.and_then(|value| parse_embedded_stats(source_name, value));

    let (schema, records) = match (raw.trades, raw.closed_positions) {
        (Some(trades), closed) => {
            if closed.is_some() {
                warn!(
                    target: "ledger",
                    snapshot = %source_name,
                    "snapshot holds both `trades` and `closed_positions`; using `trades`"
                );
            }
            (SnapshotSchema::StatusTagged, normalize_trades(source_name, trades)?)
        }
        (None, Some(closed)) => (
            SnapshotSchema::PositionBased,
            normalize_positions(source_name, closed, raw.positions.unwrap_or_default())?,
        ),
        (None, None) => {
            return Err(LedgerError::malformed(
                source_name,
                "expected a `trades` or `closed_positions` array at the top level",
            ))
        }
    };

    debug!(
        target: "ledger",
        snapshot = %source_name,
        schema = ?schema,
        records = records.len(),
        embedded_stats = embedded_stats.is_some(),
        "snapshot loaded"
    );

    Ok(Snapshot {
        schema,
        records,
        embedded_stats,
    })
}

fn parse_embedded_stats(source_name: &str, value: serde_json::Value) -> Option<EmbeddedStats> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(stats) => Some(stats),
        Err(e) => {
            // Display-only; never fails the run.
            warn!(
                target: "ledger",
                snapshot = %source_name,
                error = %e,
                "ignoring unreadable embedded stats"
            );
            None
        }
    }
}

fn normalize_trades(source_name: &str, trades: Vec<RawTrade>) -> LedgerResult<Vec<TradeRecord>> {
    trades
        .into_iter()
        .enumerate()
        .map(|(index, t)| -> LedgerResult<TradeRecord> {
            let tag = t.status.ok_or_else(|| {
                LedgerError::malformed(source_name, format!("trades[{index}] has no `status` field"))
            })?;
            Ok(TradeRecord {
                index,
                source: RecordSource::Trades,
                market: t.market.unwrap_or_default(),
                status: TradeStatus::from_tag(&tag),
                entry_price: t.entry_price,
                exit_price: t.exit_price,
                pnl: t.pnl_usd,
                amount: t.amount_usd,
                side: t.outcome.or(t.side),
                strategy: t.strategy,
            })
        })
        .collect()
}

fn normalize_positions(
    source_name: &str,
    closed: Vec<RawPosition>,
    open: Vec<RawPosition>,
) -> LedgerResult<Vec<TradeRecord>> {
    let mut records = Vec::with_capacity(closed.len() + open.len());

    for (index, p) in closed.into_iter().enumerate() {
        let pnl = p.pnl.ok_or_else(|| {
            LedgerError::malformed(
                source_name,
                format!("closed_positions[{index}] has no numeric `pnl` field"),
            )
        })?;
        records.push(TradeRecord {
            index,
            source: RecordSource::ClosedPositions,
            market: p.market_question.unwrap_or_default(),
            status: TradeStatus::Settled,
            entry_price: p.entry_price,
            exit_price: p.exit_price,
            pnl: Some(pnl),
            amount: p.amount,
            side: p.side,
            strategy: p.opportunity_type,
        });
    }

    for (index, p) in open.into_iter().enumerate() {
        records.push(TradeRecord {
            index,
            source: RecordSource::OpenPositions,
            market: p.market_question.unwrap_or_default(),
            status: TradeStatus::Open,
            entry_price: p.entry_price,
            exit_price: None,
            pnl: p.unrealized_pnl,
            amount: p.amount,
            side: p.side,
            strategy: p.opportunity_type,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(err: LedgerError) -> String {
        match err {
            LedgerError::MalformedSnapshot { reason, .. } => reason,
            other => panic!("expected MalformedSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn parses_status_tagged_trades_in_order() {
        let json = r#"{"trades":[
            {"status":"WIN","pnl_usd":12.5,"entry_price":0.4,"exit_price":0.6,"market":"X","amount_usd":5.0},
            {"status":"EXITED","pnl_usd":-3.0,"entry_price":0.5,"market":"Y"},
            {"status":"OPEN","entry_price":0.3,"market":"Z","side":"BUY"}
        ]}"#;

        let snap = parse_snapshot("mem", json).unwrap();
        assert_eq!(snap.schema, SnapshotSchema::StatusTagged);
        assert!(snap.embedded_stats.is_none());
        let markets: Vec<&str> = snap.records.iter().map(|r| r.market.as_str()).collect();
        assert_eq!(markets, vec!["X", "Y", "Z"]);
        assert_eq!(snap.records[0].status, TradeStatus::Win);
        assert_eq!(snap.records[0].amount, Some(5.0));
        assert_eq!(snap.records[1].exit_price, None);
        assert_eq!(snap.records[2].pnl, None);
        assert_eq!(snap.records[2].side.as_deref(), Some("BUY"));
        assert_eq!(snap.records[2].strategy, None);
    }

    #[test]
    fn parses_position_snapshot_with_stats() {
        let json = r#"{
            "closed_positions":[
                {"pnl":1.5,"market_question":"Will A?","status":"CLOSED","amount":2.0},
                {"pnl":0,"market_question":"Will B?","status":"RESOLVED"}
            ],
            "positions":[{"market_question":"Will C?","unrealized_pnl":-0.25,"amount":2.0}],
            "stats":{"wins":5,"losses":0,"total_scans":99}
        }"#;

        let snap = parse_snapshot("mem", json).unwrap();
        assert_eq!(snap.schema, SnapshotSchema::PositionBased);
        assert_eq!(snap.records.len(), 3);
        assert_eq!(snap.records[0].status, TradeStatus::Settled);
        assert_eq!(snap.records[1].pnl, Some(0.0));
        assert_eq!(snap.records[2].source, RecordSource::OpenPositions);
        assert_eq!(snap.records[2].pnl, Some(-0.25));
        let stats = snap.embedded_stats.unwrap();
        assert_eq!(stats.wins, Some(5));
        assert_eq!(stats.losses, Some(0));
    }

    #[test]
    fn outcome_wins_over_order_side() {
        let json = r#"{"trades":[
            {"status":"WIN","side":"BUY","outcome":"NO","strategy":"swing","market":"X"},
            {"status":"LOSS","side":"YES","market":"Y"}
        ]}"#;
        let snap = parse_snapshot("mem", json).unwrap();
        assert_eq!(snap.records[0].side.as_deref(), Some("NO"));
        assert_eq!(snap.records[0].strategy.as_deref(), Some("swing"));
        assert_eq!(snap.records[1].side.as_deref(), Some("YES"));
    }

    #[test]
    fn positions_carry_opportunity_type_as_strategy() {
        let json = r#"{"closed_positions":[
            {"pnl":1.0,"market_question":"A","side":"YES","opportunity_type":"momentum"}
        ]}"#;
        let snap = parse_snapshot("mem", json).unwrap();
        assert_eq!(snap.records[0].strategy.as_deref(), Some("momentum"));
        assert_eq!(snap.records[0].side.as_deref(), Some("YES"));
    }

    #[test]
    fn missing_top_level_key_is_malformed() {
        let err = parse_snapshot("mem", r#"{"open_trades":[]}"#).unwrap_err();
        assert!(reason(err).contains("`trades` or `closed_positions`"));
    }

    #[test]
    fn empty_and_invalid_input_is_malformed() {
        assert!(reason(parse_snapshot("mem", "   ").unwrap_err()).contains("empty"));
        assert!(reason(parse_snapshot("mem", "{not json").unwrap_err()).contains("invalid JSON"));
        assert!(reason(parse_snapshot("mem", "[1,2]").unwrap_err()).contains("invalid JSON"));
    }

    #[test]
    fn trade_without_status_is_malformed() {
        let err = parse_snapshot("mem", r#"{"trades":[{"pnl_usd":1.0,"market":"X"}]}"#).unwrap_err();
        assert!(reason(err).contains("trades[0]"));
    }

    #[test]
    fn closed_position_without_pnl_is_malformed() {
        let json = r#"{"closed_positions":[{"pnl":1.0,"market_question":"A"},{"market_question":"B"}]}"#;
        let err = parse_snapshot("mem", json).unwrap_err();
        assert!(reason(err).contains("closed_positions[1]"));
    }

    #[test]
    fn non_numeric_pnl_is_malformed() {
        let json = r#"{"trades":[{"status":"EXITED","pnl_usd":"lots","market":"X"}]}"#;
        assert!(parse_snapshot("mem", json).is_err());
    }

    #[test]
    fn unreadable_stats_block_is_ignored() {
        let json = r#"{"trades":[],"stats":{"wins":"many"}}"#;
        let snap = parse_snapshot("mem", json).unwrap();
        assert!(snap.records.is_empty());
        assert!(snap.embedded_stats.is_none());
    }

    #[test]
    fn trades_take_precedence_over_closed_positions() {
        let json = r#"{"trades":[{"status":"OPEN","market":"X"}],"closed_positions":[{"pnl":1.0}]}"#;
        let snap = parse_snapshot("mem", json).unwrap();
        assert_eq!(snap.schema, SnapshotSchema::StatusTagged);
        assert_eq!(snap.records.len(), 1);
    }

    #[test]
    fn missing_file_is_malformed() {
        let err = load_ledger(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(reason(err).contains("failed to read file"));
    }
}
