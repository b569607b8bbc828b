use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::ledger::{SnapshotSchema, StatsSummary};
use crate::types::{ExitedWithoutPnl, ReportConfig, UnclassifiablePolicy};

#[derive(Serialize)]
struct StartupLog<'a> {
    event: &'a str,
    snapshot: &'a str,
    exited_without_pnl: &'a str,
    on_unclassifiable: &'a str,
    top_n: usize,
}

pub fn log_startup(snapshot: &str, cfg: &ReportConfig) {
    let exited_without_pnl = match cfg.classify.exited_without_pnl {
        ExitedWithoutPnl::Unclassifiable => "unclassifiable",
        ExitedWithoutPnl::Open => "open",
    };
    let on_unclassifiable = match cfg.classify.on_unclassifiable {
        UnclassifiablePolicy::Abort => "abort",
        UnclassifiablePolicy::Skip => "skip",
    };
    let payload = StartupLog {
        event: "startup",
        snapshot,
        exited_without_pnl,
        on_unclassifiable,
        top_n: cfg.display.top_n,
    };
    info!(target: "report", startup = serde_json::to_string(&payload).unwrap_or_default().as_str());
}

#[derive(Serialize)]
struct ReportSummaryLog<'a> {
    event: &'a str,
    generated_at: String,
    snapshot: &'a str,
    schema: SnapshotSchema,
    total_trades: usize,
    open_positions: usize,
    closed_trades: usize,
    wins: usize,
    losses: usize,
    excluded: usize,
    win_rate: Option<f64>,
    total_pnl: f64,
    roi_pct: Option<f64>,
}

/// Emit the recomputed figures as one JSON payload on the `report` target.
pub fn log_summary(snapshot: &str, schema: SnapshotSchema, summary: &StatsSummary) {
    let payload = ReportSummaryLog {
        event: "report_summary",
        generated_at: Utc::now().to_rfc3339(),
        snapshot,
        schema,
        total_trades: summary.total_trades,
        open_positions: summary.open_positions,
        closed_trades: summary.closed_trades,
        wins: summary.wins,
        losses: summary.losses,
        excluded: summary.excluded,
        win_rate: summary.win_rate,
        total_pnl: summary.total_pnl,
        roi_pct: summary.pnl_pct,
    };

    let payload = serde_json::to_string(&payload)
        .unwrap_or_else(|_| "{\"event\":\"report_summary_error\"}".to_string());
    info!(target: "report", "{payload}");
}
