use crate::ledger::{worst_trades, ClassifiedLedger, EmbeddedStats, GroupStats, StatsSummary, TradeRecord};
use crate::types::DisplayConfig;

const RULE: &str = "============================================================";

/// Amounts that round to zero cents print as zero, never `-0.00`.
fn cents(value: f64) -> f64 {
    if value.abs() < 0.005 {
        0.0
    } else {
        value
    }
}

/// `$12.50`.
pub fn usd(value: f64) -> String {
    format!("${:.2}", cents(value))
}

/// `+$12.50` / `-$3.00`.
pub fn signed_usd(value: f64) -> String {
    let value = cents(value);
    if value < 0.0 {
        format!("-${:.2}", -value)
    } else {
        format!("+${value:.2}")
    }
}

fn opt_signed_usd(value: Option<f64>) -> String {
    value.map(signed_usd).unwrap_or_else(|| "N/A".to_string())
}

/// Percentage with one decimal, or `N/A`.
pub fn pct_or_na(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.1}%"))
        .unwrap_or_else(|| "N/A".to_string())
}

fn price_or_na(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.4}"))
        .unwrap_or_else(|| "N/A".to_string())
}

/// Cut `text` to at most `width` characters without splitting a code point.
pub fn truncate_chars(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

fn count_or_unknown(value: Option<u64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "?".to_string())
}

fn record_row(record: &TradeRecord, market_width: usize) -> String {
    format!(
        "  {} | {} -> {} | {}",
        opt_signed_usd(record.known_pnl()),
        price_or_na(record.entry_price),
        price_or_na(record.exit_price),
        truncate_chars(&record.market, market_width)
    )
}

fn group_rows(title: &str, rows: &[GroupStats]) -> Vec<String> {
    if rows.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![String::new(), format!("=== {title} ===")];
    lines.extend(rows.iter().map(|row| {
        format!(
            "  {:<16} trades {:>4} | {}W / {}L | WR {:>6} | PnL {}",
            truncate_chars(&row.key, 16),
            row.trades,
            row.wins,
            row.losses,
            pct_or_na(row.win_rate),
            signed_usd(row.realized_pnl)
        )
    }));
    lines
}

fn cross_check_line(summary: &StatsSummary, embedded: &EmbeddedStats) -> Option<String> {
    if embedded.wins.is_none() && embedded.losses.is_none() {
        return None;
    }
    let agrees = embedded.wins == Some(summary.wins as u64)
        && embedded.losses == Some(summary.losses as u64);
    Some(format!(
        "Stored in snapshot: {}W / {}L | Recomputed (authoritative): {}W / {}L{}",
        count_or_unknown(embedded.wins),
        count_or_unknown(embedded.losses),
        summary.wins,
        summary.losses,
        if agrees { "" } else { " [MISMATCH]" }
    ))
}

/// Render the plain-text ledger report.
///
/// Pure formatting: the buckets in `ledger` must already be classified and
/// `summary` computed from the same ledger.
pub fn render_report(
    summary: &StatsSummary,
    ledger: &ClassifiedLedger<'_>,
    embedded: Option<&EmbeddedStats>,
    display: &DisplayConfig,
) -> String {
    let mut lines = vec![
        RULE.to_string(),
        " LEDGER REPORT".to_string(),
        RULE.to_string(),
        format!("Total trades:    {}", summary.total_trades),
        format!("Open:            {}", summary.open_positions),
        format!("Closed:          {}", summary.closed_trades),
        format!(
            "Wins: {} | Losses: {} (breakeven: {})",
            summary.wins, summary.losses, summary.breakeven
        ),
    ];
    if summary.excluded > 0 {
        lines.push(format!("Excluded:        {} (unclassifiable)", summary.excluded));
    }
    lines.extend([
        format!("Win rate:        {}", pct_or_na(summary.win_rate)),
        format!("Invested:        {}", usd(summary.total_invested)),
        format!("Realized PnL:    {}", signed_usd(summary.realized_pnl)),
        format!("Unrealized PnL:  {}", signed_usd(summary.unrealized_pnl)),
        format!("Total PnL:       {}", signed_usd(summary.total_pnl)),
        format!("ROI:             {}", pct_or_na(summary.pnl_pct)),
        format!("Realized ROI:    {}", pct_or_na(summary.roi_realized)),
        format!(
            "Avg trade size:  {}",
            summary
                .avg_trade_size
                .map(usd)
                .unwrap_or_else(|| "N/A".to_string())
        ),
        format!(
            "Best / worst:    {} / {}",
            opt_signed_usd(summary.best_trade),
            opt_signed_usd(summary.worst_trade)
        ),
    ]);

    if let Some(line) = embedded.and_then(|e| cross_check_line(summary, e)) {
        lines.push(String::new());
        lines.push(line);
    }

    if !summary.by_entry_price.is_empty() {
        lines.push(String::new());
        lines.push("=== BY ENTRY PRICE ===".to_string());
        for row in &summary.by_entry_price {
            lines.push(format!(
                "  {:<10} trades {:>4} | closed {:>4} | wins {:>4} | WR {:>6} | PnL {}",
                row.bucket.label(),
                row.trades,
                row.closed,
                row.wins,
                pct_or_na(row.win_rate),
                signed_usd(row.realized_pnl)
            ));
        }
    }
    lines.extend(group_rows("BY SIDE", &summary.by_side));
    lines.extend(group_rows("BY STRATEGY", &summary.by_strategy));

    for (title, bucket) in [("WINS", &ledger.wins), ("LOSSES", &ledger.losses)] {
        lines.push(String::new());
        lines.push(format!("=== {title} ==="));
        if bucket.is_empty() {
            lines.push("  (none)".to_string());
        }
        lines.extend(
            bucket
                .iter()
                .take(display.top_n)
                .map(|r| record_row(r, display.market_width)),
        );
    }

    let worst = worst_trades(ledger, display.worst_n);
    if !worst.is_empty() {
        lines.push(String::new());
        lines.push(format!("=== WORST {} TRADES ===", worst.len()));
        lines.extend(worst.iter().map(|r| record_row(r, display.market_width)));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
