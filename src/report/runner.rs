use std::io::Write;
use std::path::Path;

use anyhow::Context;
use tracing::info_span;

use crate::{
    ledger::{load_ledger, partition, summarize, StatsSummary},
    monitoring::{
        logger::log_summary,
        metrics::{log_metrics_snapshot, RunMetrics},
    },
    report::render::render_report,
    types::ReportConfig,
};

/// Load a snapshot, recompute its statistics and write the text report to `out`.
///
/// Nothing is written when loading or classification fails.
pub fn run_report<W: Write>(
    snapshot_path: &Path,
    cfg: &ReportConfig,
    metrics: &RunMetrics,
    out: &mut W,
) -> anyhow::Result<StatsSummary> {
    let name = snapshot_path.display().to_string();
    let span = info_span!(target: "report", "report_run", snapshot = %name);
    let _guard = span.enter();

    let snapshot = load_ledger(snapshot_path)?;
    metrics.record_snapshot(&name, snapshot.records.len());

    let ledger = partition(&snapshot.records, &cfg.classify)?;
    metrics.record_classification(ledger.classified_len(), ledger.excluded.len());

    let summary = summarize(&ledger);
    let text = render_report(
        &summary,
        &ledger,
        snapshot.embedded_stats.as_ref(),
        &cfg.display,
    );

    out.write_all(text.as_bytes())
        .context("failed to write report")?;
    out.flush().context("failed to flush report")?;
    metrics.record_report();

    log_summary(&name, snapshot.schema, &summary);
    log_metrics_snapshot(&metrics.snapshot());

    Ok(summary)
}
