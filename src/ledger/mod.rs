pub mod aggregate;
pub mod classify;
pub mod record;
pub mod snapshot;

pub use aggregate::{
    aggregate, summarize, worst_trades, GroupStats, PriceBucket, PriceBucketStats, StatsSummary,
    UNKNOWN_STRATEGY,
};
pub use classify::{classify, partition, ClassifiedLedger, Outcome};
pub use record::{RecordSource, TradeRecord, TradeStatus};
pub use snapshot::{load_ledger, parse_snapshot, EmbeddedStats, Snapshot, SnapshotSchema};
