use crate::ledger::record::RecordSource;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("malformed snapshot {source_name}: {reason}")]
    MalformedSnapshot { source_name: String, reason: String },

    #[error("unclassifiable record #{index} in {origin} ({market:?}): {reason}")]
    UnclassifiableRecord {
        index: usize,
        origin: RecordSource,
        market: String,
        reason: String,
    },
}

impl LedgerError {
    pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        LedgerError::MalformedSnapshot {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
