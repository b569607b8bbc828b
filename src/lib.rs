pub mod error;
pub mod ledger;
pub mod monitoring;
pub mod news;
pub mod report;
pub mod utils;
pub mod types;

pub use crate::error::{LedgerError, LedgerResult};
pub use crate::types::*;
