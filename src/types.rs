use std::fs;

use anyhow::Context;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// What to do with an EXITED record that carries no PnL.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExitedWithoutPnl {
    /// Treat it as an unclassifiable record.
    #[default]
    Unclassifiable,
    /// Keep it in the open bucket.
    Open,
}

/// What to do when a record cannot be placed into OPEN/WIN/LOSS.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UnclassifiablePolicy {
    /// Fail the whole run.
    #[default]
    Abort,
    /// Drop the record, count it as excluded and log a warning.
    Skip,
}

/// Classification knobs shared by `classify`, `partition` and `aggregate`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassifyPolicy {
    #[serde(default)]
    pub exited_without_pnl: ExitedWithoutPnl,
    #[serde(default)]
    pub on_unclassifiable: UnclassifiablePolicy,
}

fn default_top_n() -> usize {
    10
}

fn default_market_width() -> usize {
    45
}

fn default_worst_n() -> usize {
    5
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Example rows printed per outcome bucket.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Maximum characters of market text per row.
    #[serde(default = "default_market_width")]
    pub market_width: usize,
    /// Rows in the worst-trades list.
    #[serde(default = "default_worst_n")]
    pub worst_n: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            market_width: default_market_width(),
            worst_n: default_worst_n(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub classify: ClassifyPolicy,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl ReportConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {path}"))?;
        let cfg: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to deserialize TOML config at {path}"))?;
        Ok(cfg)
    }
}
