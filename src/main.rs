use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use polymarket_ledger_report::{
    monitoring::{self, metrics::RunMetrics},
    news, report,
    types::{ExitedWithoutPnl, ReportConfig, UnclassifiablePolicy},
};

#[derive(Parser, Debug)]
#[command(name = "ledger-report")]
#[command(about = "Recompute win/loss and PnL statistics from trading bot snapshots", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Example rows printed per outcome bucket
    #[arg(long)]
    top_n: Option<usize>,

    /// Characters of market text shown per row
    #[arg(long)]
    market_width: Option<usize>,

    /// Rows in the worst-trades list
    #[arg(long)]
    worst_n: Option<usize>,

    /// How to treat EXITED trades that carry no PnL
    #[arg(long)]
    exited_without_pnl: Option<ExitedWithoutPnl>,

    /// Abort the run or skip records that cannot be classified
    #[arg(long)]
    on_unclassifiable: Option<UnclassifiablePolicy>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the performance report for a snapshot
    Report {
        /// Snapshot JSON file
        #[arg(default_value = "simulation_data.json")]
        snapshot: PathBuf,
    },
    /// Score a news headline with the keyword relevance heuristic
    Relevance {
        /// Headline text
        title: String,
    },
}

impl Cli {
    fn report_config(&self) -> anyhow::Result<ReportConfig> {
        let mut cfg = match &self.config {
            Some(path) => ReportConfig::from_file(path)?,
            None => ReportConfig::default(),
        };
        if let Some(top_n) = self.top_n {
            cfg.display.top_n = top_n;
        }
        if let Some(width) = self.market_width {
            cfg.display.market_width = width;
        }
        if let Some(worst_n) = self.worst_n {
            cfg.display.worst_n = worst_n;
        }
        if let Some(policy) = self.exited_without_pnl {
            cfg.classify.exited_without_pnl = policy;
        }
        if let Some(policy) = self.on_unclassifiable {
            cfg.classify.on_unclassifiable = policy;
        }
        Ok(cfg)
    }
}

fn run(mut cli: Cli) -> anyhow::Result<()> {
    let command = cli.command.take().unwrap_or(Commands::Report {
        snapshot: PathBuf::from("simulation_data.json"),
    });

    match command {
        Commands::Report { snapshot } => {
            let cfg = cli.report_config()?;
            tracing::debug!(target: "report", config = ?cli.config, "config resolved");

            let name = snapshot.display().to_string();
            monitoring::logger::log_startup(&name, &cfg);

            let metrics = RunMetrics::new();
            let stdout = io::stdout();
            let mut out = stdout.lock();
            report::run_report(&snapshot, &cfg, &metrics, &mut out)?;
        }
        Commands::Relevance { title } => {
            println!("[{}] {}", news::relevance(&title), title);
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("polymarket_ledger_report=info,report=info,ledger=info,metrics=info,warn")
    });
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .json()
        .finish();

    let cli = Cli::parse();

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(target: "report", "ledger-report starting");
        run(cli)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults_without_config_file() {
        let cli = Cli::try_parse_from([
            "ledger-report",
            "--top-n",
            "3",
            "--market-width",
            "20",
            "--worst-n",
            "1",
            "--exited-without-pnl",
            "open",
            "--on-unclassifiable",
            "skip",
            "report",
            "snap.json",
        ])
        .unwrap();
        assert!(cli.config.is_none());

        let cfg = cli.report_config().unwrap();
        assert_eq!(cfg.display.top_n, 3);
        assert_eq!(cfg.display.market_width, 20);
        assert_eq!(cfg.display.worst_n, 1);
        assert_eq!(cfg.classify.exited_without_pnl, ExitedWithoutPnl::Open);
        assert_eq!(cfg.classify.on_unclassifiable, UnclassifiablePolicy::Skip);
        assert!(matches!(cli.command, Some(Commands::Report { ref snapshot }) if snapshot == &PathBuf::from("snap.json")));
    }

    #[test]
    fn no_flags_keep_default_config() {
        let cli = Cli::try_parse_from(["ledger-report"]).unwrap();
        let cfg = cli.report_config().unwrap();
        assert_eq!(cfg.display.top_n, 10);
        assert_eq!(cfg.display.market_width, 45);
        assert_eq!(cfg.display.worst_n, 5);
        assert_eq!(cfg.classify.exited_without_pnl, ExitedWithoutPnl::Unclassifiable);
        assert_eq!(cfg.classify.on_unclassifiable, UnclassifiablePolicy::Abort);
        assert!(cli.command.is_none());
    }

    #[test]
    fn flags_override_config_file_values() {
        let path = std::env::temp_dir().join(format!("ledger-report-cli-{}.toml", std::process::id()));
        std::fs::write(&path, "[display]\ntop_n = 7\nmarket_width = 30\n").unwrap();
        let path_str = path.display().to_string();

        let cli = Cli::try_parse_from(["ledger-report", "-c", path_str.as_str(), "--top-n", "2"]).unwrap();
        let cfg = cli.report_config().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(cfg.display.top_n, 2);
        assert_eq!(cfg.display.market_width, 30);
    }
}
