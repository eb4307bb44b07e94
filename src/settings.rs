use crate::{compute::TOP_CUSTOMERS, preprocess::DatePolicy};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Revenue roll-ups by month, product and customer for an orders file
#[derive(Parser, Debug, Clone)]
#[command(name = "orders", version)]
pub(crate) struct Settings {
    /// Logging level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn", value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: String,

    // `None` runs `analyze orders.csv`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub(crate) enum Command {
    /// Print revenue by month, product and customer, then the top customers
    Analyze(AnalyzeArgs),
    /// Write a synthetic orders file
    Generate(GenerateArgs),
}

impl Default for Command {
    fn default() -> Self {
        Command::Analyze(AnalyzeArgs::default())
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub(crate) struct AnalyzeArgs {
    /// Orders CSV file
    #[arg(default_value = "orders.csv")]
    pub path: PathBuf,

    /// Number of customers on the leaderboard
    #[arg(long, default_value_t = TOP_CUSTOMERS)]
    pub top: usize,

    /// Round printed totals to this many decimal places
    #[arg(long)]
    pub round: Option<u32>,

    /// Skip rows whose order_date doesn't parse instead of failing
    #[arg(long)]
    pub drop_invalid_dates: bool,

    /// Also write every table as a CSV file into this directory
    #[arg(long)]
    pub csv_dir: Option<PathBuf>,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            path: PathBuf::from("orders.csv"),
            top: TOP_CUSTOMERS,
            round: None,
            drop_invalid_dates: false,
            csv_dir: None,
        }
    }
}

impl AnalyzeArgs {
    pub fn date_policy(&self) -> DatePolicy {
        if self.drop_invalid_dates {
            DatePolicy::DropInvalid
        } else {
            DatePolicy::Strict
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub(crate) struct GenerateArgs {
    /// Number of orders
    #[arg(long, default_value_t = 10_000)]
    pub rows: usize,

    /// Number of distinct customers
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    pub customers: u32,

    /// Random seed
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Last possible order date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Output file
    #[arg(short, long, default_value = "orders.csv")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::{AnalyzeArgs, Command, Settings};
    use crate::preprocess::DatePolicy;
    use chrono::NaiveDate;
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;

    #[test]
    fn cli_is_consistent() {
        Settings::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_analyze_orders_csv() {
        let settings = Settings::try_parse_from(["orders"]).unwrap();
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.command.unwrap_or_default(), Command::Analyze(AnalyzeArgs::default()));
    }

    #[test]
    fn analyze_args() {
        let settings = Settings::try_parse_from([
            "orders",
            "analyze",
            "data/orders.csv",
            "--top",
            "3",
            "--round",
            "2",
            "--drop-invalid-dates",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(settings.log_level, "debug");
        let Some(Command::Analyze(args)) = settings.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.path, PathBuf::from("data/orders.csv"));
        assert_eq!(args.top, 3);
        assert_eq!(args.round, Some(2));
        assert_eq!(args.date_policy(), DatePolicy::DropInvalid);
        assert_eq!(args.csv_dir, None);
        assert_eq!(AnalyzeArgs::default().date_policy(), DatePolicy::Strict);
    }

    #[test]
    fn generate_args() {
        let settings = Settings::try_parse_from([
            "orders",
            "generate",
            "--rows",
            "25",
            "--seed",
            "42",
            "--end-date",
            "2024-06-30",
        ])
        .unwrap();
        let Some(Command::Generate(args)) = settings.command else {
            panic!("expected generate");
        };
        assert_eq!(args.rows, 25);
        assert_eq!(args.customers, 100);
        assert_eq!(args.seed, 42);
        assert_eq!(args.end_date, NaiveDate::from_ymd_opt(2024, 6, 30));
        assert_eq!(args.output, PathBuf::from("orders.csv"));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Settings::try_parse_from(["orders", "generate", "--end-date", "30/06/2024"]).is_err());
        assert!(Settings::try_parse_from(["orders", "generate", "--customers", "0"]).is_err());
        assert!(Settings::try_parse_from(["orders", "--log-level", "loud"]).is_err());
    }
}
