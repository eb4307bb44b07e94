use chrono::Local;
use clap::Parser;
use compute::Report;
use data::EnrichedOrder;
use generate::{generate_orders, write_orders, GenerateOptions};
use preprocess::{preprocess, preprocess_with, DatePolicy};
use rand::{rngs::StdRng, SeedableRng};
use read::load;
use settings::{AnalyzeArgs, Command, GenerateArgs, Settings};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use write::{export_report, write_report};

mod compute;
mod data;
mod generate;
mod preprocess;
mod read;
mod settings;
#[cfg(test)]
mod testing;
mod write;

fn main() -> Result<ExitCode, anyhow::Error> {
    let settings = Settings::parse();
    setup_logging(&settings.log_level);

    match settings.command.unwrap_or_default() {
        Command::Analyze(args) => {
            // Every load/validation failure is reported the same way, and no
            // table gets printed.
            let orders = match load_orders(&args) {
                Ok(orders) => orders,
                Err(e) => {
                    println!("An unexpected error occurred: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            };
            let report = Report::build(&orders, args.top);
            info!("Total revenue: {}", report.monthly.total());
            write_report(std::io::stdout().lock(), &report, args.round)?;
            if let Some(dir) = &args.csv_dir {
                export_report(dir, &orders, &report, args.round)?;
            }
        }
        Command::Generate(args) => generate(&args)?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Logs go to stderr so that stdout only carries the report. `RUST_LOG` wins
/// over `--log-level` when set.
fn setup_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn load_orders(args: &AnalyzeArgs) -> Result<Vec<EnrichedOrder>, data::Error> {
    let table = load(&args.path)?;
    let orders = match args.date_policy() {
        DatePolicy::Strict => preprocess(&table)?,
        policy => preprocess_with(&table, policy)?,
    };
    info!("Aggregating {} orders", orders.len());
    Ok(orders)
}

fn generate(args: &GenerateArgs) -> Result<(), anyhow::Error> {
    let options = GenerateOptions {
        rows: args.rows,
        customers: args.customers,
        ..GenerateOptions::new(args.end_date.unwrap_or_else(|| Local::now().date_naive()))
    };
    let mut rng = StdRng::seed_from_u64(args.seed);
    let orders = generate_orders(&mut rng, &options);
    write_orders(std::fs::File::create(&args.output)?, &orders)?;
    println!("Created and saved to '{}'.", args.output.display());
    Ok(())
}
