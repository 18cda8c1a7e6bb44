use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use gap_branch_and_price::dataset;
use gap_branch_and_price::driver::{BranchAndPriceDriver, DriverResult};
use gap_branch_and_price::lp_engine::ClarabelEngine;
use gap_branch_and_price::reference;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Dataset {
    SmallExample,
    MediumExample,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    Standalone,
    BranchAndPrice,
    Both,
}

/// Exact branch-and-price solver for the Generalized Assignment Problem.
#[derive(Debug, Parser)]
#[command(name = "gap-solve")]
struct Cli {
    /// Named example instance to solve.
    #[arg(value_enum)]
    dataset: Dataset,

    /// Which model(s) to run.
    #[arg(long, value_enum, default_value = "both")]
    method: Method,

    /// Raise logging verbosity; repeat for more (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let problem = match cli.dataset {
        Dataset::SmallExample => dataset::small_example(),
        Dataset::MediumExample => dataset::medium_example(),
    };

    if matches!(cli.method, Method::Standalone | Method::Both) {
        let bound = reference::standalone_lp_relaxation::<ClarabelEngine>(&problem);
        tracing::info!(bound, "standalone LP relaxation");
        println!("standalone LP relaxation bound: {bound:.4}");
    }

    if matches!(cli.method, Method::BranchAndPrice | Method::Both) {
        let driver = BranchAndPriceDriver::<ClarabelEngine>::new(&problem);
        match driver.solve()? {
            DriverResult::Found(incumbent) => {
                tracing::info!(objective = incumbent.objective, "branch-and-price incumbent");
                println!("branch-and-price optimum: {:.4}", incumbent.objective);
                for (machine, tasks) in &incumbent.schedule {
                    println!("  machine {machine}: {tasks:?}");
                }
            }
            DriverResult::NoIncumbent => {
                tracing::info!("no integer-feasible solution found");
                println!("no integer-feasible solution found");
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
