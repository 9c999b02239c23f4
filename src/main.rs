// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Counts canonical facet pairings, the first stage of a census of
//! triangulations.

use std::process;

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use normal_kernel::census::{count_pairings, BoundaryMode, CensusOptions};
use normal_kernel::ProgressTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Boundary {
    /// No boundary facets
    Closed,
    /// At least one boundary facet
    Bounded,
    /// Any number of boundary facets
    Any,
}

impl From<Boundary> for BoundaryMode {
    fn from(b: Boundary) -> Self {
        match b {
            Boundary::Closed => BoundaryMode::Closed,
            Boundary::Bounded => BoundaryMode::Bounded,
            Boundary::Any => BoundaryMode::Any,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "census", version, about = "Count canonical facet pairings")]
struct Cli {
    /// Largest number of simplices to count for
    #[arg(short = 'n', long, default_value_t = 4)]
    size: usize,

    /// Count from this many simplices upward
    #[arg(long, default_value_t = 1)]
    from: usize,

    /// Simplex dimension: 3 for tetrahedra, 2 for triangles
    #[arg(short, long, default_value_t = 3)]
    dimension: usize,

    #[arg(short, long, value_enum, default_value_t = Boundary::Closed)]
    boundary: Boundary,

    /// Skip pairings holding a subgraph that rules out minimal triangulations
    #[arg(long)]
    prune: bool,

    /// Split each count across all cores
    #[arg(short, long)]
    parallel: bool,

    /// Print search statistics after each count
    #[arg(long)]
    stats: bool,

    /// Increase logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn init_logging(&self) {
        let level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        fmt().with_env_filter(filter).with_target(false).init();
    }

    fn options(&self, size: usize) -> CensusOptions {
        CensusOptions {
            dimension: self.dimension,
            size,
            boundary: self.boundary.into(),
            prune_bad_subgraphs: self.prune,
            parallel: self.parallel,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    cli.init_logging();

    for size in cli.from.max(1)..=cli.size {
        let options = cli.options(size);
        let tracker = ProgressTracker::new();
        match count_pairings(&options, Some(&tracker)) {
            Ok(outcome) => {
                println!("{}\t{}", size, outcome.count);
                if cli.stats {
                    println!("{}", outcome.statistics);
                }
                info!(size, count = outcome.count, cancelled = outcome.cancelled, "census level done");
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
    }
}
