//! matbench: time load, compute and store of Matrix Market files
//!
//! ```bash
//! matbench --input_dir data/ --output_dir out/ --result_dir results/ --threads 8 --check
//! ```

use clap::builder::RangedU64ValueParser;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use matbench::config::{default_threads, BenchConfig, DenseOperation, ProfilerKind, SparseOperation};
use matbench::harness::{configure_threads, Harness};

/// Dense/sparse matrix load-compute-store benchmark
#[derive(Parser, Debug)]
#[command(name = "matbench")]
#[command(version)]
struct Args {
    /// Directory holding the `*dense*` and `*sparse*` matrix files
    #[arg(short = 'i', long = "input_dir", value_name = "DIR", default_value = ".")]
    input_dir: PathBuf,

    /// Directory receiving `<file name>.out`
    #[arg(short = 'o', long = "output_dir", value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Directory receiving dense.csv and sparse.csv
    #[arg(short = 'r', long = "result_dir", value_name = "DIR", default_value = ".")]
    result_dir: PathBuf,

    /// Worker threads for the numeric kernels [default: number of CPUs]
    #[arg(
        short = 't',
        long,
        value_name = "N",
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    threads: Option<usize>,

    /// Verify every result against its input
    #[arg(short = 'c', long)]
    check: bool,

    /// Operation applied to dense matrices
    #[arg(long, value_enum, default_value_t = DenseOperation::ElementwiseSquare)]
    dense_op: DenseOperation,

    /// Operation applied to sparse matrices
    #[arg(long, value_enum, default_value_t = SparseOperation::ElementwiseSquare)]
    sparse_op: SparseOperation,

    /// Profiling backend bracketing each compute phase
    #[arg(long, value_enum, default_value_t = ProfilerKind::None)]
    profiler: ProfilerKind,
}

impl From<Args> for BenchConfig {
    fn from(args: Args) -> Self {
        BenchConfig {
            input_dir: args.input_dir,
            output_dir: args.output_dir,
            result_dir: args.result_dir,
            threads: args.threads.unwrap_or_else(default_threads),
            verify: args.check,
            dense_op: args.dense_op,
            sparse_op: args.sparse_op,
            profiler: args.profiler,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = BenchConfig::from(Args::parse());
    info!(threads = config.threads, "configuring worker threads");

    let outcome = configure_threads(config.threads).and_then(|()| Harness::new(config).run());
    match outcome {
        Ok(summary) => {
            info!(
                dense = summary.dense.len(),
                sparse = summary.sparse.len(),
                "benchmark complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(phase = e.phase(), "{}", e);
            ExitCode::FAILURE
        }
    }
}
