use clap::Parser;
use mechanical_sympathy::trace::init_tracing;
use mechanical_sympathy::variant::run_selected;
use mechanical_sympathy::{BenchConfig, BenchError, ConsoleReporter};
use std::io;
use std::process::ExitCode;
use tracing::error;

/// SPSC queue throughput, from a locked ring to padded cached counters.
///
/// Tunables come from the environment: SPSC_BENCH_ITERATIONS,
/// SPSC_BENCH_CAPACITY, SPSC_BENCH_RUNS, SPSC_BENCH_WARMUP_MS,
/// SPSC_BENCH_SEED, SPSC_BENCH_PIN (e.g. "2,3").
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
   /// Variants to run, in order (1-9).
   #[arg(allow_hyphen_values = true)]
   codes: Vec<String>,
}

fn main() -> ExitCode {
   init_tracing();
   let args = Args::parse();
   match run(&args) {
      Ok(0) => ExitCode::SUCCESS,
      Ok(_) => ExitCode::FAILURE,
      Err(err) => {
         error!(%err, "benchmark aborted");
         ExitCode::FAILURE
      }
   }
}

fn run(args: &Args) -> Result<usize, BenchError> {
   let config = BenchConfig::from_env()?;
   let stdout = io::stdout();
   let mut reporter = ConsoleReporter::new(stdout.lock());
   run_selected(args.codes.as_slice(), &config, &mut reporter)
}
