//! Benchmark parameters.
//!
//! Defaults reproduce the classic setup: 8M values through an 8K ring, ten
//! runs per variant, 100 ms for the consumer to spin up. Each can be
//! overridden from the environment for shorter or pinned runs.

use crate::BenchError;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_ITERATIONS: usize = 8 * 1024 * 1024;
pub const DEFAULT_CAPACITY: usize = 8 * 1024;
pub const DEFAULT_RUNS: usize = 10;
pub const DEFAULT_WARMUP: Duration = Duration::from_millis(100);

pub const ENV_ITERATIONS: &str = "SPSC_BENCH_ITERATIONS";
pub const ENV_CAPACITY: &str = "SPSC_BENCH_CAPACITY";
pub const ENV_RUNS: &str = "SPSC_BENCH_RUNS";
pub const ENV_WARMUP_MS: &str = "SPSC_BENCH_WARMUP_MS";
pub const ENV_SEED: &str = "SPSC_BENCH_SEED";
pub const ENV_PIN: &str = "SPSC_BENCH_PIN";

/// Cores for the two benchmark threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorePair {
   pub producer: usize,
   pub consumer: usize,
}

impl FromStr for CorePair {
   type Err = ();

   /// `"<producer>,<consumer>"`, e.g. `"2,3"`.
   fn from_str(s: &str) -> Result<Self, ()> {
      let (producer, consumer) = s.split_once(',').ok_or(())?;
      Ok(CorePair {
         producer: producer.trim().parse().map_err(|_| ())?,
         consumer: consumer.trim().parse().map_err(|_| ())?,
      })
   }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
   /// Values pushed through the queue per run.
   pub iterations: usize,
   /// Ring capacity of every queue built for a run.
   pub capacity: usize,
   /// Runs per variant.
   pub runs: usize,
   /// Pause between starting the consumer and starting the clock.
   pub warmup: Duration,
   /// Dataset seed; `None` draws one from the OS.
   pub seed: Option<u64>,
   pub pin: Option<CorePair>,
}

impl Default for BenchConfig {
   fn default() -> Self {
      Self {
         iterations: DEFAULT_ITERATIONS,
         capacity: DEFAULT_CAPACITY,
         runs: DEFAULT_RUNS,
         warmup: DEFAULT_WARMUP,
         seed: None,
         pin: None,
      }
   }
}

impl BenchConfig {
   /// Defaults with `SPSC_BENCH_*` overrides from the process environment.
   pub fn from_env() -> Result<Self, BenchError> {
      Self::from_lookup(|key| std::env::var(key).ok())
   }

   /// Defaults with overrides from `lookup`. Unset keys keep the default;
   /// unparsable values are rejected.
   pub fn from_lookup<F>(lookup: F) -> Result<Self, BenchError>
   where
      F: Fn(&str) -> Option<String>,
   {
      let mut config = Self::default();
      if let Some(n) = parse(&lookup, ENV_ITERATIONS)? {
         config.iterations = n;
      }
      if let Some(c) = parse(&lookup, ENV_CAPACITY)? {
         config.capacity = c;
      }
      if let Some(r) = parse(&lookup, ENV_RUNS)? {
         config.runs = r;
      }
      if let Some(ms) = parse(&lookup, ENV_WARMUP_MS)? {
         config.warmup = Duration::from_millis(ms);
      }
      config.seed = parse(&lookup, ENV_SEED)?;
      config.pin = parse(&lookup, ENV_PIN)?;

      if config.runs == 0 {
         return Err(BenchError::InvalidSetting { key: ENV_RUNS, value: "0".into() });
      }
      Ok(config)
   }
}

fn parse<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, BenchError>
where
   F: Fn(&str) -> Option<String>,
   T: FromStr,
{
   match lookup(key) {
      None => Ok(None),
      Some(value) => match value.trim().parse() {
         Ok(parsed) => Ok(Some(parsed)),
         Err(_) => Err(BenchError::InvalidSetting { key, value }),
      },
   }
}
