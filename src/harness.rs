//! Two-thread throughput harness.
//!
//! One run: a consumer thread polls exactly N values and sums them while the
//! calling thread offers the dataset in order. Both sides spin on full/empty.
//! The clock covers the producer's whole push phase up to the consumer
//! handing back its sum.

use crate::affinity;
use crate::{BenchConfig, BenchError, ConfigError, Dataset, Reporter, SpscQueue};
use crossbeam::channel;
use crossbeam::utils::Backoff;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Expected and observed consumer sums for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checksum {
   pub expected: i64,
   pub actual: i64,
}

impl Checksum {
   pub fn is_match(&self) -> bool {
      self.expected == self.actual
   }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
   pub iterations: usize,
   pub elapsed: Duration,
   pub ops_per_sec: u64,
   pub checksum: Checksum,
}

impl RunResult {
   pub fn new(iterations: usize, elapsed: Duration, checksum: Checksum) -> Self {
      Self { iterations, elapsed, ops_per_sec: throughput(iterations, elapsed), checksum }
   }
}

/// Operations per second, `iterations * 1000 / elapsed_ms` at nanosecond
/// resolution. A zero duration counts as one nanosecond.
pub fn throughput(iterations: usize, elapsed: Duration) -> u64 {
   let nanos = elapsed.as_nanos().max(1);
   let ops = iterations as u128 * 1_000_000_000 / nanos;
   u64::try_from(ops).unwrap_or(u64::MAX)
}

/// All runs of one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSet {
   pub label: &'static str,
   pub runs: Vec<RunResult>,
}

impl RunSet {
   /// Integer mean of the per-run throughputs.
   pub fn average(&self) -> u64 {
      let total: u128 = self.runs.iter().map(|r| u128::from(r.ops_per_sec)).sum();
      let mean = total.checked_div(self.runs.len() as u128).unwrap_or(0);
      u64::try_from(mean).unwrap_or(u64::MAX)
   }

   pub fn mismatches(&self) -> usize {
      self.runs.iter().filter(|r| !r.checksum.is_match()).count()
   }
}

pub struct Harness<'a> {
   dataset: &'a Dataset,
   config: &'a BenchConfig,
}

impl<'a> Harness<'a> {
   pub fn new(dataset: &'a Dataset, config: &'a BenchConfig) -> Self {
      Self { dataset, config }
   }

   pub fn config(&self) -> &BenchConfig {
      self.config
   }

   /// `config.runs` runs, each on a fresh queue from `make`, each reported
   /// as it finishes, then the average.
   pub fn run_set<Q, F>(
      &self,
      label: &'static str,
      mut make: F,
      reporter: &mut dyn Reporter,
   ) -> Result<RunSet, BenchError>
   where
      Q: SpscQueue<i64>,
      F: FnMut() -> Result<Q, ConfigError>,
   {
      let mut runs = Vec::with_capacity(self.config.runs);
      for run in 0..self.config.runs {
         let queue = make()?;
         debug!(label, run, capacity = queue.capacity(), "starting run");
         let result = self.run_once(&queue)?;
         drop(queue);

         if !result.checksum.is_match() {
            warn!(
               label,
               run,
               expected = result.checksum.expected,
               actual = result.checksum.actual,
               "checksum mismatch"
            );
         }
         reporter.run(label, &result)?;
         runs.push(result);
      }

      let set = RunSet { label, runs };
      reporter.average(&set)?;
      Ok(set)
   }

   /// One full drain of the dataset through `queue`.
   pub fn run_once<Q: SpscQueue<i64>>(&self, queue: &Q) -> Result<RunResult, BenchError> {
      let iterations = self.dataset.len();
      let pin = self.config.pin;
      let (done_tx, done_rx) = channel::bounded::<i64>(1);

      thread::scope(|s| -> Result<RunResult, BenchError> {
         let consumer = thread::Builder::new()
            .name("consumer".into())
            .spawn_scoped(s, move || {
               if let Some(pin) = pin {
                  affinity::try_pin_current_thread("consumer", pin.consumer);
               }
               let mut sum = 0i64;
               for _ in 0..iterations {
                  let backoff = Backoff::new();
                  let value = loop {
                     match queue.poll() {
                        Some(value) => break value,
                        None => backoff.snooze(),
                     }
                  };
                  sum = sum.wrapping_add(value);
               }
               // The producer holds the receiver until `recv` returns.
               let _ = done_tx.send(sum);
            })?;

         if let Some(pin) = pin {
            affinity::try_pin_current_thread("producer", pin.producer);
         }
         thread::sleep(self.config.warmup);

         let start = Instant::now();
         for &value in self.dataset.values() {
            let backoff = Backoff::new();
            let mut value = value;
            while let Err(rejected) = queue.offer(value) {
               value = rejected;
               if backoff.is_completed() && consumer.is_finished() {
                  // Only a dead consumer stops draining before N values.
                  let _ = consumer.join();
                  return Err(BenchError::ConsumerPanicked);
               }
               backoff.snooze();
            }
         }
         let received = done_rx.recv();
         let elapsed = start.elapsed();

         consumer.join().map_err(|_| BenchError::ConsumerPanicked)?;
         let actual = received.map_err(|_| BenchError::ConsumerPanicked)?;

         let checksum = Checksum { expected: self.dataset.sum(), actual };
         Ok(RunResult::new(iterations, elapsed, checksum))
      })
   }
}
