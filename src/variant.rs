//! The nine benchmarked queues, selected by code 1-9.

use crate::spsc::{
   ArrayQueueBaseline, CachedQueue, DoubleCachedQueue, PaddedDoubleCachedQueue, PaddedQueue,
   SoftMbMaskQueue, SoftMbQueue, SynchronizedQueue, VolatileQueue,
};
use crate::{BenchConfig, BenchError, Dataset, Harness, Reporter, RunSet};
use std::io::{self, Write};
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
   BlockingQueue = 1,
   Synchronized = 2,
   Volatile = 3,
   SoftMb = 4,
   SoftMbMask = 5,
   Cached = 6,
   DoubleCached = 7,
   Padded = 8,
   PaddedDoubleCached = 9,
}

impl Variant {
   pub const ALL: [Variant; 9] = [
      Variant::BlockingQueue,
      Variant::Synchronized,
      Variant::Volatile,
      Variant::SoftMb,
      Variant::SoftMbMask,
      Variant::Cached,
      Variant::DoubleCached,
      Variant::Padded,
      Variant::PaddedDoubleCached,
   ];

   pub fn from_code(code: u8) -> Option<Self> {
      Self::ALL.into_iter().find(|v| v.code() == code)
   }

   /// Parses a command-line argument; anything but `1`..=`9` is `None`.
   pub fn parse(arg: &str) -> Option<Self> {
      arg.trim().parse().ok().and_then(Self::from_code)
   }

   pub fn code(self) -> u8 {
      self as u8
   }

   /// Prefix of every result line.
   pub fn label(self) -> &'static str {
      match self {
         Variant::BlockingQueue => "BlockingQueue",
         Variant::Synchronized => "Synchronized",
         Variant::Volatile => "Volatile",
         Variant::SoftMb => "SoftMB",
         Variant::SoftMbMask => "SoftMBMod",
         Variant::Cached => "Cached Head/Tail",
         Variant::DoubleCached => "2Cached Head/Tail",
         Variant::Padded => "Padded",
         Variant::PaddedDoubleCached => "Padded 2Cached Head/Tail",
      }
   }

   /// One-line description for the usage text.
   pub fn description(self) -> &'static str {
      match self {
         Variant::BlockingQueue => "ArrayBlockingQueue",
         Variant::Synchronized => "Synchronized offer/poll",
         Variant::Volatile => "Volatile head/tail",
         Variant::SoftMb => "Soft Memory Barrier",
         Variant::SoftMbMask => "Soft Memory Barrier with mod operation",
         Variant::Cached => "Cached Head and Tail.",
         Variant::DoubleCached => "Double Cached Head and Tail.",
         Variant::Padded => "Padded and Cached for false cache sharing.",
         Variant::PaddedDoubleCached => "Padded and Double Cached for false cache sharing.",
      }
   }

   /// Runs this variant's full run set with a queue of the configured
   /// capacity per run.
   pub fn run_set(
      self,
      harness: &Harness<'_>,
      reporter: &mut dyn Reporter,
   ) -> Result<RunSet, BenchError> {
      let capacity = harness.config().capacity;
      let label = self.label();
      match self {
         Variant::BlockingQueue => {
            harness.run_set(label, || ArrayQueueBaseline::new(capacity), reporter)
         }
         Variant::Synchronized => {
            harness.run_set(label, || SynchronizedQueue::new(capacity), reporter)
         }
         Variant::Volatile => harness.run_set(label, || VolatileQueue::new(capacity), reporter),
         Variant::SoftMb => harness.run_set(label, || SoftMbQueue::new(capacity), reporter),
         Variant::SoftMbMask => {
            harness.run_set(label, || SoftMbMaskQueue::new(capacity), reporter)
         }
         Variant::Cached => harness.run_set(label, || CachedQueue::new(capacity), reporter),
         Variant::DoubleCached => {
            harness.run_set(label, || DoubleCachedQueue::new(capacity), reporter)
         }
         Variant::Padded => harness.run_set(label, || PaddedQueue::new(capacity), reporter),
         Variant::PaddedDoubleCached => {
            harness.run_set(label, || PaddedDoubleCachedQueue::new(capacity), reporter)
         }
      }
   }
}

/// Runs the variant named by each argument, in order. An argument that is
/// not a code prints the usage text and the rest still run; no arguments at
/// all print it once. The dataset is generated on the first valid code.
///
/// A run set that fails is logged and skipped. Returns how many failed.
pub fn run_selected<S: AsRef<str>>(
   args: &[S],
   config: &BenchConfig,
   reporter: &mut dyn Reporter,
) -> Result<usize, BenchError> {
   if args.is_empty() {
      reporter.usage()?;
      return Ok(0);
   }

   let mut dataset = None;
   let mut failed = 0;
   for arg in args {
      let Some(variant) = Variant::parse(arg.as_ref()) else {
         reporter.usage()?;
         continue;
      };
      let dataset =
         dataset.get_or_insert_with(|| Dataset::with_seed(config.iterations, config.seed));
      let harness = Harness::new(dataset, config);
      if let Err(err) = variant.run_set(&harness, reporter) {
         error!(variant = variant.label(), %err, "run set failed");
         failed += 1;
      }
   }
   Ok(failed)
}

pub fn write_usage<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
   writeln!(out, "usage: mechanical-sympathy <1-9>...")?;
   for variant in Variant::ALL {
      writeln!(out, "        {}: {}", variant.code(), variant.description())?;
   }
   Ok(())
}
