pub mod config;
pub mod dataset;
pub mod error;
pub mod harness;
pub mod report;
pub mod spsc;
pub mod trace;
pub mod variant;

mod affinity;

pub use config::BenchConfig;
pub use dataset::Dataset;
pub use error::{BenchError, ConfigError};
pub use harness::{Checksum, Harness, RunResult, RunSet};
pub use report::{ConsoleReporter, Reporter};
pub use spsc::{
   ArrayQueueBaseline, CachedQueue, DoubleCachedQueue, PaddedDoubleCachedQueue, PaddedQueue,
   SoftMbMaskQueue, SoftMbQueue, SynchronizedQueue, VolatileQueue,
};
pub use variant::Variant;

/// Common interface for all queues.
///
/// Exactly one thread may call `offer` and exactly one thread may call
/// `poll` over the lifetime of a queue.
pub trait SpscQueue<T: Send>: Send + Sync {
   /// Enqueues `item`, or hands it back when the queue is full.
   fn offer(&self, item: T) -> Result<(), T>;
   /// Dequeues the oldest item, `None` when the queue is empty.
   fn poll(&self) -> Option<T>;

   fn capacity(&self) -> usize;
   /// Number of queued items. A snapshot, stale as soon as it returns if
   /// the other side is running.
   fn len(&self) -> usize;

   fn is_empty(&self) -> bool {
      self.len() == 0
   }
}
