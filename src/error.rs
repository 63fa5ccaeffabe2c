// Error types for queue construction and benchmark runs.
//
// Full and empty queues are not errors: `offer`/`poll` report them through
// their return values and callers retry.

use thiserror::Error;

/// Rejected queue configuration, raised at construction time.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
   /// A ring buffer needs at least one slot.
   #[error("queue capacity must be non-zero")]
   ZeroCapacity,

   /// Masked variants index with `counter & (capacity - 1)`.
   #[error("queue capacity must be a power of two, got {0}")]
   NotPowerOfTwo(usize),
}

/// Anything that stops a benchmark run set from completing.
///
/// `Pin` is the exception: the harness logs it and keeps running unpinned.
#[derive(Debug, Error)]
pub enum BenchError {
   #[error(transparent)]
   Config(#[from] ConfigError),

   #[error("invalid value {value:?} for {key}")]
   InvalidSetting { key: &'static str, value: String },

   #[error("consumer thread terminated before draining the queue")]
   ConsumerPanicked,

   #[error("could not pin {role} to core {core}: {source}")]
   Pin { role: &'static str, core: usize, source: nix::Error },

   #[error("i/o failure: {0}")]
   Io(#[from] std::io::Error),
}
