// Cache-line padded counters.
//
// Two counters written by different threads must never share a line, or each
// write invalidates the other core's copy (false sharing). Every wrapper here
// is one full line: the hot field followed by filler up to `CACHE_LINE`.

use std::{cell::Cell, mem::size_of, ops::Deref, sync::atomic::AtomicUsize};

/// Cache line size assumed for layout, in bytes.
pub const CACHE_LINE: usize = 64;

const FILL: usize = CACHE_LINE - size_of::<usize>();

/// Atomic counter alone on its cache line.
#[repr(C, align(64))]
pub(crate) struct PaddedCounter {
   value: AtomicUsize,
   _fill: [u8; FILL],
}

impl PaddedCounter {
   pub(crate) const fn new(value: usize) -> Self {
      Self { value: AtomicUsize::new(value), _fill: [0; FILL] }
   }
}

impl Deref for PaddedCounter {
   type Target = AtomicUsize;

   #[inline]
   fn deref(&self) -> &AtomicUsize {
      &self.value
   }
}

/// Thread-private counter copy alone on its cache line.
#[repr(C, align(64))]
pub(crate) struct PaddedCache {
   value: Cell<usize>,
   _fill: [u8; FILL],
}

impl PaddedCache {
   pub(crate) const fn new(value: usize) -> Self {
      Self { value: Cell::new(value), _fill: [0; FILL] }
   }
}

impl Deref for PaddedCache {
   type Target = Cell<usize>;

   #[inline]
   fn deref(&self) -> &Cell<usize> {
      &self.value
   }
}

const _: () = assert!(size_of::<PaddedCounter>() == CACHE_LINE);
const _: () = assert!(size_of::<PaddedCache>() == CACHE_LINE);

#[cfg(test)]
mod tests {
   use super::*;
   use std::mem::align_of;
   use std::sync::atomic::Ordering;

   #[test]
   fn wrappers_fill_exactly_one_line() {
      assert_eq!(size_of::<PaddedCounter>(), CACHE_LINE);
      assert_eq!(align_of::<PaddedCounter>(), CACHE_LINE);
      assert_eq!(size_of::<PaddedCache>(), CACHE_LINE);
      assert_eq!(align_of::<PaddedCache>(), CACHE_LINE);
   }

   #[test]
   fn adjacent_counters_land_on_distinct_lines() {
      let pair = [PaddedCounter::new(1), PaddedCounter::new(2)];
      let a = &*pair[0] as *const AtomicUsize as usize;
      let b = &*pair[1] as *const AtomicUsize as usize;
      assert_ne!(a / CACHE_LINE, b / CACHE_LINE);
      assert_eq!(pair[1].load(Ordering::Relaxed), 2);
   }
}
