// Baseline: crossbeam's general-purpose bounded array queue.
//
// Unlike a locking blocking queue this baseline is lock-free: every push and
// pop claims its slot with a CAS on a shared counter, because the queue is
// built for any number of producers and consumers. It only serializes
// through those contended counters. Here it gives the SPSC rings a number
// to beat.

use crate::spsc::ring;
use crate::{ConfigError, SpscQueue};
use crossbeam::queue::ArrayQueue;

#[derive(Debug)]
pub struct ArrayQueueBaseline<T> {
   inner: ArrayQueue<T>,
}

impl<T: Send> ArrayQueueBaseline<T> {
   pub fn new(capacity: usize) -> Result<Self, ConfigError> {
      let capacity = ring::nonzero(capacity)?;
      Ok(Self { inner: ArrayQueue::new(capacity) })
   }
}

impl<T: Send> SpscQueue<T> for ArrayQueueBaseline<T> {
   #[inline]
   fn offer(&self, item: T) -> Result<(), T> {
      self.inner.push(item)
   }

   #[inline]
   fn poll(&self) -> Option<T> {
      self.inner.pop()
   }

   fn capacity(&self) -> usize {
      self.inner.capacity()
   }

   fn len(&self) -> usize {
      self.inner.len()
   }
}
