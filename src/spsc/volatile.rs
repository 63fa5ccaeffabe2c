// Lock-free ring with fully ordered counters.
//
// Every access to `head` and `tail` is sequentially consistent, including
// each side's reads of its own counter. Nothing is cached, so every
// operation crosses to the peer's cache line at least once.

use crate::spsc::ring::{self, Slots};
use crate::{ConfigError, SpscQueue};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering::SeqCst};

pub struct VolatileQueue<T> {
   slots: Slots<T>,
   head: AtomicUsize, // written by consumer
   tail: AtomicUsize, // written by producer
}

// SAFETY: the producer only writes slots in `tail..head + C`, the consumer
// only reads slots in `head..tail`, and each publishes its counter after
// touching the slot.
unsafe impl<T: Send> Send for VolatileQueue<T> {}
unsafe impl<T: Send> Sync for VolatileQueue<T> {}

impl<T: Send> VolatileQueue<T> {
   pub fn new(capacity: usize) -> Result<Self, ConfigError> {
      let capacity = ring::nonzero(capacity)?;
      Ok(Self {
         slots: Slots::new(capacity),
         head: AtomicUsize::new(0),
         tail: AtomicUsize::new(0),
      })
   }
}

impl<T: Send> SpscQueue<T> for VolatileQueue<T> {
   #[inline]
   fn offer(&self, item: T) -> Result<(), T> {
      let tail = self.tail.load(SeqCst);
      let capacity = self.slots.len();
      if tail.wrapping_sub(self.head.load(SeqCst)) >= capacity {
         return Err(item);
      }
      unsafe { self.slots.write(tail % capacity, item) };
      self.tail.store(tail.wrapping_add(1), SeqCst);
      Ok(())
   }

   #[inline]
   fn poll(&self) -> Option<T> {
      let head = self.head.load(SeqCst);
      if head == self.tail.load(SeqCst) {
         return None;
      }
      let value = unsafe { self.slots.read(head % self.slots.len()) };
      self.head.store(head.wrapping_add(1), SeqCst);
      Some(value)
   }

   fn capacity(&self) -> usize {
      self.slots.len()
   }

   fn len(&self) -> usize {
      let head = self.head.load(SeqCst);
      let tail = self.tail.load(SeqCst);
      tail.wrapping_sub(head).min(self.slots.len())
   }
}

impl<T> Drop for VolatileQueue<T> {
   fn drop(&mut self) {
      let head = *self.head.get_mut();
      let tail = *self.tail.get_mut();
      let capacity = self.slots.len();
      unsafe { self.slots.drop_range(head, tail, |c| c % capacity) };
   }
}

impl<T> fmt::Debug for VolatileQueue<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("VolatileQueue")
         .field("capacity", &self.slots.len())
         .field("head", &self.head.load(SeqCst))
         .field("tail", &self.tail.load(SeqCst))
         .finish()
   }
}
