// Rings that cache counters in thread-private fields.
//
// `CachedQueue`: each side keeps a private copy of the peer's counter and
// only goes back to the shared atomic when that copy says full (producer)
// or empty (consumer). A stale copy is always pessimistic: the real head is
// never behind `head_cache`, the real tail never behind `tail_cache`.
//
// `DoubleCachedQueue`: additionally each side keeps its own counter in a
// private field, so the hot path has no atomic load at all, only the
// release store that publishes progress.

use crate::spsc::ring::{Mask, Slots};
use crate::{ConfigError, SpscQueue};
use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{
   AtomicUsize,
   Ordering::{Acquire, Relaxed, Release},
};

pub struct CachedQueue<T> {
   slots: Slots<T>,
   mask: Mask,
   head: AtomicUsize,
   tail: AtomicUsize,
   head_cache: Cell<usize>, // producer only
   tail_cache: Cell<usize>, // consumer only
}

// SAFETY: besides the slot discipline of every ring, `head_cache` is touched
// only inside `offer` and `tail_cache` only inside `poll`; with one producer
// and one consumer neither cell is ever shared between threads.
unsafe impl<T: Send> Send for CachedQueue<T> {}
unsafe impl<T: Send> Sync for CachedQueue<T> {}

impl<T: Send> CachedQueue<T> {
   pub fn new(capacity: usize) -> Result<Self, ConfigError> {
      let mask = Mask::new(capacity)?;
      Ok(Self {
         slots: Slots::new(mask.capacity()),
         mask,
         head: AtomicUsize::new(0),
         tail: AtomicUsize::new(0),
         head_cache: Cell::new(0),
         tail_cache: Cell::new(0),
      })
   }
}

impl<T: Send> SpscQueue<T> for CachedQueue<T> {
   #[inline]
   fn offer(&self, item: T) -> Result<(), T> {
      let tail = self.tail.load(Relaxed);
      let capacity = self.mask.capacity();
      if tail.wrapping_sub(self.head_cache.get()) >= capacity {
         self.head_cache.set(self.head.load(Acquire));
         if tail.wrapping_sub(self.head_cache.get()) >= capacity {
            return Err(item);
         }
      }
      unsafe { self.slots.write(self.mask.index(tail), item) };
      self.tail.store(tail.wrapping_add(1), Release);
      Ok(())
   }

   #[inline]
   fn poll(&self) -> Option<T> {
      let head = self.head.load(Relaxed);
      if head == self.tail_cache.get() {
         self.tail_cache.set(self.tail.load(Acquire));
         if head == self.tail_cache.get() {
            return None;
         }
      }
      let value = unsafe { self.slots.read(self.mask.index(head)) };
      self.head.store(head.wrapping_add(1), Release);
      Some(value)
   }

   fn capacity(&self) -> usize {
      self.mask.capacity()
   }

   fn len(&self) -> usize {
      let head = self.head.load(Acquire);
      let tail = self.tail.load(Acquire);
      tail.wrapping_sub(head).min(self.mask.capacity())
   }
}

impl<T> Drop for CachedQueue<T> {
   fn drop(&mut self) {
      let head = *self.head.get_mut();
      let tail = *self.tail.get_mut();
      let mask = self.mask;
      unsafe { self.slots.drop_range(head, tail, |c| mask.index(c)) };
   }
}

impl<T> fmt::Debug for CachedQueue<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("CachedQueue")
         .field("capacity", &self.mask.capacity())
         .field("head", &self.head.load(Relaxed))
         .field("tail", &self.tail.load(Relaxed))
         .finish_non_exhaustive()
   }
}

/*──────────────────────────────────────────────────────────────────────────*/

pub struct DoubleCachedQueue<T> {
   slots: Slots<T>,
   mask: Mask,
   head: AtomicUsize,
   tail: AtomicUsize,
   head_cache: Cell<usize>, // producer's view of head
   tail_cache: Cell<usize>, // consumer's view of tail
   tail_local: Cell<usize>, // producer's own tail
   head_local: Cell<usize>, // consumer's own head
}

// SAFETY: as for `CachedQueue`; `tail_local` belongs to the producer and
// `head_local` to the consumer.
unsafe impl<T: Send> Send for DoubleCachedQueue<T> {}
unsafe impl<T: Send> Sync for DoubleCachedQueue<T> {}

impl<T: Send> DoubleCachedQueue<T> {
   pub fn new(capacity: usize) -> Result<Self, ConfigError> {
      let mask = Mask::new(capacity)?;
      Ok(Self {
         slots: Slots::new(mask.capacity()),
         mask,
         head: AtomicUsize::new(0),
         tail: AtomicUsize::new(0),
         head_cache: Cell::new(0),
         tail_cache: Cell::new(0),
         tail_local: Cell::new(0),
         head_local: Cell::new(0),
      })
   }
}

impl<T: Send> SpscQueue<T> for DoubleCachedQueue<T> {
   #[inline]
   fn offer(&self, item: T) -> Result<(), T> {
      let tail = self.tail_local.get();
      let capacity = self.mask.capacity();
      if tail.wrapping_sub(self.head_cache.get()) >= capacity {
         self.head_cache.set(self.head.load(Acquire));
         if tail.wrapping_sub(self.head_cache.get()) >= capacity {
            return Err(item);
         }
      }
      unsafe { self.slots.write(self.mask.index(tail), item) };
      let next = tail.wrapping_add(1);
      self.tail_local.set(next);
      self.tail.store(next, Release);
      Ok(())
   }

   #[inline]
   fn poll(&self) -> Option<T> {
      let head = self.head_local.get();
      if head == self.tail_cache.get() {
         self.tail_cache.set(self.tail.load(Acquire));
         if head == self.tail_cache.get() {
            return None;
         }
      }
      let value = unsafe { self.slots.read(self.mask.index(head)) };
      let next = head.wrapping_add(1);
      self.head_local.set(next);
      self.head.store(next, Release);
      Some(value)
   }

   fn capacity(&self) -> usize {
      self.mask.capacity()
   }

   fn len(&self) -> usize {
      let head = self.head.load(Acquire);
      let tail = self.tail.load(Acquire);
      tail.wrapping_sub(head).min(self.mask.capacity())
   }
}

impl<T> Drop for DoubleCachedQueue<T> {
   fn drop(&mut self) {
      let head = self.head_local.get();
      let tail = self.tail_local.get();
      let mask = self.mask;
      unsafe { self.slots.drop_range(head, tail, |c| mask.index(c)) };
   }
}

impl<T> fmt::Debug for DoubleCachedQueue<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("DoubleCachedQueue")
         .field("capacity", &self.mask.capacity())
         .field("head", &self.head.load(Relaxed))
         .field("tail", &self.tail.load(Relaxed))
         .finish_non_exhaustive()
   }
}
