// Cached rings with every hot field on its own cache line.
//
// Same protocols as `CachedQueue` and `DoubleCachedQueue`. Without padding
// the producer's store to `tail` invalidates the line holding `head`, and
// the private caches sit next to both; here no line is written by more than
// one thread.

use crate::spsc::padding::{PaddedCache, PaddedCounter};
use crate::spsc::ring::{Mask, Slots};
use crate::{ConfigError, SpscQueue};
use std::fmt;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};

#[repr(C)]
pub struct PaddedQueue<T> {
   head: PaddedCounter,
   tail: PaddedCounter,
   head_cache: PaddedCache, // producer only
   tail_cache: PaddedCache, // consumer only
   slots: Slots<T>,
   mask: Mask,
}

// SAFETY: see `CachedQueue`.
unsafe impl<T: Send> Send for PaddedQueue<T> {}
unsafe impl<T: Send> Sync for PaddedQueue<T> {}

impl<T: Send> PaddedQueue<T> {
   pub fn new(capacity: usize) -> Result<Self, ConfigError> {
      let mask = Mask::new(capacity)?;
      Ok(Self {
         head: PaddedCounter::new(0),
         tail: PaddedCounter::new(0),
         head_cache: PaddedCache::new(0),
         tail_cache: PaddedCache::new(0),
         slots: Slots::new(mask.capacity()),
         mask,
      })
   }
}

impl<T: Send> SpscQueue<T> for PaddedQueue<T> {
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

impl<T> Drop for PaddedQueue<T> {
   fn drop(&mut self) {
      let head = self.head.load(Relaxed);
      let tail = self.tail.load(Relaxed);
      let mask = self.mask;
      unsafe { self.slots.drop_range(head, tail, |c| mask.index(c)) };
   }
}

impl<T> fmt::Debug for PaddedQueue<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("PaddedQueue")
         .field("capacity", &self.mask.capacity())
         .field("head", &self.head.load(Relaxed))
         .field("tail", &self.tail.load(Relaxed))
         .finish_non_exhaustive()
   }
}

/*──────────────────────────────────────────────────────────────────────────*/

#[repr(C)]
pub struct PaddedDoubleCachedQueue<T> {
   head: PaddedCounter,
   tail: PaddedCounter,
   head_cache: PaddedCache,
   tail_cache: PaddedCache,
   tail_local: PaddedCache,
   head_local: PaddedCache,
   slots: Slots<T>,
   mask: Mask,
}

// SAFETY: see `DoubleCachedQueue`.
unsafe impl<T: Send> Send for PaddedDoubleCachedQueue<T> {}
unsafe impl<T: Send> Sync for PaddedDoubleCachedQueue<T> {}

impl<T: Send> PaddedDoubleCachedQueue<T> {
   pub fn new(capacity: usize) -> Result<Self, ConfigError> {
      let mask = Mask::new(capacity)?;
      Ok(Self {
         head: PaddedCounter::new(0),
         tail: PaddedCounter::new(0),
         head_cache: PaddedCache::new(0),
         tail_cache: PaddedCache::new(0),
         tail_local: PaddedCache::new(0),
         head_local: PaddedCache::new(0),
         slots: Slots::new(mask.capacity()),
         mask,
      })
   }
}

impl<T: Send> SpscQueue<T> for PaddedDoubleCachedQueue<T> {
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

impl<T> Drop for PaddedDoubleCachedQueue<T> {
   fn drop(&mut self) {
      let head = self.head_local.get();
      let tail = self.tail_local.get();
      let mask = self.mask;
      unsafe { self.slots.drop_range(head, tail, |c| mask.index(c)) };
   }
}

impl<T> fmt::Debug for PaddedDoubleCachedQueue<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("PaddedDoubleCachedQueue")
         .field("capacity", &self.mask.capacity())
         .field("head", &self.head.load(Relaxed))
         .field("tail", &self.tail.load(Relaxed))
         .finish_non_exhaustive()
   }
}
