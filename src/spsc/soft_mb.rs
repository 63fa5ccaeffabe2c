// "Soft memory barrier" rings: acquire loads, release-only stores.
//
// A release store of the counter is the weakest ordering that still makes
// the slot write visible before the peer sees the new counter. The two
// types differ only in how a counter becomes a slot index.

use crate::spsc::ring::{self, Mask, Slots};
use crate::{ConfigError, SpscQueue};
use std::fmt;
use std::sync::atomic::{
   AtomicUsize,
   Ordering::{Acquire, Relaxed, Release},
};

/*──────────────────────────────────────────────────────────────────────────*/
/*  modulo indexing                                                         */
/*──────────────────────────────────────────────────────────────────────────*/

pub struct SoftMbQueue<T> {
   slots: Slots<T>,
   head: AtomicUsize,
   tail: AtomicUsize,
}

unsafe impl<T: Send> Send for SoftMbQueue<T> {}
unsafe impl<T: Send> Sync for SoftMbQueue<T> {}

impl<T: Send> SoftMbQueue<T> {
   pub fn new(capacity: usize) -> Result<Self, ConfigError> {
      let capacity = ring::nonzero(capacity)?;
      Ok(Self {
         slots: Slots::new(capacity),
         head: AtomicUsize::new(0),
         tail: AtomicUsize::new(0),
      })
   }
}

impl<T: Send> SpscQueue<T> for SoftMbQueue<T> {
   #[inline]
   fn offer(&self, item: T) -> Result<(), T> {
      let tail = self.tail.load(Acquire);
      let capacity = self.slots.len();
      if tail.wrapping_sub(self.head.load(Acquire)) >= capacity {
         return Err(item);
      }
      unsafe { self.slots.write(tail % capacity, item) };
      self.tail.store(tail.wrapping_add(1), Release);
      Ok(())
   }

   #[inline]
   fn poll(&self) -> Option<T> {
      let head = self.head.load(Acquire);
      if head == self.tail.load(Acquire) {
         return None;
      }
      let value = unsafe { self.slots.read(head % self.slots.len()) };
      self.head.store(head.wrapping_add(1), Release);
      Some(value)
   }

   fn capacity(&self) -> usize {
      self.slots.len()
   }

   fn len(&self) -> usize {
      let head = self.head.load(Acquire);
      let tail = self.tail.load(Acquire);
      tail.wrapping_sub(head).min(self.slots.len())
   }
}

impl<T> Drop for SoftMbQueue<T> {
   fn drop(&mut self) {
      let head = *self.head.get_mut();
      let tail = *self.tail.get_mut();
      let capacity = self.slots.len();
      unsafe { self.slots.drop_range(head, tail, |c| c % capacity) };
   }
}

impl<T> fmt::Debug for SoftMbQueue<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("SoftMbQueue")
         .field("capacity", &self.slots.len())
         .field("head", &self.head.load(Relaxed))
         .field("tail", &self.tail.load(Relaxed))
         .finish()
   }
}

/*──────────────────────────────────────────────────────────────────────────*/
/*  bitmask indexing                                                        */
/*──────────────────────────────────────────────────────────────────────────*/

/// Same protocol as [`SoftMbQueue`]; power-of-two capacity, AND instead of
/// a division on every operation.
pub struct SoftMbMaskQueue<T> {
   slots: Slots<T>,
   mask: Mask,
   head: AtomicUsize,
   tail: AtomicUsize,
}

unsafe impl<T: Send> Send for SoftMbMaskQueue<T> {}
unsafe impl<T: Send> Sync for SoftMbMaskQueue<T> {}

impl<T: Send> SoftMbMaskQueue<T> {
   pub fn new(capacity: usize) -> Result<Self, ConfigError> {
      let mask = Mask::new(capacity)?;
      Ok(Self {
         slots: Slots::new(mask.capacity()),
         mask,
         head: AtomicUsize::new(0),
         tail: AtomicUsize::new(0),
      })
   }
}

impl<T: Send> SpscQueue<T> for SoftMbMaskQueue<T> {
   #[inline]
   fn offer(&self, item: T) -> Result<(), T> {
      let tail = self.tail.load(Acquire);
      if tail.wrapping_sub(self.head.load(Acquire)) >= self.mask.capacity() {
         return Err(item);
      }
      unsafe { self.slots.write(self.mask.index(tail), item) };
      self.tail.store(tail.wrapping_add(1), Release);
      Ok(())
   }

   #[inline]
   fn poll(&self) -> Option<T> {
      let head = self.head.load(Acquire);
      if head == self.tail.load(Acquire) {
         return None;
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

impl<T> Drop for SoftMbMaskQueue<T> {
   fn drop(&mut self) {
      let head = *self.head.get_mut();
      let tail = *self.tail.get_mut();
      let mask = self.mask;
      unsafe { self.slots.drop_range(head, tail, |c| mask.index(c)) };
   }
}

impl<T> fmt::Debug for SoftMbMaskQueue<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("SoftMbMaskQueue")
         .field("capacity", &self.mask.capacity())
         .field("head", &self.head.load(Relaxed))
         .field("tail", &self.tail.load(Relaxed))
         .finish()
   }
}
