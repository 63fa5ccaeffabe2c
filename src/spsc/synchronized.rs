// Mutex-guarded ring buffer.
//
// `offer` and `poll` hold the same lock for their whole body, so producer
// and consumer never overlap. Correct, and the slowest hand-written ring.

use crate::spsc::ring;
use crate::{ConfigError, SpscQueue};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct Ring<T> {
   buffer: Box<[Option<T>]>,
   head: usize, // next slot to read
   tail: usize, // next slot to write
}

#[derive(Debug)]
pub struct SynchronizedQueue<T> {
   ring: Mutex<Ring<T>>,
   capacity: usize,
}

impl<T: Send> SynchronizedQueue<T> {
   pub fn new(capacity: usize) -> Result<Self, ConfigError> {
      let capacity = ring::nonzero(capacity)?;
      let buffer = (0..capacity).map(|_| None).collect::<Vec<_>>().into_boxed_slice();
      Ok(Self {
         ring: Mutex::new(Ring { buffer, head: 0, tail: 0 }),
         capacity,
      })
   }

   // The ring holds no invariant a panicking holder could break halfway.
   #[inline]
   fn lock(&self) -> MutexGuard<'_, Ring<T>> {
      self.ring.lock().unwrap_or_else(PoisonError::into_inner)
   }
}

impl<T: Send> SpscQueue<T> for SynchronizedQueue<T> {
   fn offer(&self, item: T) -> Result<(), T> {
      let mut ring = self.lock();
      if ring.tail - ring.head >= self.capacity {
         return Err(item);
      }
      let slot = ring.tail % self.capacity;
      ring.buffer[slot] = Some(item);
      ring.tail += 1;
      Ok(())
   }

   fn poll(&self) -> Option<T> {
      let mut ring = self.lock();
      if ring.head >= ring.tail {
         return None;
      }
      let slot = ring.head % self.capacity;
      ring.head += 1;
      let value = ring.buffer[slot].take();
      debug_assert!(value.is_some(), "slot {slot} below tail was empty");
      value
   }

   fn capacity(&self) -> usize {
      self.capacity
   }

   fn len(&self) -> usize {
      let ring = self.lock();
      ring.tail - ring.head
   }
}
