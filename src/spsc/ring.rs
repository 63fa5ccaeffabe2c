// Slot storage and index arithmetic shared by the hand-written ring buffers.

use crate::ConfigError;
use std::{cell::UnsafeCell, mem::MaybeUninit};

/// Validates a capacity for the modulo-indexed variants.
#[inline]
pub(crate) fn nonzero(capacity: usize) -> Result<usize, ConfigError> {
   if capacity == 0 {
      return Err(ConfigError::ZeroCapacity);
   }
   Ok(capacity)
}

/// Bitmask index for power-of-two rings: `counter & (capacity - 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mask(usize);

impl Mask {
   /// Fails for zero and for any capacity that is not a power of two.
   pub fn new(capacity: usize) -> Result<Self, ConfigError> {
      let capacity = nonzero(capacity)?;
      if !capacity.is_power_of_two() {
         return Err(ConfigError::NotPowerOfTwo(capacity));
      }
      Ok(Mask(capacity - 1))
   }

   /// Slot index for a head or tail counter.
   #[inline]
   pub fn index(self, counter: usize) -> usize {
      counter & self.0
   }

   #[inline]
   pub fn capacity(self) -> usize {
      self.0 + 1
   }
}

/*──────────────────────────────────────────────────────────────────────────*/
/*  Slots                                                                   */
/*──────────────────────────────────────────────────────────────────────────*/

/// Fixed array of possibly-uninitialised slots.
///
/// A slot is initialised exactly when its counter lies in `head..tail` of the
/// owning queue. The queue decides who may touch which slot; this type only
/// does the raw reads and writes.
pub(crate) struct Slots<T> {
   cells: Box<[UnsafeCell<MaybeUninit<T>>]>,
}

impl<T> Slots<T> {
   pub(crate) fn new(capacity: usize) -> Self {
      let cells = (0..capacity)
         .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
         .collect::<Vec<_>>()
         .into_boxed_slice();
      Self { cells }
   }

   #[inline]
   pub(crate) fn len(&self) -> usize {
      self.cells.len()
   }

   /// # Safety
   /// `index < len()`, the slot is empty, and the caller is the producer
   /// that has not yet published the tail covering it.
   #[inline]
   pub(crate) unsafe fn write(&self, index: usize, value: T) {
      debug_assert!(index < self.cells.len());
      (*self.cells.get_unchecked(index).get()).write(value);
   }

   /// # Safety
   /// `index < len()`, the slot is full, and the caller is the consumer that
   /// has not yet published the head releasing it.
   #[inline]
   pub(crate) unsafe fn read(&self, index: usize) -> T {
      debug_assert!(index < self.cells.len());
      (*self.cells.get_unchecked(index).get()).assume_init_read()
   }

   /// Drops every value whose counter lies in `head..tail`.
   ///
   /// # Safety
   /// Exactly the slots addressed by `head..tail` through `index` are
   /// initialised.
   pub(crate) unsafe fn drop_range(
      &mut self,
      head: usize,
      tail: usize,
      index: impl Fn(usize) -> usize,
   ) {
      if !std::mem::needs_drop::<T>() {
         return;
      }
      let mut counter = head;
      while counter != tail {
         self.cells[index(counter)].get_mut().assume_init_drop();
         counter = counter.wrapping_add(1);
      }
   }
}
