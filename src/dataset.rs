// Ground-truth payload: N random i64 values and their wrapping sum.
//
// Generated once per process and shared read-only by every run, so the
// producer's loop reads from memory that never changes under it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
   values: Box<[i64]>,
   sum: i64,
}

impl Dataset {
   /// `len` values drawn from `rng`.
   pub fn generate<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
      let values = (0..len).map(|_| rng.gen::<i64>()).collect::<Vec<_>>();
      Self::from_values(values)
   }

   /// `len` values from a seeded generator, or an OS-seeded one for `None`.
   pub fn with_seed(len: usize, seed: Option<u64>) -> Self {
      let mut rng = match seed {
         Some(seed) => StdRng::seed_from_u64(seed),
         None => StdRng::from_entropy(),
      };
      let dataset = Self::generate(len, &mut rng);
      debug!(len, ?seed, sum = dataset.sum, "generated dataset");
      dataset
   }

   pub fn from_values(values: Vec<i64>) -> Self {
      let sum = checksum(&values);
      Self { values: values.into_boxed_slice(), sum }
   }

   #[inline]
   pub fn values(&self) -> &[i64] {
      &self.values
   }

   pub fn len(&self) -> usize {
      self.values.len()
   }

   pub fn is_empty(&self) -> bool {
      self.values.is_empty()
   }

   /// Wrapping sum of all values, what a correct consumer must arrive at.
   pub fn sum(&self) -> i64 {
      self.sum
   }
}

/// Wrapping sum, the same arithmetic the consumer uses.
pub fn checksum(values: &[i64]) -> i64 {
   values.iter().fold(0i64, |acc, &v| acc.wrapping_add(v))
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn sum_wraps_like_the_consumer() {
      let d = Dataset::from_values(vec![i64::MAX, 1, 10, -3]);
      assert_eq!(d.sum(), i64::MIN.wrapping_add(7));
      assert_eq!(Dataset::from_values(vec![10, -3, 7, 2]).sum(), 16);
   }

   #[test]
   fn same_seed_same_values() {
      let a = Dataset::with_seed(1_000, Some(9));
      let b = Dataset::with_seed(1_000, Some(9));
      assert_eq!(a, b);
      assert_eq!(a.len(), 1_000);
      assert_eq!(a.sum(), checksum(a.values()));
   }

   #[test]
   fn empty_dataset_sums_to_zero() {
      let d = Dataset::with_seed(0, Some(1));
      assert!(d.is_empty());
      assert_eq!(d.sum(), 0);
   }
}
