// mechanical_sympathy/tests/unit_test.rs
//
// Single-threaded laws every queue variant must obey.

use mechanical_sympathy::spsc::Mask;
use mechanical_sympathy::{
   ArrayQueueBaseline, CachedQueue, ConfigError, DoubleCachedQueue, PaddedDoubleCachedQueue,
   PaddedQueue, SoftMbMaskQueue, SoftMbQueue, SpscQueue, SynchronizedQueue, VolatileQueue,
};
use std::sync::Arc;

fn checksum_example<Q: SpscQueue<i64>>(q: Q) {
   let offered = [10, -3, 7, 2];
   for v in offered {
      q.offer(v).unwrap();
   }
   let polled: Vec<i64> = (0..4).map(|_| q.poll().unwrap()).collect();
   assert_eq!(polled, offered);
   assert_eq!(polled.iter().sum::<i64>(), 16);
   assert!(q.poll().is_none());
}

fn full_and_empty<Q: SpscQueue<i64>>(q: Q) {
   let cap = q.capacity();
   assert!(q.is_empty());
   assert!(q.poll().is_none(), "poll on a fresh queue must be empty");

   for i in 0..cap {
      assert_eq!(q.len(), i);
      assert!(q.offer(i as i64).is_ok(), "offer {i} of {cap} rejected");
   }
   assert_eq!(q.len(), cap);
   assert_eq!(q.offer(-1), Err(-1), "offer into a full queue must hand the value back");
   assert_eq!(q.len(), cap, "rejected offer changed the queue");

   assert_eq!(q.poll(), Some(0));
   assert!(q.offer(cap as i64).is_ok(), "one free slot after a poll");
   assert_eq!(q.offer(-2), Err(-2));

   for expected in 1..=cap {
      assert_eq!(q.poll(), Some(expected as i64));
   }
   assert!(q.poll().is_none());
   assert_eq!(q.len(), 0);
}

fn wrap_around<Q: SpscQueue<i64>>(q: Q) {
   let cap = q.capacity();
   for i in 0..1_000_000i64 {
      q.offer(i).unwrap();
      assert!(q.len() == 1 && q.len() <= cap);
      assert_eq!(q.poll(), Some(i));
      assert!(q.is_empty());
   }
}

// Keeps the ring partly full while cycling so the counters wrap the buffer
// at every fill level.
fn wrap_around_half_full<Q: SpscQueue<i64>>(q: Q) {
   let cap = q.capacity() as i64;
   let mut next_in = 0i64;
   let mut next_out = 0i64;
   for _ in 0..cap / 2 {
      q.offer(next_in).unwrap();
      next_in += 1;
   }
   for _ in 0..10_000 {
      q.offer(next_in).unwrap();
      next_in += 1;
      assert_eq!(q.poll(), Some(next_out));
      next_out += 1;
      assert!(q.len() as i64 <= cap);
   }
   while let Some(v) = q.poll() {
      assert_eq!(v, next_out);
      next_out += 1;
   }
   assert_eq!(next_in, next_out);
}

fn drops_undrained_values<Q: SpscQueue<Arc<()>>>(q: Q) {
   let token = Arc::new(());
   for _ in 0..3 {
      q.offer(Arc::clone(&token)).unwrap();
   }
   drop(q.poll());
   assert_eq!(Arc::strong_count(&token), 3);
   drop(q);
   assert_eq!(Arc::strong_count(&token), 1);
}

macro_rules! queue_laws {
   ($($name:ident => $queue:ident),* $(,)?) => {
      $(
         mod $name {
            use super::*;

            #[test]
            fn checksum_law() {
               checksum_example($queue::<i64>::new(4).unwrap());
            }

            #[test]
            fn full_empty_law() {
               full_and_empty($queue::<i64>::new(4).unwrap());
               full_and_empty($queue::<i64>::new(1).unwrap());
               full_and_empty($queue::<i64>::new(64).unwrap());
            }

            #[test]
            fn wrap_around_law() {
               wrap_around($queue::<i64>::new(4).unwrap());
               wrap_around_half_full($queue::<i64>::new(8).unwrap());
            }

            #[test]
            fn drop_releases_queued_values() {
               drops_undrained_values($queue::<Arc<()>>::new(4).unwrap());
            }

            #[test]
            fn zero_capacity_is_rejected() {
               assert_eq!($queue::<i64>::new(0).err(), Some(ConfigError::ZeroCapacity));
            }
         }
      )*
   };
}

queue_laws! {
   array_queue => ArrayQueueBaseline,
   synchronized => SynchronizedQueue,
   volatile => VolatileQueue,
   soft_mb => SoftMbQueue,
   soft_mb_mask => SoftMbMaskQueue,
   cached => CachedQueue,
   double_cached => DoubleCachedQueue,
   padded => PaddedQueue,
   padded_double_cached => PaddedDoubleCachedQueue,
}

macro_rules! masked_rejects_non_power_of_two {
   ($($queue:ident),* $(,)?) => {
      #[test]
      fn masked_variants_reject_capacity_six() {
         $(
            assert_eq!(
               $queue::<i64>::new(6).err(),
               Some(ConfigError::NotPowerOfTwo(6)),
               stringify!($queue)
            );
            assert_eq!($queue::<i64>::new(8).unwrap().capacity(), 8);
         )*
      }
   };
}

masked_rejects_non_power_of_two!(
   SoftMbMaskQueue,
   CachedQueue,
   DoubleCachedQueue,
   PaddedQueue,
   PaddedDoubleCachedQueue,
);

#[test]
fn modulo_variants_accept_any_capacity() {
   full_and_empty(ArrayQueueBaseline::new(6).unwrap());
   full_and_empty(SynchronizedQueue::new(6).unwrap());
   full_and_empty(VolatileQueue::new(6).unwrap());
   full_and_empty(SoftMbQueue::new(6).unwrap());
   wrap_around_half_full(VolatileQueue::new(6).unwrap());
   wrap_around_half_full(SoftMbQueue::new(6).unwrap());
   wrap_around_half_full(SynchronizedQueue::new(6).unwrap());
}

#[test]
fn mask_of_eight_indexes_within_bounds() {
   let mask = Mask::new(8).unwrap();
   for counter in (0..100_000).chain([usize::MAX - 1, usize::MAX]) {
      assert!((0..=7).contains(&mask.index(counter)));
   }
   assert_eq!(Mask::new(6), Err(ConfigError::NotPowerOfTwo(6)));
}

#[test]
fn config_error_messages() {
   assert_eq!(ConfigError::ZeroCapacity.to_string(), "queue capacity must be non-zero");
   assert_eq!(
      ConfigError::NotPowerOfTwo(6).to_string(),
      "queue capacity must be a power of two, got 6"
   );
}
