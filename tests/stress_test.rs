// mechanical_sympathy/tests/stress_test.rs
//
// One producer thread, one consumer thread, jittered timing on both sides.
// Every value must arrive exactly once and in order.

use mechanical_sympathy::{
   ArrayQueueBaseline, CachedQueue, DoubleCachedQueue, PaddedDoubleCachedQueue, PaddedQueue,
   SoftMbMaskQueue, SoftMbQueue, SpscQueue, SynchronizedQueue, VolatileQueue,
};
use rand::Rng;
use std::hint::spin_loop;
use std::thread;

const ITEMS: u64 = 1_000_000;
const CAPACITY: usize = 64;

// Mostly a few spins, sometimes a yield, so each side regularly finds the
// queue full or empty.
fn jitter<R: Rng>(rng: &mut R) {
   match rng.gen_range(0..64u32) {
      0 => thread::yield_now(),
      n if n < 16 => {
         for _ in 0..n {
            spin_loop();
         }
      }
      _ => {}
   }
}

fn stress<Q: SpscQueue<u64>>(q: Q) {
   thread::scope(|s| {
      let q = &q;

      let producer = s.spawn(move || {
         let mut rng = rand::thread_rng();
         let mut full_hits = 0u64;
         for i in 0..ITEMS {
            let mut item = i;
            while let Err(back) = q.offer(item) {
               assert_eq!(back, i, "rejected offer returned a different value");
               item = back;
               full_hits += 1;
               thread::yield_now();
            }
            jitter(&mut rng);
         }
         full_hits
      });

      let consumer = s.spawn(move || {
         let mut rng = rand::thread_rng();
         let mut expected = 0u64;
         while expected < ITEMS {
            match q.poll() {
               Some(v) => {
                  assert_eq!(v, expected, "lost, duplicated or reordered value");
                  expected += 1;
                  jitter(&mut rng);
               }
               None => thread::yield_now(),
            }
         }
         expected
      });

      producer.join().unwrap();
      assert_eq!(consumer.join().unwrap(), ITEMS);
   });

   assert!(q.poll().is_none(), "values left over after the last expected one");
   assert_eq!(q.len(), 0);
}

#[test]
fn array_queue_baseline() {
   stress(ArrayQueueBaseline::new(CAPACITY).unwrap());
}

#[test]
fn synchronized() {
   stress(SynchronizedQueue::new(CAPACITY).unwrap());
}

#[test]
fn volatile() {
   stress(VolatileQueue::new(CAPACITY).unwrap());
}

#[test]
fn soft_mb() {
   stress(SoftMbQueue::new(CAPACITY).unwrap());
}

#[test]
fn soft_mb_modulo_non_power_of_two() {
   stress(SoftMbQueue::new(48).unwrap());
}

#[test]
fn soft_mb_mask() {
   stress(SoftMbMaskQueue::new(CAPACITY).unwrap());
}

#[test]
fn cached() {
   stress(CachedQueue::new(CAPACITY).unwrap());
}

#[test]
fn double_cached() {
   stress(DoubleCachedQueue::new(CAPACITY).unwrap());
}

#[test]
fn padded() {
   stress(PaddedQueue::new(CAPACITY).unwrap());
}

#[test]
fn padded_double_cached() {
   stress(PaddedDoubleCachedQueue::new(CAPACITY).unwrap());
}

#[test]
fn padded_double_cached_tiny_ring() {
   stress(PaddedDoubleCachedQueue::new(2).unwrap());
}
