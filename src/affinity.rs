// Thread-to-core pinning for the producer and consumer.

use crate::BenchError;
use tracing::{debug, warn};

#[cfg(any(target_os = "linux", target_os = "android"))]
fn set_affinity(core: usize) -> nix::Result<()> {
   use nix::sched::{sched_setaffinity, CpuSet};
   use nix::unistd::Pid;

   let mut set = CpuSet::new();
   set.set(core)?;
   // pid 0 is the calling thread
   sched_setaffinity(Pid::from_raw(0), &set)
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn set_affinity(_core: usize) -> nix::Result<()> {
   Err(nix::Error::ENOTSUP)
}

/// Pins the calling thread to `core`.
pub(crate) fn pin_current_thread(role: &'static str, core: usize) -> Result<(), BenchError> {
   set_affinity(core).map_err(|source| BenchError::Pin { role, core, source })?;
   debug!(role, core, "pinned thread");
   Ok(())
}

/// Like [`pin_current_thread`], but a failure only costs the pinning: it is
/// logged and the thread keeps running wherever the scheduler puts it.
pub(crate) fn try_pin_current_thread(role: &'static str, core: usize) {
   if let Err(err) = pin_current_thread(role, core) {
      warn!(%err, "running unpinned");
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use std::thread;

   #[test]
   fn out_of_range_core_is_a_pin_error() {
      let err = thread::spawn(|| pin_current_thread("consumer", usize::MAX))
         .join()
         .unwrap()
         .unwrap_err();
      match err {
         BenchError::Pin { role, core, .. } => {
            assert_eq!(role, "consumer");
            assert_eq!(core, usize::MAX);
         }
         other => panic!("unexpected error {other:?}"),
      }
      assert!(err_text(usize::MAX).starts_with("could not pin producer to core"));
   }

   fn err_text(core: usize) -> String {
      thread::spawn(move || pin_current_thread("producer", core))
         .join()
         .unwrap()
         .unwrap_err()
         .to_string()
   }

   #[cfg(target_os = "linux")]
   #[test]
   fn allowed_core_can_be_pinned() {
      use nix::sched::{sched_getaffinity, CpuSet};
      use nix::unistd::Pid;

      let allowed = sched_getaffinity(Pid::from_raw(0)).unwrap();
      let core = (0..CpuSet::count()).find(|&c| allowed.is_set(c).unwrap()).unwrap();
      thread::spawn(move || pin_current_thread("producer", core)).join().unwrap().unwrap();
   }

   #[test]
   fn failed_pin_is_not_fatal() {
      thread::spawn(|| try_pin_current_thread("consumer", usize::MAX)).join().unwrap();
   }
}
