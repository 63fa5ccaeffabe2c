mod array_queue;
mod cached;
mod padded;
mod padding;
mod ring;
mod soft_mb;
mod synchronized;
mod volatile;

pub use array_queue::ArrayQueueBaseline;
pub use cached::{CachedQueue, DoubleCachedQueue};
pub use padded::{PaddedDoubleCachedQueue, PaddedQueue};
pub use padding::CACHE_LINE;
pub use ring::Mask;
pub use soft_mb::{SoftMbMaskQueue, SoftMbQueue};
pub use synchronized::SynchronizedQueue;
pub use volatile::VolatileQueue;
