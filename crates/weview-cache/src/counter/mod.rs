//! Guest id allocation.

mod guest_counter;

pub use guest_counter::{MemoryGuestCounter, RedisGuestCounter};
