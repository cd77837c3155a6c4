//! Guest id counters.
//!
//! Guest ids come from a counter shared by every instance (`INCR guest:counter`)
//! so two instances never hand out the same id.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use weview_core::{GuestCounter, RepoResult};

use crate::pool::RedisPool;

/// Redis key holding the last issued guest id
const GUEST_COUNTER_KEY: &str = "guest:counter";

/// Redis-backed guest counter
#[derive(Clone, Debug)]
pub struct RedisGuestCounter {
    pool: RedisPool,
}

impl RedisGuestCounter {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuestCounter for RedisGuestCounter {
    async fn next_guest_id(&self) -> RepoResult<u64> {
        let id = self.pool.incr(GUEST_COUNTER_KEY).await?;
        tracing::debug!(guest_id = id, "Allocated guest id");
        Ok(id)
    }
}

/// In-process guest counter, ids start at 1
#[derive(Debug, Default)]
pub struct MemoryGuestCounter {
    last: AtomicU64,
}

impl MemoryGuestCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GuestCounter for MemoryGuestCounter {
    async fn next_guest_id(&self) -> RepoResult<u64> {
        Ok(self.last.fetch_add(1, Ordering::SeqCst) + 1)
    }
}
