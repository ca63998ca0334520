//! In-memory result cache with LRU and TTL bounds.
//! 具备 LRU 与 TTL 上限的内存结果缓存。

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use rb_core::cache::{CacheEntry, NavigationError};
use rb_core::config::CacheConfig;
use rb_core::ports::{ClockPort, ResultCachePort};
use rb_core::render::{render_page, RenderedPage};
use rb_core::{ChannelId, ComputationResult, MessageId, UserId};
use tokio::sync::Mutex;
use tracing::debug;

/// Handle-keyed store of delivered results.
///
/// `max_entries == 0` disables the size bound and `ttl_secs == 0` disables
/// expiry. Entries expire `ttl_secs` after their last access.
pub struct InMemoryResultCache {
    inner: Mutex<Inner>,
    clock: Arc<dyn ClockPort>,
    max_entries: usize,
    ttl_ms: i64,
}

struct Inner {
    entries: HashMap<MessageId, CacheEntry>,
    /// Least recently used first
    order: VecDeque<MessageId>,
}

impl InMemoryResultCache {
    pub fn new(config: &CacheConfig, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            clock,
            max_entries: config.max_entries,
            ttl_ms: (config.ttl_secs as i64).saturating_mul(1000),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl ResultCachePort for InMemoryResultCache {
    async fn insert(
        &self,
        handle: MessageId,
        result: Arc<ComputationResult>,
        channel_id: ChannelId,
        requester_id: UserId,
    ) {
        let now = self.clock.now_ms();
        let mut inner = self.inner.lock().await;
        inner.purge_expired(now, self.ttl_ms);

        if inner.entries.contains_key(&handle) {
            debug!(handle = %handle, "Handle already cached, keeping the first result");
            return;
        }

        inner.entries.insert(
            handle.clone(),
            CacheEntry {
                handle: handle.clone(),
                page: 0,
                result,
                channel_id,
                requester_id,
                inserted_at_ms: now,
                last_access_ms: now,
            },
        );
        inner.order.push_back(handle);
        inner.evict_over(self.max_entries);
    }

    async fn get(&self, handle: &MessageId) -> Option<CacheEntry> {
        let now = self.clock.now_ms();
        let mut inner = self.inner.lock().await;
        inner.purge_expired(now, self.ttl_ms);
        inner.entries.get(handle).cloned()
    }

    async fn navigate(
        &self,
        handle: &MessageId,
        delta: i64,
        actor: &UserId,
    ) -> Result<RenderedPage, NavigationError> {
        let now = self.clock.now_ms();
        let mut inner = self.inner.lock().await;
        inner.purge_expired(now, self.ttl_ms);

        let entry = inner
            .entries
            .get_mut(handle)
            .ok_or(NavigationError::NotFound)?;
        if &entry.requester_id != actor {
            return Err(NavigationError::Unauthorized);
        }
        let page = entry.page_after(delta).ok_or(NavigationError::OutOfRange)?;

        entry.page = page;
        entry.last_access_ms = now;
        let rendered = render_page(&entry.result, page, &entry.requester_id);

        inner.touch(handle);
        Ok(rendered)
    }
}

impl Inner {
    fn touch(&mut self, handle: &MessageId) {
        if let Some(pos) = self.order.iter().position(|h| h == handle) {
            if let Some(h) = self.order.remove(pos) {
                self.order.push_back(h);
            }
        }
    }

    fn evict_over(&mut self, max_entries: usize) {
        if max_entries == 0 {
            return;
        }
        while self.entries.len() > max_entries {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            debug!(handle = %oldest, "Evicted least recently used result");
        }
    }

    fn purge_expired(&mut self, now_ms: i64, ttl_ms: i64) {
        if ttl_ms <= 0 {
            return;
        }
        // `order` is sorted by last access, so expired entries sit at the front
        while let Some(oldest) = self.order.front() {
            let expired = self
                .entries
                .get(oldest)
                .map(|entry| now_ms.saturating_sub(entry.last_access_ms) > ttl_ms)
                .unwrap_or(true);
            if !expired {
                break;
            }
            if let Some(handle) = self.order.pop_front() {
                self.entries.remove(&handle);
                debug!(handle = %handle, "Expired cached result");
            }
        }
    }
}
