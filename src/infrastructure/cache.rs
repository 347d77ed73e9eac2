use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::domain::cache_keys::CacheKey;
use crate::domain::errors::CacheError;
use crate::domain::images::CachedResponse;
use crate::domain::ports::ResponseCache;

struct Entry {
    response: CachedResponse,
    stored_at: Instant,
    seq: u64,
}

#[derive(Default)]
struct Slots {
    entries: HashMap<CacheKey, Entry>,
    // Insertion order, oldest first. A slot is live only while its sequence
    // number matches the entry stored under the key.
    order: VecDeque<(u64, CacheKey)>,
    next_seq: u64,
}

impl Slots {
    fn is_live(&self, seq: u64, key: &CacheKey) -> bool {
        self.entries.get(key).is_some_and(|entry| entry.seq == seq)
    }
}

/// In-process response cache bounded by entry count and age.
///
/// When full, the oldest-inserted entry is evicted. Entries older than the
/// time-to-live are treated as misses and dropped on access.
pub struct MemoryResponseCache {
    slots: Mutex<Slots>,
    capacity: usize,
    ttl: Duration,
}

impl MemoryResponseCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            slots: Mutex::new(Slots::default()),
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slots> {
        self.slots
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn lookup(&self, key: &CacheKey, now: Instant) -> Option<CachedResponse> {
        let mut slots = self.lock();
        let entry = slots.entries.get(key)?;
        if now.duration_since(entry.stored_at) < self.ttl {
            return Some(entry.response.clone());
        }
        slots.entries.remove(key);
        None
    }

    fn store(&self, key: CacheKey, response: CachedResponse, now: Instant) {
        let mut slots = self.lock();
        let seq = slots.next_seq;
        slots.next_seq += 1;
        slots.entries.insert(
            key.clone(),
            Entry {
                response,
                stored_at: now,
                seq,
            },
        );
        slots.order.push_back((seq, key));

        while slots.entries.len() > self.capacity {
            let Some((seq, oldest)) = slots.order.pop_front() else {
                break;
            };
            if slots.is_live(seq, &oldest) {
                slots.entries.remove(&oldest);
            }
        }
        // Drop slots left behind by expiry and overwrites.
        if slots.order.len() > self.capacity.saturating_mul(2) {
            let mut order = std::mem::take(&mut slots.order);
            order.retain(|(seq, key)| slots.is_live(*seq, key));
            slots.order = order;
        }
    }
}

#[async_trait]
impl ResponseCache for MemoryResponseCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedResponse>, CacheError> {
        Ok(self.lookup(key, Instant::now()))
    }

    async fn put(&self, key: CacheKey, response: CachedResponse) -> Result<(), CacheError> {
        self.store(key, response, Instant::now());
        Ok(())
    }
}
