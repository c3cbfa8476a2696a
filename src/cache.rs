use std::{
    any::Any,
    sync::Arc,
    time::{Duration, Instant},
};

use moka::{Expiry, sync::Cache};

const MAX_ENTRIES: u64 = 64;

#[derive(Clone)]
struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    ttl: Duration,
}

/// Restarts an entry's idle clock on every write and every read.
struct Sliding;

impl Expiry<String, Entry> for Sliding {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_read(
        &self,
        _key: &String,
        entry: &Entry,
        _read_at: Instant,
        _duration_until_expiry: Option<Duration>,
        _last_modified_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-process memo of whole listings. Entries use a sliding expiration:
/// every hit pushes the deadline out by the entry's ttl.
#[derive(Clone)]
pub struct ListingCache {
    entries: Cache<String, Entry>,
}

impl Default for ListingCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingCache {
    pub fn new() -> Self {
        let entries = Cache::builder().max_capacity(MAX_ENTRIES).expire_after(Sliding).build();
        Self { entries }
    }

    pub fn get<V>(&self, key: &str) -> Option<V>
    where
        V: Clone + Send + Sync + 'static,
    {
        let entry = self.entries.get(key)?;
        entry.value.downcast::<V>().ok().map(|v| V::clone(&v))
    }

    pub fn set<V>(&self, key: &str, value: V, ttl: Duration)
    where
        V: Send + Sync + 'static,
    {
        self.entries.insert(key.to_string(), Entry { value: Arc::new(value), ttl });
    }

    pub fn invalidate(&self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        tracing::debug!(key, removed, "listing cache invalidated");
        removed
    }
}

#[cfg(test)]
mod tests {
    use std::thread::sleep;

    use super::*;

    const TEN_MINUTES: Duration = Duration::from_secs(600);
    const SHORT: Duration = Duration::from_millis(400);

    #[test]
    fn returns_value_within_ttl() {
        let cache = ListingCache::new();
        cache.set("k", vec![1, 2, 3], TEN_MINUTES);

        assert_eq!(cache.get::<Vec<i32>>("k"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn reads_slide_the_deadline() {
        let cache = ListingCache::new();
        cache.set("k", "cast".to_string(), SHORT);

        // Each read lands inside the window opened by the previous one, and
        // the last lands well past the original deadline.
        for _ in 0..4 {
            sleep(Duration::from_millis(200));
            assert!(cache.get::<String>("k").is_some());
        }
    }

    #[test]
    fn idle_entry_expires() {
        let cache = ListingCache::new();
        cache.set("k", 42u32, SHORT);

        sleep(SHORT + Duration::from_millis(200));
        assert_eq!(cache.get::<u32>("k"), None);
    }

    #[test]
    fn invalidate_drops_entry() {
        let cache = ListingCache::new();
        cache.set("k", 1u8, TEN_MINUTES);

        assert!(cache.invalidate("k"));
        assert_eq!(cache.get::<u8>("k"), None);
        assert!(!cache.invalidate("k"));
    }

    #[test]
    fn wrong_type_is_a_miss() {
        let cache = ListingCache::new();
        cache.set("k", 1u8, TEN_MINUTES);

        assert_eq!(cache.get::<String>("k"), None);
        assert_eq!(cache.get::<u8>("k"), Some(1));
    }

    #[test]
    fn set_replaces_value_and_ttl() {
        let cache = ListingCache::new();
        cache.set("k", 1u8, SHORT);
        cache.set("k", 2u8, TEN_MINUTES);

        sleep(SHORT + Duration::from_millis(200));
        assert_eq!(cache.get::<u8>("k"), Some(2));
    }
}
