use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;
use yatube_models::config::CacheConfig;

struct CacheEntry<T> {
    value: T,
    inserted_at: Instant,
}

impl<T> CacheEntry<T> {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() >= ttl
    }
}

/// Rendered pages, kept for a fixed time.
///
/// Writes to the store never evict anything: a page may be served stale
/// until its entry expires.
pub struct PageCache<T> {
    inner: Option<Mutex<LruCache<i32, CacheEntry<T>>>>,
    ttl: Duration,
}

impl<T: Clone> PageCache<T> {
    pub fn new(config: &CacheConfig) -> Self {
        match NonZeroUsize::new(config.capacity) {
            Some(capacity) if config.enabled() => PageCache {
                inner: Some(Mutex::new(LruCache::new(capacity))),
                ttl: config.ttl,
            },
            _ => PageCache::disabled(),
        }
    }

    pub fn disabled() -> Self {
        PageCache {
            inner: None,
            ttl: Duration::from_secs(0),
        }
    }

    pub fn get(&self, page: i32) -> Option<T> {
        let mut cache = self.inner.as_ref()?.lock().ok()?;
        if cache.peek(&page)?.is_expired(self.ttl) {
            cache.pop(&page);
            return None;
        }
        debug!("index page {} served from cache", page);
        cache.get(&page).map(|entry| entry.value.clone())
    }

    pub fn insert(&self, page: i32, value: T) {
        if let Some(Ok(mut cache)) = self.inner.as_ref().map(Mutex::lock) {
            cache.put(
                page,
                CacheEntry {
                    value,
                    inserted_at: Instant::now(),
                },
            );
        }
    }

    /// Returns the cached page, or renders it with `render` and keeps it.
    /// Failed renders are not cached.
    pub fn get_or_try_insert_with<E, F>(&self, page: i32, render: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.get(page) {
            return Ok(value);
        }
        let value = render()?;
        self.insert(page, value.clone());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn config(ttl: Duration, capacity: usize) -> CacheConfig {
        CacheConfig { ttl, capacity }
    }

    #[test]
    fn entries_expire() {
        let cache = PageCache::new(&config(Duration::from_millis(50), 4));
        cache.insert(1, "first");
        assert_eq!(cache.get(1), Some("first"));
        sleep(Duration::from_millis(80));
        assert_eq!(cache.get(1), None);
    }

    #[test]
    fn least_recently_used_goes_first() {
        let cache = PageCache::new(&config(Duration::from_secs(60), 2));
        cache.insert(1, 'a');
        cache.insert(2, 'b');
        cache.get(1);
        cache.insert(3, 'c');
        assert_eq!(cache.get(2), None);
        assert_eq!(cache.get(1), Some('a'));
        assert_eq!(cache.get(3), Some('c'));
    }

    #[test]
    fn render_once() {
        let cache = PageCache::new(&config(Duration::from_secs(60), 2));
        let mut renders = 0;
        for _ in 0..3 {
            let page: Result<_, ()> = cache.get_or_try_insert_with(1, || {
                renders += 1;
                Ok(vec![1, 2, 3])
            });
            assert_eq!(page, Ok(vec![1, 2, 3]));
        }
        assert_eq!(renders, 1);

        let failed: Result<Vec<i32>, &str> = cache.get_or_try_insert_with(2, || Err("oops"));
        assert!(failed.is_err());
        assert_eq!(cache.get(2), None);
    }

    #[test]
    fn zero_ttl_disables() {
        let cache = PageCache::new(&config(Duration::from_secs(0), 64));
        cache.insert(1, 1);
        assert_eq!(cache.get(1), None);
    }
}
