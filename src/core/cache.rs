//! Short-lived quote caching.
//!
//! Each scrape source keeps one most-recent value so a single dashboard
//! render performs at most one fetch per source, and repeated renders
//! within the TTL reuse the last quote.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Clone)]
pub struct QuoteCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<Mutex<Option<(V, Instant)>>>,
    ttl: Duration,
}

impl<V> QuoteCache<V>
where
    V: Clone + Send + Sync,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
            ttl,
        }
    }

    pub async fn get(&self) -> Option<V> {
        let slot = self.inner.lock().await;
        match slot.as_ref() {
            Some((value, fetched_at)) if fetched_at.elapsed() < self.ttl => {
                debug!("Quote cache HIT");
                Some(value.clone())
            }
            Some(_) => {
                debug!("Quote cache STALE");
                None
            }
            None => {
                debug!("Quote cache MISS");
                None
            }
        }
    }

    pub async fn put(&self, value: V) {
        let mut slot = self.inner.lock().await;
        debug!("Quote cache PUT");
        *slot = Some((value, Instant::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_cache_get_put() {
        let cache = QuoteCache::<f64>::new(Duration::from_secs(60));

        assert!(cache.get().await.is_none());

        cache.put(2650.0).await;
        assert_eq!(cache.get().await, Some(2650.0));
    }

    #[tokio::test]
    async fn test_cache_expiry() {
        let cache = QuoteCache::<f64>::new(Duration::from_millis(10));

        cache.put(2650.0).await;
        assert_eq!(cache.get().await, Some(2650.0));

        sleep(Duration::from_millis(20)).await;
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn test_put_refreshes_stale_value() {
        let cache = QuoteCache::<f64>::new(Duration::from_millis(10));

        cache.put(2650.0).await;
        sleep(Duration::from_millis(20)).await;
        cache.put(2660.0).await;

        assert_eq!(cache.get().await, Some(2660.0));
    }
}
