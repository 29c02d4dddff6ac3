/// Read-through caching over a [`Cache`](crate::db::Cache).
///
/// Returns the cached value on a hit. On a miss the block is awaited, its value
/// is queued for a background write with the given TTL, and returned. A failed
/// cache read is logged and treated as a miss, so Redis being down never fails
/// the caller.
///
/// # Arguments
/// * `$cache`: the cache instance
/// * `$key`: the `CacheKey`
/// * `$ttl`: time-to-live in seconds
/// * `$block`: future producing `AppResult<T>` on a miss
///
/// # Example
/// ```rust,ignore
/// let rankings = cached!(self.cache, CacheKey::Rankings, 60, async move {
///     self.inner.fetch_all().await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(hit)) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(hit)
            }
            miss => {
                if let Err(e) = miss {
                    tracing::warn!(error = %e, key = %key, "Cache read failed, falling back to storage");
                }
                let value = $block.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
