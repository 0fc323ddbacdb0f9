/// Read-through caching on top of [`Cache`](crate::db::Cache).
///
/// Returns the cached value on a hit. On a miss, or when the cache itself
/// cannot be read, awaits `$block` and returns its value. The value is queued
/// for writing with `$ttl` seconds to live unless `$cacheable` rejects it.
/// Errors from `$block` are propagated with `?` and never cached.
///
/// ```rust,ignore
/// let edges = cached!(cache, CacheKey::Similar(id.to_string()), 3600, async move {
///     inner.lookup(id).await
/// }, |edges: &Vec<SimilarityEdge>| !edges.is_empty());
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr, $cacheable:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(cached)) => Ok(cached),
            miss => {
                if let Err(e) = miss {
                    tracing::warn!(error = %e, key = %key, "Cache read failed, bypassing cache");
                }
                let value = $block.await?;
                if ($cacheable)(&value) {
                    $cache.set_in_background(&key, &value, $ttl);
                } else {
                    tracing::debug!(key = %key, "Value not cacheable, skipping write");
                }
                Ok(value)
            }
        }
    }};
}
