//! Redis-backed response cache for AI generations and match results.
//!
//! The cache is optional: without `REDIS_URL`, or when Redis errors, every
//! lookup is a miss and every store is a no-op. Callers never see cache errors.

use std::future::Future;

use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::metrics;

/// Joins key parts before hashing so ("ab", "c") and ("a", "bc") differ.
const KEY_PART_SEPARATOR: char = '\u{1f}';

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CacheStats {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_keys: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hits: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub misses: Option<u64>,
}

#[derive(Clone)]
pub struct ResponseCache {
    client: Option<redis::Client>,
}

impl ResponseCache {
    pub fn new(redis_url: Option<&str>) -> Self {
        let client = redis_url.and_then(|url| match redis::Client::open(url) {
            Ok(client) => {
                info!("Redis cache enabled");
                Some(client)
            }
            Err(e) => {
                warn!("Invalid REDIS_URL, caching disabled: {e}");
                None
            }
        });
        Self { client }
    }

    pub fn disabled() -> Self {
        Self { client: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    async fn connection(&self) -> Option<redis::aio::MultiplexedConnection> {
        let client = self.client.as_ref()?;
        match client.get_multiplexed_async_connection().await {
            Ok(con) => Some(con),
            Err(e) => {
                warn!("Redis connection failed: {e}");
                None
            }
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let mut con = self.connection().await?;
        match con.get::<_, Option<String>>(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Cache get failed for {key}: {e}");
                None
            }
        }
    }

    pub async fn set(&self, key: &str, value: &str, ttl_secs: u64) {
        let Some(mut con) = self.connection().await else {
            return;
        };
        if let Err(e) = con.set_ex::<_, _, ()>(key, value, ttl_secs).await {
            warn!("Cache set failed for {key}: {e}");
        }
    }

    /// Returns the cached value for `prefix` + `parts`, or runs `compute` and
    /// stores its successful result for `ttl_secs`. Errors are never cached.
    pub async fn cached<T, E, F, Fut>(
        &self,
        prefix: &str,
        parts: &[&str],
        ttl_secs: u64,
        compute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.cached_when(prefix, parts, ttl_secs, compute, |_| true)
            .await
    }

    /// Like `cached`, but a freshly computed value is stored only if `keep`
    /// accepts it. Rejected values are still returned to the caller.
    pub async fn cached_when<T, E, F, Fut, K>(
        &self,
        prefix: &str,
        parts: &[&str],
        ttl_secs: u64,
        compute: F,
        keep: K,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        K: FnOnce(&T) -> bool,
    {
        if !self.is_enabled() {
            return compute().await;
        }

        let key = cache_key(prefix, parts);
        if let Some(raw) = self.get(&key).await {
            match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    debug!("Cache hit: {key}");
                    metrics::record_cache_hit(prefix);
                    return Ok(value);
                }
                Err(e) => warn!("Discarding undecodable cache entry {key}: {e}"),
            }
        }

        metrics::record_cache_miss(prefix);
        let value = compute().await?;
        if !keep(&value) {
            debug!("Not caching {key}: value rejected");
            return Ok(value);
        }
        match serde_json::to_string(&value) {
            Ok(raw) => self.set(&key, &raw, ttl_secs).await,
            Err(e) => warn!("Cache value for {key} not serializable: {e}"),
        }
        Ok(value)
    }

    pub async fn stats(&self) -> CacheStats {
        let Some(mut con) = self.connection().await else {
            return CacheStats::default();
        };

        let total_keys = redis::cmd("DBSIZE")
            .query_async::<_, i64>(&mut con)
            .await
            .map_err(|e| warn!("DBSIZE failed: {e}"))
            .ok();
        let info = redis::cmd("INFO")
            .arg("stats")
            .query_async::<_, String>(&mut con)
            .await
            .map_err(|e| warn!("INFO stats failed: {e}"))
            .ok();
        let (hits, misses) = info.as_deref().map(parse_info_stats).unwrap_or((None, None));

        CacheStats {
            available: true,
            total_keys,
            hits,
            misses,
        }
    }

    /// Deletes every key matching `pattern`. Returns the number removed.
    pub async fn clear(&self, pattern: &str) -> Result<u64, redis::RedisError> {
        let Some(client) = self.client.as_ref() else {
            return Ok(0);
        };
        let mut con = client.get_multiplexed_async_connection().await?;

        let mut keys: Vec<String> = Vec::new();
        {
            let mut iter = con.scan_match::<_, String>(pattern).await?;
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
        }

        if keys.is_empty() {
            return Ok(0);
        }
        let removed: u64 = con.del(&keys).await?;
        info!("Cleared {removed} cache entries matching '{pattern}'");
        Ok(removed)
    }
}

/// `prefix:` followed by the hex SHA-256 of the joined parts.
pub fn cache_key(prefix: &str, parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            let mut buf = [0u8; 4];
            hasher.update(KEY_PART_SEPARATOR.encode_utf8(&mut buf).as_bytes());
        }
        hasher.update(part.as_bytes());
    }
    format!("{prefix}:{:x}", hasher.finalize())
}

fn parse_info_stats(info: &str) -> (Option<u64>, Option<u64>) {
    let field = |name: &str| {
        info.lines()
            .filter_map(|line| line.trim().split_once(':'))
            .find(|(k, _)| *k == name)
            .and_then(|(_, v)| v.trim().parse().ok())
    };
    (field("keyspace_hits"), field("keyspace_misses"))
}
