//! Cache-aside layer over Redis.
//!
//! Every operation is strictly optional: a missing or failing backend
//! degrades to a cache miss, never to a request error. Availability is
//! decided once at startup; later failures are logged and swallowed.

use std::time::Duration;

use redis::{aio::ConnectionManager, AsyncCommands};

pub struct VectorCache {
	manager: Option<ConnectionManager>,
	ttl_seconds: u64,
	timeout: Duration,
}
impl VectorCache {
	pub async fn connect(cfg: &larder_config::Cache) -> Self {
		let manager = match try_connect(cfg).await {
			Ok(manager) => Some(manager),
			Err(err) => {
				tracing::warn!(error = %err, "Cache unreachable; running without it.");

				None
			},
		};

		Self {
			manager,
			ttl_seconds: cfg.ttl_seconds,
			timeout: Duration::from_millis(cfg.timeout_ms),
		}
	}

	/// A cache that never connects. Used where Redis is absent by design.
	pub fn unavailable(ttl_seconds: u64) -> Self {
		Self { manager: None, ttl_seconds, timeout: Duration::from_millis(2_000) }
	}

	pub fn available(&self) -> bool {
		self.manager.is_some()
	}

	pub fn ttl_seconds(&self) -> u64 {
		self.ttl_seconds
	}

	pub async fn get(&self, key: &str) -> Option<String> {
		let mut conn = self.manager.clone()?;

		match tokio::time::timeout(self.timeout, conn.get::<_, Option<String>>(key)).await {
			Ok(Ok(value)) => value,
			Ok(Err(err)) => {
				tracing::warn!(error = %err, key, "Cache read failed.");

				None
			},
			Err(_) => {
				tracing::warn!(key, "Cache read timed out.");

				None
			},
		}
	}

	pub async fn set(&self, key: &str, value: String) {
		let Some(mut conn) = self.manager.clone() else {
			return;
		};
		let write = conn.set_ex::<_, _, ()>(key, value, self.ttl_seconds);

		match tokio::time::timeout(self.timeout, write).await {
			Ok(Ok(())) => {},
			Ok(Err(err)) => tracing::warn!(error = %err, key, "Cache write failed."),
			Err(_) => tracing::warn!(key, "Cache write timed out."),
		}
	}

	/// Bulk eviction for administrative rebuilds. Not part of the recipe
	/// write path; the TTL bounds staleness there.
	pub async fn evict_pattern(&self, pattern: &str) -> u64 {
		let Some(mut conn) = self.manager.clone() else {
			return 0;
		};
		let keys: Vec<String> =
			match tokio::time::timeout(self.timeout, conn.keys(pattern)).await {
				Ok(Ok(keys)) => keys,
				Ok(Err(err)) => {
					tracing::warn!(error = %err, pattern, "Cache key scan failed.");

					return 0;
				},
				Err(_) => {
					tracing::warn!(pattern, "Cache key scan timed out.");

					return 0;
				},
			};

		if keys.is_empty() {
			return 0;
		}

		let count = keys.len() as u64;

		match tokio::time::timeout(self.timeout, conn.del::<_, ()>(keys)).await {
			Ok(Ok(())) => count,
			Ok(Err(err)) => {
				tracing::warn!(error = %err, pattern, "Cache eviction failed.");

				0
			},
			Err(_) => {
				tracing::warn!(pattern, "Cache eviction timed out.");

				0
			},
		}
	}
}

async fn try_connect(cfg: &larder_config::Cache) -> Result<ConnectionManager, redis::RedisError> {
	let client = redis::Client::open(cfg.redis_url.as_str())?;
	let mut manager = ConnectionManager::new(client).await?;

	// Round-trip probe; the value is irrelevant, reachability is not.
	let _: Option<String> = manager.get("larder:cache:probe").await?;

	Ok(manager)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn unavailable_cache_is_a_silent_no_op() {
		let cache = VectorCache::unavailable(3_600);

		assert!(!cache.available());
		assert_eq!(cache.get("search:abc").await, None);

		cache.set("search:abc", "[]".to_string()).await;

		assert_eq!(cache.get("search:abc").await, None);
		assert_eq!(cache.evict_pattern("search:*").await, 0);
	}
}
