//! Administrative reindex and observability.
//!
//! The vector index is a derived projection of Postgres; losing it is
//! tolerable because this rebuild recreates every point from source rows.

use serde::Serialize;

use crate::{LarderService, Result};
use larder_storage::queries;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexReport {
	pub indexed_count: u64,
	pub failed_count: u64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
	pub initialized: bool,
	pub embedding_available: bool,
	pub cache_available: bool,
	pub collection_name: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub points_count: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
}

impl LarderService {
	/// Rebuild every recipe point, then drop cached search results so stale
	/// rankings do not outlive the rebuild.
	pub async fn index_all(&self) -> Result<IndexReport> {
		let names = queries::recipe_names(&self.db.pool).await?;
		let mut indexed_count = 0_u64;
		let mut failed_count = 0_u64;

		for name in names {
			match self.index_recipe(&name).await {
				Ok(()) => indexed_count += 1,
				Err(err) => {
					tracing::warn!(error = %err, recipe = %name, "Reindex failed for recipe.");

					failed_count += 1;
				},
			}
		}

		let evicted = self.cache.evict_pattern("search:*").await;

		tracing::info!(indexed_count, failed_count, evicted, "Reindex finished.");

		Ok(IndexReport { indexed_count, failed_count })
	}

	pub async fn search_stats(&self) -> SearchStats {
		let mut stats = SearchStats {
			initialized: self.search_available(),
			embedding_available: self.embedding_available(),
			cache_available: self.cache.available(),
			collection_name: self.qdrant.collection.clone(),
			points_count: None,
			status: None,
		};

		if stats.initialized {
			match self.qdrant.stats().await {
				Ok(collection) => {
					stats.points_count = Some(collection.points_count);
					stats.status = Some(collection.status);
				},
				Err(err) => {
					tracing::warn!(error = %err, "Collection stats unavailable.");
				},
			}
		}

		stats
	}
}
