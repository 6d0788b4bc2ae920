//! Hybrid recipe search: cache-aside over a dense+sparse RRF query, with a
//! single-vector fallback and a deterministic exact-match fallback when the
//! index is unreachable. Search is a degradable feature end to end; the only
//! hard error out of this module is a caller mistake.

use qdrant_client::qdrant::{value::Kind, ScoredPoint};
use serde::{Deserialize, Serialize};

use crate::{Error, LarderService, Result};
use larder_domain::{cache_key, keywords, sparse};

pub const MATCH_HYBRID_RRF: &str = "hybrid_rrf";
pub const MATCH_SEMANTIC: &str = "semantic";
pub const MATCH_INGREDIENT: &str = "ingredient";
pub const MATCH_EXACT: &str = "exact";

const WARN_SEARCH_UNAVAILABLE: &str = "Semantic search unavailable, showing exact matches only";
const WARN_EMBEDDING_UNAVAILABLE: &str =
	"Semantic search is not available. Make sure the vector index and embedding endpoint are running.";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HybridSearchRequest {
	pub ingredients: Vec<String>,
	pub query: String,
	pub limit: Option<u32>,
	pub threshold: Option<f32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
	pub recipe_name: String,
	pub score: f32,
	pub cuisine_type: Option<String>,
	pub match_type: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchResponse {
	pub results: Vec<SearchHit>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub warning: Option<String>,
}

impl LarderService {
	/// Dense+sparse RRF search per the request, consulting the result cache
	/// first. Requires at least one of `ingredients` / `query`.
	pub async fn hybrid_search(&self, req: HybridSearchRequest) -> Result<SearchResponse> {
		let query = req.query.trim().to_string();
		let has_ingredients = req.ingredients.iter().any(|token| !token.trim().is_empty());

		if query.is_empty() && !has_ingredients {
			return Err(Error::InvalidArgument {
				message: "Either ingredients or query is required.".to_string(),
			});
		}

		let top_k = req.limit.unwrap_or(self.cfg.search.default_top_k).max(1) as usize;
		let threshold = req.threshold.unwrap_or(0.0);

		if !(0.0..=1.0).contains(&threshold) {
			return Err(Error::InvalidArgument {
				message: "threshold must be between 0.0 and 1.0.".to_string(),
			});
		}

		// Index down: answer from the deterministic resolver instead.
		if !self.search_available() {
			let made = self.cookable_from_fridge().await?.made;

			return Ok(SearchResponse {
				results: made
					.into_iter()
					.map(|name| SearchHit {
						recipe_name: name,
						score: 0.0,
						cuisine_type: None,
						match_type: MATCH_EXACT.to_string(),
					})
					.collect(),
				warning: Some(WARN_SEARCH_UNAVAILABLE.to_string()),
			});
		}

		let canonical_ingredients = self.resolve_all(&req.ingredients).await?;
		let canonical =
			cache_key::search_canonical(&canonical_ingredients, &query, top_k, threshold);
		let key = cache_key::search_key(&canonical);

		if let Some(raw) = self.cache.get(&key).await {
			match serde_json::from_str::<Vec<SearchHit>>(&raw) {
				Ok(results) => return Ok(SearchResponse { results, warning: None }),
				Err(err) => {
					tracing::warn!(error = %err, key = %key, "Discarding undecodable cached results.");
				},
			}
		}

		let dense = if query.is_empty() {
			None
		} else {
			self.cached_query_embedding(&query).await
		};
		let sparse_vec = if has_ingredients {
			Some(sparse::from_ingredients(&req.ingredients))
		} else {
			None
		};
		let sparse_vec = sparse_vec.filter(|vec| !vec.is_empty());

		let results = if dense.is_none() && sparse_vec.is_none() {
			self.legacy_search(&req.ingredients, &query, top_k, threshold).await
		} else {
			match self.fused_search(dense, sparse_vec.as_ref(), top_k, threshold).await {
				Ok(results) => results,
				Err(err) => {
					tracing::warn!(error = %err, "Fused query failed; using legacy search.");

					self.legacy_search(&req.ingredients, &query, top_k, threshold).await
				},
			}
		};

		if !results.is_empty() {
			if let Ok(raw) = serde_json::to_string(&results) {
				self.cache.set(&key, raw).await;
			}
		}

		Ok(SearchResponse { results, warning: None })
	}

	/// Single dense-vector search for `GET /recipes/search`. Hits whose name
	/// shares no important keyword with the query are discarded.
	pub async fn simple_search(&self, query: &str, limit: u32) -> Result<SearchResponse> {
		let query = query.trim();

		if query.is_empty() {
			return Err(Error::InvalidArgument { message: "Query is required.".to_string() });
		}
		if !self.search_available() || !self.embedding_available() {
			return Ok(SearchResponse {
				results: Vec::new(),
				warning: Some(WARN_EMBEDDING_UNAVAILABLE.to_string()),
			});
		}

		let limit = limit.max(1);
		let results = self
			.dense_hits(query, u64::from(limit), self.cfg.search.min_simple_score, MATCH_SEMANTIC)
			.await;

		Ok(SearchResponse { results, warning: None })
	}

	async fn fused_search(
		&self,
		dense: Option<Vec<f32>>,
		sparse_vec: Option<&sparse::SparseVector>,
		top_k: usize,
		threshold: f32,
	) -> Result<Vec<SearchHit>> {
		let prefetch_limit = u64::from(self.cfg.search.prefetch_limit);
		let limit = (top_k as u64 * 2).max(50);
		let points = self.qdrant.hybrid_query(dense, sparse_vec, prefetch_limit, limit).await?;
		let mut results = Vec::new();

		for point in &points {
			if point.score < threshold {
				continue;
			}

			if let Some(hit) = hit_from_point(point, MATCH_HYBRID_RRF) {
				results.push(hit);
			}
			if results.len() >= top_k {
				break;
			}
		}

		Ok(results)
	}

	/// Pre-fusion behavior: two single-vector searches, deduplicated by
	/// first occurrence, ranked by raw score.
	async fn legacy_search(
		&self,
		ingredients: &[String],
		query: &str,
		top_k: usize,
		threshold: f32,
	) -> Vec<SearchHit> {
		let fetch = (top_k * 2) as u64;
		// Both the fallback relevance floor and the caller's threshold apply.
		let min_score = self.cfg.search.min_simple_score.max(threshold);
		let mut results: Vec<SearchHit> = Vec::new();

		if !query.is_empty() {
			for hit in self.dense_hits(query, fetch, min_score, MATCH_SEMANTIC).await {
				if !results.iter().any(|existing| existing.recipe_name == hit.recipe_name) {
					results.push(hit);
				}
			}
		}
		if !ingredients.is_empty() {
			let ingredient_query = ingredients.join(" ");

			for hit in
				self.dense_hits(&ingredient_query, fetch, min_score, MATCH_INGREDIENT).await
			{
				if !results.iter().any(|existing| existing.recipe_name == hit.recipe_name) {
					results.push(hit);
				}
			}
		}

		results.sort_by(|a, b| b.score.total_cmp(&a.score));
		results.truncate(top_k);

		results
	}

	async fn dense_hits(
		&self,
		query: &str,
		limit: u64,
		min_score: f32,
		match_type: &str,
	) -> Vec<SearchHit> {
		let vector = match self.embed_text(query).await {
			Ok(Some(vector)) => vector,
			Ok(None) => return Vec::new(),
			Err(err) => {
				tracing::warn!(error = %err, "Query embedding failed.");

				return Vec::new();
			},
		};
		let points = match self.qdrant.search_dense(vector, limit, min_score).await {
			Ok(points) => points,
			Err(err) => {
				tracing::warn!(error = %err, "Dense search failed.");

				return Vec::new();
			},
		};

		points
			.iter()
			.filter_map(|point| hit_from_point(point, match_type))
			.filter(|hit| keywords::matches_query(&hit.recipe_name, query))
			.collect()
	}
}

fn hit_from_point(point: &ScoredPoint, match_type: &str) -> Option<SearchHit> {
	let recipe_name = payload_text(point, "recipe_name")?;

	Some(SearchHit {
		recipe_name,
		score: point.score,
		cuisine_type: payload_text(point, "cuisine_type"),
		match_type: match_type.to_string(),
	})
}

fn payload_text(point: &ScoredPoint, key: &str) -> Option<String> {
	match point.payload.get(key).and_then(|value| value.kind.as_ref()) {
		Some(Kind::StringValue(text)) => Some(text.clone()),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn point(name: &str, score: f32) -> ScoredPoint {
		let mut point = ScoredPoint::default();

		point.score = score;
		point.payload.insert(
			"recipe_name".to_string(),
			qdrant_client::qdrant::Value { kind: Some(Kind::StringValue(name.to_string())) },
		);

		point
	}

	#[test]
	fn hits_carry_payload_and_tag() {
		let hit = hit_from_point(&point("carbonara", 0.8), MATCH_HYBRID_RRF).unwrap();

		assert_eq!(hit.recipe_name, "carbonara");
		assert_eq!(hit.score, 0.8);
		assert_eq!(hit.match_type, "hybrid_rrf");
		assert_eq!(hit.cuisine_type, None);
	}

	#[test]
	fn points_without_names_are_dropped() {
		let nameless = ScoredPoint::default();

		assert!(hit_from_point(&nameless, MATCH_SEMANTIC).is_none());
	}

	#[test]
	fn search_hits_round_trip_through_the_cache_encoding() {
		let hits = vec![SearchHit {
			recipe_name: "salad".to_string(),
			score: 0.42,
			cuisine_type: Some("ITALIAN".to_string()),
			match_type: MATCH_HYBRID_RRF.to_string(),
		}];
		let raw = serde_json::to_string(&hits).unwrap();
		let decoded: Vec<SearchHit> = serde_json::from_str(&raw).unwrap();

		assert_eq!(decoded, hits);
	}
}
