use qdrant_client::{
	qdrant::{
		CreateCollectionBuilder, DeletePointsBuilder, Distance, Fusion, Modifier, NamedVectors,
		PointStruct, PointsIdsList, PrefetchQueryBuilder, Query, QueryPointsBuilder, ScoredPoint,
		SearchPointsBuilder, SparseVectorParamsBuilder, SparseVectorsConfigBuilder,
		UpsertPointsBuilder, Vector, VectorInput, VectorParamsBuilder, VectorsConfigBuilder,
	},
	Payload, Qdrant,
};
use sha2::{Digest, Sha256};

use crate::Result;
use larder_domain::SparseVector;

pub const DENSE_VECTOR_NAME: &str = "dense";
pub const SPARSE_VECTOR_NAME: &str = "sparse";

#[derive(Debug)]
pub struct CollectionStats {
	pub points_count: u64,
	pub status: String,
}

pub struct QdrantStore {
	pub client: Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &larder_config::Qdrant) -> Result<Self> {
		let client = Qdrant::from_url(&cfg.url)
			.timeout(std::time::Duration::from_millis(cfg.timeout_ms))
			.build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Idempotent create-if-missing. The collection carries one dense vector
	/// per recipe for semantic similarity and one IDF-modified sparse vector
	/// for keyword evidence.
	pub async fn ensure_collection(&self) -> Result<()> {
		if self.client.collection_exists(&self.collection).await? {
			return Ok(());
		}

		let mut vectors = VectorsConfigBuilder::default();

		vectors.add_named_vector_params(
			DENSE_VECTOR_NAME,
			VectorParamsBuilder::new(u64::from(self.vector_dim), Distance::Cosine),
		);

		let mut sparse_vectors = SparseVectorsConfigBuilder::default();

		sparse_vectors.add_named_vector_params(
			SPARSE_VECTOR_NAME,
			SparseVectorParamsBuilder::default().modifier(Modifier::Idf),
		);

		self.client
			.create_collection(
				CreateCollectionBuilder::new(&self.collection)
					.vectors_config(vectors)
					.sparse_vectors_config(sparse_vectors),
			)
			.await?;

		Ok(())
	}

	pub async fn upsert_recipe(
		&self,
		recipe_name: &str,
		dense: Vec<f32>,
		sparse: &SparseVector,
		payload: Payload,
	) -> Result<()> {
		let mut vectors =
			NamedVectors::default().add_vector(DENSE_VECTOR_NAME, Vector::new_dense(dense));

		if !sparse.is_empty() {
			vectors = vectors.add_vector(
				SPARSE_VECTOR_NAME,
				Vector::new_sparse(sparse.indices.clone(), sparse.values.clone()),
			);
		}

		let point = PointStruct::new(point_id(recipe_name), vectors, payload);

		self.client
			.upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]).wait(true))
			.await?;

		Ok(())
	}

	pub async fn delete_recipe(&self, recipe_name: &str) -> Result<()> {
		self.client
			.delete_points(
				DeletePointsBuilder::new(&self.collection)
					.points(PointsIdsList { ids: vec![point_id(recipe_name).into()] })
					.wait(true),
			)
			.await?;

		Ok(())
	}

	/// Single dense-vector similarity with a server-side relevance floor.
	pub async fn search_dense(
		&self,
		vector: Vec<f32>,
		limit: u64,
		min_score: f32,
	) -> Result<Vec<ScoredPoint>> {
		let search = SearchPointsBuilder::new(&self.collection, vector, limit)
			.vector_name(DENSE_VECTOR_NAME)
			.score_threshold(min_score)
			.with_payload(true);
		let response = self.client.search_points(search).await?;

		Ok(response.result)
	}

	/// Server-side RRF over a dense and a sparse prefetch branch. Callers
	/// pass whichever branches they could build; at least one is required.
	pub async fn hybrid_query(
		&self,
		dense: Option<Vec<f32>>,
		sparse: Option<&SparseVector>,
		prefetch_limit: u64,
		limit: u64,
	) -> Result<Vec<ScoredPoint>> {
		let mut search = QueryPointsBuilder::new(&self.collection);

		if let Some(vector) = dense {
			search = search.add_prefetch(
				PrefetchQueryBuilder::default()
					.query(Query::new_nearest(vector))
					.using(DENSE_VECTOR_NAME)
					.limit(prefetch_limit),
			);
		}
		if let Some(sparse) = sparse {
			search = search.add_prefetch(
				PrefetchQueryBuilder::default()
					.query(Query::new_nearest(VectorInput::new_sparse(
						sparse.indices.clone(),
						sparse.values.clone(),
					)))
					.using(SPARSE_VECTOR_NAME)
					.limit(prefetch_limit),
			);
		}

		let search = search.query(Fusion::Rrf).limit(limit).with_payload(true);
		let response = self.client.query(search).await?;

		Ok(response.result)
	}

	pub async fn stats(&self) -> Result<CollectionStats> {
		let info = self.client.collection_info(&self.collection).await?;
		let Some(result) = info.result else {
			return Ok(CollectionStats { points_count: 0, status: "unknown".to_string() });
		};

		Ok(CollectionStats {
			points_count: result.points_count.unwrap_or(0),
			status: result.status().as_str_name().to_string(),
		})
	}
}

/// Deterministic point id derived from the recipe name, truncated to 63 bits
/// so it stays positive in signed consumers. Collisions across names are
/// astronomically unlikely at pantry scale; a production deployment wanting
/// hard guarantees should widen this to a 128-bit uuid id.
pub fn point_id(recipe_name: &str) -> u64 {
	let digest = Sha256::digest(recipe_name.as_bytes());
	let mut bytes = [0_u8; 8];

	bytes.copy_from_slice(&digest[..8]);

	u64::from_be_bytes(bytes) & (i64::MAX as u64)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn point_ids_are_stable_and_positive() {
		let first = point_id("carbonara");
		let second = point_id("carbonara");

		assert_eq!(first, second);
		assert!(first <= i64::MAX as u64);
		assert_ne!(point_id("carbonara"), point_id("cacio e pepe"));
	}
}
