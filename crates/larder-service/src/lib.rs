pub mod admin;
pub mod aliases;
pub mod cookability;
pub mod pantry;
pub mod recipes;
pub mod search;
pub mod substitutions;

mod error;

pub use self::{
	admin::{IndexReport, SearchStats},
	aliases::AliasInfo,
	cookability::{
		AlmostCookableRecipe, AlmostCookableResponse, GenerateRequest, GenerateResponse,
		MissingIngredientsReport,
	},
	error::{Error, Result},
	pantry::{PantryItem, PantryView},
	recipes::{AddRecipeRequest, RecipeDetailsResponse, RecipeSummary},
	search::{HybridSearchRequest, SearchHit, SearchResponse},
	substitutions::{SubstitutionSuggestion, SubstitutionsResponse},
};

use std::{
	future::Future,
	pin::Pin,
	sync::{
		atomic::{AtomicBool, Ordering},
		Arc,
	},
};

use serde_json::Value;

use larder_config::{ChatProviderConfig, Config, EmbeddingProviderConfig};
use larder_domain::cache_key;
use larder_providers::{chat, embedding};
use larder_storage::{cache::VectorCache, db::Db, qdrant::QdrantStore};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

pub trait ChatProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, Result<Value>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub chat: Arc<dyn ChatProvider>,
}
impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>, chat: Arc<dyn ChatProvider>) -> Self {
		Self { embedding, chat }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), chat: provider }
	}
}

pub struct LarderService {
	pub cfg: Config,
	pub db: Db,
	pub qdrant: QdrantStore,
	pub cache: VectorCache,
	pub providers: Providers,
	search_available: AtomicBool,
	embedding_available: AtomicBool,
}
impl LarderService {
	pub fn new(cfg: Config, db: Db, qdrant: QdrantStore, cache: VectorCache) -> Self {
		Self::with_providers(cfg, db, qdrant, cache, Providers::default())
	}

	pub fn with_providers(
		cfg: Config,
		db: Db,
		qdrant: QdrantStore,
		cache: VectorCache,
		providers: Providers,
	) -> Self {
		Self {
			cfg,
			db,
			qdrant,
			cache,
			providers,
			search_available: AtomicBool::new(false),
			embedding_available: AtomicBool::new(false),
		}
	}

	/// Startup-probed flags. Readers tolerate staleness; no lock is held.
	pub fn set_search_available(&self, available: bool) {
		self.search_available.store(available, Ordering::Relaxed);
	}

	pub fn search_available(&self) -> bool {
		self.search_available.load(Ordering::Relaxed)
	}

	pub fn set_embedding_available(&self, available: bool) {
		self.embedding_available.store(available, Ordering::Relaxed);
	}

	pub fn embedding_available(&self) -> bool {
		self.embedding_available.load(Ordering::Relaxed)
	}

	pub(crate) fn model_version(&self) -> String {
		format!("{}:{}", self.cfg.providers.embedding.model, self.cfg.storage.qdrant.vector_dim)
	}

	/// One dense vector for `text`, or `None` for blank input.
	pub(crate) async fn embed_text(&self, text: &str) -> Result<Option<Vec<f32>>> {
		if text.trim().is_empty() {
			return Ok(None);
		}

		let embeddings = self
			.providers
			.embedding
			.embed(&self.cfg.providers.embedding, &[text.to_string()])
			.await?;
		let Some(vec) = embeddings.into_iter().next() else {
			return Err(Error::Provider {
				message: "Embedding provider returned no vectors.".to_string(),
			});
		};

		if vec.len() != self.cfg.storage.qdrant.vector_dim as usize {
			return Err(Error::Provider {
				message: "Embedding vector dimension mismatch.".to_string(),
			});
		}

		Ok(Some(vec))
	}

	/// Cache-aside query embedding: Redis first, provider on miss, then
	/// backfill. Any failure degrades to `None`.
	pub(crate) async fn cached_query_embedding(&self, query: &str) -> Option<Vec<f32>> {
		let key = cache_key::embedding_key(query);

		if let Some(raw) = self.cache.get(&key).await {
			match serde_json::from_str::<Vec<f32>>(&raw) {
				Ok(vec) => return Some(vec),
				Err(err) => {
					tracing::warn!(error = %err, key = %key, "Discarding undecodable cached embedding.");
				},
			}
		}

		let vec = match self.embed_text(query).await {
			Ok(Some(vec)) => vec,
			Ok(None) => return None,
			Err(err) => {
				tracing::warn!(error = %err, "Query embedding failed.");

				return None;
			},
		};

		if let Ok(raw) = serde_json::to_string(&vec) {
			self.cache.set(&key, raw).await;
		}

		Some(vec)
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move {
			embedding::embed(cfg, texts)
				.await
				.map_err(|err| Error::Provider { message: err.to_string() })
		})
	}
}

impl ChatProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, Result<Value>> {
		Box::pin(async move {
			chat::complete(cfg, messages)
				.await
				.map_err(|err| Error::Provider { message: err.to_string() })
		})
	}
}
