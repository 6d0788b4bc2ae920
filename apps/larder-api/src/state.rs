use std::sync::Arc;

use larder_service::LarderService;
use larder_storage::{cache::VectorCache, db::Db, qdrant::QdrantStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<LarderService>,
}
impl AppState {
	pub async fn new(config: larder_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let qdrant = QdrantStore::new(&config.storage.qdrant)?;
		let cache = VectorCache::connect(&config.cache).await;
		let service = Arc::new(LarderService::new(config, db, qdrant, cache));

		// Degradable collaborators are probed once; failure is a flag, not a
		// startup error. Postgres above is the only hard requirement.
		match service.qdrant.ensure_collection().await {
			Ok(()) => service.set_search_available(true),
			Err(err) => {
				tracing::warn!(error = %err, "Vector index unreachable; search is degraded.");
			},
		}

		let embedding_up =
			larder_providers::embedding::probe(&service.cfg.providers.embedding).await;

		service.set_embedding_available(embedding_up);

		if !embedding_up {
			tracing::warn!("Embedding endpoint unreachable; semantic search is degraded.");
		}

		Ok(Self { service })
	}
}
