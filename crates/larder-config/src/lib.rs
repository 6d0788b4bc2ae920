mod types;

use std::{fs, path::Path};

use color_eyre::eyre;

pub use types::{
	Cache, ChatProviderConfig, Config, EmbeddingProviderConfig, Postgres, Providers, Qdrant,
	Search, Service, Storage,
};

pub fn load(path: &Path) -> color_eyre::Result<Config> {
	let raw = fs::read_to_string(path)?;
	let cfg: Config = toml::from_str(&raw)?;

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> color_eyre::Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(eyre::eyre!("service.http_bind must be non-empty."));
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(eyre::eyre!("storage.postgres.pool_max_conns must be greater than zero."));
	}
	if cfg.storage.qdrant.collection.trim().is_empty() {
		return Err(eyre::eyre!("storage.qdrant.collection must be non-empty."));
	}
	if cfg.storage.qdrant.vector_dim == 0 {
		return Err(eyre::eyre!("storage.qdrant.vector_dim must be greater than zero."));
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(eyre::eyre!("providers.embedding.dimensions must be greater than zero."));
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(eyre::eyre!(
			"providers.embedding.dimensions must match storage.qdrant.vector_dim."
		));
	}
	if cfg.cache.ttl_seconds == 0 {
		return Err(eyre::eyre!("cache.ttl_seconds must be greater than zero."));
	}
	if cfg.search.default_top_k == 0 {
		return Err(eyre::eyre!("search.default_top_k must be greater than zero."));
	}
	if cfg.search.prefetch_limit == 0 {
		return Err(eyre::eyre!("search.prefetch_limit must be greater than zero."));
	}
	if !cfg.search.min_simple_score.is_finite() {
		return Err(eyre::eyre!("search.min_simple_score must be a finite number."));
	}
	if !(0.0..=1.0).contains(&cfg.search.min_simple_score) {
		return Err(eyre::eyre!("search.min_simple_score must be in the range 0.0-1.0."));
	}

	for (label, key) in [
		("embedding", &cfg.providers.embedding.api_key),
		("chat", &cfg.providers.chat.api_key),
	] {
		if key.trim().is_empty() {
			return Err(eyre::eyre!("Provider {label} api_key must be non-empty."));
		}
	}

	Ok(())
}
