use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub cache: Cache,
	pub providers: Providers,
	#[serde(default)]
	pub search: Search,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub qdrant: Qdrant,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	#[serde(default = "default_collection")]
	pub collection: String,
	pub vector_dim: u32,
	#[serde(default = "default_qdrant_timeout_ms")]
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Cache {
	pub redis_url: String,
	/// Staleness bound for cached embeddings and search results.
	#[serde(default = "default_cache_ttl_seconds")]
	pub ttl_seconds: u64,
	#[serde(default = "default_cache_timeout_ms")]
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub chat: ChatProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	#[serde(default = "default_provider_timeout_ms")]
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct ChatProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	#[serde(default = "default_chat_temperature")]
	pub temperature: f32,
	#[serde(default = "default_chat_timeout_ms")]
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub default_top_k: u32,
	/// Candidate count requested from each prefetch branch before fusion.
	pub prefetch_limit: u32,
	/// Relevance floor for the single-vector fallback path.
	pub min_simple_score: f32,
}
impl Default for Search {
	fn default() -> Self {
		Self { default_top_k: 10, prefetch_limit: 50, min_simple_score: 0.5 }
	}
}

fn default_collection() -> String {
	"recipes_v2".to_string()
}

fn default_qdrant_timeout_ms() -> u64 {
	10_000
}

fn default_cache_ttl_seconds() -> u64 {
	3_600
}

fn default_cache_timeout_ms() -> u64 {
	2_000
}

fn default_provider_timeout_ms() -> u64 {
	10_000
}

fn default_chat_timeout_ms() -> u64 {
	60_000
}

fn default_chat_temperature() -> f32 {
	0.1
}
