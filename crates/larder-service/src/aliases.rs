//! Ingredient vocabulary resolution.
//!
//! Every lookup goes canonical-first: a token that already names a canonical
//! spelling wins over any alias row, and unknown tokens canonicalize to
//! themselves. This keeps `resolve` idempotent.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use crate::{Error, LarderService, Result};
use larder_storage::queries;

const ALIAS_SOURCE_MANUAL: &str = "manual";
const ALIAS_SOURCE_SEED: &str = "seed";
const ALIAS_SOURCE_AI: &str = "ai_generated";

const SEED_CONFIDENCE: f32 = 0.9;
const AI_CONFIDENCE: f32 = 0.8;

/// Bootstrap vocabulary for the most commonly aliased staples.
const SEED_ALIASES: &[(&str, &[&str])] = &[
	(
		"tomato",
		&[
			"tomatoes",
			"roma tomato",
			"cherry tomato",
			"plum tomato",
			"grape tomato",
			"beefsteak tomato",
			"vine tomato",
			"heirloom tomato",
		],
	),
	(
		"onion",
		&[
			"onions",
			"yellow onion",
			"white onion",
			"red onion",
			"sweet onion",
			"vidalia onion",
			"shallot",
			"spring onion",
		],
	),
	(
		"bell pepper",
		&[
			"bell peppers",
			"red bell pepper",
			"green bell pepper",
			"yellow bell pepper",
			"capsicum",
			"sweet pepper",
		],
	),
	(
		"potato",
		&[
			"potatoes",
			"russet potato",
			"yukon gold",
			"red potato",
			"fingerling potato",
			"baby potato",
			"new potato",
		],
	),
	(
		"chicken",
		&[
			"chicken breast",
			"chicken thigh",
			"chicken leg",
			"chicken wing",
			"whole chicken",
			"boneless chicken",
			"skinless chicken",
		],
	),
	(
		"beef",
		&[
			"ground beef",
			"beef steak",
			"beef chuck",
			"beef sirloin",
			"stewing beef",
			"beef brisket",
			"beef tenderloin",
		],
	),
	(
		"garlic",
		&[
			"garlic clove",
			"garlic cloves",
			"minced garlic",
			"crushed garlic",
			"fresh garlic",
			"roasted garlic",
		],
	),
];

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasInfo {
	pub ingredient: String,
	pub canonical: String,
	pub aliases: Vec<String>,
}

impl LarderService {
	/// Token to canonical token. Blank input is returned unchanged.
	pub async fn resolve(&self, token: &str) -> Result<String> {
		if token.trim().is_empty() {
			return Ok(token.to_string());
		}

		let normalized = token.trim().to_lowercase();

		if let Some(canonical) = queries::find_canonical(&self.db.pool, &normalized).await? {
			return Ok(canonical);
		}
		if let Some(canonical) = queries::find_alias_canonical(&self.db.pool, &normalized).await? {
			return Ok(canonical);
		}

		Ok(token.trim().to_string())
	}

	/// Order-preserving bulk form of [`Self::resolve`].
	pub async fn resolve_all(&self, tokens: &[String]) -> Result<Vec<String>> {
		let mut out = Vec::with_capacity(tokens.len());

		for token in tokens {
			out.push(self.resolve(token).await?);
		}

		Ok(out)
	}

	/// Deduplicated canonicals merged with the raw inputs, so pre-resolution
	/// spellings remain matchable.
	pub async fn resolve_to_set(&self, tokens: &[String]) -> Result<HashSet<String>> {
		let mut out = HashSet::new();

		for token in tokens {
			out.insert(self.resolve(token).await?);
			out.insert(token.clone());
		}

		Ok(out)
	}

	/// Order-preserving variant of [`Self::resolve_to_set`] for callers whose
	/// output order must be deterministic.
	pub(crate) async fn expand_pantry(&self, tokens: &[String]) -> Result<Vec<String>> {
		let mut seen = HashSet::new();
		let mut out = Vec::new();

		for token in tokens {
			for form in [self.resolve(token).await?, token.clone()] {
				if seen.insert(form.clone()) {
					out.push(form);
				}
			}
		}

		Ok(out)
	}

	pub async fn add_alias(&self, canonical: &str, alias: &str) -> Result<()> {
		let canonical = canonical.trim().to_lowercase();
		let alias = alias.trim().to_lowercase();

		if canonical.is_empty() {
			return Err(Error::InvalidArgument {
				message: "Canonical name is required.".to_string(),
			});
		}
		if alias.is_empty() {
			return Err(Error::InvalidArgument { message: "Alias is required.".to_string() });
		}

		queries::upsert_alias(&self.db.pool, &canonical, &alias, 1.0, ALIAS_SOURCE_MANUAL)
			.await?;

		Ok(())
	}

	pub async fn alias_info(&self, ingredient: &str) -> Result<AliasInfo> {
		let trimmed = ingredient.trim();

		if trimmed.is_empty() {
			return Err(Error::InvalidArgument {
				message: "Ingredient name is required.".to_string(),
			});
		}

		let canonical = self.resolve(trimmed).await?;
		let records = queries::aliases_for(&self.db.pool, &trimmed.to_lowercase()).await?;

		Ok(AliasInfo {
			ingredient: trimmed.to_string(),
			canonical,
			aliases: records.into_iter().map(|record| record.alias).collect(),
		})
	}

	/// LLM-suggested spelling variants, persisted at reduced confidence.
	/// Provider failures log and yield an empty list; they are never fatal.
	pub async fn generate_aliases(&self, ingredient: &str) -> Result<Vec<String>> {
		let trimmed = ingredient.trim();

		if trimmed.is_empty() {
			return Err(Error::InvalidArgument {
				message: "Ingredient name is required.".to_string(),
			});
		}

		let canonical = trimmed.to_lowercase();
		let messages = alias_messages(&canonical);
		let raw = match self.providers.chat.complete(&self.cfg.providers.chat, &messages).await {
			Ok(value) => value,
			Err(err) => {
				tracing::warn!(error = %err, ingredient = %canonical, "Alias generation failed.");

				return Ok(Vec::new());
			},
		};
		let mut generated = Vec::new();

		for value in extract_string_array(&raw) {
			let alias = value.trim().to_lowercase();

			if !alias.is_empty() && alias != canonical && !generated.contains(&alias) {
				generated.push(alias);
			}
		}

		for alias in &generated {
			queries::upsert_alias(&self.db.pool, &canonical, alias, AI_CONFIDENCE, ALIAS_SOURCE_AI)
				.await?;
		}

		// Self-loop row so canonical lookups stay uniform.
		queries::upsert_alias(&self.db.pool, &canonical, &canonical, 1.0, ALIAS_SOURCE_AI).await?;

		Ok(generated)
	}

	pub async fn seed_common_aliases(&self) -> Result<()> {
		for (canonical, aliases) in SEED_ALIASES {
			queries::upsert_alias(&self.db.pool, canonical, canonical, 1.0, ALIAS_SOURCE_SEED)
				.await?;

			for alias in *aliases {
				queries::upsert_alias(
					&self.db.pool,
					canonical,
					alias,
					SEED_CONFIDENCE,
					ALIAS_SOURCE_SEED,
				)
				.await?;
			}
		}

		Ok(())
	}
}

fn alias_messages(ingredient: &str) -> Vec<Value> {
	let prompt = format!(
		"You are a culinary expert. For the ingredient \"{ingredient}\", list common \
		 alternative names, abbreviations, variety names, and singular/plural forms that \
		 could be used interchangeably in recipes. Do NOT include completely different \
		 ingredients. Return ONLY a JSON array of strings."
	);

	vec![serde_json::json!({ "role": "user", "content": prompt })]
}

/// Accepts a bare JSON array or the first array-valued field of an object.
fn extract_string_array(value: &Value) -> Vec<String> {
	let array = match value {
		Value::Array(items) => Some(items),
		Value::Object(map) => map.values().find_map(|field| field.as_array()),
		_ => None,
	};

	array
		.map(|items| {
			items
				.iter()
				.filter_map(|item| item.as_str())
				.map(str::to_string)
				.collect()
		})
		.unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn extracts_bare_arrays() {
		let value = serde_json::json!(["roma tomato", "tomatoes"]);

		assert_eq!(extract_string_array(&value), vec!["roma tomato", "tomatoes"]);
	}

	#[test]
	fn extracts_first_array_field_of_objects() {
		let value = serde_json::json!({ "aliases": ["spud"], "note": "ok" });

		assert_eq!(extract_string_array(&value), vec!["spud"]);
	}

	#[test]
	fn non_array_payloads_yield_nothing() {
		assert!(extract_string_array(&serde_json::json!("just text")).is_empty());
		assert!(extract_string_array(&serde_json::json!({ "count": 3 })).is_empty());
	}
}
