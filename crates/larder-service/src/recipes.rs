//! Recipe write path and read models.
//!
//! Postgres is authoritative: the transaction commits before the vector
//! index hears about the change, and index failures never propagate to the
//! caller. The cache is not invalidated here; its TTL bounds staleness.

use std::{collections::BTreeMap, sync::Arc};

use qdrant_client::Payload;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, LarderService, Result};
use larder_domain::{recipe_text, sparse, CuisineType};
use larder_storage::queries;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRecipeRequest {
	pub name: String,
	pub ingredients: Vec<String>,
	#[serde(default)]
	pub seasonings: Vec<String>,
	#[serde(default)]
	pub cuisine_type: Option<String>,
	#[serde(default)]
	pub instructions: Option<String>,
	#[serde(default)]
	pub image_url: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetailsResponse {
	pub name: String,
	pub ingredients: Vec<String>,
	pub seasonings: Vec<String>,
	pub cuisine_type: CuisineType,
	pub instructions: Option<String>,
	pub image_url: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RecipeSummary {
	pub name: String,
	pub ingredients: Vec<String>,
	pub seasonings: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct ParsedRecipe {
	name: String,
	#[serde(default)]
	ingredients: Vec<String>,
	#[serde(default)]
	seasonings: Vec<String>,
	#[serde(default, rename = "cuisineType")]
	cuisine_type: Option<String>,
	#[serde(default)]
	instructions: Option<String>,
}

impl LarderService {
	/// Transactional write, then a fire-and-log index side effect. Re-adding
	/// a recipe re-establishes its edge set atomically.
	pub async fn add_recipe(self: &Arc<Self>, req: AddRecipeRequest) -> Result<String> {
		let name = req.name.trim().to_string();

		if name.is_empty() {
			return Err(Error::InvalidArgument {
				message: "Recipe name is required.".to_string(),
			});
		}

		let ingredients = normalized_tokens(&req.ingredients);
		let seasonings = normalized_tokens(&req.seasonings);

		if ingredients.is_empty() {
			return Err(Error::InvalidArgument {
				message: "Ingredients list is required.".to_string(),
			});
		}

		for seasoning in &seasonings {
			if ingredients.contains(seasoning) {
				return Err(Error::InvalidArgument {
					message: format!(
						"'{seasoning}' cannot be both an ingredient and a seasoning."
					),
				});
			}
		}

		let cuisine = CuisineType::parse(req.cuisine_type.as_deref().unwrap_or_default());
		let mut tx = self.db.pool.begin().await?;

		queries::upsert_food_item(&mut *tx, &name).await?;

		for token in ingredients.iter().chain(&seasonings) {
			queries::upsert_food_item(&mut *tx, token).await?;
		}

		queries::delete_recipe_dependencies(&mut *tx, &name).await?;

		for (position, ingredient) in ingredients.iter().enumerate() {
			queries::upsert_dependency(&mut *tx, &name, ingredient, false, position as i32)
				.await?;
		}
		for (position, seasoning) in seasonings.iter().enumerate() {
			queries::upsert_dependency(&mut *tx, &name, seasoning, true, position as i32).await?;
		}

		queries::upsert_recipe_details(
			&mut *tx,
			&name,
			cuisine.as_str(),
			req.instructions.as_deref(),
			req.image_url.as_deref(),
		)
		.await?;

		tx.commit().await?;

		let service = self.clone();
		let recipe_name = name.clone();

		tokio::spawn(async move {
			if let Err(err) = service.index_recipe(&recipe_name).await {
				tracing::warn!(error = %err, recipe = %recipe_name, "Recipe indexing failed.");
			}
		});

		Ok(name)
	}

	/// Transactional delete, then best-effort removal from the index.
	pub async fn delete_recipe(self: &Arc<Self>, recipe_name: &str) -> Result<()> {
		let name = recipe_name.trim().to_string();

		if name.is_empty() {
			return Err(Error::InvalidArgument {
				message: "Recipe name is required.".to_string(),
			});
		}

		let mut tx = self.db.pool.begin().await?;

		// Idempotent: deleting an absent recipe is a no-op, not an error.
		queries::delete_recipe_details(&mut *tx, &name).await?;
		queries::delete_recipe_dependencies(&mut *tx, &name).await?;

		tx.commit().await?;

		let service = self.clone();

		tokio::spawn(async move {
			if let Err(err) = service.qdrant.delete_recipe(&name).await {
				tracing::warn!(error = %err, recipe = %name, "Index point removal failed.");
			}
		});

		Ok(())
	}

	pub async fn get_recipe(&self, recipe_name: &str) -> Result<RecipeDetailsResponse> {
		let name = recipe_name.trim();

		if name.is_empty() {
			return Err(Error::InvalidArgument {
				message: "Recipe name is required.".to_string(),
			});
		}

		let Some(details) = queries::recipe_details(&self.db.pool, name).await? else {
			return Err(Error::NotFound { message: format!("Recipe not found: {name}") });
		};
		let rows = queries::recipe_dependencies(&self.db.pool, name).await?;
		let (seasonings, ingredients): (Vec<_>, Vec<_>) =
			rows.into_iter().partition(|row| row.is_seasoning != 0);

		Ok(RecipeDetailsResponse {
			name: details.recipe_name,
			ingredients: ingredients.into_iter().map(|row| row.ingredient_name).collect(),
			seasonings: seasonings.into_iter().map(|row| row.ingredient_name).collect(),
			cuisine_type: CuisineType::parse(details.cuisine_type.as_deref().unwrap_or_default()),
			instructions: details.instructions,
			image_url: details.image_url,
		})
	}

	/// All recipes grouped by cuisine label.
	pub async fn recipes_by_cuisine(&self) -> Result<BTreeMap<String, Vec<RecipeSummary>>> {
		let details = queries::list_recipe_details(&self.db.pool).await?;
		let dependencies = queries::list_dependencies(&self.db.pool).await?;
		let mut by_recipe: BTreeMap<String, (Vec<String>, Vec<String>)> = BTreeMap::new();

		for row in dependencies {
			let entry = by_recipe.entry(row.recipe_name.clone()).or_default();

			if row.is_seasoning == 0 {
				entry.0.push(row.ingredient_name);
			} else {
				entry.1.push(row.ingredient_name);
			}
		}

		let mut grouped: BTreeMap<String, Vec<RecipeSummary>> = BTreeMap::new();

		for details_row in details {
			let cuisine = CuisineType::parse(
				details_row.cuisine_type.as_deref().unwrap_or_default(),
			);
			let (ingredients, seasonings) =
				by_recipe.remove(&details_row.recipe_name).unwrap_or_default();

			grouped.entry(cuisine.as_str().to_string()).or_default().push(RecipeSummary {
				name: details_row.recipe_name,
				ingredients,
				seasonings,
			});
		}

		Ok(grouped)
	}

	/// Free recipe text in, stored recipe out. The LLM owns the parsing; a
	/// provider failure degrades to `None` without writing anything.
	pub async fn parse_recipe_text(
		self: &Arc<Self>,
		text: &str,
	) -> Result<Option<RecipeDetailsResponse>> {
		if text.trim().is_empty() {
			return Err(Error::InvalidArgument {
				message: "Recipe text is required.".to_string(),
			});
		}

		let messages = parse_messages(text);
		let raw = match self.providers.chat.complete(&self.cfg.providers.chat, &messages).await {
			Ok(value) => value,
			Err(err) => {
				tracing::warn!(error = %err, "Recipe text parsing failed.");

				return Ok(None);
			},
		};
		let parsed: ParsedRecipe = match serde_json::from_value(raw) {
			Ok(parsed) => parsed,
			Err(err) => {
				tracing::warn!(error = %err, "Recipe text parser returned an unusable shape.");

				return Ok(None);
			},
		};

		if parsed.name.trim().is_empty() || normalized_tokens(&parsed.ingredients).is_empty() {
			tracing::warn!("Recipe text parser returned no usable name or ingredients.");

			return Ok(None);
		}

		let name = self
			.add_recipe(AddRecipeRequest {
				name: parsed.name,
				ingredients: parsed.ingredients,
				seasonings: parsed.seasonings,
				cuisine_type: parsed.cuisine_type,
				instructions: parsed.instructions,
				image_url: None,
			})
			.await?;

		self.get_recipe(&name).await.map(Some)
	}

	/// Compose, embed, and upsert one recipe into the vector index.
	pub(crate) async fn index_recipe(&self, recipe_name: &str) -> Result<()> {
		let recipe = self.get_recipe(recipe_name).await?;
		let cuisine = recipe.cuisine_type.as_str();
		let text = recipe_text::compose(
			&recipe.name,
			&recipe.ingredients,
			Some(cuisine),
			recipe.instructions.as_deref(),
		);
		let Some(dense) = self.embed_text(&text).await? else {
			return Err(Error::Provider {
				message: "Recipe text produced no embedding.".to_string(),
			});
		};
		let sparse = sparse::from_recipe(&recipe.name, &recipe.ingredients, Some(cuisine));
		let mut payload = Payload::new();

		payload.insert("recipe_name", recipe.name.as_str());
		payload.insert("cuisine_type", cuisine);
		payload.insert("ingredients", Value::from(recipe.ingredients.clone()));
		payload.insert("model_version", self.model_version());

		self.qdrant.upsert_recipe(&recipe.name, dense, &sparse, payload).await?;

		Ok(())
	}
}

fn normalized_tokens(tokens: &[String]) -> Vec<String> {
	let mut out: Vec<String> = Vec::with_capacity(tokens.len());

	for token in tokens {
		let trimmed = token.trim();

		if !trimmed.is_empty() && !out.iter().any(|existing| existing == trimmed) {
			out.push(trimmed.to_string());
		}
	}

	out
}

fn parse_messages(text: &str) -> Vec<Value> {
	let prompt = format!(
		"Parse the following recipe text into JSON with exactly these fields: \
		 \"name\" (string), \"ingredients\" (array of ingredient names), \"seasonings\" \
		 (array of seasoning names), \"cuisineType\" (one of CHINESE, JAPANESE, ITALIAN, \
		 MEXICAN, INDIAN, THAI, KOREAN, FRENCH, AMERICAN, MEDITERRANEAN, MIDDLE_EASTERN, \
		 OTHER), \"instructions\" (string). Return ONLY the JSON object.\n\n{text}"
	);

	vec![serde_json::json!({ "role": "user", "content": prompt })]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn normalization_trims_and_deduplicates() {
		let tokens = vec![
			" bread ".to_string(),
			"bread".to_string(),
			"".to_string(),
			"ham".to_string(),
		];

		assert_eq!(normalized_tokens(&tokens), vec!["bread".to_string(), "ham".to_string()]);
	}

	#[test]
	fn parsed_recipe_tolerates_missing_optional_fields() {
		let parsed: ParsedRecipe =
			serde_json::from_value(serde_json::json!({ "name": "toast" })).unwrap();

		assert_eq!(parsed.name, "toast");
		assert!(parsed.ingredients.is_empty());
		assert!(parsed.cuisine_type.is_none());
	}
}
