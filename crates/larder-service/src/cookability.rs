//! Deterministic "what can I cook" answers. No cache, no vector index:
//! Postgres plus the pure graph resolver.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Error, LarderService, Result};
use larder_domain::cookability;
use larder_storage::queries;

const MAX_MISSING_LIMIT: usize = 5;

#[derive(Clone, Debug, Deserialize)]
pub struct GenerateRequest {
	pub recipes: Vec<String>,
	pub ingredients: Vec<Vec<String>>,
	pub supplies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct GenerateResponse {
	pub made: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlmostCookableRecipe {
	pub recipe_name: String,
	pub missing_ingredients: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlmostCookableResponse {
	pub recipes: Vec<AlmostCookableRecipe>,
	pub count: usize,
	pub max_missing: usize,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingIngredientsReport {
	pub recipe_name: String,
	pub missing_ingredients: Vec<String>,
	pub total_required: usize,
	pub coverage_percent: f64,
}

impl LarderService {
	/// Ad-hoc cookability over caller-supplied recipes and supplies.
	pub async fn generate(&self, req: GenerateRequest) -> Result<GenerateResponse> {
		if req.recipes.is_empty() {
			return Err(Error::InvalidArgument {
				message: "Recipes list is required and cannot be empty.".to_string(),
			});
		}
		if req.ingredients.is_empty() {
			return Err(Error::InvalidArgument {
				message: "Ingredients list is required and cannot be empty.".to_string(),
			});
		}
		if req.supplies.is_empty() {
			return Err(Error::InvalidArgument {
				message: "Supplies list is required and cannot be empty.".to_string(),
			});
		}
		if req.recipes.len() != req.ingredients.len() {
			return Err(Error::InvalidArgument {
				message: "Recipes and ingredients lists must have the same size.".to_string(),
			});
		}

		for (recipe, ingredients) in req.recipes.iter().zip(&req.ingredients) {
			if ingredients.is_empty() {
				return Err(Error::InvalidArgument {
					message: format!("Ingredient list for recipe '{recipe}' cannot be empty."),
				});
			}
		}

		let mut recipes = Vec::with_capacity(req.recipes.len());

		for (recipe, ingredients) in req.recipes.iter().zip(&req.ingredients) {
			recipes.push((recipe.clone(), self.resolve_all(ingredients).await?));
		}

		let pantry = self.expand_pantry(&req.supplies).await?;
		let made = cookability::cookable_recipes(&recipes, &pantry);

		Ok(GenerateResponse { made })
	}

	/// Cookability from stored pantry state and stored recipes. Seasoning
	/// edges never enter the graph.
	pub async fn cookable_from_fridge(&self) -> Result<GenerateResponse> {
		let recipes = self.canonical_recipe_graph().await?;
		let supplies: Vec<String> = queries::list_supplies(&self.db.pool)
			.await?
			.into_iter()
			.map(|supply| supply.name)
			.collect();

		if recipes.is_empty() || supplies.is_empty() {
			return Ok(GenerateResponse { made: Vec::new() });
		}

		let pantry = self.expand_pantry(&supplies).await?;

		Ok(GenerateResponse { made: cookability::cookable_recipes(&recipes, &pantry) })
	}

	/// Recipes within `max_missing` obtainable ingredients of being cookable.
	pub async fn almost_cookable(&self, max_missing: usize) -> Result<AlmostCookableResponse> {
		if !(1..=MAX_MISSING_LIMIT).contains(&max_missing) {
			return Err(Error::InvalidArgument {
				message: format!("maxMissing must be between 1 and {MAX_MISSING_LIMIT}."),
			});
		}

		let recipes = self.canonical_recipe_graph().await?;
		let supplies: Vec<String> = queries::list_supplies(&self.db.pool)
			.await?
			.into_iter()
			.map(|supply| supply.name)
			.collect();
		let pantry: HashSet<String> = self.resolve_to_set(&supplies).await?;
		let close = cookability::almost_cookable(&recipes, &pantry, max_missing);

		Ok(AlmostCookableResponse {
			count: close.len(),
			max_missing,
			recipes: close
				.into_iter()
				.map(|recipe| AlmostCookableRecipe {
					recipe_name: recipe.recipe_name,
					missing_ingredients: recipe.missing_ingredients,
				})
				.collect(),
		})
	}

	/// Which required ingredients the pantry does not cover, with coverage.
	pub async fn missing_report(&self, recipe_name: &str) -> Result<MissingIngredientsReport> {
		let trimmed = recipe_name.trim();

		if trimmed.is_empty() {
			return Err(Error::InvalidArgument {
				message: "Recipe name is required.".to_string(),
			});
		}
		if queries::recipe_details(&self.db.pool, trimmed).await?.is_none() {
			return Err(Error::NotFound { message: format!("Recipe not found: {trimmed}") });
		}

		let required: Vec<String> = queries::recipe_dependencies(&self.db.pool, trimmed)
			.await?
			.into_iter()
			.filter(|row| row.is_seasoning == 0)
			.map(|row| row.ingredient_name)
			.collect();
		let supplies: Vec<String> = queries::list_supplies(&self.db.pool)
			.await?
			.into_iter()
			.map(|supply| supply.name)
			.collect();
		let pantry = self.resolve_to_set(&supplies).await?;
		let mut missing = Vec::new();

		for ingredient in &required {
			let canonical = self.resolve(ingredient).await?;

			if !pantry.contains(ingredient) && !pantry.contains(&canonical) {
				missing.push(ingredient.clone());
			}
		}

		let total_required = required.len();
		let coverage_percent = if total_required == 0 {
			100.0
		} else {
			(total_required - missing.len()) as f64 * 100.0 / total_required as f64
		};

		Ok(MissingIngredientsReport {
			recipe_name: trimmed.to_string(),
			missing_ingredients: missing,
			total_required,
			coverage_percent,
		})
	}

	/// Stored recipes with canonicalized non-seasoning ingredient lists, in
	/// stable recipe order.
	pub(crate) async fn canonical_recipe_graph(&self) -> Result<Vec<(String, Vec<String>)>> {
		let edges = queries::non_seasoning_graph(&self.db.pool).await?;
		let mut recipes: Vec<(String, Vec<String>)> = Vec::new();

		for (recipe_name, ingredient) in edges {
			let canonical = self.resolve(&ingredient).await?;

			if let Some((name, ingredients)) = recipes.last_mut() {
				if *name == recipe_name {
					ingredients.push(canonical);

					continue;
				}
			}

			recipes.push((recipe_name, vec![canonical]));
		}

		Ok(recipes)
	}
}
