use sqlx::PgExecutor;

use crate::{
	models::{AliasRecord, DependencyRow, RecipeDetailsRow, Supply},
	Result,
};

pub async fn upsert_food_item<'e, E>(executor: E, name: &str) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query("INSERT INTO food_items (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
		.bind(name)
		.execute(executor)
		.await?;

	Ok(())
}

pub async fn upsert_dependency<'e, E>(
	executor: E,
	recipe_name: &str,
	ingredient_name: &str,
	is_seasoning: bool,
	position: i32,
) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO recipe_dependencies (recipe_name, ingredient_name, is_seasoning, position)
VALUES ($1, $2, $3, $4)
ON CONFLICT (recipe_name, ingredient_name) DO NOTHING",
	)
	.bind(recipe_name)
	.bind(ingredient_name)
	.bind(i32::from(is_seasoning))
	.bind(position)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn upsert_recipe_details<'e, E>(
	executor: E,
	recipe_name: &str,
	cuisine_type: &str,
	instructions: Option<&str>,
	image_url: Option<&str>,
) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO recipe_details (recipe_name, cuisine_type, instructions, image_url)
VALUES ($1, $2, $3, $4)
ON CONFLICT (recipe_name) DO UPDATE
SET
	cuisine_type = EXCLUDED.cuisine_type,
	instructions = EXCLUDED.instructions,
	image_url = EXCLUDED.image_url",
	)
	.bind(recipe_name)
	.bind(cuisine_type)
	.bind(instructions)
	.bind(image_url)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn delete_recipe_details<'e, E>(executor: E, recipe_name: &str) -> Result<u64>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query("DELETE FROM recipe_details WHERE recipe_name = $1")
		.bind(recipe_name)
		.execute(executor)
		.await?;

	Ok(result.rows_affected())
}

pub async fn delete_recipe_dependencies<'e, E>(executor: E, recipe_name: &str) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query("DELETE FROM recipe_dependencies WHERE recipe_name = $1")
		.bind(recipe_name)
		.execute(executor)
		.await?;

	Ok(())
}

pub async fn recipe_details<'e, E>(executor: E, recipe_name: &str) -> Result<Option<RecipeDetailsRow>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, RecipeDetailsRow>(
		"\
SELECT recipe_name, cuisine_type, instructions, image_url
FROM recipe_details
WHERE recipe_name = $1",
	)
	.bind(recipe_name)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

/// Ingredient rows for one recipe, seasonings last, each group in the order
/// the recipe was written.
pub async fn recipe_dependencies<'e, E>(executor: E, recipe_name: &str) -> Result<Vec<DependencyRow>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, DependencyRow>(
		"\
SELECT recipe_name, ingredient_name, is_seasoning
FROM recipe_dependencies
WHERE recipe_name = $1
ORDER BY is_seasoning, position",
	)
	.bind(recipe_name)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

/// Non-seasoning (recipe, ingredient) edges for the cookability graph.
pub async fn non_seasoning_graph<'e, E>(executor: E) -> Result<Vec<(String, String)>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, (String, String)>(
		"\
SELECT recipe_name, ingredient_name
FROM recipe_dependencies
WHERE is_seasoning = 0
ORDER BY recipe_name, position",
	)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn list_recipe_details<'e, E>(executor: E) -> Result<Vec<RecipeDetailsRow>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, RecipeDetailsRow>(
		"\
SELECT recipe_name, cuisine_type, instructions, image_url
FROM recipe_details
ORDER BY cuisine_type, recipe_name",
	)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn list_dependencies<'e, E>(executor: E) -> Result<Vec<DependencyRow>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, DependencyRow>(
		"\
SELECT recipe_name, ingredient_name, is_seasoning
FROM recipe_dependencies
ORDER BY recipe_name, is_seasoning, position",
	)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn recipe_names<'e, E>(executor: E) -> Result<Vec<String>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, (String,)>(
		"SELECT recipe_name FROM recipe_details ORDER BY recipe_name",
	)
	.fetch_all(executor)
	.await?;

	Ok(rows.into_iter().map(|(name,)| name).collect())
}

pub async fn list_supplies<'e, E>(executor: E) -> Result<Vec<Supply>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, Supply>(
		"SELECT name, quantity, sort_order FROM supplies ORDER BY sort_order, name",
	)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

/// Adds onto an existing quantity rather than replacing it, so repeated
/// restocks of the same item accumulate.
pub async fn add_supply<'e, E>(executor: E, name: &str, quantity: i32) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO supplies (name, quantity)
VALUES ($1, $2)
ON CONFLICT (name) DO UPDATE
SET quantity = supplies.quantity + EXCLUDED.quantity",
	)
	.bind(name)
	.bind(quantity)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn set_supply_quantity<'e, E>(executor: E, name: &str, quantity: i32) -> Result<u64>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query("UPDATE supplies SET quantity = $1 WHERE name = $2")
		.bind(quantity)
		.bind(name)
		.execute(executor)
		.await?;

	Ok(result.rows_affected())
}

pub async fn set_supply_order<'e, E>(executor: E, name: &str, sort_order: i32) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query("UPDATE supplies SET sort_order = $1 WHERE name = $2")
		.bind(sort_order)
		.bind(name)
		.execute(executor)
		.await?;

	Ok(())
}

pub async fn clear_supplies<'e, E>(executor: E) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query("DELETE FROM supplies").execute(executor).await?;

	Ok(())
}

pub async fn delete_supply<'e, E>(executor: E, name: &str) -> Result<u64>
where
	E: PgExecutor<'e>,
{
	let result =
		sqlx::query("DELETE FROM supplies WHERE name = $1").bind(name).execute(executor).await?;

	Ok(result.rows_affected())
}

/// Canonical self-match: the token is already a canonical spelling.
pub async fn find_canonical<'e, E>(executor: E, token: &str) -> Result<Option<String>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, (String,)>(
		"\
SELECT DISTINCT canonical_name
FROM ingredient_aliases
WHERE LOWER(canonical_name) = $1
LIMIT 1",
	)
	.bind(token)
	.fetch_optional(executor)
	.await?;

	Ok(row.map(|(name,)| name))
}

/// Alias match with highest confidence; insertion recency breaks ties.
pub async fn find_alias_canonical<'e, E>(executor: E, token: &str) -> Result<Option<String>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, (String,)>(
		"\
SELECT canonical_name
FROM ingredient_aliases
WHERE LOWER(alias) = $1
ORDER BY confidence DESC, id DESC
LIMIT 1",
	)
	.bind(token)
	.fetch_optional(executor)
	.await?;

	Ok(row.map(|(name,)| name))
}

pub async fn upsert_alias<'e, E>(
	executor: E,
	canonical_name: &str,
	alias: &str,
	confidence: f32,
	source: &str,
) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO ingredient_aliases (canonical_name, alias, confidence, source)
VALUES ($1, $2, $3, $4)
ON CONFLICT (canonical_name, alias) DO UPDATE
SET
	confidence = EXCLUDED.confidence,
	source = EXCLUDED.source,
	created_at = now()",
	)
	.bind(canonical_name)
	.bind(alias)
	.bind(confidence)
	.bind(source)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn aliases_for<'e, E>(executor: E, canonical_name: &str) -> Result<Vec<AliasRecord>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, AliasRecord>(
		"\
SELECT id, canonical_name, alias, confidence, source, created_at
FROM ingredient_aliases
WHERE LOWER(canonical_name) = $1
ORDER BY confidence DESC, id",
	)
	.bind(canonical_name)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}
