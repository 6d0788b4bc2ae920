use time::OffsetDateTime;

#[derive(Debug, sqlx::FromRow)]
pub struct Supply {
	pub name: String,
	pub quantity: i32,
	pub sort_order: i32,
}

#[derive(Debug, sqlx::FromRow)]
pub struct AliasRecord {
	pub id: i64,
	pub canonical_name: String,
	pub alias: String,
	pub confidence: f32,
	pub source: String,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct RecipeDetailsRow {
	pub recipe_name: String,
	pub cuisine_type: Option<String>,
	pub instructions: Option<String>,
	pub image_url: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct DependencyRow {
	pub recipe_name: String,
	pub ingredient_name: String,
	pub is_seasoning: i32,
}
