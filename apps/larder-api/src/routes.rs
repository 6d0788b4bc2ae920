use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post, put},
	Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::state::AppState;
use larder_domain::CuisineType;
use larder_service::{AddRecipeRequest, Error, GenerateRequest, HybridSearchRequest};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/generate", post(generate).get(generate_from_fridge))
		.route("/api/recipes", get(recipes_by_cuisine).post(add_recipe))
		.route("/api/recipes/search", get(search_recipes))
		.route("/api/recipes/hybrid-search", post(hybrid_search))
		.route("/api/recipes/almost-cookable", get(almost_cookable))
		.route("/api/recipes/parse-text", post(parse_recipe_text))
		.route("/api/recipes/{name}", get(get_recipe).delete(delete_recipe))
		.route("/api/recipes/{name}/missing", get(missing_ingredients))
		.route("/api/recipes/{name}/substitutions", get(substitutions))
		.route("/api/cuisines", get(cuisines))
		.route("/api/fridge", get(fridge_view).put(replace_fridge))
		.route("/api/fridge/order", put(reorder_fridge))
		.route(
			"/api/fridge/{item}",
			post(add_to_fridge).put(set_fridge_count).delete(remove_from_fridge),
		)
		.route("/api/ingredients/seed-aliases", post(seed_aliases))
		.route("/api/ingredients/{name}/aliases", get(ingredient_aliases).post(add_alias))
		.route("/api/ingredients/{name}/generate-aliases", post(generate_aliases))
		.route("/api/ingredients/{name}/resolve", get(resolve_ingredient))
		.route("/api/search/index-all", post(index_all))
		.route("/api/search/stats", get(search_stats))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn generate(
	State(state): State<AppState>,
	Json(payload): Json<GenerateRequest>,
) -> Result<Json<Value>, ApiError> {
	let response = state.service.generate(payload).await?;

	Ok(Json(json!(response)))
}

async fn generate_from_fridge(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
	let response = state.service.cookable_from_fridge().await?;

	Ok(Json(json!(response)))
}

async fn recipes_by_cuisine(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
	let grouped = state.service.recipes_by_cuisine().await?;

	Ok(Json(json!(grouped)))
}

async fn add_recipe(
	State(state): State<AppState>,
	Json(payload): Json<AddRecipeRequest>,
) -> Result<Json<Value>, ApiError> {
	let name = state.service.add_recipe(payload).await?;

	Ok(Json(json!({ "message": "Recipe added successfully", "name": name })))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
	query: String,
	#[serde(default = "default_limit")]
	limit: u32,
}

async fn search_recipes(
	State(state): State<AppState>,
	Query(params): Query<SearchParams>,
) -> Result<Json<Value>, ApiError> {
	let response = state.service.simple_search(&params.query, params.limit).await?;

	Ok(Json(json!(response)))
}

async fn hybrid_search(
	State(state): State<AppState>,
	Json(payload): Json<HybridSearchRequest>,
) -> Result<Json<Value>, ApiError> {
	let response = state.service.hybrid_search(payload).await?;

	Ok(Json(json!(response)))
}

#[derive(Debug, Deserialize)]
struct AlmostCookableParams {
	#[serde(default = "default_max_missing", rename = "maxMissing")]
	max_missing: usize,
}

async fn almost_cookable(
	State(state): State<AppState>,
	Query(params): Query<AlmostCookableParams>,
) -> Result<Json<Value>, ApiError> {
	let response = state.service.almost_cookable(params.max_missing).await?;

	Ok(Json(json!(response)))
}

#[derive(Debug, Deserialize)]
struct ParseTextBody {
	text: String,
}

async fn parse_recipe_text(
	State(state): State<AppState>,
	Json(payload): Json<ParseTextBody>,
) -> Result<Json<Value>, ApiError> {
	match state.service.parse_recipe_text(&payload.text).await? {
		Some(recipe) => Ok(Json(json!({ "message": "Recipe added successfully", "recipe": recipe }))),
		None => Ok(Json(json!({
			"warning": "Recipe text could not be parsed; nothing was saved."
		}))),
	}
}

async fn get_recipe(
	State(state): State<AppState>,
	Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
	let recipe = state.service.get_recipe(&name).await?;

	Ok(Json(json!(recipe)))
}

async fn delete_recipe(
	State(state): State<AppState>,
	Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
	state.service.delete_recipe(&name).await?;

	Ok(Json(json!({ "message": "Recipe deleted successfully", "name": name })))
}

async fn missing_ingredients(
	State(state): State<AppState>,
	Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
	let report = state.service.missing_report(&name).await?;

	Ok(Json(json!(report)))
}

async fn substitutions(
	State(state): State<AppState>,
	Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
	let response = state.service.substitutions(&name).await?;

	Ok(Json(json!(response)))
}

async fn cuisines() -> Json<Value> {
	let cuisines: Vec<Value> = CuisineType::ALL
		.iter()
		.map(|cuisine| json!({ "name": cuisine.as_str(), "displayName": cuisine.display_name() }))
		.collect();

	Json(json!(cuisines))
}

async fn fridge_view(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
	let view = state.service.pantry_view().await?;

	Ok(Json(json!(view)))
}

#[derive(Debug, Deserialize)]
struct SuppliesBody {
	supplies: Vec<String>,
}

async fn replace_fridge(
	State(state): State<AppState>,
	Json(payload): Json<SuppliesBody>,
) -> Result<Json<Value>, ApiError> {
	state.service.replace_pantry(&payload.supplies).await?;

	Ok(Json(json!({ "message": "Fridge updated successfully", "supplies": payload.supplies })))
}

#[derive(Debug, Deserialize)]
struct ItemsBody {
	items: Vec<String>,
}

async fn reorder_fridge(
	State(state): State<AppState>,
	Json(payload): Json<ItemsBody>,
) -> Result<Json<Value>, ApiError> {
	state.service.reorder_pantry(&payload.items).await?;

	Ok(Json(json!({ "message": "Order updated successfully" })))
}

#[derive(Debug, Deserialize)]
struct AddToFridgeParams {
	#[serde(default = "default_count")]
	count: i32,
}

async fn add_to_fridge(
	State(state): State<AppState>,
	Path(item): Path<String>,
	Query(params): Query<AddToFridgeParams>,
) -> Result<Json<Value>, ApiError> {
	state.service.add_pantry_item(&item, params.count).await?;

	Ok(Json(json!({ "message": format!("Added {} {item} to fridge", params.count) })))
}

#[derive(Debug, Deserialize)]
struct CountBody {
	count: i32,
}

async fn set_fridge_count(
	State(state): State<AppState>,
	Path(item): Path<String>,
	Json(payload): Json<CountBody>,
) -> Result<Json<Value>, ApiError> {
	state.service.set_pantry_item_count(&item, payload.count).await?;

	Ok(Json(json!({ "message": format!("Updated {item} count to {}", payload.count) })))
}

async fn remove_from_fridge(
	State(state): State<AppState>,
	Path(item): Path<String>,
) -> Result<Json<Value>, ApiError> {
	state.service.remove_pantry_item(&item).await?;

	Ok(Json(json!({ "message": format!("Removed {item} from fridge") })))
}

async fn seed_aliases(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
	state.service.seed_common_aliases().await?;

	Ok(Json(json!({ "message": "Seeded common ingredient aliases" })))
}

async fn ingredient_aliases(
	State(state): State<AppState>,
	Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
	let info = state.service.alias_info(&name).await?;

	Ok(Json(json!(info)))
}

#[derive(Debug, Deserialize)]
struct AliasBody {
	alias: String,
}

async fn add_alias(
	State(state): State<AppState>,
	Path(canonical): Path<String>,
	Json(payload): Json<AliasBody>,
) -> Result<Json<Value>, ApiError> {
	state.service.add_alias(&canonical, &payload.alias).await?;

	Ok(Json(json!({
		"message": "Alias added successfully",
		"canonical": canonical,
		"alias": payload.alias,
	})))
}

async fn generate_aliases(
	State(state): State<AppState>,
	Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
	let generated = state.service.generate_aliases(&name).await?;

	Ok(Json(json!({
		"ingredient": name,
		"count": generated.len(),
		"generated": generated,
	})))
}

async fn resolve_ingredient(
	State(state): State<AppState>,
	Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
	let trimmed = name.trim().to_string();

	if trimmed.is_empty() {
		return Err(Error::InvalidArgument {
			message: "Ingredient name is required.".to_string(),
		}
		.into());
	}

	let canonical = state.service.resolve(&trimmed).await?;

	Ok(Json(json!({
		"original": trimmed,
		"resolved": canonical != trimmed,
		"canonical": canonical,
	})))
}

async fn index_all(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
	if !state.service.search_available() {
		return Ok(Json(json!({
			"warning": "Vector search is not available. Make sure the vector index is running."
		})));
	}

	let report = state.service.index_all().await?;

	Ok(Json(json!({
		"message": "Indexed recipes for semantic search",
		"count": report.indexed_count,
		"failed": report.failed_count,
	})))
}

async fn search_stats(State(state): State<AppState>) -> Json<Value> {
	let stats = state.service.search_stats().await;

	Json(json!(stats))
}

fn default_limit() -> u32 {
	10
}

fn default_max_missing() -> usize {
	2
}

fn default_count() -> i32 {
	1
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	message: String,
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		let status = match &err {
			Error::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
			Error::NotFound { .. } => StatusCode::NOT_FOUND,
			Error::Provider { .. } | Error::Storage { .. } | Error::Qdrant { .. } =>
				StatusCode::INTERNAL_SERVER_ERROR,
		};

		Self { status, message: err.to_string() }
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(self.status, Json(json!({ "error": self.message }))).into_response()
	}
}
