//! LLM-backed substitution planning for a recipe's missing ingredients.
//!
//! The diff against the pantry is deterministic; only the candidate
//! replacements come from the model. A failed suggestion request costs one
//! ingredient its list, never the whole response.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::{LarderService, Result};
use larder_storage::queries;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstitutionSuggestion {
	pub original_ingredient: String,
	pub substitute: String,
	pub in_fridge: bool,
	pub confidence: f64,
	pub reasoning: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstitutionsResponse {
	pub recipe_name: String,
	pub substitutions: BTreeMap<String, Vec<SubstitutionSuggestion>>,
}

impl LarderService {
	pub async fn substitutions(&self, recipe_name: &str) -> Result<SubstitutionsResponse> {
		let report = self.missing_report(recipe_name).await?;

		if report.missing_ingredients.is_empty() {
			return Ok(SubstitutionsResponse {
				recipe_name: report.recipe_name,
				substitutions: BTreeMap::new(),
			});
		}

		let recipe = self.get_recipe(&report.recipe_name).await?;
		let pantry_raw: Vec<String> = queries::list_supplies(&self.db.pool)
			.await?
			.into_iter()
			.map(|supply| supply.name)
			.collect();
		let pantry = self.resolve_to_set(&pantry_raw).await?;
		let mut substitutions = BTreeMap::new();

		for missing in &report.missing_ingredients {
			let messages = substitution_messages(
				missing,
				recipe.cuisine_type.as_str(),
				&recipe.ingredients,
				&pantry_raw,
			);
			let suggestions = match self
				.providers
				.chat
				.complete(&self.cfg.providers.chat, &messages)
				.await
			{
				Ok(raw) => {
					let mut suggestions = parse_suggestions(&raw, missing);

					for suggestion in &mut suggestions {
						suggestion.in_fridge = pantry.contains(&suggestion.substitute)
							|| pantry.contains(&self.resolve(&suggestion.substitute).await?);
					}

					suggestions
				},
				Err(err) => {
					tracing::warn!(
						error = %err,
						ingredient = %missing,
						"Substitution request failed."
					);

					Vec::new()
				},
			};

			substitutions.insert(missing.clone(), suggestions);
		}

		Ok(SubstitutionsResponse { recipe_name: report.recipe_name, substitutions })
	}
}

fn substitution_messages(
	ingredient: &str,
	cuisine: &str,
	co_ingredients: &[String],
	pantry: &[String],
) -> Vec<Value> {
	let prompt = format!(
		"You are a culinary expert. Suggest substitutes for \"{ingredient}\" in a {cuisine} \
		 recipe that also uses: {}. Prefer items from this pantry: {}. Return ONLY a JSON \
		 object {{\"substitutes\": [{{\"ingredient\": string, \"confidence\": number between \
		 0 and 1, \"reasoning\": string}}]}}.",
		co_ingredients.join(", "),
		pantry.join(", ")
	);

	vec![serde_json::json!({ "role": "user", "content": prompt })]
}

/// Defensive parse of the `substitutes` array; malformed entries are skipped.
fn parse_suggestions(raw: &Value, original: &str) -> Vec<SubstitutionSuggestion> {
	let Some(substitutes) = raw.get("substitutes").and_then(Value::as_array) else {
		return Vec::new();
	};
	let mut suggestions = Vec::new();

	for entry in substitutes {
		let Some(substitute) = entry.get("ingredient").and_then(Value::as_str) else {
			continue;
		};
		let substitute = substitute.trim();

		if substitute.is_empty() {
			continue;
		}

		let confidence =
			entry.get("confidence").and_then(Value::as_f64).unwrap_or(0.0).clamp(0.0, 1.0);
		let reasoning =
			entry.get("reasoning").and_then(Value::as_str).unwrap_or_default().to_string();

		suggestions.push(SubstitutionSuggestion {
			original_ingredient: original.to_string(),
			substitute: substitute.to_string(),
			in_fridge: false,
			confidence,
			reasoning,
		});
	}

	suggestions
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_well_formed_suggestions() {
		let raw = serde_json::json!({
			"substitutes": [
				{ "ingredient": "pecorino", "confidence": 0.9, "reasoning": "Same family." },
				{ "ingredient": "grana padano", "confidence": 0.7 }
			]
		});
		let suggestions = parse_suggestions(&raw, "parmesan");

		assert_eq!(suggestions.len(), 2);
		assert_eq!(suggestions[0].substitute, "pecorino");
		assert_eq!(suggestions[0].original_ingredient, "parmesan");
		assert_eq!(suggestions[1].reasoning, "");
	}

	#[test]
	fn skips_malformed_entries_and_clamps_confidence() {
		let raw = serde_json::json!({
			"substitutes": [
				{ "confidence": 0.9 },
				{ "ingredient": "  " },
				{ "ingredient": "ghee", "confidence": 7.0 }
			]
		});
		let suggestions = parse_suggestions(&raw, "butter");

		assert_eq!(suggestions.len(), 1);
		assert_eq!(suggestions[0].substitute, "ghee");
		assert_eq!(suggestions[0].confidence, 1.0);
	}

	#[test]
	fn missing_substitutes_field_yields_empty() {
		assert!(parse_suggestions(&serde_json::json!({}), "milk").is_empty());
		assert!(parse_suggestions(&serde_json::json!([]), "milk").is_empty());
	}
}
