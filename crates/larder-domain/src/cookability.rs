//! Pantry-to-recipe reachability over the ingredient dependency graph.
//!
//! Recipes are sinks of a bipartite graph whose sources are pantry tokens.
//! A recipe whose in-degree drains to zero is cookable, and is itself fed
//! back into the queue as a token so that composite recipes (a recipe that
//! lists another recipe as an ingredient) resolve in the same pass.

use std::collections::{HashMap, HashSet, VecDeque};

/// A recipe within reach of the pantry once at most `max_missing` ingredients
/// are obtained.
#[derive(Clone, Debug, PartialEq)]
pub struct AlmostCookable {
	pub recipe_name: String,
	pub missing_ingredients: Vec<String>,
}

/// Kahn-style propagation from pantry tokens to recipes.
///
/// Duplicate recipe names are merged (union of their ingredients) before the
/// graph is built. Emission order is discovery order, which is deterministic
/// for identical inputs. A recipe listing itself as an ingredient keeps a
/// positive in-degree forever and is never emitted.
pub fn cookable_recipes(recipes: &[(String, Vec<String>)], pantry: &[String]) -> Vec<String> {
	if recipes.is_empty() || pantry.is_empty() {
		return Vec::new();
	}

	// Merge duplicates while keeping first-seen recipe order.
	let mut order = Vec::new();
	let mut merged: HashMap<&str, HashSet<&str>> = HashMap::new();

	for (name, ingredients) in recipes {
		let entry = merged.entry(name.as_str()).or_insert_with(|| {
			order.push(name.as_str());

			HashSet::new()
		});

		entry.extend(ingredients.iter().map(String::as_str));
	}

	let mut graph: HashMap<&str, Vec<&str>> = HashMap::new();
	let mut in_degree: HashMap<&str, usize> = HashMap::new();

	for &name in &order {
		let ingredients = &merged[name];

		for &ingredient in ingredients {
			graph.entry(ingredient).or_default().push(name);
		}

		in_degree.insert(name, ingredients.len());
	}

	let mut queue = VecDeque::new();
	let mut processed = HashSet::new();
	let mut emitted = Vec::new();

	for token in pantry {
		if processed.insert(token.as_str()) {
			queue.push_back(token.as_str());
		}
	}

	while let Some(token) = queue.pop_front() {
		let Some(dependents) = graph.get(token) else {
			continue;
		};

		for &recipe in dependents {
			let remaining = in_degree.entry(recipe).or_insert(0);

			*remaining = remaining.saturating_sub(1);

			if *remaining == 0 && processed.insert(recipe) {
				emitted.push(recipe.to_string());
				queue.push_back(recipe);
			}
		}
	}

	emitted
}

/// Required ingredients not covered by the pantry, in recipe order.
pub fn missing_ingredients(required: &[String], pantry: &HashSet<String>) -> Vec<String> {
	required.iter().filter(|ingredient| !pantry.contains(*ingredient)).cloned().collect()
}

/// Recipes whose missing-ingredient count is within `max_missing`.
///
/// `recipes` maps each recipe to its canonicalized required ingredients and
/// `pantry` holds both canonical and raw pantry tokens. Callers validate the
/// 1..=5 bound on `max_missing`.
pub fn almost_cookable(
	recipes: &[(String, Vec<String>)],
	pantry: &HashSet<String>,
	max_missing: usize,
) -> Vec<AlmostCookable> {
	let mut out = Vec::new();

	for (name, required) in recipes {
		let missing = missing_ingredients(required, pantry);

		if missing.len() <= max_missing {
			out.push(AlmostCookable { recipe_name: name.clone(), missing_ingredients: missing });
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	fn recipe(name: &str, ingredients: &[&str]) -> (String, Vec<String>) {
		(name.to_string(), ingredients.iter().map(|s| s.to_string()).collect())
	}

	fn pantry(items: &[&str]) -> Vec<String> {
		items.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn resolves_composite_recipes_in_discovery_order() {
		let recipes = vec![
			recipe("sandwich", &["bread", "ham"]),
			recipe("burger", &["bread", "meat", "sandwich"]),
		];
		let made = cookable_recipes(&recipes, &pantry(&["bread", "ham", "meat"]));

		assert_eq!(made, vec!["sandwich".to_string(), "burger".to_string()]);
	}

	#[test]
	fn recipe_with_unmet_ingredient_is_not_emitted() {
		let recipes = vec![recipe("omelette", &["egg", "milk"])];
		let made = cookable_recipes(&recipes, &pantry(&["egg"]));

		assert!(made.is_empty());
	}

	#[test]
	fn duplicate_recipe_names_merge_their_ingredients() {
		let recipes = vec![recipe("stew", &["beef"]), recipe("stew", &["carrot"])];

		assert!(cookable_recipes(&recipes, &pantry(&["beef"])).is_empty());
		assert_eq!(
			cookable_recipes(&recipes, &pantry(&["beef", "carrot"])),
			vec!["stew".to_string()]
		);
	}

	#[test]
	fn duplicate_pantry_tokens_decrement_once() {
		let recipes = vec![recipe("toast", &["bread", "butter"])];
		let made = cookable_recipes(&recipes, &pantry(&["bread", "bread", "butter"]));

		assert_eq!(made, vec!["toast".to_string()]);
	}

	#[test]
	fn self_referential_recipe_is_never_cookable() {
		let recipes = vec![recipe("sourdough", &["sourdough", "flour"])];
		let made = cookable_recipes(&recipes, &pantry(&["flour", "water"]));

		assert!(made.is_empty());
	}

	#[test]
	fn empty_inputs_produce_empty_output() {
		assert!(cookable_recipes(&[], &pantry(&["bread"])).is_empty());
		assert!(cookable_recipes(&[recipe("toast", &["bread"])], &[]).is_empty());
	}

	#[test]
	fn almost_cookable_is_bounded_by_missing_count() {
		let recipes = vec![
			recipe("salad", &["tomato", "lettuce"]),
			recipe("soup", &["stock", "leek", "potato"]),
			recipe("toast", &["bread"]),
		];
		let on_hand: HashSet<String> =
			["tomato", "bread"].iter().map(|s| s.to_string()).collect();
		let close = almost_cookable(&recipes, &on_hand, 1);

		// Fully covered recipes count as zero missing and stay in range.
		assert_eq!(
			close,
			vec![
				AlmostCookable {
					recipe_name: "salad".to_string(),
					missing_ingredients: vec!["lettuce".to_string()],
				},
				AlmostCookable { recipe_name: "toast".to_string(), missing_ingredients: vec![] },
			]
		);

		let close = almost_cookable(&recipes, &on_hand, 3);

		assert_eq!(close.len(), 3);
		assert_eq!(close[1].missing_ingredients.len(), 3);
	}
}
