use std::collections::HashSet;

use larder_domain::{cache_key, cookability, keywords, sparse};

fn recipe(name: &str, ingredients: &[&str]) -> (String, Vec<String>) {
	(name.to_string(), ingredients.iter().map(|s| s.to_string()).collect())
}

#[test]
fn pantry_covers_chained_recipes() {
	let recipes = vec![
		recipe("sandwich", &["bread", "ham"]),
		recipe("burger", &["bread", "meat", "sandwich"]),
	];
	let pantry = vec!["bread".to_string(), "ham".to_string(), "meat".to_string()];

	assert_eq!(
		cookability::cookable_recipes(&recipes, &pantry),
		vec!["sandwich".to_string(), "burger".to_string()]
	);
}

#[test]
fn seasonings_excluded_from_the_graph_do_not_block_cooking() {
	// The service feeds only non-seasoning edges into the resolver, so a
	// carbonara requiring salt and pepper as seasonings cooks from the
	// staples alone.
	let recipes = vec![recipe("carbonara", &["pasta", "egg", "pancetta"])];
	let pantry = vec!["pasta".to_string(), "egg".to_string(), "pancetta".to_string()];

	assert_eq!(cookability::cookable_recipes(&recipes, &pantry), vec!["carbonara".to_string()]);
}

#[test]
fn canonicalized_pantry_tokens_match_recipe_requirements() {
	// "roma tomato" resolves to "tomato" upstream; both forms are kept in
	// the pantry set, so either spelling in the recipe matches.
	let recipes = vec![recipe("salad", &["tomato", "lettuce"])];
	let pantry = vec![
		"tomato".to_string(),
		"roma tomato".to_string(),
		"lettuce".to_string(),
	];

	assert_eq!(cookability::cookable_recipes(&recipes, &pantry), vec!["salad".to_string()]);
}

#[test]
fn missing_ingredient_report_inputs_line_up() {
	let required = vec!["egg".to_string(), "milk".to_string()];
	let pantry: HashSet<String> = ["egg".to_string()].into_iter().collect();
	let missing = cookability::missing_ingredients(&required, &pantry);

	assert_eq!(missing, vec!["milk".to_string()]);
}

#[test]
fn query_and_index_sparse_vectors_share_buckets() {
	let query = sparse::from_ingredients(&["chicken".to_string()]);
	let indexed = sparse::from_recipe("chicken rice", &["chicken".to_string()], None);

	for index in &query.indices {
		assert!(indexed.indices.contains(index));
	}
}

#[test]
fn search_cache_key_is_deterministic_across_requests() {
	let ingredients = vec!["Chicken".to_string()];
	let reordered = vec!["chicken".to_string()];
	let first =
		cache_key::search_key(&cache_key::search_canonical(&ingredients, "quick dinner", 5, 0.2));
	let second =
		cache_key::search_key(&cache_key::search_canonical(&reordered, "Quick Dinner ", 5, 0.2));

	assert_eq!(first, second);
}

#[test]
fn keyword_gate_applies_to_fallback_results_only_by_contract() {
	assert!(keywords::matches_query("Chicken Soup", "hearty chicken soup"));
	assert!(!keywords::matches_query("Beef Stew", "hearty chicken soup"));
}
