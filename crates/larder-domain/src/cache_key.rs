//! Cache key derivation for the embedding and search-result caches.
//!
//! Keys embed a short SHA-256 digest so that arbitrarily long queries map to
//! bounded Redis keys. The search key is built from a canonical form of the
//! request so that equivalent requests collide on the same entry.

use sha2::{Digest, Sha256};

const EMBEDDING_KEY_PREFIX: &str = "emb:";
const SEARCH_KEY_PREFIX: &str = "search:";

pub fn embedding_key(query: &str) -> String {
	format!("{EMBEDDING_KEY_PREFIX}{}", short_hash(query))
}

pub fn search_key(canonical: &str) -> String {
	format!("{SEARCH_KEY_PREFIX}{}", short_hash(canonical))
}

/// Canonical request form: sorted lowercase ingredients, trimmed lowercase
/// query, then the paging and threshold parameters. Empty segments are
/// omitted so ingredient-only and query-only requests stay distinct.
pub fn search_canonical(
	ingredients: &[String],
	query: &str,
	top_k: usize,
	threshold: f32,
) -> String {
	let mut canonical = String::new();

	if !ingredients.is_empty() {
		let mut sorted: Vec<String> =
			ingredients.iter().map(|ingredient| ingredient.to_lowercase()).collect();

		sorted.sort();

		canonical.push_str("ing:");
		canonical.push_str(&sorted.join(","));
	}

	let query = query.trim().to_lowercase();

	if !query.is_empty() {
		canonical.push_str("|q:");
		canonical.push_str(&query);
	}

	canonical.push_str(&format!("|t:{top_k}|s:{threshold}"));

	canonical
}

/// Lowercase hex of the first 8 bytes of `sha256(input)`.
fn short_hash(input: &str) -> String {
	let digest = Sha256::digest(input.as_bytes());
	let mut out = String::with_capacity(16);

	for byte in &digest[..8] {
		out.push_str(&format!("{byte:02x}"));
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keys_are_prefixed_and_bounded() {
		let key = embedding_key("a very long natural language query about dinner");

		assert!(key.starts_with("emb:"));
		assert_eq!(key.len(), "emb:".len() + 16);
	}

	#[test]
	fn canonical_form_ignores_ingredient_order_and_case() {
		let first = search_canonical(
			&["Chicken".to_string(), "rice".to_string()],
			"Quick Dinner",
			5,
			0.2,
		);
		let second = search_canonical(
			&["rice".to_string(), "chicken".to_string()],
			"  quick dinner ",
			5,
			0.2,
		);

		assert_eq!(first, second);
		assert_eq!(first, "ing:chicken,rice|q:quick dinner|t:5|s:0.2");
	}

	#[test]
	fn parameters_split_the_cache() {
		let base = search_canonical(&["egg".to_string()], "", 10, 0.0);
		let other_k = search_canonical(&["egg".to_string()], "", 5, 0.0);
		let other_threshold = search_canonical(&["egg".to_string()], "", 10, 0.5);

		assert_ne!(base, other_k);
		assert_ne!(base, other_threshold);
		assert_ne!(search_key(&base), search_key(&other_k));
	}

	#[test]
	fn same_input_hashes_identically() {
		assert_eq!(embedding_key("tomato soup"), embedding_key("tomato soup"));
		assert_ne!(embedding_key("tomato soup"), embedding_key("tomato stew"));
	}
}
