//! Hash-bucketed sparse vectors for BM25-style keyword retrieval.
//!
//! Tokens are folded into a fixed vocabulary of `VOCABULARY_SIZE` buckets
//! with FNV-1a, so collisions are accepted rather than tracked. The vector
//! is a bag-of-words surrogate, not a true vocabulary.

use std::collections::HashMap;

pub const VOCABULARY_SIZE: u64 = 100_000;

const FNV_OFFSET_BASIS: u64 = 0xCBF2_9CE4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;

const STOP_WORDS: &[&str] = &[
	"a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
	"from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had", "do", "does",
	"did", "will", "would", "could", "should", "may", "might", "must", "shall", "can", "need",
	"recipe", "dish", "food", "make", "cook", "cooking", "made",
];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseVector {
	pub indices: Vec<u32>,
	pub values: Vec<f32>,
}
impl SparseVector {
	pub fn is_empty(&self) -> bool {
		self.indices.is_empty()
	}

	pub fn len(&self) -> usize {
		self.indices.len()
	}
}

/// Term-frequency vector over ingredient tokens, weight 1.0 each.
pub fn from_ingredients(ingredients: &[String]) -> SparseVector {
	let mut buckets = HashMap::new();

	for ingredient in ingredients {
		accumulate(&mut buckets, ingredient, 1.0);
	}

	into_sparse(buckets)
}

/// Recipe vector with field weighting: name tokens count double, cuisine
/// tokens half again over plain ingredients.
pub fn from_recipe(name: &str, ingredients: &[String], cuisine: Option<&str>) -> SparseVector {
	let mut buckets = HashMap::new();

	accumulate(&mut buckets, name, 2.0);

	for ingredient in ingredients {
		accumulate(&mut buckets, ingredient, 1.0);
	}
	if let Some(cuisine) = cuisine {
		accumulate(&mut buckets, cuisine, 1.5);
	}

	into_sparse(buckets)
}

/// Lowercase, split on runs of non-alphanumerics (CJK ideographs retained),
/// drop one-character tokens and stop words. No stemming.
pub fn tokenize(text: &str) -> Vec<String> {
	let normalized = text.trim().to_lowercase();

	normalized
		.split(|c: char| !is_token_char(c))
		.filter(|part| part.chars().count() >= 2 && !STOP_WORDS.contains(part))
		.map(str::to_string)
		.collect()
}

fn is_token_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

fn bucket(token: &str) -> u32 {
	let mut hash = FNV_OFFSET_BASIS;

	for byte in token.as_bytes() {
		hash ^= u64::from(*byte);
		hash = hash.wrapping_mul(FNV_PRIME);
	}

	(hash % VOCABULARY_SIZE) as u32
}

fn accumulate(buckets: &mut HashMap<u32, f32>, text: &str, weight: f32) {
	for token in tokenize(text) {
		*buckets.entry(bucket(&token)).or_insert(0.0) += weight;
	}
}

fn into_sparse(buckets: HashMap<u32, f32>) -> SparseVector {
	let mut entries: Vec<(u32, f32)> = buckets.into_iter().collect();

	entries.sort_by_key(|(index, _)| *index);

	let (indices, values) = entries.into_iter().unzip();

	SparseVector { indices, values }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tokenize_drops_stop_words_and_short_tokens() {
		let tokens = tokenize("A quick Chicken-Stir Fry recipe!");

		assert_eq!(tokens, vec!["quick", "chicken", "stir", "fry"]);
	}

	#[test]
	fn tokenize_retains_cjk_runs() {
		let tokens = tokenize("麻婆豆腐 tofu");

		assert_eq!(tokens, vec!["麻婆豆腐", "tofu"]);
	}

	#[test]
	fn buckets_are_stable_and_bounded() {
		let first = bucket("tomato");
		let second = bucket("tomato");

		assert_eq!(first, second);
		assert!(u64::from(first) < VOCABULARY_SIZE);
	}

	#[test]
	fn duplicate_tokens_accumulate_weight() {
		let vec =
			from_ingredients(&["chicken breast".to_string(), "chicken thigh".to_string()]);
		let chicken = bucket("chicken");
		let position = vec.indices.iter().position(|index| *index == chicken).unwrap();

		assert_eq!(vec.values[position], 2.0);
	}

	#[test]
	fn recipe_vector_weights_name_over_ingredients() {
		let vec = from_recipe("tomato soup", &["tomato".to_string()], Some("ITALIAN"));
		let tomato = bucket("tomato");
		let italian = bucket("italian");
		let tomato_position = vec.indices.iter().position(|index| *index == tomato).unwrap();
		let italian_position = vec.indices.iter().position(|index| *index == italian).unwrap();

		// 2.0 from the name plus 1.0 from the ingredient list.
		assert_eq!(vec.values[tomato_position], 3.0);
		assert_eq!(vec.values[italian_position], 1.5);
	}

	#[test]
	fn blank_input_yields_empty_vector() {
		assert!(from_ingredients(&[]).is_empty());
		assert!(from_ingredients(&["  ".to_string()]).is_empty());
	}
}
