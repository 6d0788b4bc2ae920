//! Keyword gate applied to single-vector search hits.
//!
//! Dense similarity alone happily returns "beef stew" for "chicken soup";
//! requiring one important query keyword in the recipe name keeps the
//! fallback path honest. The fused RRF path never uses this gate because
//! its sparse branch already carries keyword evidence.

const STOP_WORDS: &[&str] = &[
	"with", "and", "the", "for", "recipe", "dish", "food", "make", "cook", "how", "to", "is",
	"in", "on", "at",
];

const MIN_KEYWORD_LEN: usize = 4;

/// Query terms worth matching on: lowercased, punctuation stripped, longer
/// than three characters, not stop words.
pub fn important_keywords(query: &str) -> Vec<String> {
	query
		.to_lowercase()
		.split_whitespace()
		.map(|word| word.chars().filter(|c| c.is_ascii_lowercase()).collect::<String>())
		.filter(|word| word.len() >= MIN_KEYWORD_LEN && !STOP_WORDS.contains(&word.as_str()))
		.collect()
}

/// Whether `recipe_name` contains at least one important keyword from the
/// query. Queries without important keywords match everything.
pub fn matches_query(recipe_name: &str, query: &str) -> bool {
	let keywords = important_keywords(query);

	if keywords.is_empty() {
		return true;
	}

	let name = recipe_name.to_lowercase();

	keywords.iter().any(|keyword| name.contains(keyword))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn extracts_long_non_stop_words() {
		assert_eq!(
			important_keywords("How to make chicken soup for dinner"),
			vec!["chicken".to_string(), "soup".to_string(), "dinner".to_string()]
		);
	}

	#[test]
	fn strips_punctuation_before_length_check() {
		assert_eq!(important_keywords("stir-fry!"), vec!["stirfry".to_string()]);
	}

	#[test]
	fn short_only_queries_match_everything() {
		assert!(matches_query("beef stew", "a hot pot"));
	}

	#[test]
	fn requires_one_keyword_in_the_name() {
		assert!(matches_query("Chicken Noodle Soup", "quick chicken dinner"));
		assert!(!matches_query("beef stew", "quick chicken dinner"));
	}
}
