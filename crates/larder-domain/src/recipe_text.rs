//! Canonical text form of a recipe for dense embedding.

const INSTRUCTIONS_LIMIT: usize = 500;

/// Deterministic embedding text. Empty segments are omitted so two recipes
/// differing only in absent fields do not share filler text.
pub fn compose(
	name: &str,
	ingredients: &[String],
	cuisine: Option<&str>,
	instructions: Option<&str>,
) -> String {
	let mut text = format!("Recipe: {name}. ");

	if let Some(cuisine) = cuisine.filter(|value| !value.is_empty()) {
		text.push_str(&format!("Cuisine: {cuisine}. "));
	}
	if !ingredients.is_empty() {
		text.push_str(&format!("Ingredients: {}. ", ingredients.join(", ")));
	}
	if let Some(instructions) = instructions.filter(|value| !value.is_empty()) {
		text.push_str("Instructions: ");

		if instructions.chars().count() > INSTRUCTIONS_LIMIT {
			let truncated: String = instructions.chars().take(INSTRUCTIONS_LIMIT).collect();

			text.push_str(&truncated);
			text.push_str("...");
		} else {
			text.push_str(instructions);
		}
	}

	text
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn composes_all_segments() {
		let text = compose(
			"carbonara",
			&["pasta".to_string(), "egg".to_string()],
			Some("ITALIAN"),
			Some("Boil pasta."),
		);

		assert_eq!(
			text,
			"Recipe: carbonara. Cuisine: ITALIAN. Ingredients: pasta, egg. \
			 Instructions: Boil pasta."
		);
	}

	#[test]
	fn omits_empty_segments() {
		let text = compose("toast", &[], None, None);

		assert_eq!(text, "Recipe: toast. ");
	}

	#[test]
	fn elides_long_instructions_on_char_boundaries() {
		let instructions = "般".repeat(600);
		let text = compose("congee", &["rice".to_string()], None, Some(&instructions));

		assert!(text.ends_with("..."));
		assert!(text.contains(&"般".repeat(500)));
		assert!(!text.contains(&"般".repeat(501)));
	}
}
