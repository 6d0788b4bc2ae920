use serde::{Deserialize, Serialize};

/// Closed set of supported cuisines. Unknown labels fold into [`Self::Other`]
/// rather than failing, because cuisine is descriptive metadata.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CuisineType {
	Chinese,
	Japanese,
	Italian,
	Mexican,
	Indian,
	Thai,
	Korean,
	French,
	American,
	Mediterranean,
	MiddleEastern,
	#[default]
	Other,
}
impl CuisineType {
	pub const ALL: [Self; 12] = [
		Self::Chinese,
		Self::Japanese,
		Self::Italian,
		Self::Mexican,
		Self::Indian,
		Self::Thai,
		Self::Korean,
		Self::French,
		Self::American,
		Self::Mediterranean,
		Self::MiddleEastern,
		Self::Other,
	];

	pub fn parse(value: &str) -> Self {
		match value.trim().to_uppercase().as_str() {
			"CHINESE" => Self::Chinese,
			"JAPANESE" => Self::Japanese,
			"ITALIAN" => Self::Italian,
			"MEXICAN" => Self::Mexican,
			"INDIAN" => Self::Indian,
			"THAI" => Self::Thai,
			"KOREAN" => Self::Korean,
			"FRENCH" => Self::French,
			"AMERICAN" => Self::American,
			"MEDITERRANEAN" => Self::Mediterranean,
			"MIDDLE_EASTERN" => Self::MiddleEastern,
			_ => Self::Other,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Chinese => "CHINESE",
			Self::Japanese => "JAPANESE",
			Self::Italian => "ITALIAN",
			Self::Mexican => "MEXICAN",
			Self::Indian => "INDIAN",
			Self::Thai => "THAI",
			Self::Korean => "KOREAN",
			Self::French => "FRENCH",
			Self::American => "AMERICAN",
			Self::Mediterranean => "MEDITERRANEAN",
			Self::MiddleEastern => "MIDDLE_EASTERN",
			Self::Other => "OTHER",
		}
	}

	pub fn display_name(&self) -> &'static str {
		match self {
			Self::Chinese => "Chinese",
			Self::Japanese => "Japanese",
			Self::Italian => "Italian",
			Self::Mexican => "Mexican",
			Self::Indian => "Indian",
			Self::Thai => "Thai",
			Self::Korean => "Korean",
			Self::French => "French",
			Self::American => "American",
			Self::Mediterranean => "Mediterranean",
			Self::MiddleEastern => "Middle Eastern",
			Self::Other => "Other",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unknown_labels_fold_to_other() {
		assert_eq!(CuisineType::parse("MARTIAN"), CuisineType::Other);
		assert_eq!(CuisineType::parse(""), CuisineType::Other);
	}

	#[test]
	fn parse_is_case_insensitive_and_round_trips() {
		for cuisine in CuisineType::ALL {
			assert_eq!(CuisineType::parse(cuisine.as_str()), cuisine);
		}

		assert_eq!(CuisineType::parse("middle_eastern"), CuisineType::MiddleEastern);
	}

	#[test]
	fn serializes_as_screaming_snake_case() {
		let json = serde_json::to_string(&CuisineType::MiddleEastern).unwrap();

		assert_eq!(json, "\"MIDDLE_EASTERN\"");
	}
}
