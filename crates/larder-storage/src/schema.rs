pub fn render_schema() -> String {
	let init = include_str!("../../../sql/init.sql");

	expand_includes(init)
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_food_items.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_food_items.sql")),
				"tables/002_recipe_dependencies.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_recipe_dependencies.sql")),
				"tables/003_recipe_details.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_recipe_details.sql")),
				"tables/004_supplies.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_supplies.sql")),
				"tables/005_ingredient_aliases.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_ingredient_aliases.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn expands_all_table_includes() {
		let sql = render_schema();

		for table in [
			"food_items",
			"recipe_dependencies",
			"recipe_details",
			"supplies",
			"ingredient_aliases",
		] {
			assert!(
				sql.contains(&format!("CREATE TABLE IF NOT EXISTS {table}")),
				"Missing table {table}"
			);
		}

		assert!(!sql.contains("\\ir"));
	}
}
