use std::collections::HashSet;

use serde::Serialize;

use crate::{Error, LarderService, Result};
use larder_storage::queries;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PantryItem {
	pub name: String,
	pub quantity: i32,
	pub sort_order: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct PantryView {
	pub supplies: Vec<PantryItem>,
}

impl LarderService {
	pub async fn pantry_view(&self) -> Result<PantryView> {
		let supplies = queries::list_supplies(&self.db.pool)
			.await?
			.into_iter()
			.map(|supply| PantryItem {
				name: supply.name,
				quantity: supply.quantity,
				sort_order: supply.sort_order,
			})
			.collect();

		Ok(PantryView { supplies })
	}

	/// Restock: quantities accumulate onto an existing row.
	pub async fn add_pantry_item(&self, name: &str, count: i32) -> Result<()> {
		let name = required_item_name(name)?;

		if count < 1 {
			return Err(Error::InvalidArgument {
				message: "Count must be at least 1.".to_string(),
			});
		}

		let mut tx = self.db.pool.begin().await?;

		queries::upsert_food_item(&mut *tx, &name).await?;
		queries::add_supply(&mut *tx, &name, count).await?;

		tx.commit().await?;

		Ok(())
	}

	pub async fn set_pantry_item_count(&self, name: &str, count: i32) -> Result<()> {
		let name = required_item_name(name)?;

		if count < 1 {
			return Err(Error::InvalidArgument {
				message: "Count must be at least 1.".to_string(),
			});
		}
		if queries::set_supply_quantity(&self.db.pool, &name, count).await? == 0 {
			return Err(Error::NotFound { message: format!("Item not found: {name}") });
		}

		Ok(())
	}

	/// Replace the whole pantry. Every new item starts at quantity 1.
	pub async fn replace_pantry(&self, supplies: &[String]) -> Result<()> {
		let mut seen = HashSet::new();
		let mut deduped = Vec::new();

		for supply in supplies {
			let trimmed = supply.trim();

			if !trimmed.is_empty() && seen.insert(trimmed.to_string()) {
				deduped.push(trimmed.to_string());
			}
		}

		let mut tx = self.db.pool.begin().await?;

		queries::clear_supplies(&mut *tx).await?;

		for supply in &deduped {
			queries::upsert_food_item(&mut *tx, supply).await?;
			queries::add_supply(&mut *tx, supply, 1).await?;
		}

		tx.commit().await?;

		Ok(())
	}

	/// Assign `sort_order` from list position. Unlisted items keep theirs.
	pub async fn reorder_pantry(&self, items: &[String]) -> Result<()> {
		if items.is_empty() {
			return Err(Error::InvalidArgument {
				message: "items list is required.".to_string(),
			});
		}

		let mut tx = self.db.pool.begin().await?;

		for (position, item) in items.iter().enumerate() {
			queries::set_supply_order(&mut *tx, item, position as i32).await?;
		}

		tx.commit().await?;

		Ok(())
	}

	pub async fn remove_pantry_item(&self, name: &str) -> Result<()> {
		let name = required_item_name(name)?;

		if queries::delete_supply(&self.db.pool, &name).await? == 0 {
			return Err(Error::NotFound { message: format!("Item not found: {name}") });
		}

		Ok(())
	}
}

fn required_item_name(name: &str) -> Result<String> {
	let trimmed = name.trim();

	if trimmed.is_empty() {
		return Err(Error::InvalidArgument { message: "Item name is required.".to_string() });
	}

	Ok(trimmed.to_string())
}
