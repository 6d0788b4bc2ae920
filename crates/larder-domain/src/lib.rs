pub mod cache_key;
pub mod cookability;
pub mod cuisine;
pub mod keywords;
pub mod recipe_text;
pub mod sparse;

pub use self::{
	cookability::{almost_cookable, cookable_recipes, missing_ingredients, AlmostCookable},
	cuisine::CuisineType,
	sparse::SparseVector,
};
