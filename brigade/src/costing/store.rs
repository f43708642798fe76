//! Storage seam consumed by the costing engine.
//!
//! The engine never talks to the database directly; it goes through this
//! trait so it can be driven by the Postgres repository in production and by
//! an in-memory store in tests.

use crate::db::errors::Result;
use crate::db::models::recipes::{Recipe, RecipeIngredientLine, SubRecipeLink};
use crate::types::RecipeId;
use chrono::{DateTime, Utc};

/// Read/write access required to cost a recipe.
///
/// Ordering contracts: `ingredient_lines` returns lines in display/costing
/// order (stable across calls), and `sub_recipe_links` returns links ordered
/// by their position field. The engine iterates both as returned and never
/// re-sorts.
#[async_trait::async_trait]
pub trait CostingStore {
    /// Fetch a recipe by id, or `None` if it does not exist
    async fn recipe(&mut self, id: RecipeId) -> Result<Option<Recipe>>;

    /// Fetch the ordered ingredient lines of a recipe
    async fn ingredient_lines(&mut self, recipe_id: RecipeId) -> Result<Vec<RecipeIngredientLine>>;

    /// Fetch the ordered sub-recipe links of a parent recipe
    async fn sub_recipe_links(&mut self, parent_id: RecipeId) -> Result<Vec<SubRecipeLink>>;

    /// Overwrite the recipe's cached cost per portion and modification
    /// timestamp. Returns the updated recipe, or `None` if it does not exist.
    async fn save_recipe_cost(
        &mut self,
        id: RecipeId,
        cost_per_portion: f64,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Recipe>>;
}
