//! Test fixtures: an in-memory [`CostingStore`] so the costing engine can be
//! exercised without a database.

use crate::costing::store::CostingStore;
use crate::db::errors::Result;
use crate::db::models::recipes::{Recipe, RecipeIngredientLine, SubRecipeLink, SubRecipeUnit};
use crate::types::{RecipeId, SubRecipeLinkId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory recipe graph. Lines and links keep insertion order, which stands
/// in for the repository's `sort_order`/`position` ordering.
#[derive(Debug, Default)]
pub struct InMemoryCostingStore {
    recipes: HashMap<RecipeId, Recipe>,
    lines: HashMap<RecipeId, Vec<RecipeIngredientLine>>,
    links: HashMap<RecipeId, Vec<SubRecipeLink>>,
    /// Every snapshot write the store has seen, in order
    pub saved_costs: Vec<(RecipeId, f64)>,
}

impl InMemoryCostingStore {
    pub fn add_recipe(&mut self, name: &str, yield_quantity: f64, yield_unit: &str) -> RecipeId {
        let id = Uuid::new_v4();
        let now = Utc::now();
        self.recipes.insert(
            id,
            Recipe {
                id,
                name: name.to_string(),
                yield_quantity,
                yield_unit: yield_unit.to_string(),
                is_prep_recipe: false,
                cost_price: None,
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    pub fn add_ingredient_line(
        &mut self,
        recipe_id: RecipeId,
        ingredient_name: &str,
        quantity: f64,
        unit: &str,
        base_unit: Option<&str>,
        unit_price: Option<f64>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let lines = self.lines.entry(recipe_id).or_default();
        lines.push(RecipeIngredientLine {
            id,
            recipe_id,
            ingredient_id: Uuid::new_v4(),
            ingredient_name: ingredient_name.to_string(),
            quantity,
            unit: unit.to_string(),
            base_unit: base_unit.map(|s| s.to_string()),
            unit_price,
            sort_order: lines.len() as i32,
        });
        id
    }

    pub fn link_sub_recipe(
        &mut self,
        parent_id: RecipeId,
        child_id: RecipeId,
        quantity: f64,
        unit: SubRecipeUnit,
    ) -> SubRecipeLinkId {
        assert!(self.recipes.contains_key(&child_id), "child recipe must exist; use link_dangling_sub_recipe");
        self.push_link(parent_id, child_id, quantity, unit)
    }

    /// Link to a child id with no backing recipe, for missing-child scenarios
    pub fn link_dangling_sub_recipe(
        &mut self,
        parent_id: RecipeId,
        child_id: RecipeId,
        quantity: f64,
        unit: SubRecipeUnit,
    ) -> SubRecipeLinkId {
        self.push_link(parent_id, child_id, quantity, unit)
    }

    fn push_link(&mut self, parent_id: RecipeId, child_id: RecipeId, quantity: f64, unit: SubRecipeUnit) -> SubRecipeLinkId {
        let id = Uuid::new_v4();
        let links = self.links.entry(parent_id).or_default();
        links.push(SubRecipeLink {
            id,
            parent_recipe_id: parent_id,
            child_recipe_id: child_id,
            quantity,
            unit,
            position: links.len() as i32,
        });
        id
    }
}

#[async_trait::async_trait]
impl CostingStore for InMemoryCostingStore {
    async fn recipe(&mut self, id: RecipeId) -> Result<Option<Recipe>> {
        Ok(self.recipes.get(&id).cloned())
    }

    async fn ingredient_lines(&mut self, recipe_id: RecipeId) -> Result<Vec<RecipeIngredientLine>> {
        Ok(self.lines.get(&recipe_id).cloned().unwrap_or_default())
    }

    async fn sub_recipe_links(&mut self, parent_id: RecipeId) -> Result<Vec<SubRecipeLink>> {
        Ok(self.links.get(&parent_id).cloned().unwrap_or_default())
    }

    async fn save_recipe_cost(
        &mut self,
        id: RecipeId,
        cost_per_portion: f64,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Recipe>> {
        let Some(recipe) = self.recipes.get_mut(&id) else {
            return Ok(None);
        };
        recipe.cost_price = Some(cost_per_portion);
        recipe.updated_at = updated_at;
        self.saved_costs.push((id, cost_per_portion));
        Ok(Some(recipe.clone()))
    }
}
