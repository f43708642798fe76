//! Reporting records produced by the costing engine.

use crate::db::models::recipes::SubRecipeUnit;
use crate::types::{IngredientId, RecipeId, SubRecipeLinkId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One ingredient line of a cost breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CostBreakdownItem {
    #[schema(value_type = String, format = "uuid")]
    pub ingredient_id: IngredientId,
    pub ingredient_name: String,
    /// Quantity as entered on the line
    pub quantity: f64,
    /// Unit as entered on the line
    pub unit: String,
    /// Quantity converted to the base unit, or the original quantity when the
    /// conversion failed
    pub quantity_in_base_unit: f64,
    pub base_unit: Option<String>,
    pub cost_per_base_unit: Option<f64>,
    /// `None` when the line cost is indeterminate
    pub line_cost: Option<f64>,
}

/// One sub-recipe link of a cost breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubRecipeCostItem {
    #[schema(value_type = String, format = "uuid")]
    pub link_id: SubRecipeLinkId,
    #[schema(value_type = String, format = "uuid")]
    pub recipe_id: RecipeId,
    pub recipe_name: String,
    pub quantity: f64,
    pub unit: SubRecipeUnit,
    /// The child's total batch cost, when it could be computed
    pub sub_recipe_batch_cost: Option<f64>,
    /// The child's cost per portion, when it could be computed
    pub sub_recipe_portion_cost: Option<f64>,
    /// `None` when the line cost is indeterminate
    pub line_cost: Option<f64>,
}

/// Full cost breakdown for one recipe.
///
/// Invariants: `total_batch_cost` is present iff `missing_costs` is empty,
/// and `cost_per_portion` is present only when `total_batch_cost` is present
/// and the yield quantity is strictly positive. A recipe with even one
/// unpriced component has an explicitly unknown batch cost, not a partial one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CostingResult {
    #[schema(value_type = String, format = "uuid")]
    pub recipe_id: RecipeId,
    pub recipe_name: String,
    pub yield_quantity: f64,
    pub yield_unit: String,
    pub breakdown: Vec<CostBreakdownItem>,
    pub sub_recipe_breakdown: Vec<SubRecipeCostItem>,
    /// Sum of the determinate ingredient line costs
    pub ingredient_cost: f64,
    /// Sum of the determinate sub-recipe line costs
    pub sub_recipe_cost: f64,
    pub total_batch_cost: Option<f64>,
    pub cost_per_portion: Option<f64>,
    /// Human-readable names of every component whose cost is indeterminate
    pub missing_costs: Vec<String>,
}
