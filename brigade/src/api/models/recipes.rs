//! API models for recipe resources.

use crate::db::models::recipes::Recipe;
use crate::types::RecipeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Recipe as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipeResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: RecipeId,
    pub name: String,
    pub yield_quantity: f64,
    pub yield_unit: String,
    pub is_prep_recipe: bool,
    /// Cached cost per portion from the last persisted snapshot; may be stale
    /// or absent
    pub cost_price: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            yield_quantity: recipe.yield_quantity,
            yield_unit: recipe.yield_unit,
            is_prep_recipe: recipe.is_prep_recipe,
            cost_price: recipe.cost_price,
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        }
    }
}
