//! Database models for recipes, ingredient lines, and sub-recipe links.

use crate::types::{IngredientId, RecipeId, SubRecipeLinkId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Database representation of a recipe.
///
/// `cost_price` is a cache of the last computed cost per portion. It may be
/// stale or absent; the costing engine is the only writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub yield_quantity: f64,
    pub yield_unit: String,
    pub is_prep_recipe: bool,
    pub cost_price: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One ingredient line of a recipe, with the ingredient name resolved via join.
///
/// `unit` is free text and must be convertible to `base_unit` for the line to
/// be costable. `unit_price` is the cost per unit of `base_unit`; not all
/// prices are known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecipeIngredientLine {
    pub id: Uuid,
    pub recipe_id: RecipeId,
    pub ingredient_id: IngredientId,
    pub ingredient_name: String,
    pub quantity: f64,
    pub unit: String,
    pub base_unit: Option<String>,
    pub unit_price: Option<f64>,
    pub sort_order: i32,
}

/// A directed edge from a parent recipe to a child recipe.
///
/// The recipe graph is a general directed graph: multiple parents may link the
/// same child, and cycles can exist in stored data. The costing engine guards
/// against them at traversal time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SubRecipeLink {
    pub id: SubRecipeLinkId,
    pub parent_recipe_id: RecipeId,
    pub child_recipe_id: RecipeId,
    pub quantity: f64,
    pub unit: SubRecipeUnit,
    pub position: i32,
}

/// How a sub-recipe quantity is denominated on a link.
///
/// The set is closed: the database column is the `sub_recipe_unit` enum type,
/// so stored data can never carry an unrecognized unit. Serialized names are
/// the lowercase variant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "sub_recipe_unit", rename_all = "lowercase")]
pub enum SubRecipeUnit {
    Portion,
    Batch,
    G,
    Ml,
}
