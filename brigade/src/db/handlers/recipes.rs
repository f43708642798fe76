//! Database repository for recipes and their costing inputs.

use crate::{
    costing::store::CostingStore,
    db::{
        errors::Result,
        models::recipes::{Recipe, RecipeIngredientLine, SubRecipeLink},
    },
    types::RecipeId,
};
use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use tracing::instrument;

const RECIPE_COLUMNS: &str = "id, name, yield_quantity, yield_unit, is_prep_recipe, cost_price, created_at, updated_at";

pub struct Recipes<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Recipes<'c> {
    /// Create a new Recipes repository instance
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Get a recipe by ID
    #[instrument(skip(self), err)]
    pub async fn get_by_id(&mut self, id: RecipeId) -> Result<Option<Recipe>> {
        let recipe = sqlx::query_as::<_, Recipe>(&format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(recipe)
    }

    /// List the ingredient lines of a recipe in display/costing order, with
    /// the ingredient name resolved via join
    #[instrument(skip(self), err)]
    pub async fn list_ingredient_lines(&mut self, recipe_id: RecipeId) -> Result<Vec<RecipeIngredientLine>> {
        let lines = sqlx::query_as::<_, RecipeIngredientLine>(
            r#"
            SELECT ri.id, ri.recipe_id, ri.ingredient_id, i.name AS ingredient_name,
                   ri.quantity, ri.unit, ri.base_unit, ri.unit_price, ri.sort_order
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = $1
            ORDER BY ri.sort_order
            "#,
        )
        .bind(recipe_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(lines)
    }

    /// List the sub-recipe links of a parent recipe, ordered by position
    #[instrument(skip(self), err)]
    pub async fn list_sub_recipe_links(&mut self, parent_id: RecipeId) -> Result<Vec<SubRecipeLink>> {
        let links = sqlx::query_as::<_, SubRecipeLink>(
            r#"
            SELECT id, parent_recipe_id, child_recipe_id, quantity, unit, position
            FROM recipe_sub_recipes
            WHERE parent_recipe_id = $1
            ORDER BY position
            "#,
        )
        .bind(parent_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(links)
    }

    /// Overwrite the cached cost per portion and the modification timestamp.
    /// This is the only mutation the costing engine performs.
    #[instrument(skip(self), err)]
    pub async fn update_cost_price(
        &mut self,
        id: RecipeId,
        cost_per_portion: f64,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Recipe>> {
        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            "UPDATE recipes SET cost_price = $2, updated_at = $3 WHERE id = $1 RETURNING {RECIPE_COLUMNS}"
        ))
        .bind(id)
        .bind(cost_per_portion)
        .bind(updated_at)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(recipe)
    }
}

#[async_trait::async_trait]
impl CostingStore for Recipes<'_> {
    async fn recipe(&mut self, id: RecipeId) -> Result<Option<Recipe>> {
        self.get_by_id(id).await
    }

    async fn ingredient_lines(&mut self, recipe_id: RecipeId) -> Result<Vec<RecipeIngredientLine>> {
        self.list_ingredient_lines(recipe_id).await
    }

    async fn sub_recipe_links(&mut self, parent_id: RecipeId) -> Result<Vec<SubRecipeLink>> {
        self.list_sub_recipe_links(parent_id).await
    }

    async fn save_recipe_cost(
        &mut self,
        id: RecipeId,
        cost_per_portion: f64,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Recipe>> {
        self.update_cost_price(id, cost_per_portion, updated_at).await
    }
}
