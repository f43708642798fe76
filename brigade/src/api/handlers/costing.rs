//! HTTP handlers for recipe costing endpoints.

use crate::{
    AppState,
    api::models::recipes::RecipeResponse,
    costing::{CostingEngine, CostingResult, SnapshotOutcome},
    db::handlers::Recipes,
    errors::{Error, Result},
    types::RecipeId,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

/// Compute the full cost breakdown for a recipe
#[utoipa::path(
    get,
    path = "/recipes/{id}/costing",
    tag = "costing",
    summary = "Compute a recipe's cost breakdown",
    description = "Recursively cost a recipe, including sub-recipes. Components whose cost cannot \
                   be determined are listed in `missing_costs`; the batch total is only present \
                   when every component resolved.",
    params(
        ("id" = String, Path, format = "uuid", description = "Recipe ID"),
    ),
    responses(
        (status = 200, description = "Cost breakdown", body = CostingResult),
        (status = 404, description = "Recipe not found"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all, fields(recipe_id = %recipe_id))]
pub async fn get_recipe_costing(State(state): State<AppState>, Path(recipe_id): Path<RecipeId>) -> Result<Json<CostingResult>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Recipes::new(&mut conn);

    let mut engine = CostingEngine::new(&mut repo).with_max_depth(state.config.costing.max_depth);
    match engine.cost_recipe(recipe_id).await? {
        Some(result) => Ok(Json(result)),
        None => Err(Error::NotFound {
            resource: "Recipe".to_string(),
            id: recipe_id.to_string(),
        }),
    }
}

/// Compute and persist a recipe's cost-per-portion snapshot
#[utoipa::path(
    post,
    path = "/recipes/{id}/costing/snapshot",
    tag = "costing",
    summary = "Persist a recipe's cost snapshot",
    description = "Recompute the recipe's cost and cache the cost per portion on the recipe. \
                   Nothing is written when the cost cannot be fully resolved; the response then \
                   lists the unpriced components.",
    params(
        ("id" = String, Path, format = "uuid", description = "Recipe ID"),
    ),
    responses(
        (status = 200, description = "Snapshot persisted", body = RecipeResponse),
        (status = 404, description = "Recipe not found"),
        (status = 422, description = "Cost could not be resolved; nothing written"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all, fields(recipe_id = %recipe_id))]
pub async fn snapshot_recipe_cost(
    State(state): State<AppState>,
    Path(recipe_id): Path<RecipeId>,
) -> Result<(StatusCode, Json<RecipeResponse>)> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Recipes::new(&mut conn);

    let mut engine = CostingEngine::new(&mut repo).with_max_depth(state.config.costing.max_depth);
    match engine.persist_snapshot(recipe_id).await? {
        SnapshotOutcome::Saved(recipe) => Ok((StatusCode::OK, Json(RecipeResponse::from(recipe)))),
        SnapshotOutcome::RecipeNotFound => Err(Error::NotFound {
            resource: "Recipe".to_string(),
            id: recipe_id.to_string(),
        }),
        SnapshotOutcome::Unresolved { missing_costs } => Err(Error::UnresolvedCost { recipe_id, missing_costs }),
    }
}
