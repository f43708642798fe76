//! OpenAPI documentation for the costing API.
//!
//! The assembled document is served at `/api-docs/openapi.json`.

use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    servers(
        (url = "/api/v1", description = "Recipe costing API")
    ),
    paths(
        api::handlers::costing::get_recipe_costing,
        api::handlers::costing::snapshot_recipe_cost,
    ),
    components(
        schemas(
            crate::api::models::recipes::RecipeResponse,
            crate::costing::CostingResult,
            crate::costing::CostBreakdownItem,
            crate::costing::SubRecipeCostItem,
            crate::db::models::recipes::SubRecipeUnit,
        )
    ),
    info(
        title = "Brigade Costing API",
        version = "0.1.0",
        description = "Recipe cost computation and snapshot persistence.

## Costing

`GET /recipes/{id}/costing` walks the recipe's ingredient lines and sub-recipes
recursively and returns a full cost breakdown. Components that cannot be priced
are listed in `missing_costs`; the batch total and per-portion cost are only
present when every component resolved.

## Snapshots

`POST /recipes/{id}/costing/snapshot` recomputes the cost and caches the
per-portion value on the recipe. When the cost cannot be fully resolved the
request fails with `422` and nothing is written.",
    ),
)]
pub struct ApiDoc;
