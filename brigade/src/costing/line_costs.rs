//! Per-line cost arithmetic for ingredient lines and sub-recipe links.
//!
//! Every rule here returns `Option<f64>`: `None` means the cost is
//! indeterminate, never zero. Callers record indeterminate lines in the
//! result's `missing_costs` and exclude them from subtotals.

use crate::db::models::recipes::SubRecipeUnit;

/// Cost of one ingredient line: quantity converted to the base unit times the
/// unit price (cost per base unit). Indeterminate when the conversion failed
/// or the price is unknown.
pub fn ingredient_line_cost(quantity_in_base_unit: Option<f64>, unit_price: Option<f64>) -> Option<f64> {
    Some(quantity_in_base_unit? * unit_price?)
}

/// Cost of one sub-recipe link, given the child's computed costs.
///
/// - `portion`: quantity x child cost per portion
/// - `batch`: quantity x child batch cost
/// - `g`/`ml`: the requested amount is treated as a fraction of one full
///   batch, with the child's yield quantity as the batch-defining
///   denominator. The yield is assumed to be denominated in the link's unit;
///   this is not verified against the child's yield unit (see the costing
///   module docs).
///
/// A missing child cost, or a missing/non-positive yield where required,
/// makes the line indeterminate.
pub fn sub_recipe_line_cost(
    unit: SubRecipeUnit,
    quantity: f64,
    child_batch_cost: Option<f64>,
    child_portion_cost: Option<f64>,
    child_yield_quantity: f64,
) -> Option<f64> {
    match unit {
        SubRecipeUnit::Portion => Some(quantity * child_portion_cost?),
        SubRecipeUnit::Batch => Some(quantity * child_batch_cost?),
        SubRecipeUnit::G | SubRecipeUnit::Ml => {
            if child_yield_quantity > 0.0 {
                Some(quantity / child_yield_quantity * child_batch_cost?)
            } else {
                None
            }
        }
    }
}
