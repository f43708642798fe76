//! Recursive cost computation over the recipe graph.
//!
//! [`CostingEngine`] walks one recipe's ingredient lines and sub-recipe
//! links, recursing into children sequentially and in stored order. Two
//! guards bound the recursion: a depth limit, and a set of recipe ids
//! currently being costed on the active call stack. The guard set is threaded
//! by mutable reference down every recursive call and is fresh per top-level
//! invocation, so diamond-shaped sharing is allowed while true cycles degrade
//! to an indeterminate branch.
//!
//! Every failure inside the graph is local and non-fatal: a missing child, a
//! failed unit conversion, an unpriced ingredient, a cycle, or the depth
//! limit all surface as entries in `missing_costs` while sibling computations
//! proceed. Only the top-level recipe being absent aborts the call.

use crate::costing::line_costs::{ingredient_line_cost, sub_recipe_line_cost};
use crate::costing::results::{CostBreakdownItem, CostingResult, SubRecipeCostItem};
use crate::costing::store::CostingStore;
use crate::costing::units::convert_to_base_unit;
use crate::db::models::recipes::Recipe;
use crate::errors::Result;
use crate::types::{RecipeId, abbrev_uuid};
use chrono::Utc;
use futures::future::BoxFuture;
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

/// Default bound on sub-recipe nesting. Branches deeper than this are treated
/// as indeterminate rather than costed.
pub const DEFAULT_MAX_DEPTH: u32 = 20;

/// Outcome of persisting a cost snapshot.
#[derive(Debug, PartialEq)]
pub enum SnapshotOutcome {
    /// The cost per portion was written to the recipe's cache field
    Saved(Recipe),
    /// The recipe does not exist
    RecipeNotFound,
    /// The cost per portion could not be resolved; nothing was written
    Unresolved { missing_costs: Vec<String> },
}

/// The costing engine. One instance per computation; it borrows its store for
/// the duration so concurrent top-level computations never share guard state.
pub struct CostingEngine<'s, S: CostingStore + Send + ?Sized> {
    store: &'s mut S,
    max_depth: u32,
}

impl<'s, S: CostingStore + Send + ?Sized> CostingEngine<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self {
            store,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Compute the full cost breakdown for a recipe, including sub-recipes.
    ///
    /// Returns `Ok(None)` when the recipe does not exist. The result always
    /// carries both breakdown lists for audit/display, whether or not the
    /// aggregate cost was resolvable.
    #[instrument(skip(self))]
    pub async fn cost_recipe(&mut self, recipe_id: RecipeId) -> Result<Option<CostingResult>> {
        let mut in_progress = HashSet::new();
        self.compute(recipe_id, 0, &mut in_progress).await
    }

    /// Compute the recipe's cost and persist the cost per portion to the
    /// recipe's cached cost field. No write happens unless the cost per
    /// portion resolved. Idempotent for unchanged inputs.
    #[instrument(skip(self))]
    pub async fn persist_snapshot(&mut self, recipe_id: RecipeId) -> Result<SnapshotOutcome> {
        let Some(costing) = self.cost_recipe(recipe_id).await? else {
            return Ok(SnapshotOutcome::RecipeNotFound);
        };

        let Some(cost_per_portion) = costing.cost_per_portion else {
            debug!(recipe = %abbrev_uuid(&recipe_id), "cost per portion unresolved, skipping snapshot write");
            return Ok(SnapshotOutcome::Unresolved {
                missing_costs: costing.missing_costs,
            });
        };

        match self.store.save_recipe_cost(recipe_id, cost_per_portion, Utc::now()).await? {
            Some(recipe) => Ok(SnapshotOutcome::Saved(recipe)),
            None => Ok(SnapshotOutcome::RecipeNotFound),
        }
    }

    /// Guarded recursion entry point. Boxed because the future recurses.
    fn compute<'a>(
        &'a mut self,
        recipe_id: RecipeId,
        depth: u32,
        in_progress: &'a mut HashSet<RecipeId>,
    ) -> BoxFuture<'a, Result<Option<CostingResult>>> {
        Box::pin(async move {
            if depth >= self.max_depth {
                warn!(
                    recipe = %abbrev_uuid(&recipe_id),
                    depth, "max costing depth reached, treating branch as indeterminate"
                );
                return Ok(None);
            }

            // Already being costed on an ancestor call: a cycle. The ancestor
            // owns the guard entry, so nothing to remove here.
            if !in_progress.insert(recipe_id) {
                warn!(recipe = %abbrev_uuid(&recipe_id), "cycle detected in sub-recipe graph");
                return Ok(None);
            }

            let result = self.walk(recipe_id, depth, in_progress).await;
            in_progress.remove(&recipe_id);
            result
        })
    }

    async fn walk(
        &mut self,
        recipe_id: RecipeId,
        depth: u32,
        in_progress: &mut HashSet<RecipeId>,
    ) -> Result<Option<CostingResult>> {
        let Some(recipe) = self.store.recipe(recipe_id).await? else {
            return Ok(None);
        };

        // Ingredient lines, in stored order
        let lines = self.store.ingredient_lines(recipe_id).await?;
        let mut breakdown = Vec::with_capacity(lines.len());
        let mut missing_costs = Vec::new();
        let mut ingredient_cost = 0.0;

        for line in lines {
            let quantity_in_base = line
                .base_unit
                .as_deref()
                .and_then(|base| convert_to_base_unit(line.quantity, &line.unit, base));
            let line_cost = ingredient_line_cost(quantity_in_base, line.unit_price);

            match line_cost {
                Some(cost) => ingredient_cost += cost,
                None => missing_costs.push(line.ingredient_name.clone()),
            }

            breakdown.push(CostBreakdownItem {
                ingredient_id: line.ingredient_id,
                ingredient_name: line.ingredient_name,
                quantity: line.quantity,
                unit: line.unit,
                quantity_in_base_unit: quantity_in_base.unwrap_or(line.quantity),
                base_unit: line.base_unit,
                cost_per_base_unit: line.unit_price,
                line_cost,
            });
        }

        // Sub-recipe links, in stored order, costed recursively
        let links = self.store.sub_recipe_links(recipe_id).await?;
        let mut sub_recipe_breakdown = Vec::with_capacity(links.len());
        let mut sub_recipe_cost = 0.0;

        for link in links {
            let Some(child) = self.store.recipe(link.child_recipe_id).await? else {
                missing_costs.push(format!("[Sub-recipe {}]", link.child_recipe_id));
                continue;
            };

            let child_costing = self.compute(link.child_recipe_id, depth + 1, in_progress).await?;
            let child_batch_cost = child_costing.as_ref().and_then(|c| c.total_batch_cost);
            let child_portion_cost = child_costing.as_ref().and_then(|c| c.cost_per_portion);

            let line_cost = sub_recipe_line_cost(
                link.unit,
                link.quantity,
                child_batch_cost,
                child_portion_cost,
                child.yield_quantity,
            );

            match line_cost {
                Some(cost) => sub_recipe_cost += cost,
                None => missing_costs.push(format!("[Sub-recipe: {}]", child.name)),
            }

            sub_recipe_breakdown.push(SubRecipeCostItem {
                link_id: link.id,
                recipe_id: child.id,
                recipe_name: child.name,
                quantity: link.quantity,
                unit: link.unit,
                sub_recipe_batch_cost: child_batch_cost,
                sub_recipe_portion_cost: child_portion_cost,
                line_cost,
            });
        }

        let total = ingredient_cost + sub_recipe_cost;
        let total_batch_cost = missing_costs.is_empty().then_some(total);
        let cost_per_portion = total_batch_cost
            .filter(|_| recipe.yield_quantity > 0.0)
            .map(|total| total / recipe.yield_quantity);

        debug!(
            recipe = %abbrev_uuid(&recipe_id),
            depth,
            ?total_batch_cost,
            missing = missing_costs.len(),
            "costed recipe"
        );

        Ok(Some(CostingResult {
            recipe_id: recipe.id,
            recipe_name: recipe.name,
            yield_quantity: recipe.yield_quantity,
            yield_unit: recipe.yield_unit,
            breakdown,
            sub_recipe_breakdown,
            ingredient_cost,
            sub_recipe_cost,
            total_batch_cost,
            cost_per_portion,
            missing_costs,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::recipes::SubRecipeUnit;
    use crate::test_utils::InMemoryCostingStore;
    use uuid::Uuid;

    #[test_log::test(tokio::test)]
    async fn simple_ingredient_cost() {
        let mut store = InMemoryCostingStore::default();
        let bread = store.add_recipe("Simple Bread", 2.0, "loaf");
        store.add_ingredient_line(bread, "Flour", 500.0, "g", Some("g"), Some(0.002));

        let result = CostingEngine::new(&mut store)
            .cost_recipe(bread)
            .await
            .unwrap()
            .expect("recipe exists");

        assert_eq!(result.recipe_name, "Simple Bread");
        assert_eq!(result.total_batch_cost, Some(1.0));
        assert_eq!(result.cost_per_portion, Some(0.5));
        assert_eq!(result.breakdown.len(), 1);
        assert!(result.missing_costs.is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn ingredient_cost_with_unit_conversion() {
        let mut store = InMemoryCostingStore::default();
        let mix = store.add_recipe("Sweet Mix", 1.0, "batch");
        store.add_ingredient_line(mix, "Sugar", 1.0, "kg", Some("g"), Some(0.001));

        let result = CostingEngine::new(&mut store).cost_recipe(mix).await.unwrap().unwrap();

        // 1kg converts to 1000g at 0.001 per g
        assert_eq!(result.total_batch_cost, Some(1.0));
        assert_eq!(result.breakdown[0].quantity_in_base_unit, 1000.0);
        assert_eq!(result.breakdown[0].line_cost, Some(1.0));
    }

    #[test_log::test(tokio::test)]
    async fn missing_price_makes_total_unknown() {
        let mut store = InMemoryCostingStore::default();
        let soup = store.add_recipe("Soup", 4.0, "portion");
        store.add_ingredient_line(soup, "Stock", 1000.0, "ml", Some("ml"), Some(0.0005));
        store.add_ingredient_line(soup, "Wild Garlic", 50.0, "g", Some("g"), None);

        let result = CostingEngine::new(&mut store).cost_recipe(soup).await.unwrap().unwrap();

        assert_eq!(result.missing_costs, vec!["Wild Garlic".to_string()]);
        // Priced lines still contribute to the subtotal, but the total is
        // explicitly unknown, not partial
        assert_eq!(result.ingredient_cost, 0.5);
        assert_eq!(result.total_batch_cost, None);
        assert_eq!(result.cost_per_portion, None);
        assert_eq!(result.breakdown.len(), 2);
    }

    #[test_log::test(tokio::test)]
    async fn failed_conversion_makes_line_indeterminate() {
        let mut store = InMemoryCostingStore::default();
        let cake = store.add_recipe("Cake", 8.0, "portion");
        // "cup" is not convertible to g; the breakdown keeps the original quantity
        store.add_ingredient_line(cake, "Flour", 2.0, "cup", Some("g"), Some(0.002));

        let result = CostingEngine::new(&mut store).cost_recipe(cake).await.unwrap().unwrap();

        assert_eq!(result.missing_costs, vec!["Flour".to_string()]);
        assert_eq!(result.breakdown[0].quantity_in_base_unit, 2.0);
        assert_eq!(result.breakdown[0].line_cost, None);
        assert_eq!(result.total_batch_cost, None);
    }

    #[test_log::test(tokio::test)]
    async fn sub_recipe_by_portion() {
        let mut store = InMemoryCostingStore::default();
        let sauce = store.add_recipe("Tomato Sauce", 2.0, "portion");
        store.add_ingredient_line(sauce, "Tomatoes", 500.0, "g", Some("g"), Some(0.002));
        let pasta = store.add_recipe("Pasta Dish", 1.0, "portion");
        store.link_sub_recipe(pasta, sauce, 3.0, SubRecipeUnit::Portion);

        let result = CostingEngine::new(&mut store).cost_recipe(pasta).await.unwrap().unwrap();

        // Child: batch 1.0, per portion 0.5; 3 portions -> 1.5
        let item = &result.sub_recipe_breakdown[0];
        assert_eq!(item.sub_recipe_batch_cost, Some(1.0));
        assert_eq!(item.sub_recipe_portion_cost, Some(0.5));
        assert_eq!(item.line_cost, Some(1.5));
        assert_eq!(result.total_batch_cost, Some(1.5));
    }

    #[test_log::test(tokio::test)]
    async fn sub_recipe_by_batch_and_weight() {
        let mut store = InMemoryCostingStore::default();
        let stock = store.add_recipe("Brown Stock", 1000.0, "ml");
        store.add_ingredient_line(stock, "Bones", 2.0, "kg", Some("g"), Some(0.002));
        let jus = store.add_recipe("Jus", 4.0, "portion");
        store.link_sub_recipe(jus, stock, 250.0, SubRecipeUnit::Ml);
        let banquet = store.add_recipe("Banquet Prep", 1.0, "batch");
        store.link_sub_recipe(banquet, stock, 2.0, SubRecipeUnit::Batch);

        let jus_result = CostingEngine::new(&mut store).cost_recipe(jus).await.unwrap().unwrap();
        // 250ml of a 1000-yield batch costing 4.0 -> 1.0
        assert_eq!(jus_result.sub_recipe_breakdown[0].line_cost, Some(1.0));
        assert_eq!(jus_result.total_batch_cost, Some(1.0));
        assert_eq!(jus_result.cost_per_portion, Some(0.25));

        let banquet_result = CostingEngine::new(&mut store).cost_recipe(banquet).await.unwrap().unwrap();
        assert_eq!(banquet_result.sub_recipe_breakdown[0].line_cost, Some(8.0));
    }

    #[test_log::test(tokio::test)]
    async fn missing_child_recipe_degrades_to_missing_cost() {
        let mut store = InMemoryCostingStore::default();
        let parent = store.add_recipe("Parent", 1.0, "portion");
        let ghost = Uuid::new_v4();
        store.link_dangling_sub_recipe(parent, ghost, 1.0, SubRecipeUnit::Portion);

        let result = CostingEngine::new(&mut store).cost_recipe(parent).await.unwrap().unwrap();

        assert_eq!(result.missing_costs, vec![format!("[Sub-recipe {ghost}]")]);
        assert!(result.sub_recipe_breakdown.is_empty());
        assert_eq!(result.total_batch_cost, None);
    }

    #[test_log::test(tokio::test)]
    async fn top_level_recipe_not_found() {
        let mut store = InMemoryCostingStore::default();
        let result = CostingEngine::new(&mut store).cost_recipe(Uuid::new_v4()).await.unwrap();
        assert!(result.is_none());
    }

    #[test_log::test(tokio::test)]
    async fn two_node_cycle_terminates() {
        let mut store = InMemoryCostingStore::default();
        let a = store.add_recipe("A", 1.0, "portion");
        let b = store.add_recipe("B", 1.0, "portion");
        store.link_sub_recipe(a, b, 1.0, SubRecipeUnit::Portion);
        store.link_sub_recipe(b, a, 1.0, SubRecipeUnit::Portion);

        let result = CostingEngine::new(&mut store).cost_recipe(a).await.unwrap().unwrap();

        // B could not be costed because costing it revisits A
        assert_eq!(result.missing_costs, vec!["[Sub-recipe: B]".to_string()]);
        assert_eq!(result.total_batch_cost, None);
    }

    #[test_log::test(tokio::test)]
    async fn self_cycle_terminates() {
        let mut store = InMemoryCostingStore::default();
        let a = store.add_recipe("Ouroboros", 1.0, "portion");
        store.link_sub_recipe(a, a, 1.0, SubRecipeUnit::Portion);

        let result = CostingEngine::new(&mut store).cost_recipe(a).await.unwrap().unwrap();

        assert_eq!(result.missing_costs, vec!["[Sub-recipe: Ouroboros]".to_string()]);
        assert_eq!(result.total_batch_cost, None);
    }

    #[test_log::test(tokio::test)]
    async fn diamond_sharing_is_not_a_cycle() {
        let mut store = InMemoryCostingStore::default();
        let base = store.add_recipe("Base", 1.0, "portion");
        store.add_ingredient_line(base, "Butter", 100.0, "g", Some("g"), Some(0.01));
        let left = store.add_recipe("Left", 1.0, "portion");
        store.link_sub_recipe(left, base, 1.0, SubRecipeUnit::Portion);
        let right = store.add_recipe("Right", 1.0, "portion");
        store.link_sub_recipe(right, base, 1.0, SubRecipeUnit::Portion);
        let top = store.add_recipe("Top", 1.0, "portion");
        store.link_sub_recipe(top, left, 1.0, SubRecipeUnit::Portion);
        store.link_sub_recipe(top, right, 1.0, SubRecipeUnit::Portion);

        let result = CostingEngine::new(&mut store).cost_recipe(top).await.unwrap().unwrap();

        // The shared base is costed once per incoming edge, and both resolve
        assert!(result.missing_costs.is_empty());
        assert_eq!(result.total_batch_cost, Some(2.0));
    }

    #[test_log::test(tokio::test)]
    async fn depth_limit_bounds_linear_chains() {
        let max_depth = 5;
        let mut store = InMemoryCostingStore::default();

        // A chain max_depth + 5 deep; the tail has the only priced ingredient
        let mut chain = vec![store.add_recipe("Link 0", 1.0, "portion")];
        for i in 1..(max_depth + 5) {
            let id = store.add_recipe(&format!("Link {i}"), 1.0, "portion");
            store.link_sub_recipe(chain[i - 1], id, 1.0, SubRecipeUnit::Portion);
            chain.push(id);
        }
        let tail = *chain.last().unwrap();
        store.add_ingredient_line(tail, "Salt", 10.0, "g", Some("g"), Some(0.001));

        let result = CostingEngine::new(&mut store)
            .with_max_depth(max_depth as u32)
            .cost_recipe(chain[0])
            .await
            .unwrap()
            .unwrap();

        // The limit is hit before the priced tail, so the cost never resolves
        assert_eq!(result.total_batch_cost, None);
        assert!(!result.missing_costs.is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn non_positive_yield_blocks_cost_per_portion() {
        let mut store = InMemoryCostingStore::default();
        let recipe = store.add_recipe("Zero Yield", 0.0, "portion");
        store.add_ingredient_line(recipe, "Flour", 500.0, "g", Some("g"), Some(0.002));

        let result = CostingEngine::new(&mut store).cost_recipe(recipe).await.unwrap().unwrap();

        assert_eq!(result.total_batch_cost, Some(1.0));
        assert_eq!(result.cost_per_portion, None);
    }

    #[test_log::test(tokio::test)]
    async fn costing_is_idempotent() {
        let mut store = InMemoryCostingStore::default();
        let sauce = store.add_recipe("Sauce", 2.0, "portion");
        store.add_ingredient_line(sauce, "Tomatoes", 500.0, "g", Some("g"), Some(0.002));
        let dish = store.add_recipe("Dish", 4.0, "portion");
        store.add_ingredient_line(dish, "Pasta", 1.0, "kg", Some("g"), Some(0.001));
        store.link_sub_recipe(dish, sauce, 2.0, SubRecipeUnit::Portion);

        let first = CostingEngine::new(&mut store).cost_recipe(dish).await.unwrap().unwrap();
        let second = CostingEngine::new(&mut store).cost_recipe(dish).await.unwrap().unwrap();

        assert_eq!(first, second);
    }

    #[test_log::test(tokio::test)]
    async fn snapshot_persists_resolved_cost() {
        let mut store = InMemoryCostingStore::default();
        let bread = store.add_recipe("Bread", 2.0, "loaf");
        store.add_ingredient_line(bread, "Flour", 500.0, "g", Some("g"), Some(0.002));

        let outcome = CostingEngine::new(&mut store).persist_snapshot(bread).await.unwrap();

        let SnapshotOutcome::Saved(recipe) = outcome else {
            panic!("expected a saved snapshot, got {outcome:?}");
        };
        assert_eq!(recipe.cost_price, Some(0.5));
        assert_eq!(store.saved_costs, vec![(bread, 0.5)]);

        // Unchanged inputs produce the same stored value
        let outcome = CostingEngine::new(&mut store).persist_snapshot(bread).await.unwrap();
        let SnapshotOutcome::Saved(recipe) = outcome else {
            panic!("expected a saved snapshot");
        };
        assert_eq!(recipe.cost_price, Some(0.5));
    }

    #[test_log::test(tokio::test)]
    async fn snapshot_skips_write_when_unresolved() {
        let mut store = InMemoryCostingStore::default();
        let soup = store.add_recipe("Soup", 4.0, "portion");
        store.add_ingredient_line(soup, "Wild Garlic", 50.0, "g", Some("g"), None);

        let outcome = CostingEngine::new(&mut store).persist_snapshot(soup).await.unwrap();

        assert_eq!(
            outcome,
            SnapshotOutcome::Unresolved {
                missing_costs: vec!["Wild Garlic".to_string()]
            }
        );
        assert!(store.saved_costs.is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn snapshot_of_missing_recipe() {
        let mut store = InMemoryCostingStore::default();
        let outcome = CostingEngine::new(&mut store).persist_snapshot(Uuid::new_v4()).await.unwrap();
        assert_eq!(outcome, SnapshotOutcome::RecipeNotFound);
    }
}
