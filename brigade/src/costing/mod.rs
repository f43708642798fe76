//! The recipe costing engine.
//!
//! Computes the monetary cost of producing a recipe, where a recipe may be
//! composed of other recipes to arbitrary depth and the stored graph may
//! contain cycles. The engine reads through the [`store::CostingStore`] seam,
//! costs ingredient lines and sub-recipe links with [`line_costs`], and
//! reports a full [`results::CostingResult`] breakdown. The only write it
//! ever performs is the cost-per-portion snapshot.
//!
//! Known modelling caveat, preserved deliberately: when a sub-recipe link is
//! denominated in `g` or `ml`, the child's yield quantity is used as the
//! batch denominator without verifying that the yield unit belongs to the
//! same unit family as the link. Flagged for product review; do not "fix"
//! silently, downstream costing history depends on the current numbers.

pub mod engine;
pub mod line_costs;
pub mod results;
pub mod store;
pub mod units;

pub use engine::{CostingEngine, DEFAULT_MAX_DEPTH, SnapshotOutcome};
pub use results::{CostBreakdownItem, CostingResult, SubRecipeCostItem};
pub use store::CostingStore;
