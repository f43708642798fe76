//! Common type definitions shared across the crate.
//!
//! All entity IDs are UUIDs wrapped in type aliases for better type safety:
//!
//! - [`RecipeId`]: Recipe identifier
//! - [`IngredientId`]: Ingredient identifier
//! - [`SubRecipeLinkId`]: Identifier of a parent-to-child recipe link

use uuid::Uuid;

// Type aliases for IDs
pub type RecipeId = Uuid;
pub type IngredientId = Uuid;
pub type SubRecipeLinkId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}
