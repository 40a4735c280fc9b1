//! Ingredient domain type.

use foodgram_core::IngredientId;

/// An ingredient from the reference dataset.
///
/// `(name, measurement_unit)` is unique: "flour, g" and "flour, kg" are two
/// different ingredients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}
