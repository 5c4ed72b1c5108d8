// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures of the drinks API. All types derive
//! `ToSchema` for the OpenAPI document.
//!
//! ## Representations
//!
//! A drink is exposed in two forms:
//!
//! - **short** (public): recipe parts without ingredient names
//! - **long** (requires `get:drinks-detail`): the full recipe

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Drink Models
// =============================================================================

/// One ingredient of a recipe.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct RecipePart {
    /// Display color of the layer.
    pub color: String,
    /// Ingredient name.
    pub name: String,
    /// Relative amount.
    pub parts: u32,
}

/// Recipe part without the ingredient name.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ShortRecipePart {
    pub color: String,
    pub parts: u32,
}

/// A drink in the catalog (long form).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Drink {
    /// Identifier assigned by the store.
    pub id: u64,
    /// Unique title.
    pub title: String,
    /// Ordered recipe.
    pub recipe: Vec<RecipePart>,
}

/// A drink with its recipe reduced to colors and proportions.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DrinkSummary {
    pub id: u64,
    pub title: String,
    pub recipe: Vec<ShortRecipePart>,
}

impl Drink {
    /// Short representation (public listing).
    pub fn short(&self) -> DrinkSummary {
        DrinkSummary {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|part| ShortRecipePart {
                    color: part.color.clone(),
                    parts: part.parts,
                })
                .collect(),
        }
    }
}

/// Recipe as sent by clients: a list of parts, or a single part.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<RecipePart>),
    One(RecipePart),
}

impl From<RecipeInput> for Vec<RecipePart> {
    fn from(value: RecipeInput) -> Self {
        match value {
            RecipeInput::Many(parts) => parts,
            RecipeInput::One(part) => vec![part],
        }
    }
}

/// Request to create a drink.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateDrinkRequest {
    pub title: String,
    pub recipe: RecipeInput,
}

/// Request to update a drink. Absent or empty fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateDrinkRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<RecipeInput>,
}

// =============================================================================
// Response Envelopes
// =============================================================================

/// Public drink listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DrinkSummaryList {
    pub success: bool,
    pub drinks: Vec<DrinkSummary>,
}

/// Drinks with full recipes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DrinkList {
    pub success: bool,
    pub drinks: Vec<Drink>,
}

/// Result of a deletion.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DrinkDeleted {
    pub success: bool,
    /// Identifier of the deleted drink.
    pub delete: u64,
}
