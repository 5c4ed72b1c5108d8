// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory drinks store.
//!
//! Drinks are kept in id order; ids are assigned monotonically from 1 and
//! never reused. Titles are unique.

use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::models::{CreateDrinkRequest, Drink, RecipePart, UpdateDrinkRequest};

#[derive(Default)]
pub struct InMemoryStore {
    drinks: BTreeMap<u64, Drink>,
    last_id: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the sample "water" drink.
    pub fn with_sample_drinks() -> Self {
        let mut store = Self::new();
        store.insert(
            "water".to_string(),
            vec![RecipePart {
                color: "blue".to_string(),
                name: "water".to_string(),
                parts: 1,
            }],
        );
        store
    }

    pub fn list_drinks(&self) -> Vec<Drink> {
        self.drinks.values().cloned().collect()
    }

    pub fn create_drink(&mut self, request: CreateDrinkRequest) -> Result<Drink, ApiError> {
        let title = request.title.trim().to_string();
        let recipe: Vec<RecipePart> = request.recipe.into();

        if title.is_empty() {
            return Err(ApiError::unprocessable("Drink title must not be empty"));
        }
        if recipe.is_empty() {
            return Err(ApiError::unprocessable("Drink recipe must not be empty"));
        }
        self.ensure_title_free(&title, None)?;

        Ok(self.insert(title, recipe))
    }

    pub fn update_drink(&mut self, id: u64, request: UpdateDrinkRequest) -> Result<Drink, ApiError> {
        if !self.drinks.contains_key(&id) {
            return Err(drink_not_found(id));
        }

        let title = request
            .title
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty());
        let recipe = request
            .recipe
            .map(Vec::<RecipePart>::from)
            .filter(|recipe| !recipe.is_empty());

        if let Some(title) = &title {
            self.ensure_title_free(title, Some(id))?;
        }

        let drink = self.drinks.get_mut(&id).ok_or_else(|| drink_not_found(id))?;
        if let Some(title) = title {
            drink.title = title;
        }
        if let Some(recipe) = recipe {
            drink.recipe = recipe;
        }
        Ok(drink.clone())
    }

    pub fn delete_drink(&mut self, id: u64) -> Result<(), ApiError> {
        if self.drinks.remove(&id).is_some() {
            Ok(())
        } else {
            Err(drink_not_found(id))
        }
    }

    fn insert(&mut self, title: String, recipe: Vec<RecipePart>) -> Drink {
        self.last_id += 1;
        let drink = Drink {
            id: self.last_id,
            title,
            recipe,
        };
        self.drinks.insert(drink.id, drink.clone());
        drink
    }

    fn ensure_title_free(&self, title: &str, except: Option<u64>) -> Result<(), ApiError> {
        let taken = self
            .drinks
            .values()
            .any(|drink| drink.title == title && Some(drink.id) != except);
        if taken {
            Err(ApiError::unprocessable(format!(
                "A drink titled '{title}' already exists"
            )))
        } else {
            Ok(())
        }
    }
}

fn drink_not_found(id: u64) -> ApiError {
    ApiError::not_found(format!("Drink {id} not found"))
}
