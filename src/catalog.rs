//! Catalog file interchange: a JSON array of `{id, name, kcalPer100g}`.

use crate::models::FoodItem;
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("catalog file must contain a list of foods")]
    NotASequence,

    #[error("food #{index} is invalid: {reason}")]
    InvalidItem { index: usize, reason: String },

    #[error("food id {0:?} appears more than once")]
    DuplicateId(String),
}

/// Validates an import document. Nothing is returned unless every element
/// passes, so callers can replace the catalog wholesale.
pub fn parse_catalog(bytes: &[u8]) -> Result<Vec<FoodItem>, CatalogError> {
    let document: Value = serde_json::from_slice(bytes)?;
    let Value::Array(items) = document else {
        return Err(CatalogError::NotASequence);
    };

    let mut seen = HashSet::with_capacity(items.len());
    let mut foods = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let food = parse_item(item).map_err(|reason| CatalogError::InvalidItem {
            index,
            reason: reason.to_string(),
        })?;
        if !seen.insert(food.id.clone()) {
            return Err(CatalogError::DuplicateId(food.id));
        }
        foods.push(food);
    }

    Ok(foods)
}

fn parse_item(item: &Value) -> Result<FoodItem, &'static str> {
    let Value::Object(fields) = item else {
        return Err("expected an object");
    };

    let id = fields
        .get("id")
        .and_then(Value::as_str)
        .ok_or("missing string `id`")?;
    let name = fields
        .get("name")
        .and_then(Value::as_str)
        .ok_or("missing string `name`")?;
    let kcal_per_100g = fields
        .get("kcalPer100g")
        .and_then(Value::as_f64)
        .ok_or("missing numeric `kcalPer100g`")?;

    if name.trim().is_empty() {
        return Err("`name` is blank");
    }
    if kcal_per_100g < 0.0 {
        return Err("`kcalPer100g` is negative");
    }

    Ok(FoodItem {
        id: id.to_string(),
        name: name.to_string(),
        kcal_per_100g,
    })
}

pub fn export_catalog(foods: &[FoodItem]) -> Result<String, CatalogError> {
    Ok(serde_json::to_string_pretty(foods)?)
}
