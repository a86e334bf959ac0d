use crate::summary::DaySummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "kcalPer100g")]
    pub kcal_per_100g: f64,
}

/// One logged consumption. `name` and `kcal` are snapshots taken when the
/// entry was created and are never recomputed from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grams: Option<f64>,
    pub kcal: u64,
}

/// A numeric form field: either a JSON number or the raw text typed into it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return None;
                }
                text.parse::<f64>().ok()
            }
        };
        value.filter(|value| value.is_finite())
    }
}

#[derive(Debug, Deserialize)]
pub struct GoalRequest {
    pub goal: NumericInput,
}

#[derive(Debug, Deserialize)]
pub struct AddFoodRequest {
    pub name: String,
    #[serde(rename = "kcalPer100g")]
    pub kcal_per_100g: NumericInput,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEntryRequest {
    pub food_id: String,
    pub grams: NumericInput,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FoodsResponse {
    pub added: Option<FoodItem>,
    pub foods: Vec<FoodItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodayResponse {
    pub date: String,
    pub key: String,
    pub goal: f64,
    pub entries: Vec<Entry>,
    pub summary: DaySummary,
}
