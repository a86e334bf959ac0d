//! The calorie tracker's domain state: daily goal, food catalog and the
//! active day log, written through to a [`KeyValueStore`] on every change.

use crate::catalog::{self, CatalogError};
use crate::clock::Clock;
use crate::day_key::today_key;
use crate::models::{Entry, FoodItem};
use crate::rollover::RolloverTimer;
use crate::store::{self, KeyValueStore};
use crate::summary::{build_summary, DaySummary};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{error, info, warn};
use uuid::Uuid;

pub const GOAL_KEY: &str = "dailyLimit";
pub const CATALOG_KEY: &str = "foodDb";
pub const DEFAULT_GOAL: f64 = 2000.0;

pub struct Tracker {
    store: Box<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    goal: f64,
    foods: Vec<FoodItem>,
    active_key: String,
    entries: Vec<Entry>,
    timer: RolloverTimer,
}

impl Tracker {
    /// Loads goal, catalog and today's log from `store` and arms the rollover.
    pub fn load(
        store: impl KeyValueStore + 'static,
        clock: Arc<dyn Clock>,
        default_goal: f64,
    ) -> Self {
        let store: Box<dyn KeyValueStore> = Box::new(store);
        let now = clock.now();
        let active_key = today_key(&now);

        let goal = store::load(store.as_ref(), GOAL_KEY, default_goal);
        let foods = store::load(store.as_ref(), CATALOG_KEY, Vec::new());
        let entries = store::load(store.as_ref(), &active_key, Vec::new());

        let mut tracker = Self {
            store,
            clock,
            goal,
            foods,
            active_key,
            entries,
            timer: RolloverTimer::new(),
        };
        tracker.timer.arm(now);
        tracker
    }

    pub fn goal(&self) -> f64 {
        self.goal
    }

    pub fn foods(&self) -> &[FoodItem] {
        &self.foods
    }

    /// Catalog ordered by name, case-insensitively, with lowercase spellings
    /// ahead of capitalised ones on ties.
    pub fn sorted_foods(&self) -> Vec<FoodItem> {
        let mut foods = self.foods.clone();
        foods.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| b.name.cmp(&a.name))
        });
        foods
    }

    pub fn food(&self, id: &str) -> Option<&FoodItem> {
        self.foods.iter().find(|food| food.id == id)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn active_key(&self) -> &str {
        &self.active_key
    }

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    pub fn summary(&self) -> DaySummary {
        build_summary(self.goal, &self.entries)
    }

    pub fn set_goal(&mut self, goal: f64) {
        self.goal = goal;
        persist(self.store.as_mut(), GOAL_KEY, &goal);
    }

    /// Returns the new item, or `None` when the input was rejected.
    pub fn add_food(&mut self, name: &str, kcal_per_100g: f64) -> Option<FoodItem> {
        let name = name.trim();
        if name.is_empty() || !kcal_per_100g.is_finite() || kcal_per_100g < 0.0 {
            warn!(name, kcal_per_100g, "ignoring invalid food");
            return None;
        }

        let food = FoodItem {
            id: self.fresh_food_id(),
            name: name.to_string(),
            kcal_per_100g,
        };
        self.foods.push(food.clone());
        self.persist_catalog();
        Some(food)
    }

    pub fn remove_food(&mut self, id: &str) -> bool {
        let before = self.foods.len();
        self.foods.retain(|food| food.id != id);
        if self.foods.len() == before {
            return false;
        }
        self.persist_catalog();
        true
    }

    /// Logs `grams` of a catalog food for today, fixing its kcal now.
    pub fn add_entry_from_catalog(&mut self, food_id: &str, grams: f64) -> Option<Entry> {
        self.tick();

        let Some(food) = self.food(food_id) else {
            warn!(food_id, "ignoring entry for unknown food");
            return None;
        };
        if !grams.is_finite() || grams <= 0.0 {
            warn!(food_id, grams, "ignoring entry with invalid grams");
            return None;
        }

        let entry = Entry {
            id: Uuid::new_v4().to_string(),
            food_id: Some(food.id.clone()),
            name: food.name.clone(),
            grams: Some(grams),
            kcal: entry_kcal(food.kcal_per_100g, grams),
        };
        self.entries.push(entry.clone());
        self.entries_changed();
        Some(entry)
    }

    pub fn remove_entry(&mut self, id: &str) -> bool {
        self.tick();

        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        let removed = self.entries.len() != before;
        if removed {
            self.entries_changed();
        }
        removed
    }

    pub fn reset_entries(&mut self) {
        self.tick();

        self.entries.clear();
        self.entries_changed();
    }

    /// Replaces the whole catalog with a validated document. On error the
    /// catalog is left untouched.
    pub fn import_catalog(&mut self, payload: &[u8]) -> Result<usize, CatalogError> {
        let foods = catalog::parse_catalog(payload)?;
        let count = foods.len();
        self.foods = foods;
        self.persist_catalog();
        info!(count, "catalog imported");
        Ok(count)
    }

    pub fn export_catalog(&self) -> Result<String, CatalogError> {
        catalog::export_catalog(&self.foods)
    }

    /// Timer callback. Starts a fresh day log if the armed rollover is due
    /// or the local date no longer matches the active key; returns whether
    /// that happened.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        let due = self.timer.fire_if_due(now);
        let today = today_key(&now);
        if !due && today == self.active_key {
            return false;
        }

        info!(from = %self.active_key, to = %today, "day rolled over");
        self.active_key = today;
        self.entries.clear();
        self.persist_entries();
        self.timer.arm(now);
        true
    }

    pub fn time_until_rollover(&self) -> Option<std::time::Duration> {
        self.timer.remaining(self.clock.now())
    }

    pub fn rollover_deadline(&self) -> Option<DateTime<Local>> {
        self.timer.deadline()
    }

    pub fn rollover_wake_handle(&self) -> Arc<Notify> {
        self.timer.wake_handle()
    }

    #[cfg(test)]
    pub fn rollover_arm_count(&self) -> u64 {
        self.timer.arm_count()
    }

    /// Session teardown: no rollover fires after this.
    pub fn cancel_rollover(&mut self) {
        self.timer.cancel();
    }

    fn entries_changed(&mut self) {
        self.persist_entries();
        self.timer.arm(self.clock.now());
    }

    fn fresh_food_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.food(&id).is_none() {
                return id;
            }
        }
    }

    fn persist_catalog(&mut self) {
        persist(self.store.as_mut(), CATALOG_KEY, &self.foods);
    }

    fn persist_entries(&mut self) {
        persist(self.store.as_mut(), &self.active_key, &self.entries);
    }
}

/// Store failures are logged, never surfaced: the in-memory state stays
/// authoritative for the session.
fn persist<T: Serialize + ?Sized>(store: &mut dyn KeyValueStore, key: &str, value: &T) {
    if let Err(err) = store::save(store, key, value) {
        error!("failed to persist {key}: {err}");
    }
}

/// Calories for `grams` of a food, rounded half up to a whole kcal.
pub fn entry_kcal(kcal_per_100g: f64, grams: f64) -> u64 {
    (kcal_per_100g * grams / 100.0).round().max(0.0) as u64
}
