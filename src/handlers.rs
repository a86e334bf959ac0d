use crate::errors::AppError;
use crate::models::{
    AddEntryRequest, AddFoodRequest, FoodItem, FoodsResponse, GoalRequest, TodayResponse,
};
use crate::state::AppState;
use crate::tracker::Tracker;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use tracing::warn;

pub async fn get_today(State(state): State<AppState>) -> Json<TodayResponse> {
    let mut tracker = state.tracker.lock().await;
    tracker.tick();
    Json(today_response(&tracker))
}

pub async fn set_goal(
    State(state): State<AppState>,
    Json(payload): Json<GoalRequest>,
) -> Json<TodayResponse> {
    let mut tracker = state.tracker.lock().await;
    tracker.tick();
    match payload.goal.value() {
        Some(goal) => tracker.set_goal(goal),
        None => warn!("ignoring non-numeric goal"),
    }
    Json(today_response(&tracker))
}

pub async fn list_foods(State(state): State<AppState>) -> Json<Vec<FoodItem>> {
    let mut tracker = state.tracker.lock().await;
    tracker.tick();
    Json(tracker.sorted_foods())
}

pub async fn add_food(
    State(state): State<AppState>,
    Json(payload): Json<AddFoodRequest>,
) -> Json<FoodsResponse> {
    let mut tracker = state.tracker.lock().await;
    tracker.tick();
    let added = match payload.kcal_per_100g.value() {
        Some(kcal) => tracker.add_food(&payload.name, kcal),
        None => {
            warn!(name = %payload.name, "ignoring food with non-numeric kcal");
            None
        }
    };

    Json(FoodsResponse {
        added,
        foods: tracker.sorted_foods(),
    })
}

pub async fn remove_food(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Vec<FoodItem>> {
    let mut tracker = state.tracker.lock().await;
    tracker.tick();
    tracker.remove_food(&id);
    Json(tracker.sorted_foods())
}

pub async fn add_entry(
    State(state): State<AppState>,
    Json(payload): Json<AddEntryRequest>,
) -> Json<TodayResponse> {
    let mut tracker = state.tracker.lock().await;
    match payload.grams.value() {
        Some(grams) => {
            tracker.add_entry_from_catalog(&payload.food_id, grams);
        }
        None => warn!(food_id = %payload.food_id, "ignoring entry with non-numeric grams"),
    }
    tracker.tick();
    Json(today_response(&tracker))
}

pub async fn remove_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<TodayResponse> {
    let mut tracker = state.tracker.lock().await;
    tracker.remove_entry(&id);
    Json(today_response(&tracker))
}

pub async fn reset_entries(State(state): State<AppState>) -> Json<TodayResponse> {
    let mut tracker = state.tracker.lock().await;
    tracker.reset_entries();
    Json(today_response(&tracker))
}

pub async fn export_catalog(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let tracker = state.tracker.lock().await;
    let document = tracker.export_catalog().map_err(AppError::internal)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"foods.json\""),
        ],
        document,
    ))
}

pub async fn import_catalog(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<FoodItem>>, AppError> {
    let mut tracker = state.tracker.lock().await;
    tracker.import_catalog(&body)?;
    Ok(Json(tracker.sorted_foods()))
}

fn today_response(tracker: &Tracker) -> TodayResponse {
    TodayResponse {
        date: tracker.now().date_naive().to_string(),
        key: tracker.active_key().to_string(),
        goal: tracker.goal(),
        entries: tracker.entries().to_vec(),
        summary: tracker.summary(),
    }
}
