use crate::catalog;
use crate::errors::AppError;
use crate::models::{
    Achievement, CalendarDay, CalendarQuery, Category, Habit, HabitId, HabitTemplate, HabitsResponse,
    NewCategory, NewHabit, StatsResponse, UpdateRequest, UpdateResponse,
};
use crate::notify::CompletionEvent;
use crate::state::AppState;
use crate::stats::build_stats;
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    Json,
};
use tracing::warn;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let mut ledger = state.ledger.lock().await;
    ledger.check_rollover();
    let categories = state.categories.lock().await;
    Html(render_index(&ledger, &categories))
}

pub async fn list_habits(State(state): State<AppState>) -> Json<HabitsResponse> {
    let mut ledger = state.ledger.lock().await;
    ledger.check_rollover();
    Json(HabitsResponse {
        active: ledger.active().cloned().collect(),
        completed: ledger.completed().cloned().collect(),
    })
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(payload): Json<NewHabit>,
) -> Result<(StatusCode, Json<Habit>), AppError> {
    if let Some(category) = payload.category.as_deref() {
        if !state.categories.lock().await.contains_name(category) {
            warn!(category, "habit refers to an unknown category");
        }
    }

    let habit = state.ledger.lock().await.add_habit(payload)?;
    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn delete_habit(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.ledger.lock().await.delete_habit(&HabitId::from(id));
    StatusCode::NO_CONTENT
}

pub async fn update_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateRequest>,
) -> Result<Json<UpdateResponse>, AppError> {
    let id = HabitId::from(id);
    let outcome = state.ledger.lock().await.apply_update(&id, payload.value);
    let habit = outcome
        .habit
        .ok_or_else(|| AppError::not_found(format!("no habit with id {id}")))?;

    Ok(Json(UpdateResponse {
        habit,
        moved_to_completed: outcome.moved_to_completed,
    }))
}

pub async fn increment(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    step(&state, id, 1).await;
    Redirect::to("/")
}

pub async fn decrement(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    step(&state, id, -1).await;
    Redirect::to("/")
}

async fn step(state: &AppState, id: String, delta: i64) {
    let id = HabitId::from(id);
    let mut ledger = state.ledger.lock().await;
    ledger.check_rollover();
    if let Some(current) = ledger.habit(&id).map(|habit| i64::from(habit.current)) {
        ledger.apply_update(&id, current + delta);
    }
}

pub async fn share_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Habit>, AppError> {
    let id = HabitId::from(id);
    state
        .ledger
        .lock()
        .await
        .share_habit(&id)
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("no habit with id {id}")))
}

pub async fn list_templates() -> Json<Vec<HabitTemplate>> {
    Json(catalog::templates())
}

pub async fn use_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Habit>), AppError> {
    let template = catalog::find_template(&id)
        .ok_or_else(|| AppError::not_found(format!("no template with id {id}")))?;
    let habit = state.ledger.lock().await.instantiate_from_template(&template);
    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.categories.lock().await.list().to_vec())
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<NewCategory>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let category = state.categories.lock().await.add(payload)?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn delete_category(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.categories.lock().await.delete(&id);
    StatusCode::NO_CONTENT
}

pub async fn list_achievements() -> Json<Vec<Achievement>> {
    Json(catalog::achievements())
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let mut ledger = state.ledger.lock().await;
    ledger.check_rollover();
    Json(build_stats(&ledger))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Json<Vec<CalendarDay>> {
    let ledger = state.ledger.lock().await;
    let reference = query.date.unwrap_or_else(|| ledger.today());
    Json(ledger.streak_calendar_window(reference))
}

pub async fn drain_notifications(State(state): State<AppState>) -> Json<Vec<CompletionEvent>> {
    Json(state.toasts.drain())
}
