use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/habits/:id/increment", post(handlers::increment))
        .route("/habits/:id/decrement", post(handlers::decrement))
        .route("/api/habits", get(handlers::list_habits).post(handlers::create_habit))
        .route("/api/habits/:id", delete(handlers::delete_habit))
        .route("/api/habits/:id/update", post(handlers::update_habit))
        .route("/api/habits/:id/share", post(handlers::share_habit))
        .route("/api/templates", get(handlers::list_templates))
        .route("/api/templates/:id/use", post(handlers::use_template))
        .route(
            "/api/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route("/api/categories/:id", delete(handlers::delete_category))
        .route("/api/achievements", get(handlers::list_achievements))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/calendar", get(handlers::get_calendar))
        .route("/api/notifications", get(handlers::drain_notifications))
        .with_state(state)
}
