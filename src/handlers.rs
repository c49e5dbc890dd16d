use crate::errors::AppError;
use crate::models::{
    DayFlagResponse, Direction, DisplayCursor, MonthCount, MonthView, NavigateRequest,
    ToggleRequest,
};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Json,
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let session = state.session.lock().await;
    Html(render_index(&session.month_view()))
}

pub async fn get_month(State(state): State<AppState>) -> Json<MonthView> {
    let session = state.session.lock().await;
    Json(session.month_view())
}

pub async fn get_trend(State(state): State<AppState>) -> Json<Vec<MonthCount>> {
    let session = state.session.lock().await;
    Json(session.trend())
}

pub async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Json<DayFlagResponse> {
    let session = state.session.lock().await;
    let on_site = session.is_on_site(&date);
    Json(DayFlagResponse { date, on_site })
}

pub async fn toggle(
    State(state): State<AppState>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<DayFlagResponse>, AppError> {
    let date = payload.date.trim();
    if date.is_empty() {
        return Err(AppError::bad_request("date must not be empty"));
    }

    let on_site = state.session.lock().await.on_toggle(date).await;
    Ok(Json(DayFlagResponse {
        date: date.to_string(),
        on_site,
    }))
}

pub async fn navigate(
    State(state): State<AppState>,
    Json(payload): Json<NavigateRequest>,
) -> Json<DisplayCursor> {
    let cursor = state.session.lock().await.on_navigate(payload.direction);
    Json(cursor)
}

pub async fn toggle_form(State(state): State<AppState>, Path(date): Path<String>) -> Redirect {
    state.session.lock().await.on_toggle(&date).await;
    Redirect::to("/")
}

pub async fn nav_prev(State(state): State<AppState>) -> Redirect {
    state.session.lock().await.on_navigate(Direction::Previous);
    Redirect::to("/")
}

pub async fn nav_next(State(state): State<AppState>) -> Redirect {
    state.session.lock().await.on_navigate(Direction::Next);
    Redirect::to("/")
}

pub async fn reopen(State(state): State<AppState>) -> Redirect {
    state.session.lock().await.on_open();
    Redirect::to("/")
}
