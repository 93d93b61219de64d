use crate::catalog;
use crate::errors::AppError;
use crate::journal::{EntryLog, InvalidUpdate};
use crate::models::{
    DailyEntry, EntryUpdate, ImportResponse, InsightResponse, ResetRequest, SummaryResponse,
    TimerRequest, TimerStatus, Toggle, TodayResponse,
};
use crate::sanitize::sanitize_entries;
use crate::state::AppState;
use crate::stats::{build_summary, date_key};
use crate::storage::{clear_entries, persist_entries};
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
    Json,
};
use chrono::{Datelike, Local, NaiveDate};
use serde_json::Value;
use tracing::info;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = today();
    let insight = state.insight.read().await.clone();
    let log = state.log.lock().await;
    let summary = build_summary(log.entries(), insight);
    Html(render_index(&summary, &today_response(&log, today)))
}

pub async fn get_today(State(state): State<AppState>) -> Result<Json<TodayResponse>, AppError> {
    let log = state.log.lock().await;
    Ok(Json(today_response(&log, today())))
}

pub async fn get_summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, AppError> {
    let insight = state.insight.read().await.clone();
    let log = state.log.lock().await;
    Ok(Json(build_summary(log.entries(), insight)))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Json(update): Json<EntryUpdate>,
) -> Result<Json<DailyEntry>, AppError> {
    let entry = mutate(&state, |log, today| log.apply(today, update)).await?;
    Ok(Json(entry))
}

pub async fn toggle(
    State(state): State<AppState>,
    Json(toggle): Json<Toggle>,
) -> Result<Json<DailyEntry>, AppError> {
    let entry = mutate(&state, |log, today| log.toggle(today, toggle)).await?;
    Ok(Json(entry))
}

pub async fn toggle_flag_form(
    State(state): State<AppState>,
    Path(target): Path<String>,
) -> Result<Redirect, AppError> {
    let toggle = parse_toggle(&target, None)?;
    mutate(&state, |log, today| log.toggle(today, toggle)).await?;
    Ok(Redirect::to("/"))
}

pub async fn toggle_item_form(
    State(state): State<AppState>,
    Path((target, id)): Path<(String, String)>,
) -> Result<Redirect, AppError> {
    let toggle = parse_toggle(&target, Some(id))?;
    mutate(&state, |log, today| log.toggle(today, toggle)).await?;
    Ok(Redirect::to("/"))
}

pub async fn export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let log = state.log.lock().await;
    let body = serde_json::to_string(log.entries()).map_err(AppError::internal)?;
    let disposition = format!("attachment; filename=\"obsidian_backup_{}.json\"", date_key(today()));

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

pub async fn import(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ImportResponse>, AppError> {
    let raw: Value = serde_json::from_str(&body).map_err(|_| AppError::invalid_import())?;
    if !raw.is_array() {
        return Err(AppError::invalid_import());
    }
    let entries = sanitize_entries(raw);

    let mut log = state.log.lock().await;
    let before = log.total_xp();
    let imported = EntryLog::new(entries);
    persist_entries(&state.data_path, imported.entries()).await?;
    *log = imported;
    info!(count = log.len(), "imported entries");

    if log.total_xp() != before {
        state.refresh_insight(log.entries().to_vec());
    }
    Ok(Json(ImportResponse { imported: log.len() }))
}

pub async fn reset(
    State(state): State<AppState>,
    Json(request): Json<ResetRequest>,
) -> Result<Json<ImportResponse>, AppError> {
    if !request.confirm {
        return Err(AppError::bad_request("reset requires \"confirm\": true"));
    }

    let mut log = state.log.lock().await;
    clear_entries(&state.data_path).await?;
    log.clear();
    state.reset_insight().await;
    info!("entries reset");

    Ok(Json(ImportResponse { imported: 0 }))
}

pub async fn get_insight(State(state): State<AppState>) -> Json<InsightResponse> {
    Json(InsightResponse {
        insight: state.insight.read().await.clone(),
    })
}

pub async fn timer_status(State(state): State<AppState>) -> Json<TimerStatus> {
    Json(state.timer.status().await)
}

pub async fn timer_start(
    State(state): State<AppState>,
    Json(request): Json<TimerRequest>,
) -> Json<TimerStatus> {
    Json(state.timer.start(request.seconds).await)
}

pub async fn timer_cancel(State(state): State<AppState>) -> Json<TimerStatus> {
    Json(state.timer.cancel().await)
}

/// Applies a change to today's entry, persists the whole collection and
/// kicks off an insight refresh when the lifetime score moved. The change is
/// made on a copy, which replaces the live log only once it is on disk.
async fn mutate<F>(state: &AppState, change: F) -> Result<DailyEntry, AppError>
where
    F: FnOnce(&mut EntryLog, NaiveDate) -> Result<DailyEntry, InvalidUpdate>,
{
    let mut log = state.log.lock().await;
    let before = log.total_xp();
    let mut updated = log.clone();
    let entry = change(&mut updated, today())?;
    persist_entries(&state.data_path, updated.entries()).await?;
    *log = updated;

    if log.total_xp() != before {
        state.refresh_insight(log.entries().to_vec());
    }
    Ok(entry)
}

fn parse_toggle(target: &str, id: Option<String>) -> Result<Toggle, AppError> {
    match (target, id) {
        ("workout", None) => Ok(Toggle::Workout),
        ("sleep", None) => Ok(Toggle::Sleep),
        ("meal", Some(id)) => Ok(Toggle::Meal(id)),
        ("posture", Some(id)) => Ok(Toggle::Posture(id)),
        ("exercise", Some(id)) => id
            .parse()
            .map(Toggle::Exercise)
            .map_err(|_| AppError::bad_request("exercise index must be a number")),
        _ => Err(AppError::bad_request(format!("unknown toggle target '{target}'"))),
    }
}

fn today_response(log: &EntryLog, today: NaiveDate) -> TodayResponse {
    TodayResponse {
        entry: log.entry_or_placeholder(today),
        weekday: weekday_name(today).to_string(),
        plan: catalog::workout_plan(today.weekday()),
    }
}

fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        chrono::Weekday::Mon => "Monday",
        chrono::Weekday::Tue => "Tuesday",
        chrono::Weekday::Wed => "Wednesday",
        chrono::Weekday::Thu => "Thursday",
        chrono::Weekday::Fri => "Friday",
        chrono::Weekday::Sat => "Saturday",
        chrono::Weekday::Sun => "Sunday",
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
