use crate::errors::AppError;
use crate::models::{
    AddRowsRequest, CellEdit, Field, SaveRequest, SaveResponse, SheetQuery, SheetResponse,
    TodayResponse,
};
use crate::notify::Toast;
use crate::state::{AppState, Session};
use crate::storage::persist_store;
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use chrono::{Local, NaiveDate};
use std::time::Instant;
use tracing::info;

const MAX_ADD_ROWS: usize = 500;

pub async fn index() -> Html<String> {
    Html(render_index(&today_string()))
}

pub async fn get_today() -> Json<TodayResponse> {
    Json(TodayResponse {
        date: today_string(),
    })
}

pub async fn get_sheet(
    State(state): State<AppState>,
    Query(query): Query<SheetQuery>,
) -> Result<Json<SheetResponse>, AppError> {
    let date = query.date.filter(|value| !value.trim().is_empty());
    if let Some(date) = date.as_deref() {
        validate_date(date)?;
    }

    let mut session = state.session.lock().await;
    let Session {
        store,
        sheet,
        notifier,
    } = &mut *session;

    sheet.select_date(date);
    let toast = sheet.load(store, notifier, Instant::now());
    if let Some(date) = sheet.date() {
        info!("loaded sheet {date} with {} rows", sheet.row_count());
    }

    Ok(Json(SheetResponse {
        date: sheet.date().map(str::to_string),
        rows: sheet.rows(),
        toast,
    }))
}

pub async fn edit_cell(
    State(state): State<AppState>,
    Json(payload): Json<CellEdit>,
) -> Result<Json<SaveResponse>, AppError> {
    let field = Field::parse(payload.field.trim())
        .ok_or_else(|| AppError::bad_request(format!("unknown field '{}'", payload.field)))?;

    let mut session = state.session.lock().await;
    if !sheet_is_open(&session, &payload.date)? {
        return Ok(nothing_saved(&session));
    }
    session.sheet.edit(payload.row, field, payload.value)?;

    save_session(&state, &mut session, true).await
}

pub async fn add_rows(
    State(state): State<AppState>,
    Json(payload): Json<AddRowsRequest>,
) -> Result<Json<SaveResponse>, AppError> {
    if payload.count == 0 || payload.count > MAX_ADD_ROWS {
        return Err(AppError::bad_request(format!(
            "count must be between 1 and {MAX_ADD_ROWS}"
        )));
    }

    let mut session = state.session.lock().await;
    if !sheet_is_open(&session, &payload.date)? {
        return Ok(nothing_saved(&session));
    }
    session.sheet.add_rows(payload.count);

    save_session(&state, &mut session, true).await
}

pub async fn save(
    State(state): State<AppState>,
    Json(payload): Json<SaveRequest>,
) -> Result<Json<SaveResponse>, AppError> {
    let mut session = state.session.lock().await;
    if !sheet_is_open(&session, &payload.date)? {
        return Ok(nothing_saved(&session));
    }

    save_session(&state, &mut session, payload.silent).await
}

pub async fn get_toast(State(state): State<AppState>) -> Json<Option<Toast>> {
    let session = state.session.lock().await;
    Json(session.notifier.visible(Instant::now()))
}

async fn save_session(
    state: &AppState,
    session: &mut Session,
    silent: bool,
) -> Result<Json<SaveResponse>, AppError> {
    let Session {
        store,
        sheet,
        notifier,
    } = session;

    let toast = sheet.save(store, silent, notifier, Instant::now())?;
    persist_store(&state.data_path, store).await?;

    Ok(Json(SaveResponse {
        saved: sheet.date().is_some(),
        rows: sheet.row_count(),
        toast,
    }))
}

fn nothing_saved(session: &Session) -> Json<SaveResponse> {
    Json(SaveResponse {
        saved: false,
        rows: session.sheet.row_count(),
        toast: None,
    })
}

/// `Ok(false)` when no date is selected on either side: the request is a
/// silent no-op. A date that disagrees with the open sheet is a conflict.
fn sheet_is_open(session: &Session, date: &str) -> Result<bool, AppError> {
    let date = date.trim();
    match session.sheet.date() {
        Some(active) if active == date => Ok(true),
        None if date.is_empty() => Ok(false),
        Some(active) => Err(AppError::stale_sheet(format!(
            "{date} is not the open sheet ({active})"
        ))),
        None => Err(AppError::stale_sheet(format!(
            "no sheet is open, load {date} first"
        ))),
    }
}

fn validate_date(date: &str) -> Result<(), AppError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| AppError::bad_request(format!("invalid date '{date}', expected YYYY-MM-DD")))
}

fn today_string() -> String {
    Local::now().date_naive().to_string()
}
