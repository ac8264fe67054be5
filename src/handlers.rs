use crate::calendar::{parse_date_key, Direction};
use crate::errors::AppError;
use crate::models::{
    AddMedicationResponse, CalendarResponse, MedicationInput, MedicationListResponse,
    MedicationView, NavigateRequest, ReminderResponse, SelectionRequest, StatsResponse,
    ToggleRequest, ToggleResponse,
};
use crate::state::AppState;
use crate::storage::persist_data;
use crate::tracker::Tracker;
use crate::ui::render_index;
use axum::{extract::State, response::Html, Json};
use chrono::NaiveDate;
use tracing::{error, info};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let tracker = state.tracker.lock().await;
    Html(render_index(tracker.view().label().as_str(), tracker.medications().len()))
}

pub async fn list_medications(
    State(state): State<AppState>,
) -> Result<Json<MedicationListResponse>, AppError> {
    let today = state.clock.today();
    let mut tracker = state.tracker.lock().await;
    tracker.refresh_streaks(today);

    let medications = tracker
        .medications()
        .iter()
        .map(|medication| MedicationView {
            adherence: tracker.adherence(medication.id, today),
            medication: medication.clone(),
        })
        .collect();

    Ok(Json(MedicationListResponse { medications }))
}

pub async fn add_medication(
    State(state): State<AppState>,
    Json(input): Json<MedicationInput>,
) -> Result<Json<AddMedicationResponse>, AppError> {
    let mut tracker = state.tracker.lock().await;
    let snapshot = tracker.clone();
    let medication = tracker.add_medication(&input)?;
    commit(&state, &mut tracker, snapshot).await?;

    let notice = format!("{} added successfully!", medication.name);
    info!(id = medication.id, time = %medication.time, "{notice}");
    Ok(Json(AddMedicationResponse { medication, notice }))
}

pub async fn select_medication(
    State(state): State<AppState>,
    Json(payload): Json<SelectionRequest>,
) -> Result<Json<CalendarResponse>, AppError> {
    let today = state.clock.today();
    let mut tracker = state.tracker.lock().await;
    if !tracker.select(payload.medication_id) {
        return Err(AppError::not_found("unknown medication"));
    }
    Ok(Json(calendar_response(&tracker, today)))
}

pub async fn get_calendar(
    State(state): State<AppState>,
) -> Result<Json<CalendarResponse>, AppError> {
    let today = state.clock.today();
    let tracker = state.tracker.lock().await;
    Ok(Json(calendar_response(&tracker, today)))
}

pub async fn navigate(
    State(state): State<AppState>,
    Json(payload): Json<NavigateRequest>,
) -> Result<Json<CalendarResponse>, AppError> {
    let direction: Direction = payload.direction.parse().map_err(AppError::bad_request)?;
    let today = state.clock.today();
    let mut tracker = state.tracker.lock().await;
    tracker.navigate(direction);
    Ok(Json(calendar_response(&tracker, today)))
}

pub async fn toggle(
    State(state): State<AppState>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, AppError> {
    let date = parse_date_key(&payload.date)
        .ok_or_else(|| AppError::bad_request("date must be formatted as YYYY-MM-DD"))?;
    let today = state.clock.today();
    let mut tracker = state.tracker.lock().await;
    let snapshot = tracker.clone();

    let Some(taken) = tracker.toggle(date, today) else {
        return Ok(Json(ToggleResponse {
            toggled: false,
            date: payload.date,
            taken: None,
            notice: None,
        }));
    };
    commit(&state, &mut tracker, snapshot).await?;

    let name = tracker
        .selected()
        .map(|medication| medication.name.clone())
        .unwrap_or_default();
    let notice = format!(
        "{name} marked as {}",
        if taken { "taken" } else { "not taken" }
    );
    info!(date = %date, "{notice}");

    Ok(Json(ToggleResponse {
        toggled: true,
        date: date.to_string(),
        taken: Some(taken),
        notice: Some(notice),
    }))
}

pub async fn get_reminder(
    State(state): State<AppState>,
) -> Result<Json<ReminderResponse>, AppError> {
    let today = state.clock.today();
    let tracker = state.tracker.lock().await;
    Ok(Json(reminder_response(&tracker, today, None)))
}

pub async fn dismiss_reminder(
    State(state): State<AppState>,
) -> Result<Json<ReminderResponse>, AppError> {
    let today = state.clock.today();
    let mut tracker = state.tracker.lock().await;
    if let Some(id) = tracker.dismiss_reminder() {
        info!(id, "reminder dismissed");
    }
    Ok(Json(reminder_response(&tracker, today, None)))
}

pub async fn confirm_reminder(
    State(state): State<AppState>,
) -> Result<Json<ReminderResponse>, AppError> {
    let today = state.clock.today();
    let mut tracker = state.tracker.lock().await;
    let snapshot = tracker.clone();
    let Some(id) = tracker.confirm_reminder(today) else {
        return Ok(Json(reminder_response(&tracker, today, None)));
    };
    commit(&state, &mut tracker, snapshot).await?;

    let notice = tracker
        .medication(id)
        .map(|medication| format!("{} marked as taken", medication.name));
    if let Some(notice) = &notice {
        info!(id, "{notice}");
    }
    Ok(Json(reminder_response(&tracker, today, notice)))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let today = state.clock.today();
    let tracker = state.tracker.lock().await;
    Ok(Json(tracker.stats(today)))
}

/// Persists the mutated tracker, restoring `snapshot` in memory when the
/// write fails so a retried request starts from the same state.
async fn commit(
    state: &AppState,
    tracker: &mut Tracker,
    snapshot: Tracker,
) -> Result<(), AppError> {
    let Some(path) = &state.data_path else {
        return Ok(());
    };
    if let Err(err) = persist_data(path, tracker.data()).await {
        error!(path = %path.display(), "failed to persist tracker data: {}", err.message);
        *tracker = snapshot;
        return Err(err);
    }
    Ok(())
}

fn calendar_response(tracker: &Tracker, today: NaiveDate) -> CalendarResponse {
    let view = tracker.view();
    let medication = tracker
        .selected()
        .and_then(|medication| tracker.medication_at(medication.id, today));
    let adherence = medication
        .as_ref()
        .map(|medication| tracker.adherence(medication.id, today))
        .unwrap_or(0);

    CalendarResponse {
        medication,
        year: view.year(),
        month: view.month(),
        label: view.label(),
        cells: tracker.calendar(today).collect(),
        adherence,
    }
}

fn reminder_response(
    tracker: &Tracker,
    today: NaiveDate,
    notice: Option<String>,
) -> ReminderResponse {
    ReminderResponse {
        visible: tracker.reminders().is_visible(),
        medication: tracker
            .reminders()
            .due_medication()
            .and_then(|id| tracker.medication_at(id, today)),
        queued: tracker.reminders().queued(),
        notice,
    }
}
