use crate::calendar::{is_taken, parse_date_key, MonthView};
use crate::models::{AdherenceRecord, MedicationId, StatsResponse, TrackerData};
use chrono::{Datelike, Duration, NaiveDate};

/// Percentage of elapsed days in `view` on which the medication was taken.
///
/// Elapsed days are the whole month for past months, up to and including
/// `today` for the current month, and none for future months. Only taken
/// keys inside the viewed month count.
pub fn calculate_adherence(
    adherence: &AdherenceRecord,
    medication_id: MedicationId,
    view: MonthView,
    today: NaiveDate,
) -> u8 {
    let Some(days) = adherence.get(&medication_id) else {
        return 0;
    };

    let days_so_far = days_elapsed(view, today);
    if days_so_far == 0 || days.is_empty() {
        return 0;
    }

    let taken_days = days
        .iter()
        .filter(|(_, taken)| **taken)
        .filter_map(|(key, _)| parse_date_key(key))
        .filter(|date| view.contains(*date) && *date <= today)
        .count();

    let percent = (taken_days as f64 / f64::from(days_so_far) * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}

fn days_elapsed(view: MonthView, today: NaiveDate) -> u32 {
    if view.contains(today) {
        return today.day();
    }
    let current = MonthView::containing(today);
    if (view.year(), view.month()) < (current.year(), current.month()) {
        view.days()
    } else {
        0
    }
}

/// Consecutive taken days ending today, or ending yesterday while today's
/// dose is still open.
pub fn current_streak(
    adherence: &AdherenceRecord,
    medication_id: MedicationId,
    today: NaiveDate,
) -> u32 {
    let mut cursor = if is_taken(adherence, medication_id, today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0u32;
    while is_taken(adherence, medication_id, cursor) {
        streak = streak.saturating_add(1);
        cursor = cursor - Duration::days(1);
    }
    streak
}

pub fn build_stats(
    data: &TrackerData,
    selected: Option<MedicationId>,
    view: MonthView,
    today: NaiveDate,
) -> StatsResponse {
    let (current_streak, monthly_adherence) = match selected {
        Some(id) => (
            current_streak(&data.adherence, id, today),
            calculate_adherence(&data.adherence, id, view, today),
        ),
        None => (0, 0),
    };

    StatsResponse {
        current_streak,
        monthly_adherence,
        total_medications: data.medications.len(),
    }
}
