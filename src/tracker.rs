use crate::calendar::{self, date_key, Direction, MonthDays, MonthView};
use crate::errors::ValidationError;
use crate::models::{Medication, MedicationId, MedicationInput, StatsResponse, TrackerData};
use crate::registry;
use crate::reminder::{self, ReminderState};
use crate::stats;
use chrono::{NaiveDate, NaiveDateTime};

/// All tracker state owned by one page: registry and adherence record
/// (persisted), plus the month view, selection slot and reminder slot.
#[derive(Debug, Clone)]
pub struct Tracker {
    data: TrackerData,
    view: MonthView,
    selected: Option<MedicationId>,
    reminders: ReminderState,
}

impl Tracker {
    pub fn new(data: TrackerData, today: NaiveDate) -> Self {
        let mut tracker = Self {
            data,
            view: MonthView::containing(today),
            selected: None,
            reminders: ReminderState::default(),
        };
        tracker.refresh_streaks(today);
        tracker
    }

    pub fn data(&self) -> &TrackerData {
        &self.data
    }

    pub fn add_medication(
        &mut self,
        input: &MedicationInput,
    ) -> Result<Medication, ValidationError> {
        registry::add_medication(&mut self.data, input)
    }

    pub fn medications(&self) -> &[Medication] {
        registry::list_medications(&self.data)
    }

    pub fn medication(&self, id: MedicationId) -> Option<&Medication> {
        registry::find_medication(&self.data, id)
    }

    /// Sets the selection slot. Returns false for an unknown id, leaving the
    /// current selection in place.
    pub fn select(&mut self, id: Option<MedicationId>) -> bool {
        match id {
            Some(id) if self.medication(id).is_none() => false,
            id => {
                self.selected = id;
                true
            }
        }
    }

    pub fn selected(&self) -> Option<&Medication> {
        self.selected.and_then(|id| self.medication(id))
    }

    /// A copy of the medication with its streak computed for `today`, so
    /// callers never see a value left over from an earlier day.
    pub fn medication_at(&self, id: MedicationId, today: NaiveDate) -> Option<Medication> {
        self.medication(id).cloned().map(|mut medication| {
            medication.streak = stats::current_streak(&self.data.adherence, id, today);
            medication
        })
    }

    pub fn view(&self) -> MonthView {
        self.view
    }

    pub fn navigate(&mut self, direction: Direction) -> MonthView {
        self.view = self.view.navigate(direction);
        self.view
    }

    pub fn calendar(&self, today: NaiveDate) -> MonthDays<'_> {
        calendar::generate_days(&self.data.adherence, self.view, self.selected, today)
    }

    /// Toggles `date` for the selected medication. `None` when nothing is selected.
    /// Marking a dose taken also clears its pending reminder for that day.
    pub fn toggle(&mut self, date: NaiveDate, today: NaiveDate) -> Option<bool> {
        let id = self.selected?;
        let taken = calendar::toggle_taken(&mut self.data.adherence, Some(id), &date_key(date))?;
        if taken {
            self.reminders.clear(id, date);
        }
        self.refresh_streaks(today);
        Some(taken)
    }

    pub fn adherence(&self, id: MedicationId, today: NaiveDate) -> u8 {
        stats::calculate_adherence(&self.data.adherence, id, self.view, today)
    }

    pub fn stats(&self, today: NaiveDate) -> StatsResponse {
        stats::build_stats(&self.data, self.selected, self.view, today)
    }

    pub fn refresh_streaks(&mut self, today: NaiveDate) {
        let adherence = &self.data.adherence;
        for medication in &mut self.data.medications {
            medication.streak = stats::current_streak(adherence, medication.id, today);
        }
    }

    pub fn reminders(&self) -> &ReminderState {
        &self.reminders
    }

    pub fn due_medication(&self) -> Option<&Medication> {
        self.reminders.due_medication().and_then(|id| self.medication(id))
    }

    /// Runs one reminder tick against the live state.
    pub fn evaluate_reminders(&mut self, now: NaiveDateTime) -> Vec<MedicationId> {
        reminder::evaluate_tick(&self.data, &mut self.reminders, now)
    }

    pub fn dismiss_reminder(&mut self) -> Option<MedicationId> {
        self.reminders.dismiss()
    }

    pub fn confirm_reminder(&mut self, today: NaiveDate) -> Option<MedicationId> {
        let id = reminder::confirm_taken(&mut self.data, &mut self.reminders)?;
        self.refresh_streaks(today);
        Some(id)
    }
}
