use crate::calendar::{date_key, is_taken};
use crate::models::{MedicationId, TrackerData};
use crate::state::AppState;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Due reminders waiting for the user, each tied to the day it fell due.
/// The front entry is the one shown; the slot is visible while anything is
/// queued.
#[derive(Debug, Clone, Default)]
pub struct ReminderState {
    queue: VecDeque<(MedicationId, NaiveDate)>,
}

impl ReminderState {
    pub fn due_medication(&self) -> Option<MedicationId> {
        self.queue.front().map(|(id, _)| *id)
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.queue.front().map(|(_, date)| *date)
    }

    pub fn is_visible(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Hides the current reminder without touching adherence.
    pub fn dismiss(&mut self) -> Option<MedicationId> {
        self.queue.pop_front().map(|(id, _)| id)
    }

    /// Drops the reminder for `id` due on `date`, if queued.
    pub fn clear(&mut self, id: MedicationId, date: NaiveDate) -> bool {
        let before = self.queue.len();
        self.queue.retain(|entry| *entry != (id, date));
        self.queue.len() != before
    }

    fn enqueue(&mut self, id: MedicationId, date: NaiveDate) -> bool {
        if self.queue.contains(&(id, date)) {
            return false;
        }
        self.queue.push_back((id, date));
        true
    }
}

/// Queues every reminder-enabled medication scheduled for the current
/// minute whose dose for today is still open. Returns the newly queued ids
/// in registry order.
pub fn evaluate_tick(
    data: &TrackerData,
    reminders: &mut ReminderState,
    now: NaiveDateTime,
) -> Vec<MedicationId> {
    let today = now.date();
    let mut queued = Vec::new();

    for medication in &data.medications {
        if !medication.reminders_enabled {
            continue;
        }
        if medication.time.hour != now.hour() || medication.time.minute != now.minute() {
            continue;
        }
        if is_taken(&data.adherence, medication.id, today) {
            continue;
        }
        if reminders.enqueue(medication.id, today) {
            queued.push(medication.id);
        }
    }

    queued
}

/// Marks the shown dose as taken on the day it fell due and hides it.
pub fn confirm_taken(
    data: &mut TrackerData,
    reminders: &mut ReminderState,
) -> Option<MedicationId> {
    let (id, due) = reminders.queue.pop_front()?;
    data.adherence
        .entry(id)
        .or_default()
        .insert(date_key(due), true);
    Some(id)
}

/// Owns the background reminder task. Dropping the handle cancels it.
#[derive(Debug)]
pub struct ReminderHandle {
    task: JoinHandle<()>,
}

impl ReminderHandle {
    pub fn cancel(self) {
        self.task.abort();
    }
}

impl Drop for ReminderHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Starts the recurring reminder check. Every tick reads the shared tracker
/// behind `state`, so medications added later are picked up.
pub fn spawn(state: AppState, period: Duration) -> ReminderHandle {
    let task = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            run_tick(&state).await;
        }
    });

    info!(period_secs = period.as_secs_f64(), "reminder task started");
    ReminderHandle { task }
}

pub async fn run_tick(state: &AppState) -> Vec<MedicationId> {
    let now = state.clock.now();
    let mut tracker = state.tracker.lock().await;
    let queued = tracker.evaluate_reminders(now);

    if queued.is_empty() {
        debug!(at = %now, "reminder tick: nothing due");
    }
    for id in &queued {
        if let Some(medication) = tracker.medication(*id) {
            info!(
                medication = %medication.name,
                time = %medication.time,
                "time to take {}", medication.name
            );
        }
    }

    queued
}
