use crate::models::{AdherenceRecord, DayCell, MedicationId};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::str::FromStr;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d").ok()
}

/// Number of days in `month` (0 = January). Zero for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = first_of_month(year, month) else {
        return 0;
    };
    let next = if month == 11 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 2, 1)
    };
    next.map(|next| (next - first).num_days() as u32).unwrap_or(0)
}

/// Weekday index of the 1st of `month`, 0 = Sunday.
pub fn first_weekday(year: i32, month: u32) -> u32 {
    first_of_month(year, month)
        .map(|date| date.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    if month > 11 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month + 1, 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "prev" | "previous" | "back" => Ok(Direction::Prev),
            "next" | "forward" => Ok(Direction::Next),
            other => Err(format!("direction must be 'prev' or 'next', got '{other}'")),
        }
    }
}

/// The month currently on screen. `month` is 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthView {
    year: i32,
    month: u32,
}

impl MonthView {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        first_of_month(year, month).map(|_| Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn navigate(self, direction: Direction) -> Self {
        match (direction, self.month) {
            (Direction::Prev, 0) => Self {
                year: self.year - 1,
                month: 11,
            },
            (Direction::Prev, month) => Self {
                year: self.year,
                month: month - 1,
            },
            (Direction::Next, 11) => Self {
                year: self.year + 1,
                month: 0,
            },
            (Direction::Next, month) => Self {
                year: self.year,
                month: month + 1,
            },
        }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month
    }

    pub fn days(self) -> u32 {
        days_in_month(self.year, self.month)
    }

    pub fn label(self) -> String {
        format!("{} {}", MONTH_NAMES[self.month as usize], self.year)
    }
}

/// Lazily yields the cells of a 7-column, Sunday-first month grid: leading
/// blanks, then one cell per real day. Clone it to walk the grid again.
#[derive(Debug, Clone)]
pub struct MonthDays<'a> {
    view: MonthView,
    today: NaiveDate,
    taken: Option<&'a BTreeMap<String, bool>>,
    blanks: u32,
    days: u32,
    next: u32,
}

impl Iterator for MonthDays<'_> {
    type Item = DayCell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.blanks + self.days {
            return None;
        }
        let index = self.next;
        self.next += 1;

        if index < self.blanks {
            return Some(DayCell::Blank);
        }

        let day = index - self.blanks + 1;
        let date = NaiveDate::from_ymd_opt(self.view.year, self.view.month + 1, day)?;
        let key = date_key(date);
        let is_taken = self
            .taken
            .and_then(|days| days.get(&key))
            .copied()
            .unwrap_or(false);

        Some(DayCell::Day {
            day,
            date: key,
            is_today: date == self.today,
            is_taken,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.blanks + self.days).saturating_sub(self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MonthDays<'_> {}

/// Builds the grid for `view`, reading taken flags for `medication_id` when
/// one is given.
pub fn generate_days<'a>(
    adherence: &'a AdherenceRecord,
    view: MonthView,
    medication_id: Option<MedicationId>,
    today: NaiveDate,
) -> MonthDays<'a> {
    MonthDays {
        view,
        today,
        taken: medication_id.and_then(|id| adherence.get(&id)),
        blanks: first_weekday(view.year, view.month),
        days: view.days(),
        next: 0,
    }
}

/// Flips the taken flag for `key`. Returns the new state, or `None` without
/// touching anything when no medication is selected.
pub fn toggle_taken(
    adherence: &mut AdherenceRecord,
    selected: Option<MedicationId>,
    key: &str,
) -> Option<bool> {
    let id = selected?;
    let days = adherence.entry(id).or_default();
    let taken = days.entry(key.to_string()).or_insert(false);
    *taken = !*taken;
    Some(*taken)
}

pub fn is_taken(adherence: &AdherenceRecord, id: MedicationId, date: NaiveDate) -> bool {
    adherence
        .get(&id)
        .and_then(|days| days.get(&date_key(date)))
        .copied()
        .unwrap_or(false)
}
