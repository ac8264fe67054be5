use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub type MedicationId = u64;

/// Taken flags keyed by medication id, then by date-key (`YYYY-MM-DD`).
/// A date-key is only present once it has been toggled.
pub type AdherenceRecord = BTreeMap<MedicationId, BTreeMap<String, bool>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    Daily,
    Weekly,
    #[serde(rename = "As Needed")]
    AsNeeded,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::AsNeeded => "As Needed",
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "as needed" | "as_needed" | "asneeded" => Ok(Frequency::AsNeeded),
            other => Err(format!(
                "unknown frequency '{other}', expected Daily, Weekly or As Needed"
            )),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduled time of day, serialized as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScheduleTime {
    pub hour: u32,
    pub minute: u32,
}

impl FromStr for ScheduleTime {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        let (hour, minute) = value
            .split_once(':')
            .ok_or_else(|| format!("time '{value}' must be formatted as HH:MM"))?;

        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !digits(hour) || hour.len() > 2 || !digits(minute) || minute.len() != 2 {
            return Err(format!("time '{value}' must be formatted as HH:MM"));
        }

        let hour: u32 = hour.parse().map_err(|_| format!("invalid hour in '{value}'"))?;
        let minute: u32 = minute
            .parse()
            .map_err(|_| format!("invalid minute in '{value}'"))?;
        if hour > 23 {
            return Err(format!("hour {hour} is out of range 0-23"));
        }
        if minute > 59 {
            return Err(format!("minute {minute} is out of range 0-59"));
        }

        Ok(Self { hour, minute })
    }
}

impl TryFrom<String> for ScheduleTime {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ScheduleTime> for String {
    fn from(time: ScheduleTime) -> Self {
        time.to_string()
    }
}

impl fmt::Display for ScheduleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: MedicationId,
    pub name: String,
    pub dosage: String,
    pub frequency: Frequency,
    pub time: ScheduleTime,
    pub reminders_enabled: bool,
    pub streak: u32,
    pub color: String,
}

/// Everything that survives a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerData {
    #[serde(default = "first_id")]
    pub next_id: MedicationId,
    #[serde(default)]
    pub medications: Vec<Medication>,
    #[serde(default)]
    pub adherence: AdherenceRecord,
}

impl Default for TrackerData {
    fn default() -> Self {
        Self {
            next_id: first_id(),
            medications: Vec::new(),
            adherence: AdherenceRecord::new(),
        }
    }
}

fn first_id() -> MedicationId {
    1
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MedicationInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub time: String,
    #[serde(default = "reminders_default")]
    pub reminders: bool,
}

fn reminders_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DayCell {
    Blank,
    Day {
        day: u32,
        date: String,
        is_today: bool,
        is_taken: bool,
    },
}

#[derive(Debug, Serialize)]
pub struct MedicationView {
    #[serde(flatten)]
    pub medication: Medication,
    pub adherence: u8,
}

#[derive(Debug, Serialize)]
pub struct MedicationListResponse {
    pub medications: Vec<MedicationView>,
}

#[derive(Debug, Serialize)]
pub struct AddMedicationResponse {
    pub medication: Medication,
    pub notice: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub medication_id: Option<MedicationId>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub medication: Option<Medication>,
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub cells: Vec<DayCell>,
    pub adherence: u8,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub direction: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub toggled: bool,
    pub date: String,
    pub taken: Option<bool>,
    pub notice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReminderResponse {
    pub visible: bool,
    pub medication: Option<Medication>,
    pub queued: usize,
    pub notice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub current_streak: u32,
    pub monthly_adherence: u8,
    pub total_medications: usize,
}
