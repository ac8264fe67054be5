use crate::errors::{FieldError, ValidationError};
use crate::models::{
    Frequency, Medication, MedicationId, MedicationInput, ScheduleTime, TrackerData,
};
use std::collections::BTreeMap;

const NAME_MIN_CHARS: usize = 2;
const GOLDEN_ANGLE_DEGREES: u64 = 137;

struct ValidMedication {
    name: String,
    dosage: String,
    frequency: Frequency,
    time: ScheduleTime,
}

/// Checks every field and reports all failures at once.
fn validate(input: &MedicationInput) -> Result<ValidMedication, ValidationError> {
    let mut errors = Vec::new();

    let name = input.name.trim();
    if name.chars().count() < NAME_MIN_CHARS {
        errors.push(FieldError::new("name", "Name must be at least 2 characters"));
    }

    let dosage = input.dosage.trim();
    if dosage.is_empty() {
        errors.push(FieldError::new("dosage", "Dosage is required"));
    }

    let frequency = if input.frequency.trim().is_empty() {
        errors.push(FieldError::new("frequency", "Frequency is required"));
        None
    } else {
        match input.frequency.parse::<Frequency>() {
            Ok(frequency) => Some(frequency),
            Err(message) => {
                errors.push(FieldError::new("frequency", message));
                None
            }
        }
    };

    let time = if input.time.trim().is_empty() {
        errors.push(FieldError::new("time", "Time is required"));
        None
    } else {
        match input.time.parse::<ScheduleTime>() {
            Ok(time) => Some(time),
            Err(message) => {
                errors.push(FieldError::new("time", message));
                None
            }
        }
    };

    match (frequency, time) {
        (Some(frequency), Some(time)) if errors.is_empty() => Ok(ValidMedication {
            name: name.to_string(),
            dosage: dosage.to_string(),
            frequency,
            time,
        }),
        _ => Err(ValidationError { errors }),
    }
}

/// Appends a medication and seeds its empty adherence map. State is left
/// untouched when validation fails.
pub fn add_medication(
    data: &mut TrackerData,
    input: &MedicationInput,
) -> Result<Medication, ValidationError> {
    let valid = validate(input)?;

    let id = data.next_id;
    data.next_id = data.next_id.saturating_add(1);

    let medication = Medication {
        id,
        name: valid.name,
        dosage: valid.dosage,
        frequency: valid.frequency,
        time: valid.time,
        reminders_enabled: input.reminders,
        streak: 0,
        color: color_for(id),
    };

    data.medications.push(medication.clone());
    data.adherence.insert(id, BTreeMap::new());

    Ok(medication)
}

pub fn list_medications(data: &TrackerData) -> &[Medication] {
    &data.medications
}

pub fn find_medication(data: &TrackerData, id: MedicationId) -> Option<&Medication> {
    data.medications.iter().find(|medication| medication.id == id)
}

/// Spreads hues around the wheel so neighbouring ids stay distinguishable.
pub fn color_for(id: MedicationId) -> String {
    let hue = id.wrapping_mul(GOLDEN_ANGLE_DEGREES) % 360;
    format!("hsl({hue}, 70%, 60%)")
}
