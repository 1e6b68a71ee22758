//! Core four-week periodization engine for strength-training cycles.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod plan;
pub mod progression;
pub mod schedule;

pub use plan::{slots_per_exercise, week_slots, RepScheme, SetSlot, WEEKS_PER_CYCLE};
pub use progression::{advance_roster, ProgressionState};
pub use schedule::{build_schedule, LoadedSet, Schedule, SetRow};

#[derive(Error, Debug)]
pub enum CycleError {
    #[error("unknown exercise role '{role}' for day {day} exercise '{name}'")]
    UnknownRole { day: u32, name: String, role: String },
    #[error("invalid week {0}: cycle weeks run 1 through 4")]
    InvalidWeek(u8),
    #[error("day {day} has an exercise with an empty name")]
    EmptyExerciseName { day: u32 },
    #[error("training max for '{name}' must be positive, got {value}")]
    NonPositiveTrainingMax { name: String, value: f64 },
    #[error("training maxes already advanced for cycle {cycle}")]
    AlreadyAdvanced { cycle: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Main,
    Support,
}

impl Role {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "main" => Some(Role::Main),
            "support" => Some(Role::Support),
            _ => None,
        }
    }
}

/// One persisted roster line: a single exercise on a single day.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RosterEntry {
    pub day: u32,
    pub exercise: String,
    #[serde(rename = "type")]
    pub role: String,
    pub training_max: f64,
    pub increment_per_cycle: f64,
}

/// A validated exercise ready for scheduling.
#[derive(Clone, Debug, PartialEq)]
pub struct Exercise {
    pub name: String,
    pub training_max: f64,
    pub increment_per_cycle: f64,
}

impl Exercise {
    pub fn new(name: impl Into<String>, training_max: f64, increment_per_cycle: f64) -> Self {
        Self {
            name: name.into(),
            training_max,
            increment_per_cycle,
        }
    }
}

/// One training day: main lifts first, then accessories, in roster order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrainingDay {
    pub main: Vec<Exercise>,
    pub support: Vec<Exercise>,
}

/// Group roster entries into training days, validating each record.
///
/// Days are ordered by first appearance in the roster, and exercises keep
/// their relative input order within a day. Any malformed record aborts the
/// whole grouping; no partial result is returned.
pub fn group_roster(entries: &[RosterEntry]) -> Result<Vec<TrainingDay>, CycleError> {
    let mut order: Vec<u32> = Vec::new();
    let mut days: Vec<TrainingDay> = Vec::new();

    for entry in entries {
        let name = entry.exercise.trim();
        if name.is_empty() {
            return Err(CycleError::EmptyExerciseName { day: entry.day });
        }
        if !(entry.training_max > 0.0) {
            return Err(CycleError::NonPositiveTrainingMax {
                name: name.to_string(),
                value: entry.training_max,
            });
        }
        let role = Role::parse(entry.role.trim()).ok_or_else(|| CycleError::UnknownRole {
            day: entry.day,
            name: name.to_string(),
            role: entry.role.clone(),
        })?;

        let idx = match order.iter().position(|&d| d == entry.day) {
            Some(idx) => idx,
            None => {
                order.push(entry.day);
                days.push(TrainingDay::default());
                days.len() - 1
            }
        };
        let exercise = Exercise::new(name, entry.training_max, entry.increment_per_cycle);
        match role {
            Role::Main => days[idx].main.push(exercise),
            Role::Support => days[idx].support.push(exercise),
        }
    }

    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day: u32, name: &str, role: &str, tm: f64) -> RosterEntry {
        RosterEntry {
            day,
            exercise: name.to_string(),
            role: role.to_string(),
            training_max: tm,
            increment_per_cycle: 2.5,
        }
    }

    #[test]
    fn groups_days_by_first_appearance() {
        let entries = vec![
            entry(3, "Bench", "main", 139.0),
            entry(1, "Squat", "main", 188.0),
            entry(3, "DB Flies", "support", 69.5),
            entry(1, "Situp", "support", 17.1),
        ];
        let days = group_roster(&entries).unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].main[0].name, "Bench");
        assert_eq!(days[0].support[0].name, "DB Flies");
        assert_eq!(days[1].main[0].name, "Squat");
        assert_eq!(days[1].support[0].name, "Situp");
    }

    #[test]
    fn preserves_within_day_order() {
        let entries = vec![
            entry(1, "GM Standing", "support", 76.5),
            entry(1, "Squat", "main", 188.0),
            entry(1, "DB Lunge", "support", 69.5),
        ];
        let days = group_roster(&entries).unwrap();
        assert_eq!(days[0].main.len(), 1);
        let supports: Vec<&str> = days[0].support.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(supports, ["GM Standing", "DB Lunge"]);
    }

    #[test]
    fn unknown_role_names_the_record() {
        let entries = vec![entry(2, "Deadlift", "primary", 215.0)];
        let err = group_roster(&entries).unwrap_err();
        match err {
            CycleError::UnknownRole { day, name, role } => {
                assert_eq!(day, 2);
                assert_eq!(name, "Deadlift");
                assert_eq!(role, "primary");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_empty_exercise_name() {
        let entries = vec![entry(1, "  ", "main", 100.0)];
        assert!(matches!(
            group_roster(&entries),
            Err(CycleError::EmptyExerciseName { day: 1 })
        ));
    }

    #[test]
    fn rejects_non_positive_training_max() {
        let entries = vec![entry(1, "Pullup", "support", 0.0)];
        assert!(matches!(
            group_roster(&entries),
            Err(CycleError::NonPositiveTrainingMax { .. })
        ));
    }
}
