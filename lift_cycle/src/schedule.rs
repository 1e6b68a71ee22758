//! Schedule assembly: per-exercise row blocks stacked into the cycle table.

use serde::Serialize;

use crate::plan::{slots_per_exercise, week_slots, RepScheme, WEEKS_PER_CYCLE};
use crate::{CycleError, Exercise, Role, TrainingDay};

/// A prescribed set with its working weight resolved from the training max.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct LoadedSet {
    pub reps: RepScheme,
    pub weight: f64,
}

/// One output row: a single set-slot across all four weeks, tagged with the
/// exercise it belongs to. The increment annotation appears only on an
/// exercise's first row; deload placeholders are empty week cells.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SetRow {
    pub day: u32,
    pub exercise: String,
    pub weeks: [Option<LoadedSet>; WEEKS_PER_CYCLE as usize],
    pub increment_next_cycle: Option<f64>,
}

/// The full cycle table. Derived fresh each cycle, never persisted.
#[derive(Clone, Debug, Default)]
pub struct Schedule {
    pub rows: Vec<SetRow>,
}

impl Schedule {
    /// Column headers for the tabular rendering of the schedule.
    pub fn headers() -> Vec<String> {
        let mut headers = vec!["Day".to_string(), "Exercise".to_string()];
        for week in 1..=WEEKS_PER_CYCLE {
            headers.push(format!("Week {} Reps", week));
            headers.push(format!("Week {} Weight", week));
        }
        headers.push("Increment for Next Cycle".to_string());
        headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Expand one exercise into its block of rows, slot by slot.
fn exercise_rows(
    day: u32,
    exercise: &Exercise,
    role: Role,
    extended: bool,
) -> Result<Vec<SetRow>, CycleError> {
    let slots = slots_per_exercise(role, extended);
    let mut rows = Vec::with_capacity(slots);
    for slot_idx in 0..slots {
        let mut weeks = [None; WEEKS_PER_CYCLE as usize];
        for week in 1..=WEEKS_PER_CYCLE {
            let table = week_slots(role, extended, week)?;
            weeks[(week - 1) as usize] = table[slot_idx].map(|slot| LoadedSet {
                reps: slot.reps,
                weight: slot.weight_for(exercise.training_max),
            });
        }
        rows.push(SetRow {
            day,
            exercise: exercise.name.clone(),
            weeks,
            increment_next_cycle: (slot_idx == 0).then_some(exercise.increment_per_cycle),
        });
    }
    Ok(rows)
}

/// Build the schedule for one four-week cycle.
///
/// Days are numbered 1-based in input order. Within a day, main lifts come
/// before accessories, each in roster order. The extension flag applies
/// uniformly to every main lift in the run; accessories are never extended.
/// An empty roster yields an empty schedule, not an error.
pub fn build_schedule(days: &[TrainingDay], extended: bool) -> Result<Schedule, CycleError> {
    let mut rows = Vec::new();
    for (i, day) in days.iter().enumerate() {
        let day_no = (i + 1) as u32;
        for exercise in &day.main {
            rows.extend(exercise_rows(day_no, exercise, Role::Main, extended)?);
        }
        for exercise in &day.support {
            rows.extend(exercise_rows(day_no, exercise, Role::Support, false)?);
        }
    }
    Ok(Schedule { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::{advance_roster, ProgressionState};
    use crate::{group_roster, RosterEntry};

    fn two_day_roster() -> Vec<TrainingDay> {
        vec![
            TrainingDay {
                main: vec![Exercise::new("Squat", 188.0, 10.0)],
                support: vec![Exercise::new("GM Standing", 76.5, 1.25)],
            },
            TrainingDay {
                main: vec![Exercise::new("Bench", 139.0, 5.0)],
                support: vec![Exercise::new("DB Flies", 69.5, 2.5)],
            },
        ]
    }

    #[test]
    fn two_day_cycle_row_count_and_order() {
        let schedule = build_schedule(&two_day_roster(), true).unwrap();
        assert_eq!(schedule.len(), 14);

        let days: Vec<u32> = schedule.rows.iter().map(|r| r.day).collect();
        assert_eq!(days, [[1u32; 7].as_slice(), [2u32; 7].as_slice()].concat());

        let day_one: Vec<&str> = schedule.rows[..7]
            .iter()
            .map(|r| r.exercise.as_str())
            .collect();
        assert_eq!(
            day_one,
            ["Squat"; 6]
                .iter()
                .chain(["GM Standing"].iter())
                .copied()
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn increment_annotated_on_first_row_only() {
        let schedule = build_schedule(&two_day_roster(), true).unwrap();
        assert_eq!(schedule.rows[0].increment_next_cycle, Some(10.0));
        assert!(schedule.rows[1..6]
            .iter()
            .all(|r| r.increment_next_cycle.is_none()));
        assert_eq!(schedule.rows[6].increment_next_cycle, Some(1.25));
    }

    #[test]
    fn deload_cells_are_blank_for_extended_mains() {
        let schedule = build_schedule(&two_day_roster(), true).unwrap();
        let deload_idx = (WEEKS_PER_CYCLE - 1) as usize;
        for row in &schedule.rows[..3] {
            assert!(row.weeks[deload_idx].is_none());
            assert!(row.weeks[..deload_idx].iter().all(Option::is_some));
        }
        for row in &schedule.rows[3..6] {
            assert!(row.weeks[deload_idx].is_some());
        }
    }

    #[test]
    fn accessories_are_never_extended() {
        let schedule = build_schedule(&two_day_roster(), true).unwrap();
        let support: Vec<&SetRow> = schedule
            .rows
            .iter()
            .filter(|r| r.exercise == "GM Standing")
            .collect();
        assert_eq!(support.len(), 1);
        let first_week = support[0].weeks[0].unwrap();
        assert_eq!(first_week.reps, RepScheme::SetsOf { sets: 5, reps: 10 });
        assert_eq!(first_week.weight, 65.03);
    }

    #[test]
    fn empty_roster_yields_empty_schedule() {
        let schedule = build_schedule(&[], true).unwrap();
        assert!(schedule.is_empty());
        assert_eq!(Schedule::headers().len(), 11);
    }

    #[test]
    fn weights_never_decrease_across_cycles() {
        let mut entries = vec![
            RosterEntry {
                day: 1,
                exercise: "Squat".to_string(),
                role: "main".to_string(),
                training_max: 188.0,
                increment_per_cycle: 10.0,
            },
            RosterEntry {
                day: 1,
                exercise: "Situp".to_string(),
                role: "support".to_string(),
                training_max: 17.1,
                increment_per_cycle: 0.0,
            },
        ];
        let first = build_schedule(&group_roster(&entries).unwrap(), true).unwrap();

        let mut state = ProgressionState::default();
        advance_roster(&mut entries, &mut state).unwrap();
        let second = build_schedule(&group_roster(&entries).unwrap(), true).unwrap();

        assert_eq!(first.len(), second.len());
        for (before, after) in first.rows.iter().zip(second.rows.iter()) {
            for (a, b) in before.weeks.iter().zip(after.weeks.iter()) {
                match (a, b) {
                    (Some(a), Some(b)) => assert!(b.weight >= a.weight),
                    (None, None) => {}
                    _ => panic!("slot shape changed between cycles"),
                }
            }
        }
    }
}
