//! Fixed periodization tables: three ramp weeks followed by a deload week.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CycleError, Role};

/// Number of weeks in one cycle.
pub const WEEKS_PER_CYCLE: u8 = 4;

/// Warm-up slots dropped from the main table in standard (non-extended) form.
const WARMUP_SLOTS: usize = 3;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RepScheme {
    /// A plain rep count for one set.
    Straight(u32),
    /// A sets-by-reps volume block, e.g. 5x10.
    SetsOf { sets: u32, reps: u32 },
}

impl fmt::Display for RepScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepScheme::Straight(reps) => write!(f, "{}", reps),
            RepScheme::SetsOf { sets, reps } => write!(f, "{}x{}", sets, reps),
        }
    }
}

/// One prescribed set: a rep scheme at a percentage of the training max.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetSlot {
    pub reps: RepScheme,
    pub percent_of_max: f64,
}

impl SetSlot {
    /// Working weight for this slot, rounded to two decimals.
    pub fn weight_for(&self, training_max: f64) -> f64 {
        (self.percent_of_max * training_max * 100.0).round() / 100.0
    }
}

const fn straight(reps: u32, percent: f64) -> Option<SetSlot> {
    Some(SetSlot {
        reps: RepScheme::Straight(reps),
        percent_of_max: percent,
    })
}

const fn volume(sets: u32, reps: u32, percent: f64) -> Option<SetSlot> {
    Some(SetSlot {
        reps: RepScheme::SetsOf { sets, reps },
        percent_of_max: percent,
    })
}

/// Main-lift table, extended form. The standard form is this table truncated
/// to the last three slots of each week, which drops the warm-up ramp on
/// weeks one through three and the omitted deload slots on week four.
const MAIN_WEEKS: [[Option<SetSlot>; 6]; 4] = [
    [
        straight(5, 0.40),
        straight(5, 0.47),
        straight(3, 0.55),
        straight(5, 0.65),
        straight(5, 0.75),
        straight(5, 0.85),
    ],
    [
        straight(5, 0.40),
        straight(5, 0.50),
        straight(3, 0.60),
        straight(3, 0.70),
        straight(3, 0.80),
        straight(3, 0.90),
    ],
    [
        straight(5, 0.40),
        straight(5, 0.50),
        straight(3, 0.60),
        straight(5, 0.75),
        straight(3, 0.85),
        straight(1, 0.95),
    ],
    // Deload week: the warm-up ramp is skipped entirely.
    [
        None,
        None,
        None,
        straight(5, 0.40),
        straight(5, 0.50),
        straight(5, 0.60),
    ],
];

/// Accessory table: a single high-volume slot per week.
const SUPPORT_WEEKS: [[Option<SetSlot>; 1]; 4] = [
    [volume(5, 10, 0.85)],
    [volume(5, 10, 0.90)],
    [volume(5, 10, 0.95)],
    [volume(5, 10, 0.60)],
];

/// Slot sequence for one week of one exercise.
///
/// `None` entries mark sets omitted on the deload week. Weeks run 1 through
/// 4; anything else is rejected. The extension flag only applies to main
/// lifts and is ignored for accessories.
pub fn week_slots(
    role: Role,
    extended: bool,
    week: u8,
) -> Result<&'static [Option<SetSlot>], CycleError> {
    if !(1..=WEEKS_PER_CYCLE).contains(&week) {
        return Err(CycleError::InvalidWeek(week));
    }
    let idx = (week - 1) as usize;
    Ok(match role {
        Role::Main if extended => &MAIN_WEEKS[idx][..],
        Role::Main => &MAIN_WEEKS[idx][WARMUP_SLOTS..],
        Role::Support => &SUPPORT_WEEKS[idx][..],
    })
}

/// Number of set-slots per week for a role/extension combination.
pub fn slots_per_exercise(role: Role, extended: bool) -> usize {
    match role {
        Role::Main if extended => MAIN_WEEKS[0].len(),
        Role::Main => MAIN_WEEKS[0].len() - WARMUP_SLOTS,
        Role::Support => SUPPORT_WEEKS[0].len(),
    }
}
