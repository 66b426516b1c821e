//! Habit data model.

use serde::{Deserialize, Serialize};

use crate::period::DAYS_PER_WEEK;
use crate::record::RemoteId;

/// A habit tracked across the seven days of one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub name: String,
    /// Done-state per day, Monday first.
    #[serde(default)]
    pub days: [bool; DAYS_PER_WEEK],
}

impl Habit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            days: [false; DAYS_PER_WEEK],
        }
    }

    pub fn completed_days(&self) -> usize {
        self.days.iter().filter(|d| **d).count()
    }
}

/// A `habits` table row as returned by a bulk read.
#[derive(Debug, Clone, PartialEq)]
pub struct HabitRow {
    pub id: RemoteId,
    pub week_key: String,
    pub habit: Habit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_habit_has_seven_unchecked_days() {
        let habit = Habit::new("Stretch");
        assert_eq!(habit.days, [false; 7]);
        assert_eq!(habit.completed_days(), 0);
    }

    #[test]
    fn missing_days_default_to_unchecked() {
        let habit: Habit = serde_json::from_str(r#"{"name":"Read"}"#).unwrap();
        assert_eq!(habit.days, [false; 7]);
    }
}
