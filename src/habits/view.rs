//! Week grid rendering for the habit board.

use serde::Serialize;

use super::model::Habit;
use crate::period::{DAY_ABBREVIATIONS, DAYS_PER_WEEK, WeekKey};
use crate::record::{LocalId, Record};

#[derive(Debug, Clone, Serialize)]
pub struct HabitRowView {
    pub id: LocalId,
    pub name: String,
    pub days: [bool; DAYS_PER_WEEK],
    pub completed: usize,
    pub saved: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HabitWeekView {
    pub week: WeekKey,
    pub offset: i32,
    pub day_headers: [&'static str; DAYS_PER_WEEK],
    pub habits: Vec<HabitRowView>,
}

pub fn render_week(habits: &[Record<Habit>], week: WeekKey, offset: i32) -> HabitWeekView {
    HabitWeekView {
        week,
        offset,
        day_headers: DAY_ABBREVIATIONS,
        habits: habits
            .iter()
            .map(|r| HabitRowView {
                id: r.local_id,
                name: r.data.name.clone(),
                days: r.data.days,
                completed: r.data.completed_days(),
                saved: r.is_saved(),
            })
            .collect(),
    }
}
