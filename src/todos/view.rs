//! Week rendering for the to-do board.

use std::collections::BTreeMap;

use serde::Serialize;

use super::board::WeekSlots;
use crate::period::{DAY_NAMES, WeekKey};
use crate::record::LocalId;

#[derive(Debug, Clone, Serialize)]
pub struct TodoItemView {
    pub id: LocalId,
    pub text: String,
    pub note: String,
    pub done: bool,
    /// False until the remote insert has succeeded.
    pub saved: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TodoDayView {
    pub index: usize,
    pub name: &'static str,
    pub items: Vec<TodoItemView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TodoWeekView {
    pub week: WeekKey,
    pub offset: i32,
    pub days: Vec<TodoDayView>,
}

/// Render one week. A week with no mirrored entry renders as seven empty days.
pub fn render_week(
    weeks: &BTreeMap<WeekKey, WeekSlots>,
    week: WeekKey,
    offset: i32,
) -> TodoWeekView {
    let slots = weeks.get(&week);
    let days = DAY_NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| TodoDayView {
            index,
            name,
            items: slots
                .map(|slots| {
                    slots[index]
                        .iter()
                        .map(|r| TodoItemView {
                            id: r.local_id,
                            text: r.data.text.clone(),
                            note: r.data.note.clone(),
                            done: r.data.done,
                            saved: r.is_saved(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect();
    TodoWeekView { week, offset, days }
}
