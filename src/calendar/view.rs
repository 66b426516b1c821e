//! Month grid and day list rendering for the calendar board.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::model::CalendarEvent;
use crate::period::MonthKey;
use crate::record::{LocalId, Record};

#[derive(Debug, Clone, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub day: u32,
    pub has_events: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarMonthView {
    pub month: MonthKey,
    pub offset: i32,
    /// e.g. "October 2026".
    pub label: String,
    /// Empty cells before day 1 in a Sunday-first grid.
    pub leading_blanks: u32,
    pub cells: Vec<DayCell>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarEventView {
    pub id: LocalId,
    pub title: String,
    pub note: String,
    pub saved: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarDayView {
    pub date: NaiveDate,
    pub events: Vec<CalendarEventView>,
}

pub fn render_month(
    events: &BTreeMap<NaiveDate, Vec<Record<CalendarEvent>>>,
    month: MonthKey,
    offset: i32,
) -> CalendarMonthView {
    let Some(first) = month.first_day() else {
        return CalendarMonthView {
            month,
            offset,
            label: month.to_string(),
            leading_blanks: 0,
            cells: Vec::new(),
        };
    };

    let cells = first
        .iter_days()
        .take_while(|date| month.contains(*date))
        .map(|date| DayCell {
            date,
            day: date.day(),
            has_events: events.get(&date).is_some_and(|list| !list.is_empty()),
        })
        .collect();

    CalendarMonthView {
        month,
        offset,
        label: first.format("%B %Y").to_string(),
        leading_blanks: first.weekday().num_days_from_sunday(),
        cells,
    }
}

pub fn render_day(events: &BTreeMap<NaiveDate, Vec<Record<CalendarEvent>>>, date: NaiveDate) -> CalendarDayView {
    CalendarDayView {
        date,
        events: events
            .get(&date)
            .map(|list| {
                list.iter()
                    .map(|r| CalendarEventView {
                        id: r.local_id,
                        title: r.data.title.clone(),
                        note: r.data.note.clone(),
                        saved: r.is_saved(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}
