//! planboard: weekly to-dos, monthly budget, habit tracking, diary, and
//! calendar, each mirrored locally over a remote table store.

pub mod api;
pub mod budget;
pub mod calendar;
pub mod config;
pub mod diary;
pub mod error;
pub mod habits;
pub mod period;
pub mod planner;
pub mod record;
pub mod store;
pub mod todos;
