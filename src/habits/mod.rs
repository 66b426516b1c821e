//! Weekly habit tracker: named habits with a done flag per weekday.

pub mod board;
pub mod model;
pub mod view;

pub use board::HabitBoard;
pub use model::{Habit, HabitRow};
pub use view::HabitWeekView;
