//! Calendar: titled events keyed by date, shown as a month grid.

pub mod board;
pub mod model;
pub mod view;

pub use board::CalendarBoard;
pub use model::{CalendarEvent, CalendarEventRow};
pub use view::{CalendarDayView, CalendarMonthView};
