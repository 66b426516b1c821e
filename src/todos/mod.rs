//! Weekly to-do list: seven day slots per week, each holding an ordered list.

pub mod board;
pub mod model;
pub mod view;

pub use board::TodoBoard;
pub use model::{Todo, TodoRow};
pub use view::TodoWeekView;
