//! Dated diary entries.

pub mod board;
pub mod model;
pub mod view;

pub use board::DiaryBoard;
pub use model::{DiaryEntry, DiaryRow};
pub use view::DiaryView;
