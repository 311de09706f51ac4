pub mod board;
pub mod calendar;
pub mod error;
pub mod input;
pub mod milestone;
pub mod selection;
pub mod store;

pub use crate::board::{BoardSnapshot, TodoBoard, TodoBoardBuilder};
pub use crate::error::{TodoError, TodoResult};
