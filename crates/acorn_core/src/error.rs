use thiserror::Error;

use crate::calendar::DayKey;
use crate::store::TaskId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TodoError {
    #[error("task text must not be empty")]
    EmptyText,

    #[error("choose a difficulty between 1 and 5 before adding the task")]
    DifficultyNotChosen,

    #[error("difficulty {value} is outside 1..=5")]
    DifficultyOutOfRange { value: u8 },

    #[error("task {id} not found on {day}")]
    TaskNotFound { day: DayKey, id: TaskId },

    #[error("{day} is not part of the calendar")]
    UnknownDay { day: DayKey },

    #[error("'{value}' is not a YYYY-MM-DD day key")]
    InvalidDayKey { value: String },
}

impl TodoError {
    /// Validation failures abort the submission and are shown to the user as a prompt.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TodoError::EmptyText
                | TodoError::DifficultyNotChosen
                | TodoError::DifficultyOutOfRange { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TodoError::TaskNotFound { .. })
    }
}

pub type TodoResult<T> = Result<T, TodoError>;
