use tracing::debug;

use crate::board::TodoBoard;
use crate::calendar::DayKey;
use crate::error::TodoResult;
use crate::store::{Difficulty, Task};

pub const INPUT_PLACEHOLDER: &str = "Add a new todo.";

/// Draft state of the "new task" region. While inactive the region shows
/// static placeholder text; while active it holds an editable draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InputDraft {
    #[default]
    Inactive,
    Active {
        text: String,
        difficulty: u8,
    },
}

impl InputDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        matches!(self, InputDraft::Active { .. })
    }

    /// Outside clicks only matter while a draft is open.
    pub fn wants_outside_click(&self) -> bool {
        self.is_active()
    }

    pub fn placeholder(&self) -> &'static str {
        INPUT_PLACEHOLDER
    }

    /// Returns true when this call moved the region from inactive to active,
    /// i.e. when the view should focus the field.
    pub fn activate(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        *self = InputDraft::Active {
            text: String::new(),
            difficulty: 0,
        };
        true
    }

    pub fn text(&self) -> &str {
        match self {
            InputDraft::Active { text, .. } => text,
            InputDraft::Inactive => "",
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut String> {
        match self {
            InputDraft::Active { text, .. } => Some(text),
            InputDraft::Inactive => None,
        }
    }

    pub fn set_text(&mut self, value: impl Into<String>) {
        if let Some(text) = self.text_mut() {
            *text = value.into();
        }
    }

    pub fn difficulty(&self) -> u8 {
        match self {
            InputDraft::Active { difficulty, .. } => *difficulty,
            InputDraft::Inactive => 0,
        }
    }

    /// Clicking the acorn that is already chosen clears the choice.
    pub fn choose_difficulty(&mut self, value: u8) {
        if let InputDraft::Active { difficulty, .. } = self {
            let value = value.min(Difficulty::MAX);
            *difficulty = if *difficulty == value { 0 } else { value };
        }
    }

    /// Adds the draft to the selected day. A rejected draft stays open and
    /// untouched so the user can fix it.
    pub fn submit(&mut self, board: &TodoBoard) -> TodoResult<Task> {
        self.submit_to(board, board.selected_day())
    }

    /// Adds the draft to `day`, the day that was on screen when the user
    /// pressed submit.
    pub fn submit_to(&mut self, board: &TodoBoard, day: DayKey) -> TodoResult<Task> {
        let task = board.add_task(day, self.text(), self.difficulty())?;
        *self = InputDraft::Inactive;
        Ok(task)
    }

    /// Click outside the region: close and drop the draft.
    pub fn dismiss(&mut self) {
        if self.is_active() {
            debug!("input dismissed");
        }
        *self = InputDraft::Inactive;
    }
}
