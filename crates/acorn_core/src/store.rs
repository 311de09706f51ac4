use std::collections::BTreeMap;
use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::calendar::DayKey;
use crate::error::{TodoError, TodoResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out creation-time ids in milliseconds. Two ids minted within the same
/// millisecond are separated by one so ids stay unique and increasing.
#[derive(Debug, Clone, Default)]
pub(crate) struct IdClock {
    last: i64,
}

impl IdClock {
    pub(crate) fn next(&mut self) -> i64 {
        self.next_at(Utc::now().timestamp_millis())
    }

    pub(crate) fn next_at(&mut self, now_millis: i64) -> i64 {
        let id = now_millis.max(self.last.saturating_add(1));
        self.last = id;
        id
    }
}

/// How hard a task is, shown as filled acorns. Always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MAX: u8 = 5;

    /// `0` means the user has not picked any acorn yet.
    pub fn new(value: u8) -> TodoResult<Self> {
        match value {
            0 => Err(TodoError::DifficultyNotChosen),
            1..=Self::MAX => Ok(Self(value)),
            _ => Err(TodoError::DifficultyOutOfRange { value }),
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    pub fn points(&self) -> u32 {
        u32::from(self.0)
    }

    /// Filled/empty state for each of the five acorn icons.
    pub fn acorns(&self) -> [bool; Self::MAX as usize] {
        acorn_row(self.0)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = TodoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.0
    }
}

pub fn acorn_row(filled: u8) -> [bool; Difficulty::MAX as usize] {
    let mut row = [false; Difficulty::MAX as usize];
    for (idx, slot) in row.iter_mut().enumerate() {
        *slot = idx < usize::from(filled);
    }
    row
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub total: usize,
    pub completed: usize,
    pub points: u32,
}

/// Tasks grouped by calendar day, newest first within a day.
#[derive(Debug, Default)]
pub struct TaskStore {
    days: BTreeMap<DayKey, Vec<Task>>,
    ids: IdClock,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_task(&mut self, day: DayKey, text: &str, difficulty: u8) -> TodoResult<Task> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TodoError::EmptyText);
        }
        let difficulty = Difficulty::new(difficulty)?;
        let task = Task {
            id: TaskId(self.ids.next()),
            text: text.to_string(),
            completed: false,
            difficulty,
        };
        self.days.entry(day).or_default().insert(0, task.clone());
        Ok(task)
    }

    pub fn toggle_completion(&mut self, day: DayKey, id: TaskId) -> TodoResult<Task> {
        let task = self
            .days
            .get_mut(&day)
            .and_then(|tasks| tasks.iter_mut().find(|task| task.id == id))
            .ok_or(TodoError::TaskNotFound { day, id })?;
        task.completed = !task.completed;
        Ok(task.clone())
    }

    /// Removes the task if present. The day keeps its (possibly empty) entry.
    pub fn delete_task(&mut self, day: DayKey, id: TaskId) -> Option<Task> {
        let tasks = self.days.get_mut(&day)?;
        let idx = tasks.iter().position(|task| task.id == id)?;
        Some(tasks.remove(idx))
    }

    pub fn tasks_for_day(&self, day: DayKey) -> &[Task] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_points(&self) -> u32 {
        self.days
            .values()
            .flatten()
            .filter(|task| task.completed)
            .map(|task| task.difficulty.points())
            .sum()
    }

    pub fn day_summary(&self, day: DayKey) -> DaySummary {
        let tasks = self.tasks_for_day(day);
        DaySummary {
            total: tasks.len(),
            completed: tasks.iter().filter(|task| task.completed).count(),
            points: tasks
                .iter()
                .filter(|task| task.completed)
                .map(|task| task.difficulty.points())
                .sum(),
        }
    }

    pub fn has_day(&self, day: DayKey) -> bool {
        self.days.contains_key(&day)
    }

    pub fn task_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }
}
