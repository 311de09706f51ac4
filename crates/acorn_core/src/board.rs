use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    calendar::{Calendar, CalendarDay, CalendarWindow, DayKey},
    error::{TodoError, TodoResult},
    milestone::{MilestoneNotifier, Notification, NotificationSink},
    selection::{Selection, StripGeometry},
    store::{DaySummary, Task, TaskId, TaskStore},
};

/// Demo tasks shown when sample seeding is enabled, top to bottom.
const SAMPLE_TASKS: [(&str, u8, bool); 4] = [
    ("Study Rust", 4, true),
    ("Sketch the todo design", 3, false),
    ("Sketch the todo design", 4, false),
    ("Sketch the todo design", 5, false),
];

#[derive(Debug, Clone, Serialize)]
pub struct DayView {
    pub key: DayKey,
    #[serde(flatten)]
    pub day: CalendarDay,
    pub summary: DaySummary,
    pub selected: bool,
}

/// Everything the view needs for one render.
#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    pub days: Vec<DayView>,
    pub selected: DayKey,
    pub tasks: Vec<Task>,
    pub total_points: u32,
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
    pub panel_open: bool,
}

pub struct TodoBoard {
    calendar: Calendar,
    store: RwLock<TaskStore>,
    notifier: RwLock<MilestoneNotifier>,
    selection: RwLock<Selection>,
    panel_open: RwLock<bool>,
    notification_sink: Option<Box<dyn NotificationSink>>,
}

pub struct TodoBoardBuilder {
    window: CalendarWindow,
    calendar: Option<Calendar>,
    today: Option<NaiveDate>,
    notification_sink: Option<Box<dyn NotificationSink>>,
}

impl TodoBoardBuilder {
    pub fn new() -> Self {
        Self {
            window: CalendarWindow::default(),
            calendar: None,
            today: None,
            notification_sink: None,
        }
    }

    pub fn with_window(mut self, window: CalendarWindow) -> Self {
        self.window = window;
        self
    }

    /// Use an already generated day sequence instead of the window.
    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = Some(calendar);
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn with_notification_sink(mut self, sink: Box<dyn NotificationSink>) -> Self {
        self.notification_sink = Some(sink);
        self
    }

    pub fn build(self) -> Result<TodoBoard> {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let calendar = match self.calendar {
            Some(calendar) => calendar,
            None => Calendar::new(self.window, today),
        };
        let initial = calendar
            .default_selection(today)
            .ok_or_else(|| anyhow!("calendar window {:?} contains no days", self.window))?;
        info!(
            day_count = calendar.len(),
            initial = %initial,
            "board created"
        );
        Ok(TodoBoard {
            calendar,
            store: RwLock::new(TaskStore::new()),
            notifier: RwLock::new(MilestoneNotifier::new()),
            selection: RwLock::new(Selection::new(initial)),
            panel_open: RwLock::new(false),
            notification_sink: self.notification_sink,
        })
    }
}

impl Default for TodoBoardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoBoard {
    pub fn builder() -> TodoBoardBuilder {
        TodoBoardBuilder::new()
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn add_task(&self, day: DayKey, text: &str, difficulty: u8) -> TodoResult<Task> {
        self.ensure_known_day(day)?;
        let mut store = self.store.write();
        let task = match store.add_task(day, text, difficulty) {
            Ok(task) => task,
            Err(err) => {
                warn!(day = %day, %err, "task rejected");
                return Err(err);
            }
        };
        info!(day = %day, id = %task.id, difficulty = task.difficulty.get(), "task added");
        self.observe_total(store.total_points());
        Ok(task)
    }

    pub fn add_task_to_selected(&self, text: &str, difficulty: u8) -> TodoResult<Task> {
        self.add_task(self.selected_day(), text, difficulty)
    }

    pub fn toggle_task(&self, day: DayKey, id: TaskId) -> TodoResult<Task> {
        let mut store = self.store.write();
        let task = store.toggle_completion(day, id)?;
        info!(day = %day, id = %id, completed = task.completed, "task toggled");
        self.observe_total(store.total_points());
        Ok(task)
    }

    pub fn toggle_selected(&self, id: TaskId) -> TodoResult<Task> {
        self.toggle_task(self.selected_day(), id)
    }

    pub fn delete_task(&self, day: DayKey, id: TaskId) -> Option<Task> {
        let mut store = self.store.write();
        let removed = store.delete_task(day, id);
        match &removed {
            Some(task) => {
                info!(day = %day, id = %task.id, "task deleted");
                self.observe_total(store.total_points());
            }
            None => debug!(day = %day, id = %id, "delete ignored for unknown task"),
        }
        removed
    }

    pub fn total_points(&self) -> u32 {
        self.store.read().total_points()
    }

    pub fn tasks_for_day(&self, day: DayKey) -> Vec<Task> {
        self.store.read().tasks_for_day(day).to_vec()
    }

    pub fn selected_tasks(&self) -> Vec<Task> {
        self.tasks_for_day(self.selected_day())
    }

    pub fn selected_day(&self) -> DayKey {
        self.selection.read().selected()
    }

    pub fn select_day(&self, day: DayKey) -> TodoResult<bool> {
        self.ensure_known_day(day)?;
        let changed = self.selection.write().select_day(day);
        if changed {
            debug!(day = %day, "day selected");
        }
        Ok(changed)
    }

    pub fn on_scroll(&self, geometry: &StripGeometry) -> bool {
        let changed = self.selection.write().on_scroll(geometry);
        if changed {
            debug!(day = %self.selected_day(), "selection followed scroll");
        }
        changed
    }

    pub fn cancel_recentering(&self) {
        self.selection.write().cancel_recentering();
    }

    pub fn take_scroll_request(&self) -> Option<DayKey> {
        self.selection.write().take_scroll_request()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifier.read().notifications().to_vec()
    }

    pub fn unread_count(&self) -> usize {
        self.notifier.read().unread_count()
    }

    pub fn panel_open(&self) -> bool {
        *self.panel_open.read()
    }

    pub fn open_notifications(&self) {
        *self.panel_open.write() = true;
    }

    /// Closing the panel marks every notification read in one go.
    pub fn close_notifications(&self) -> usize {
        {
            let mut open = self.panel_open.write();
            if !*open {
                return 0;
            }
            *open = false;
        }
        let flipped = self.notifier.write().mark_all_read();
        debug!(flipped, "notifications marked read");
        flipped
    }

    pub fn toggle_notifications(&self) {
        if self.panel_open() {
            self.close_notifications();
        } else {
            self.open_notifications();
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let selected = self.selected_day();
        let store = self.store.read();
        let notifier = self.notifier.read();
        let days = self
            .calendar
            .days()
            .iter()
            .map(|day| DayView {
                key: day.key(),
                day: day.clone(),
                summary: store.day_summary(day.key()),
                selected: day.key() == selected,
            })
            .collect();
        BoardSnapshot {
            days,
            selected,
            tasks: store.tasks_for_day(selected).to_vec(),
            total_points: store.total_points(),
            notifications: notifier.notifications().to_vec(),
            unread_count: notifier.unread_count(),
            panel_open: self.panel_open(),
        }
    }

    pub fn seed_sample_tasks(&self, day: DayKey) -> TodoResult<Vec<Task>> {
        let mut seeded = Vec::with_capacity(SAMPLE_TASKS.len());
        for (text, difficulty, completed) in SAMPLE_TASKS.iter().rev() {
            let task = self.add_task(day, text, *difficulty)?;
            let task = if *completed {
                self.toggle_task(day, task.id)?
            } else {
                task
            };
            seeded.push(task);
        }
        seeded.reverse();
        info!(day = %day, count = seeded.len(), "sample tasks seeded");
        Ok(seeded)
    }
}

impl TodoBoard {
    fn ensure_known_day(&self, day: DayKey) -> TodoResult<()> {
        if self.calendar.contains(day) {
            Ok(())
        } else {
            Err(TodoError::UnknownDay { day })
        }
    }

    /// Called with the store write guard still held, so `total` is the total
    /// this mutation produced. Lock order is store, then notifier.
    fn observe_total(&self, total: u32) -> Option<Notification> {
        let notification = self.notifier.write().observe(total)?;
        info!(
            milestone = notification.milestone,
            total, "milestone reached"
        );
        if let Some(sink) = &self.notification_sink {
            sink.deliver(&notification);
        }
        Some(notification)
    }
}
