use std::sync::Arc;

use acorn_core::{
    calendar::{CalendarWindow, DayKey},
    input::InputDraft,
    milestone::{Notification, NotificationSink},
    selection::{CellGeometry, StripGeometry},
    TodoBoard, TodoError,
};
use chrono::NaiveDate;
use parking_lot::Mutex;

#[derive(Clone, Default)]
struct RecordingSink {
    delivered: Arc<Mutex<Vec<u32>>>,
}

impl NotificationSink for RecordingSink {
    fn deliver(&self, notification: &Notification) {
        self.delivered.lock().push(notification.milestone);
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn summer_board(sink: RecordingSink) -> TodoBoard {
    TodoBoard::builder()
        .with_window(CalendarWindow::Fixed {
            start: date(2025, 5, 1),
            end: date(2025, 7, 31),
        })
        .with_today(date(2025, 5, 20))
        .with_notification_sink(Box::new(sink))
        .build()
        .expect("build board")
}

fn complete(board: &TodoBoard, day: DayKey, text: &str, difficulty: u8) {
    let task = board.add_task(day, text, difficulty).expect("add task");
    board.toggle_task(day, task.id).expect("toggle task");
}

#[test]
fn milestones_fire_once_per_ten_points() {
    let sink = RecordingSink::default();
    let board = summer_board(sink.clone());
    let monday = DayKey::from_ymd(2025, 5, 19).expect("day");
    let tuesday = DayKey::from_ymd(2025, 5, 20).expect("day");

    complete(&board, monday, "Stretch", 4);
    complete(&board, tuesday, "Laundry", 4);
    assert!(board.notifications().is_empty());
    complete(&board, tuesday, "Groceries", 3);
    assert_eq!(board.total_points(), 11);

    let notifications = board.notifications();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].message.contains("10"));

    complete(&board, monday, "Read", 5);
    assert_eq!(board.total_points(), 16);
    assert_eq!(board.notifications().len(), 1);

    complete(&board, tuesday, "Cook", 5);
    assert_eq!(board.total_points(), 21);
    assert_eq!(board.notifications().len(), 2);
    assert_eq!(*sink.delivered.lock(), vec![10, 20]);
}

#[test]
fn unchecking_and_rechecking_does_not_repeat_a_milestone() {
    let sink = RecordingSink::default();
    let board = summer_board(sink.clone());
    let day = board.selected_day();

    let big = board.add_task(day, "Deep clean", 5).expect("add");
    complete(&board, day, "Taxes", 5);
    board.toggle_task(day, big.id).expect("toggle");
    assert_eq!(board.total_points(), 10);
    assert_eq!(board.notifications().len(), 1);

    board.toggle_task(day, big.id).expect("untoggle");
    assert_eq!(board.total_points(), 5);
    board.toggle_task(day, big.id).expect("retoggle");
    assert_eq!(board.total_points(), 10);
    assert_eq!(board.notifications().len(), 1);

    let max_reached = 10;
    assert!(board.notifications().len() as u32 <= max_reached / 10);
    assert_eq!(sink.delivered.lock().len(), 1);
}

#[test]
fn closing_the_panel_reads_everything() {
    let board = summer_board(RecordingSink::default());
    let day = board.selected_day();
    for _ in 0..6 {
        complete(&board, day, "Sprint", 5);
    }
    let before = board.notifications();
    assert_eq!(before.len(), 3);
    assert_eq!(board.unread_count(), 3);

    board.open_notifications();
    assert!(board.panel_open());
    assert_eq!(board.unread_count(), 3);
    assert_eq!(board.close_notifications(), 3);
    assert!(!board.panel_open());
    assert_eq!(board.unread_count(), 0);

    let after = board.notifications();
    assert_eq!(after.len(), before.len());
    let ids = |list: &[Notification]| list.iter().map(|n| n.id).collect::<Vec<_>>();
    assert_eq!(ids(&after), ids(&before));
}

#[test]
fn toggling_a_missing_task_is_reported() {
    let board = summer_board(RecordingSink::default());
    let day = board.selected_day();
    let task = board.add_task(day, "Walk", 2).expect("add");
    let other = DayKey::from_ymd(2025, 6, 1).expect("day");

    let err = board.toggle_task(other, task.id).expect_err("wrong day");
    assert!(err.is_not_found());
    assert!(board.delete_task(other, task.id).is_none());
    assert_eq!(board.tasks_for_day(day).len(), 1);
}

#[test]
fn input_draft_submits_to_the_selected_day() {
    let board = summer_board(RecordingSink::default());
    let mut draft = InputDraft::new();
    draft.activate();
    draft.set_text("   ");
    draft.choose_difficulty(2);
    assert_eq!(draft.submit(&board), Err(TodoError::EmptyText));
    assert!(draft.is_active());

    draft.set_text("Call grandma");
    draft.choose_difficulty(2);
    let err = draft.submit(&board).expect_err("difficulty cleared");
    assert_eq!(err, TodoError::DifficultyNotChosen);
    assert!(err.is_validation());
    assert!(board.selected_tasks().is_empty());

    draft.choose_difficulty(3);
    let task = draft.submit(&board).expect("submit");
    assert!(!draft.is_active());
    assert_eq!(draft.text(), "");
    assert_eq!(board.selected_tasks(), vec![task]);
}

#[test]
fn scroll_sampling_moves_and_then_holds_the_selection() {
    let board = summer_board(RecordingSink::default());
    let may_20 = DayKey::from_ymd(2025, 5, 20).expect("day");
    let may_21 = DayKey::from_ymd(2025, 5, 21).expect("day");
    let geometry = StripGeometry {
        viewport_left: 100.0,
        viewport_width: 200.0,
        cells: vec![
            CellGeometry::spacer(0.0, 50.0),
            CellGeometry::day(may_20, 50.0, 50.0),
            CellGeometry::day(may_21, 175.0, 50.0),
        ],
    };

    // settles the mount-time centring, which targets May 20
    board.cancel_recentering();
    assert!(board.on_scroll(&geometry));
    assert_eq!(board.selected_day(), may_21);
    for _ in 0..3 {
        assert!(!board.on_scroll(&geometry));
    }
    assert_eq!(board.selected_day(), may_21);

    assert_eq!(board.select_day(may_20), Ok(true));
    assert_eq!(board.take_scroll_request(), Some(may_20));
    assert!(!board.on_scroll(&geometry));
    assert_eq!(board.selected_day(), may_20);
}

#[test]
fn snapshot_serializes_for_the_view() {
    let board = summer_board(RecordingSink::default());
    let day = board.selected_day();
    complete(&board, day, "Plan week", 2);

    let snapshot = board.snapshot();
    assert_eq!(snapshot.days.len(), 92);
    assert_eq!(snapshot.selected, day);
    assert_eq!(snapshot.total_points, 2);
    let selected: Vec<_> = snapshot.days.iter().filter(|d| d.selected).collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].summary.points, 2);

    let json = serde_json::to_value(&snapshot).expect("serialize");
    assert_eq!(json["selected"], "2025-05-20");
    assert_eq!(json["tasks"][0]["text"], "Plan week");
    assert_eq!(json["tasks"][0]["difficulty"], 2);
    assert_eq!(json["tasks"][0]["completed"], true);
    assert_eq!(json["days"][0]["key"], "2025-05-01");
    assert_eq!(json["days"][0]["weekday_label"], "Thu");
    assert_eq!(json["unread_count"], 0);
}
