use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use egui::{
    Align, Align2, Color32, Frame, Label, Layout, RichText, Sense, Stroke, TextEdit, UiBuilder, Vec2,
};
use tracing::{debug, info, warn};

use acorn_core::{
    calendar::{CalendarWindow, DayKey},
    input::InputDraft,
    milestone::{Notification, NotificationSink},
    selection::{spacer_width, CellGeometry, StripGeometry},
    store::{acorn_row, TaskId},
    BoardSnapshot, TodoBoard, TodoError,
};

use crate::view::{self, MAIN_GRAY, MAIN_WHITE, MAIN_YELLOW};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub(crate) window: CalendarWindow,
    pub(crate) sample_tasks: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        let policy = lookup("ACORN_CALENDAR").unwrap_or_default();
        match policy.trim().to_ascii_lowercase().as_str() {
            "rolling" => {
                let mut radius = CalendarWindow::DEFAULT_RADIUS;
                if let Some(value) = lookup("ACORN_ROLLING_RADIUS") {
                    match value.trim().parse::<u32>() {
                        Ok(parsed) if parsed > CalendarWindow::MAX_RADIUS => {
                            warn!(
                                requested = parsed,
                                max = CalendarWindow::MAX_RADIUS,
                                "clamping ACORN_ROLLING_RADIUS"
                            );
                            radius = CalendarWindow::MAX_RADIUS;
                        }
                        Ok(parsed) => radius = parsed,
                        Err(err) => warn!(%value, %err, "ignoring ACORN_ROLLING_RADIUS"),
                    }
                }
                config.window = CalendarWindow::Rolling { radius };
            }
            "" | "fixed" => {
                if let CalendarWindow::Fixed { mut start, mut end } = config.window {
                    if let Some(value) = lookup("ACORN_WINDOW_START") {
                        start = parse_date("ACORN_WINDOW_START", &value).unwrap_or(start);
                    }
                    if let Some(value) = lookup("ACORN_WINDOW_END") {
                        end = parse_date("ACORN_WINDOW_END", &value).unwrap_or(end);
                    }
                    if end < start {
                        bail!("ACORN_WINDOW_END {end} is before ACORN_WINDOW_START {start}");
                    }
                    config.window = CalendarWindow::Fixed { start, end };
                }
            }
            other => warn!(policy = other, "unknown ACORN_CALENDAR, keeping fixed window"),
        }
        if let Some(value) = lookup("ACORN_SAMPLE_TASKS") {
            config.sample_tasks = matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        Ok(config)
    }

    pub fn window(&self) -> CalendarWindow {
        self.window
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: CalendarWindow::default(),
            sample_tasks: false,
        }
    }
}

fn parse_date(name: &str, value: &str) -> Option<NaiveDate> {
    match value.parse::<DayKey>() {
        Ok(key) => Some(key.date()),
        Err(err) => {
            warn!(variable = name, %err, "ignoring malformed date");
            None
        }
    }
}

struct LogSink;

impl NotificationSink for LogSink {
    fn deliver(&self, notification: &Notification) {
        info!(
            id = notification.id,
            milestone = notification.milestone,
            message = %notification.message,
            "notification posted"
        );
    }
}

pub fn build_board(config: &AppConfig) -> Result<TodoBoard> {
    let board = TodoBoard::builder()
        .with_window(config.window)
        .with_notification_sink(Box::new(LogSink))
        .build()
        .context("failed to initialize board")?;
    if config.sample_tasks {
        board
            .seed_sample_tasks(board.selected_day())
            .context("failed to seed sample tasks")?;
    }
    Ok(board)
}

/// Gestures collected while painting a frame, applied once painting is done.
/// Task gestures carry the day that was drawn, since the strip may move the
/// selection later in the same frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    SelectDay(DayKey),
    ToggleTask(DayKey, TaskId),
    DeleteTask(DayKey, TaskId),
    ToggleNotifications,
    ActivateInput,
    ChooseDifficulty(u8),
    Submit(DayKey),
    DismissInput,
    DismissPrompt,
}

pub struct AcornApp {
    board: TodoBoard,
    draft: InputDraft,
    prompt: Option<String>,
    focus_input: bool,
}

impl AcornApp {
    pub fn new(board: TodoBoard) -> Self {
        Self {
            board,
            draft: InputDraft::new(),
            prompt: None,
            focus_input: false,
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::SelectDay(day) => {
                if let Err(err) = self.board.select_day(day) {
                    warn!(%err, "day selection rejected");
                }
            }
            Action::ToggleTask(day, id) => {
                if let Err(err) = self.board.toggle_task(day, id) {
                    warn!(%err, "toggle failed");
                }
            }
            Action::DeleteTask(day, id) => {
                self.board.delete_task(day, id);
            }
            Action::ToggleNotifications => self.board.toggle_notifications(),
            Action::ActivateInput => {
                if self.draft.activate() {
                    self.focus_input = true;
                }
            }
            Action::ChooseDifficulty(value) => self.draft.choose_difficulty(value),
            Action::Submit(day) => match self.draft.submit_to(&self.board, day) {
                Ok(task) => {
                    debug!(id = %task.id, "draft submitted");
                    self.prompt = None;
                }
                Err(err) if err.is_validation() => self.prompt = Some(prompt_for(&err)),
                Err(err) => warn!(%err, "submission failed"),
            },
            Action::DismissInput => self.draft.dismiss(),
            Action::DismissPrompt => self.prompt = None,
        }
    }

    fn header(&self, ui: &mut egui::Ui, snapshot: &BoardSnapshot, actions: &mut Vec<Action>) {
        ui.horizontal(|ui| {
            let bell = if snapshot.unread_count > 0 {
                format!("Alerts ({})", snapshot.unread_count)
            } else {
                "Alerts".to_string()
            };
            if ui.button(bell).clicked() {
                actions.push(Action::ToggleNotifications);
            }
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                Frame::new()
                    .fill(MAIN_YELLOW)
                    .corner_radius(20.0)
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            view::acorn_icon(ui, true, view::ACORN_SIZE, Sense::hover());
                            ui.label(
                                RichText::new(snapshot.total_points.to_string())
                                    .size(20.0)
                                    .color(MAIN_GRAY),
                            );
                        });
                    });
            });
        });
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("todo todo").size(48.0).strong().color(MAIN_GRAY));
        });
    }

    fn notification_panel(
        &self,
        ctx: &egui::Context,
        snapshot: &BoardSnapshot,
        actions: &mut Vec<Action>,
    ) {
        if !snapshot.panel_open {
            return;
        }
        egui::Window::new("Notifications")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::LEFT_TOP, [12.0, 48.0])
            .show(ctx, |ui| {
                if snapshot.notifications.is_empty() {
                    ui.label("No notifications yet.");
                }
                for notification in snapshot.notifications.iter().rev() {
                    let text = RichText::new(&notification.message).color(MAIN_GRAY);
                    let text = if notification.read { text } else { text.strong() };
                    ui.label(text);
                }
                ui.separator();
                if ui.button("Close").clicked() {
                    actions.push(Action::ToggleNotifications);
                }
            });
    }

    fn day_strip(&self, ui: &mut egui::Ui, snapshot: &BoardSnapshot, actions: &mut Vec<Action>) {
        let scroll_target = self.board.take_scroll_request();
        let viewport_width = ui.available_width();
        let pad = spacer_width(viewport_width, view::DAY_CELL_SIZE.x);

        let output = egui::ScrollArea::horizontal()
            .id_salt("day_strip")
            .scroll_bar_visibility(egui::scroll_area::ScrollBarVisibility::AlwaysHidden)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let mut cells = Vec::with_capacity(snapshot.days.len() + 2);
                    let leading = view::spacer(ui, pad);
                    cells.push(CellGeometry::spacer(leading.left(), leading.width()));
                    for day in &snapshot.days {
                        let response = view::day_cell(ui, day);
                        if response.clicked() {
                            actions.push(Action::SelectDay(day.key));
                        }
                        if scroll_target == Some(day.key) {
                            response.scroll_to_me(Some(Align::Center));
                        }
                        cells.push(CellGeometry::day(
                            day.key,
                            response.rect.left(),
                            response.rect.width(),
                        ));
                    }
                    let trailing = view::spacer(ui, pad);
                    cells.push(CellGeometry::spacer(trailing.left(), trailing.width()));
                    cells
                })
                .inner
            });

        let viewport = output.inner_rect;
        let user_scrolling = ui.rect_contains_pointer(viewport)
            && ui.input(|i| i.smooth_scroll_delta != Vec2::ZERO || i.pointer.is_decidedly_dragging());
        if user_scrolling {
            self.board.cancel_recentering();
        }
        let geometry = StripGeometry {
            viewport_left: viewport.left(),
            viewport_width: viewport.width(),
            cells: output.inner,
        };
        self.board.on_scroll(&geometry);
    }

    fn input_region(
        &mut self,
        ui: &mut egui::Ui,
        snapshot: &BoardSnapshot,
        actions: &mut Vec<Action>,
    ) -> egui::Rect {
        let day = snapshot.selected;
        let active = self.draft.is_active();
        let chosen = self.draft.difficulty();
        let focus = std::mem::take(&mut self.focus_input);
        let placeholder = self.draft.placeholder();

        // the region's own click sense sits behind the field and acorn buttons
        let inner = ui.scope_builder(UiBuilder::new().sense(Sense::click()), |ui| {
            Frame::new()
                .fill(MAIN_YELLOW)
                .corner_radius(20.0)
                .inner_margin(14.0)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.add(
                            Label::new(RichText::new("+").size(24.0).strong().color(MAIN_GRAY))
                                .selectable(false),
                        );
                        match self.draft.text_mut() {
                            Some(text) => {
                                let response = ui.add(
                                    TextEdit::singleline(text)
                                        .hint_text(placeholder)
                                        .frame(false)
                                        .desired_width(ui.available_width() - 140.0),
                                );
                                if focus {
                                    response.request_focus();
                                }
                                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                                    actions.push(Action::Submit(day));
                                }
                            }
                            None => {
                                ui.add(
                                    Label::new(RichText::new(placeholder).color(MAIN_GRAY))
                                        .selectable(false),
                                );
                            }
                        }
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            if active && ui.small_button("Add").clicked() {
                                actions.push(Action::Submit(day));
                            }
                            // acorn 1 stays leftmost inside the right-aligned group
                            ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                                if let Some(value) = view::acorn_row(ui, acorn_row(chosen), active) {
                                    actions.push(Action::ChooseDifficulty(value));
                                }
                            });
                        });
                    });
                })
        });

        let region = inner.response.rect;
        if !active && inner.response.clicked() {
            actions.push(Action::ActivateInput);
        }
        region
    }

    fn task_list(&self, ui: &mut egui::Ui, snapshot: &BoardSnapshot, actions: &mut Vec<Action>) {
        if snapshot.tasks.is_empty() {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("Nothing planned for this day.").color(MAIN_GRAY));
            });
            return;
        }
        egui::ScrollArea::vertical()
            .id_salt("task_list")
            .show(ui, |ui| {
                for task in &snapshot.tasks {
                    Frame::new()
                        .fill(Color32::WHITE)
                        .stroke(Stroke::new(2.0, MAIN_YELLOW))
                        .corner_radius(20.0)
                        .inner_margin(14.0)
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.horizontal(|ui| {
                                if view::check_icon(ui, task.completed).clicked() {
                                    actions.push(Action::ToggleTask(snapshot.selected, task.id));
                                }
                                let text = RichText::new(&task.text).size(17.0).color(MAIN_GRAY);
                                let text = if task.completed { text.strikethrough() } else { text };
                                ui.label(text);
                                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                    if ui.small_button("Delete").clicked() {
                                        actions.push(Action::DeleteTask(snapshot.selected, task.id));
                                    }
                                    ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                                        view::acorn_row(ui, task.difficulty.acorns(), false);
                                    });
                                });
                            });
                        });
                    ui.add_space(12.0);
                }
            });
    }

    fn validation_prompt(&self, ctx: &egui::Context, actions: &mut Vec<Action>) {
        let Some(message) = &self.prompt else {
            return;
        };
        egui::Window::new("Check your todo")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    actions.push(Action::DismissPrompt);
                }
            });
    }
}

impl eframe::App for AcornApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let snapshot = self.board.snapshot();
        let mut actions = Vec::new();

        egui::CentralPanel::default()
            .frame(Frame::new().fill(MAIN_WHITE).inner_margin(24.0))
            .show(ctx, |ui| {
                self.header(ui, &snapshot, &mut actions);
                ui.add_space(16.0);
                self.day_strip(ui, &snapshot, &mut actions);
                ui.add_space(16.0);
                let region = self.input_region(ui, &snapshot, &mut actions);
                if self.draft.wants_outside_click() && self.prompt.is_none() {
                    let clicked_outside = ctx.input(|i| {
                        i.pointer.any_click()
                            && i.pointer
                                .interact_pos()
                                .is_some_and(|pos| !region.contains(pos))
                    });
                    if clicked_outside {
                        actions.push(Action::DismissInput);
                    }
                }
                ui.add_space(16.0);
                self.task_list(ui, &snapshot, &mut actions);
            });

        self.notification_panel(ctx, &snapshot, &mut actions);
        self.validation_prompt(ctx, &mut actions);

        for action in actions {
            self.apply(action);
        }
    }
}

fn prompt_for(err: &TodoError) -> String {
    match err {
        TodoError::EmptyText => "Write something to do first.".to_string(),
        TodoError::DifficultyNotChosen => "Pick how many acorns this task is worth.".to_string(),
        other => other.to_string(),
    }
}

pub fn run(config: AppConfig) -> Result<()> {
    info!(window = ?config.window, sample_tasks = config.sample_tasks, "starting acorn");
    let board = build_board(&config)?;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("acorn")
            .with_inner_size([560.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "acorn",
        options,
        Box::new(move |_cc| Ok(Box::new(AcornApp::new(board)))),
    )
    .map_err(|err| anyhow!("{err}"))
}
