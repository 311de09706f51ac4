//! Painted widgets for the board: acorns, check marks and day cells.

use acorn_core::board::DayView;
use egui::{
    pos2, vec2, Align2, Color32, CursorIcon, FontId, Rect, Response, Sense, Stroke, Ui, Vec2,
};

pub const MAIN_YELLOW: Color32 = Color32::from_rgb(0xFF, 0xE0, 0x82);
pub const MAIN_WHITE: Color32 = Color32::from_rgb(0xFF, 0xFD, 0xF6);
pub const MAIN_GRAY: Color32 = Color32::from_rgb(0x64, 0x64, 0x64);
pub const ACORN_FILLED: Color32 = Color32::from_rgb(0x8D, 0x7B, 0x68);
pub const ACORN_EMPTY: Color32 = Color32::from_rgb(0xC8, 0xB6, 0xA6);

pub const DAY_CELL_SIZE: Vec2 = vec2(64.0, 64.0);
pub const ACORN_SIZE: f32 = 22.0;

/// A nut with a cap. Filled acorns count towards the difficulty.
pub fn acorn_icon(ui: &mut Ui, filled: bool, size: f32, sense: Sense) -> Response {
    let (rect, response) = ui.allocate_exact_size(Vec2::splat(size), sense);
    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        let color = if filled { ACORN_FILLED } else { ACORN_EMPTY };
        let color = if response.hovered() && sense.senses_click() {
            color.gamma_multiply(0.8)
        } else {
            color
        };
        let nut_center = rect.center() + vec2(0.0, size * 0.1);
        painter.circle_filled(nut_center, size * 0.3, color);
        let cap = Rect::from_center_size(
            rect.center() - vec2(0.0, size * 0.18),
            vec2(size * 0.72, size * 0.22),
        );
        painter.rect_filled(cap, size * 0.1, color.gamma_multiply(0.85));
        painter.line_segment(
            [
                cap.center_top(),
                cap.center_top() - vec2(0.0, size * 0.14),
            ],
            Stroke::new(2.0, color),
        );
    }
    response
}

/// Five acorns, the first `filled` of them coloured. Returns the 1-based
/// index of a clicked acorn when `clickable`.
pub fn acorn_row(ui: &mut Ui, filled: [bool; 5], clickable: bool) -> Option<u8> {
    let sense = if clickable {
        Sense::click()
    } else {
        Sense::hover()
    };
    let mut clicked = None;
    ui.spacing_mut().item_spacing.x = 2.0;
    for (idx, is_filled) in filled.into_iter().enumerate() {
        let response = acorn_icon(ui, is_filled, ACORN_SIZE, sense);
        if clickable && response.on_hover_cursor(CursorIcon::PointingHand).clicked() {
            clicked = Some(idx as u8 + 1);
        }
    }
    clicked
}

pub fn check_icon(ui: &mut Ui, completed: bool) -> Response {
    let size = 30.0;
    let (rect, response) = ui.allocate_exact_size(Vec2::splat(size), Sense::click());
    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        let center = rect.center();
        if completed {
            painter.circle_filled(center, size / 2.0, MAIN_YELLOW);
            let stroke = Stroke::new(3.0, MAIN_GRAY);
            painter.line_segment(
                [center + vec2(-7.0, 0.0), center + vec2(-2.0, 6.0)],
                stroke,
            );
            painter.line_segment([center + vec2(-2.0, 6.0), center + vec2(8.0, -6.0)], stroke);
        } else {
            painter.circle_filled(center, size / 2.0, Color32::WHITE);
            painter.circle_stroke(center, size / 2.0 - 1.0, Stroke::new(2.0, MAIN_GRAY));
        }
    }
    response.on_hover_cursor(CursorIcon::PointingHand)
}

pub fn day_cell(ui: &mut Ui, day: &DayView) -> Response {
    let (rect, response) = ui.allocate_exact_size(DAY_CELL_SIZE, Sense::click());
    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        let fill = if day.selected { MAIN_YELLOW } else { MAIN_WHITE };
        painter.rect_filled(rect, 20.0, fill);
        painter.rect_stroke(rect, 20.0, Stroke::new(2.0, MAIN_YELLOW), egui::StrokeKind::Inside);
        let size = if day.selected { 19.0 } else { 17.0 };
        painter.text(
            pos2(rect.center().x, rect.top() + 22.0),
            Align2::CENTER_CENTER,
            day.day.day_of_month.to_string(),
            FontId::proportional(size),
            MAIN_GRAY,
        );
        painter.text(
            pos2(rect.center().x, rect.top() + 44.0),
            Align2::CENTER_CENTER,
            day.day.weekday_label,
            FontId::proportional(13.0),
            MAIN_GRAY,
        );
        if day.summary.total > 0 {
            let dot = if day.summary.completed == day.summary.total {
                ACORN_FILLED
            } else {
                ACORN_EMPTY
            };
            painter.circle_filled(pos2(rect.center().x, rect.bottom() - 8.0), 3.0, dot);
        }
    }
    response.on_hover_cursor(CursorIcon::PointingHand)
}

/// Non-interactive filler so the first and last day can be centred.
pub fn spacer(ui: &mut Ui, width: f32) -> Rect {
    let (rect, _) = ui.allocate_exact_size(vec2(width, DAY_CELL_SIZE.y), Sense::hover());
    rect
}
