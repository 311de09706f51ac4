//! Keeps the selected day and the horizontally scrolling day strip in step.
//!
//! The strip is padded with spacer cells on both ends so that the first and
//! last real day can sit in the middle of the viewport. Clicking a day is
//! authoritative: it queues a scroll request for the view and ignores scroll
//! samples until the strip has settled on that day, which keeps the scroll
//! handler from fighting the programmatic re-centring.

use serde::Serialize;

use crate::calendar::DayKey;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum CellKind {
    Day(DayKey),
    Spacer,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellGeometry {
    pub left: f32,
    pub width: f32,
    pub kind: CellKind,
}

impl CellGeometry {
    pub fn day(day: DayKey, left: f32, width: f32) -> Self {
        Self {
            left,
            width,
            kind: CellKind::Day(day),
        }
    }

    pub fn spacer(left: f32, width: f32) -> Self {
        Self {
            left,
            width,
            kind: CellKind::Spacer,
        }
    }

    pub fn center(&self) -> f32 {
        self.left + self.width / 2.0
    }
}

/// One layout sample of the strip. Cell positions and the viewport share a
/// coordinate space.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StripGeometry {
    pub viewport_left: f32,
    pub viewport_width: f32,
    pub cells: Vec<CellGeometry>,
}

impl StripGeometry {
    pub fn center(&self) -> f32 {
        self.viewport_left + self.viewport_width / 2.0
    }

    pub fn distance_of(&self, day: DayKey) -> Option<f32> {
        let center = self.center();
        self.cells
            .iter()
            .find(|cell| cell.kind == CellKind::Day(day))
            .map(|cell| (cell.center() - center).abs())
    }
}

/// The real day whose centre is nearest the viewport centre. Spacers never
/// win; on exactly equal distances the earlier cell is kept.
pub fn closest_to_center(geometry: &StripGeometry) -> Option<(DayKey, f32)> {
    let center = geometry.center();
    let mut best: Option<(DayKey, f32)> = None;
    for cell in &geometry.cells {
        let CellKind::Day(day) = cell.kind else {
            continue;
        };
        let distance = (cell.center() - center).abs();
        if !distance.is_finite() {
            continue;
        }
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((day, distance));
        }
    }
    best
}

/// Width of the spacer placed on each side so an edge day of `cell_width`
/// can sit in the middle of a `viewport_width` wide strip.
pub fn spacer_width(viewport_width: f32, cell_width: f32) -> f32 {
    ((viewport_width - cell_width) / 2.0).max(0.0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    selected: DayKey,
    recentering: Option<DayKey>,
    scroll_request: Option<DayKey>,
}

impl Selection {
    /// Starts on `initial` and asks the view to centre it once.
    pub fn new(initial: DayKey) -> Self {
        Self {
            selected: initial,
            recentering: Some(initial),
            scroll_request: Some(initial),
        }
    }

    pub fn selected(&self) -> DayKey {
        self.selected
    }

    pub fn is_recentering(&self) -> bool {
        self.recentering.is_some()
    }

    pub fn select_day(&mut self, day: DayKey) -> bool {
        let changed = self.selected != day;
        self.selected = day;
        self.recentering = Some(day);
        self.scroll_request = Some(day);
        changed
    }

    /// Returns whether the selection moved.
    pub fn on_scroll(&mut self, geometry: &StripGeometry) -> bool {
        let Some((closest, distance)) = closest_to_center(geometry) else {
            return false;
        };
        if let Some(target) = self.recentering {
            if closest == target {
                self.recentering = None;
            }
            return false;
        }
        if closest == self.selected {
            return false;
        }
        if geometry.distance_of(self.selected) == Some(distance) {
            return false;
        }
        self.selected = closest;
        true
    }

    /// The user grabbed the strip; scroll samples drive the selection again.
    pub fn cancel_recentering(&mut self) {
        self.recentering = None;
    }

    pub fn take_scroll_request(&mut self) -> Option<DayKey> {
        self.scroll_request.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> DayKey {
        DayKey::from_ymd(2025, 5, d).unwrap()
    }

    /// Two spacers, then `days` cells of width 60 starting at x = 120.
    fn strip(days: &[u32], scroll: f32) -> StripGeometry {
        let mut cells = vec![CellGeometry::spacer(0.0, 60.0), CellGeometry::spacer(60.0, 60.0)];
        for (idx, d) in days.iter().enumerate() {
            cells.push(CellGeometry::day(day(*d), 120.0 + idx as f32 * 60.0, 60.0));
        }
        StripGeometry {
            viewport_left: scroll,
            viewport_width: 300.0,
            cells,
        }
    }

    #[test]
    fn picks_the_day_nearest_the_centre() {
        // viewport centre at 150 + scroll
        let geometry = strip(&[1, 2, 3, 4], 0.0);
        assert_eq!(closest_to_center(&geometry), Some((day(1), 0.0)));
        let geometry = strip(&[1, 2, 3, 4], 100.0);
        assert_eq!(closest_to_center(&geometry), Some((day(3), 20.0)));
    }

    #[test]
    fn spacers_never_win() {
        let geometry = StripGeometry {
            viewport_left: 0.0,
            viewport_width: 60.0,
            cells: vec![
                CellGeometry::spacer(0.0, 60.0),
                CellGeometry::day(day(1), 200.0, 60.0),
            ],
        };
        assert_eq!(closest_to_center(&geometry).map(|(d, _)| d), Some(day(1)));
        let only_spacers = StripGeometry {
            viewport_left: 0.0,
            viewport_width: 60.0,
            cells: vec![CellGeometry::spacer(0.0, 60.0)],
        };
        assert_eq!(closest_to_center(&only_spacers), None);
    }

    #[test]
    fn equal_distances_keep_the_first_cell() {
        let geometry = StripGeometry {
            viewport_left: 0.0,
            viewport_width: 120.0,
            cells: vec![
                CellGeometry::day(day(1), 0.0, 60.0),
                CellGeometry::day(day(2), 60.0, 60.0),
            ],
        };
        assert_eq!(closest_to_center(&geometry), Some((day(1), 30.0)));
    }

    #[test]
    fn exact_tie_does_not_reselect() {
        let geometry = StripGeometry {
            viewport_left: 0.0,
            viewport_width: 120.0,
            cells: vec![
                CellGeometry::day(day(1), 0.0, 60.0),
                CellGeometry::day(day(2), 60.0, 60.0),
            ],
        };
        let mut selection = Selection::new(day(2));
        selection.cancel_recentering();
        assert!(!selection.on_scroll(&geometry));
        assert_eq!(selection.selected(), day(2));
    }

    #[test]
    fn repeated_identical_geometry_is_stable() {
        let mut selection = Selection::new(day(1));
        selection.cancel_recentering();
        let geometry = strip(&[1, 2, 3, 4], 100.0);
        assert!(selection.on_scroll(&geometry));
        assert_eq!(selection.selected(), day(3));
        for _ in 0..5 {
            assert!(!selection.on_scroll(&geometry));
            assert_eq!(selection.selected(), day(3));
        }
    }

    #[test]
    fn initial_scroll_request_is_issued_once() {
        let mut selection = Selection::new(day(3));
        assert_eq!(selection.take_scroll_request(), Some(day(3)));
        assert_eq!(selection.take_scroll_request(), None);
    }

    #[test]
    fn clicks_are_not_undone_by_in_flight_scrolling() {
        let mut selection = Selection::new(day(1));
        selection.cancel_recentering();
        assert!(selection.select_day(day(4)));
        assert_eq!(selection.take_scroll_request(), Some(day(4)));

        // strip still animating past day 2 and 3
        assert!(!selection.on_scroll(&strip(&[1, 2, 3, 4], 60.0)));
        assert!(!selection.on_scroll(&strip(&[1, 2, 3, 4], 120.0)));
        assert_eq!(selection.selected(), day(4));
        assert!(selection.is_recentering());

        // settled on the target, scroll sync resumes
        assert!(!selection.on_scroll(&strip(&[1, 2, 3, 4], 180.0)));
        assert!(!selection.is_recentering());
        assert!(selection.on_scroll(&strip(&[1, 2, 3, 4], 0.0)));
        assert_eq!(selection.selected(), day(1));
    }

    #[test]
    fn spacer_lets_edge_days_reach_the_centre() {
        assert_eq!(spacer_width(300.0, 60.0), 120.0);
        assert_eq!(spacer_width(40.0, 60.0), 0.0);
        // first day right after the spacer, with the strip scrolled to the start
        let first = CellGeometry::day(day(1), spacer_width(300.0, 60.0), 60.0);
        assert_eq!(first.center(), 150.0);
    }
}
