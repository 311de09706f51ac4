use serde::{Deserialize, Serialize};

use crate::store::IdClock;

pub const MILESTONE_STEP: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub message: String,
    pub read: bool,
    pub milestone: u32,
}

/// Outbound hook for freshly emitted milestone notifications.
pub trait NotificationSink: Send + Sync {
    fn deliver(&self, notification: &Notification);
}

/// Highest multiple of [`MILESTONE_STEP`] not above `total`.
pub fn milestone_for(total: u32) -> u32 {
    total / MILESTONE_STEP * MILESTONE_STEP
}

pub fn milestone_message(milestone: u32) -> String {
    format!("{milestone} points reached!")
}

#[derive(Debug, Default)]
pub struct MilestoneNotifier {
    last_milestone: u32,
    log: Vec<Notification>,
    ids: IdClock,
}

impl MilestoneNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the freshly recomputed point total. Returns the notification when a
    /// new milestone was crossed. Announced milestones are never lowered, so
    /// dropping below and climbing back over one stays silent.
    pub fn observe(&mut self, total_points: u32) -> Option<Notification> {
        let current = milestone_for(total_points);
        if current == 0 || current <= self.last_milestone {
            return None;
        }
        self.last_milestone = current;
        let notification = Notification {
            id: self.ids.next(),
            message: milestone_message(current),
            read: false,
            milestone: current,
        };
        self.log.push(notification.clone());
        Some(notification)
    }

    pub fn last_milestone(&self) -> u32 {
        self.last_milestone
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.log
    }

    pub fn unread_count(&self) -> usize {
        self.log.iter().filter(|n| !n.read).count()
    }

    pub fn mark_all_read(&mut self) -> usize {
        let mut flipped = 0;
        for notification in self.log.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            flipped += 1;
        }
        flipped
    }
}
