use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Error,
    Info,
}

#[derive(Debug)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub expires_at: Instant,
}

/// Short-lived messages shown in the bottom-right corner of the dashboard.
pub struct Notifier {
    notifications: VecDeque<Notification>,
}

impl Notifier {
    const ERROR_TTL: Duration = Duration::from_secs(3);

    pub fn new() -> Self {
        Self {
            notifications: VecDeque::new(),
        }
    }

    pub fn info(&mut self, message: impl Into<String>, ttl: Duration) {
        self.add(message.into(), NotificationKind::Info, ttl);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%message, "dashboard error");
        self.add(message, NotificationKind::Error, Self::ERROR_TTL);
    }

    pub fn recent(&self) -> Option<&Notification> {
        self.notifications.back()
    }

    pub fn prune_expired(&mut self) {
        let now = Instant::now();
        self.notifications.retain(|n| n.expires_at > now);
    }

    fn add(&mut self, message: String, kind: NotificationKind, ttl: Duration) {
        self.notifications.push_back(Notification {
            message,
            kind,
            expires_at: Instant::now() + ttl,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_notification_wins() {
        let mut notifier = Notifier::new();
        notifier.info("copied", Duration::from_secs(2));
        notifier.error("no editor");
        let recent = notifier.recent().unwrap();
        assert_eq!(recent.kind, NotificationKind::Error);
        assert_eq!(recent.message, "no editor");
    }

    #[test]
    fn expired_notifications_are_pruned() {
        let mut notifier = Notifier::new();
        notifier.info("gone", Duration::ZERO);
        notifier.prune_expired();
        assert!(notifier.recent().is_none());
    }
}
