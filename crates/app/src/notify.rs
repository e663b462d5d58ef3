//! Transient user-facing notifications.
//!
//! Messages auto-dismiss after a TTL. Dismissal is a scheduled task owned by
//! the notifier, not a free-floating timer, so pending dismissals die with
//! the notifier instead of leaking.

use std::{
    ops::ControlFlow,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tracing::{error, info};

use crate::poll::{PollHandle, spawn_poller};

/// How long a notice stays visible by default.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5);

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A transient message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Publishes notices and dismisses them after the TTL.
#[derive(Debug)]
pub struct Notifier {
    ttl: Duration,
    next_id: AtomicU64,
    active: Arc<Mutex<Vec<(u64, Notice)>>>,
    dismissers: Mutex<Vec<PollHandle<()>>>,
}

impl Notifier {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_id: AtomicU64::new(0),
            active: Arc::new(Mutex::new(Vec::new())),
            dismissers: Mutex::new(Vec::new()),
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.publish(NoticeLevel::Info, message.into());
    }

    pub fn success(&self, message: impl Into<String>) {
        self.publish(NoticeLevel::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(NoticeLevel::Error, message.into());
    }

    /// Publish a notice and schedule its dismissal.
    pub fn publish(&self, level: NoticeLevel, message: String) {
        match level {
            NoticeLevel::Info | NoticeLevel::Success => info!("{message}"),
            NoticeLevel::Error => error!("{message}"),
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        lock(&self.active).push((id, Notice { level, message }));

        let active = Arc::clone(&self.active);

        let dismisser = spawn_poller(self.ttl, move || {
            lock(&active).retain(|(notice_id, _)| *notice_id != id);

            async { ControlFlow::Break(()) }
        });

        let mut dismissers = lock(&self.dismissers);
        dismissers.retain(|handle| !handle.is_finished());
        dismissers.push(dismisser);
    }

    /// The notices currently visible, oldest first.
    #[must_use]
    pub fn active(&self) -> Vec<Notice> {
        lock(&self.active)
            .iter()
            .map(|(_, notice)| notice.clone())
            .collect()
    }

    /// Drop every visible notice and cancel pending dismissals.
    pub fn dismiss_all(&self) {
        lock(&self.dismissers).clear();
        lock(&self.active).clear();
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
