//! Cancellable scheduled polling tasks.
//!
//! Payment confirmation, VM readiness and live stats are all driven by
//! fixed-interval polling against the API. Instead of free-floating timers,
//! every loop runs as a [`spawn_poller`] task whose [`PollHandle`] is tied to
//! the owning scope: dropping the handle aborts the task, so a forgotten
//! teardown cannot leak a timer.

use std::{future::Future, ops::ControlFlow, time::Duration};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

/// Handle to a running poll task.
///
/// The task ends when the tick closure breaks, when [`PollHandle::stop`] is
/// called, or when the handle is dropped.
#[derive(Debug)]
pub struct PollHandle<T> {
    stop: watch::Sender<bool>,
    task: Option<JoinHandle<Option<T>>>,
}

impl<T> PollHandle<T> {
    /// Ask the task to end after the current tick.
    pub fn stop(&self) {
        let _ = self.stop.send(true);
    }

    /// Whether the task has already ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the task to end.
    ///
    /// Returns the break value, or `None` when the task was stopped or
    /// aborted first.
    pub async fn join(mut self) -> Option<T> {
        match self.task.take() {
            Some(task) => task.await.ok().flatten(),
            None => None,
        }
    }
}

impl<T> Drop for PollHandle<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Run `tick` every `period` until it breaks or the handle is stopped.
///
/// The first tick fires one full period after the call, matching interval
/// timers started on condition entry. Ticks missed while a slow response is
/// in flight are skipped, not bursted.
pub fn spawn_poller<T, F, Fut>(period: Duration, mut tick: F) -> PollHandle<T>
where
    T: Send + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ControlFlow<T>> + Send + 'static,
{
    let (stop, mut stopped) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = stopped.changed() => break None,
                _ = interval.tick() => {
                    if let ControlFlow::Break(value) = tick().await {
                        break Some(value);
                    }
                }
            }
        }
    });

    PollHandle {
        stop,
        task: Some(task),
    }
}
