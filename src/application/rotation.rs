//! Cancellable segment-rotation timer
//!
//! A one-shot deferred task: after the delay it generates a fresh segment
//! name and re-issues a SaveSegment command into the controller channel.
//! Each rotation reschedules itself through the controller, composing a
//! repeating rotation until cancelled.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::recording::generate_segment_file_name;

use super::command::ServiceCommand;

/// Cancellable one-shot rotation timer
#[derive(Debug, Default)]
pub struct RotationTimer {
    pending: Option<JoinHandle<()>>,
}

impl RotationTimer {
    /// Create a timer with nothing scheduled
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Schedule a rotation after `delay`, replacing any pending one.
    ///
    /// The file name is generated when the timer fires, not when it is
    /// scheduled, so each rotation gets a current timestamp.
    pub fn schedule(&mut self, delay: Duration, commands: mpsc::Sender<ServiceCommand>) {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let file_name = generate_segment_file_name();
            let _ = commands
                .send(ServiceCommand::SaveSegment {
                    file_name: Some(file_name),
                })
                .await;
        }));
    }

    /// Cancel the pending rotation, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Check whether a rotation is still pending
    pub fn is_scheduled(&self) -> bool {
        self.pending
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for RotationTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay_with_generated_name() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut timer = RotationTimer::new();
        timer.schedule(Duration::from_secs(60), tx);
        assert!(timer.is_scheduled());

        tokio::time::advance(Duration::from_secs(60)).await;

        let cmd = rx.recv().await.unwrap();
        match cmd {
            ServiceCommand::SaveSegment {
                file_name: Some(name),
            } => {
                assert!(name.starts_with("Rec_"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_firing() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut timer = RotationTimer::new();
        timer.schedule(Duration::from_secs(60), tx);
        timer.cancel();
        assert!(!timer.is_scheduled());

        tokio::time::advance(Duration::from_secs(120)).await;
        tokio::task::yield_now().await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn reschedule_replaces_pending() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut timer = RotationTimer::new();
        timer.schedule(Duration::from_secs(30), tx.clone());
        timer.schedule(Duration::from_secs(60), tx);

        // The first deadline passes without a command
        tokio::time::advance(Duration::from_secs(30)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn unscheduled_timer_is_not_pending() {
        let timer = RotationTimer::new();
        assert!(!timer.is_scheduled());
    }
}
