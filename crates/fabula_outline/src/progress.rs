//! Progress reporting for generation runs.

use fabula_error::{FabulaResult, GenerationError, GenerationErrorKind};
use fabula_interface::ProgressEvent;
use tokio::sync::mpsc;
use tracing::debug;

/// Forwards generation milestones to a streaming consumer.
///
/// In silent mode events are discarded, so batch and streaming runs walk the
/// same milestones and differ only in delivery. Reported percentages are
/// clamped to be non-decreasing; late rounds of dense plans can request a
/// lower base percentage than the previous round finished at, and the clamp
/// keeps the emitted sequence monotonic.
///
/// A closed channel means the consumer disconnected: milestone sends then
/// fail with a cancellation error so the run stops between commits.
#[derive(Debug)]
pub struct ProgressReporter {
    tx: Option<mpsc::Sender<ProgressEvent>>,
    last_percent: u8,
}

impl ProgressReporter {
    /// Reporter that discards every event.
    pub fn silent() -> Self {
        Self {
            tx: None,
            last_percent: 0,
        }
    }

    /// Reporter forwarding events into `tx`.
    pub fn streaming(tx: mpsc::Sender<ProgressEvent>) -> Self {
        Self {
            tx: Some(tx),
            last_percent: 0,
        }
    }

    /// Report a milestone.
    pub async fn progress(&mut self, message: impl Into<String>, percent: u8) -> FabulaResult<()> {
        self.progress_with_status(message, percent, None).await
    }

    /// Report a milestone with a status tag.
    pub async fn progress_with_status(
        &mut self,
        message: impl Into<String>,
        percent: u8,
        status: Option<String>,
    ) -> FabulaResult<()> {
        let percent = percent.max(self.last_percent).min(100);
        self.last_percent = percent;
        let message = message.into();
        debug!(percent, %message, "generation progress");
        self.send(ProgressEvent::Progress {
            message,
            percent,
            status,
        })
        .await
    }

    /// Deliver the structured result payload of a successful run.
    pub async fn result(&mut self, data: serde_json::Value) -> FabulaResult<()> {
        self.send(ProgressEvent::Result { data }).await
    }

    /// Deliver a terminal failure notice. Best effort: a disconnected
    /// consumer cannot receive it anyway.
    pub async fn error(&mut self, message: impl Into<String>, code: Option<u16>) {
        if let Some(tx) = &self.tx {
            let _ = tx
                .send(ProgressEvent::Error {
                    message: message.into(),
                    code,
                })
                .await;
        }
    }

    /// Deliver the end-of-stream marker. Best effort, like [`Self::error`].
    pub async fn done(&mut self) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(ProgressEvent::Done).await;
        }
    }

    async fn send(&self, event: ProgressEvent) -> FabulaResult<()> {
        if let Some(tx) = &self.tx {
            tx.send(event)
                .await
                .map_err(|_| GenerationError::new(GenerationErrorKind::Cancelled))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn silent_reporter_accepts_everything() {
        let mut reporter = ProgressReporter::silent();
        reporter.progress("step", 10).await.unwrap();
        reporter.result(serde_json::json!({"ok": true})).await.unwrap();
        reporter.error("ignored", None).await;
        reporter.done().await;
    }

    #[tokio::test]
    async fn percentages_never_decrease() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut reporter = ProgressReporter::streaming(tx);
        reporter.progress("a", 40).await.unwrap();
        reporter.progress("b", 35).await.unwrap();
        reporter.progress("c", 55).await.unwrap();
        drop(reporter);

        let mut seen = Vec::new();
        while let Some(ProgressEvent::Progress { percent, .. }) = rx.recv().await {
            seen.push(percent);
        }
        assert_eq!(seen, [40, 40, 55]);
    }

    #[tokio::test]
    async fn percent_is_capped_at_100() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut reporter = ProgressReporter::streaming(tx);
        reporter.progress("overflow", 120).await.unwrap();
        match rx.recv().await.unwrap() {
            ProgressEvent::Progress { percent, .. } => assert_eq!(percent, 100),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn closed_channel_cancels_the_run() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let mut reporter = ProgressReporter::streaming(tx);
        let err = reporter.progress("lost", 10).await.unwrap_err();
        assert!(err.to_string().contains("cancelled"));
    }
}
