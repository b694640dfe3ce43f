//! Rate-limited status notifications.
//!
//! Messages are shown one at a time in submission order, at least
//! [`DISPLAY_SPACING`] apart. Each one is dismissed [`DISPLAY_LIFETIME`]
//! after it appeared, on its own timer, so an older toast may still be
//! fading out while the next one is already on screen.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::model::{Notification, Severity};

pub const DISPLAY_SPACING: Duration = Duration::from_millis(250);
pub const DISPLAY_LIFETIME: Duration = Duration::from_millis(3000);

/// Where notifications are actually drawn.
pub trait NotificationSink: Send + Sync + 'static {
    fn show(&self, id: u64, notification: &Notification);
    fn dismiss(&self, id: u64);
}

#[derive(Debug, Clone, Copy)]
struct Timing {
    spacing: Duration,
    lifetime: Duration,
}

/// Cheap, cloneable handle to the single drain task.
#[derive(Clone)]
pub struct NotificationQueue {
    tx: UnboundedSender<Notification>,
}

impl NotificationQueue {
    /// Starts the drain task on the current tokio runtime.
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self::with_timing(sink, DISPLAY_SPACING, DISPLAY_LIFETIME)
    }

    pub fn with_timing(sink: Arc<dyn NotificationSink>, spacing: Duration, lifetime: Duration) -> Self {
        let (tx, rx) = unbounded_channel();
        tokio::spawn(drain(rx, sink, Timing { spacing, lifetime }));
        Self { tx }
    }

    /// Appends a message; never blocks and never fails.
    pub fn enqueue(&self, message: impl Into<String>, severity: Severity) {
        let notification = Notification::new(message, severity);
        if let Err(e) = self.tx.send(notification) {
            tracing::warn!(message = %e.0.message, "notification dropped, drain task is gone");
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.enqueue(message, Severity::Info);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.enqueue(message, Severity::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.enqueue(message, Severity::Error);
    }
}

async fn drain(mut rx: UnboundedReceiver<Notification>, sink: Arc<dyn NotificationSink>, timing: Timing) {
    let mut next_id: u64 = 0;
    while let Some(notification) = rx.recv().await {
        let id = next_id;
        next_id += 1;

        tracing::trace!(id, severity = ?notification.severity, "showing notification");
        sink.show(id, &notification);

        let dismiss_sink = Arc::clone(&sink);
        let lifetime = timing.lifetime;
        tokio::spawn(async move {
            tokio::time::sleep(lifetime).await;
            dismiss_sink.dismiss(id);
        });

        tokio::time::sleep(timing.spacing).await;
    }
    tracing::debug!("notification queue closed");
}
