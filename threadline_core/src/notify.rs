use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ids::{CommentId, EmployeeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    ModerationAction,
}

/// Payload handed to the notification transport. Delivery guarantees are the
/// emitter's responsibility; the engine fires and forgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub recipient_id: EmployeeId,
    pub sender_id: EmployeeId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub related_comment_id: CommentId,
}

/// Seam for the external delivery transport (push hub, mail relay, ...).
#[async_trait]
pub trait NotificationEmitter: Send + Sync {
    async fn emit(&self, notification: Notification);
}

/// Default emitter for embedders that wire delivery elsewhere.
#[derive(Debug, Default)]
pub struct NoopEmitter;

#[async_trait]
impl NotificationEmitter for NoopEmitter {
    async fn emit(&self, _notification: Notification) {}
}

/// Buffers emitted notifications in memory. Used by tests to assert what the
/// moderation machine sent, and handy for embedders that batch-forward.
#[derive(Debug, Default)]
pub struct RecordingEmitter {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().expect("emitter lock poisoned").clone()
    }
}

#[async_trait]
impl NotificationEmitter for RecordingEmitter {
    async fn emit(&self, notification: Notification) {
        self.sent
            .lock()
            .expect("emitter lock poisoned")
            .push(notification);
    }
}
