//! Bounded completion queue.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use tasktrack_core::TaskId;

/// Result of a non-blocking submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The id was admitted.
    Accepted,
    /// The queue was full and the id was dropped.
    Dropped,
    /// Every consumer is gone.
    Closed,
}

/// Bounded multi-producer, multi-consumer queue of task ids.
///
/// Producers never wait: a full queue sheds the submission.
pub struct CompletionQueue {
    tx: mpsc::Sender<TaskId>,
    rx: QueueReceiver,
    capacity: usize,
}

impl CompletionQueue {
    /// Create a queue holding at most `capacity` ids (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: QueueReceiver {
                rx: Arc::new(Mutex::new(rx)),
            },
            capacity,
        }
    }

    /// Submit a task id without waiting.
    pub fn submit(&self, task_id: TaskId) -> EnqueueOutcome {
        match self.tx.try_send(task_id) {
            Ok(()) => EnqueueOutcome::Accepted,
            Err(mpsc::error::TrySendError::Full(_)) => EnqueueOutcome::Dropped,
            Err(mpsc::error::TrySendError::Closed(_)) => EnqueueOutcome::Closed,
        }
    }

    /// A consumer handle. Consumers share one underlying receiver.
    pub fn receiver(&self) -> QueueReceiver {
        self.rx.clone()
    }

    /// Maximum number of queued ids.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of ids currently waiting.
    pub fn len(&self) -> usize {
        self.capacity - self.tx.capacity()
    }

    /// Returns true if no ids are waiting.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared consuming end of a [`CompletionQueue`].
#[derive(Clone)]
pub struct QueueReceiver {
    rx: Arc<Mutex<mpsc::Receiver<TaskId>>>,
}

impl QueueReceiver {
    /// Wait for the next id. Cancel-safe: dropping the future loses nothing.
    pub async fn recv(&self) -> Option<TaskId> {
        self.rx.lock().await.recv().await
    }
}
