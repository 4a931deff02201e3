//! Outbound queue between the reception side and the drain loop.
//!
//! Any number of [`QueueSender`] clones may push concurrently; rows from one
//! sender keep their order. The single [`LineQueue`] receiver only ever takes
//! what is available right now and never waits.

use tokio::sync::mpsc::{self, error::TryRecvError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("outbound queue is closed")]
pub struct QueueClosed;

pub fn line_queue() -> (QueueSender, LineQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (QueueSender { tx }, LineQueue { rx })
}

#[derive(Debug, Clone)]
pub struct QueueSender {
    tx: mpsc::UnboundedSender<String>,
}

impl QueueSender {
    pub fn push(&self, line: String) -> Result<(), QueueClosed> {
        self.tx.send(line).map_err(|_| QueueClosed)
    }
}

#[derive(Debug)]
pub struct LineQueue {
    rx: mpsc::UnboundedReceiver<String>,
}

impl LineQueue {
    /// Append every queued row to `out` without blocking.
    ///
    /// Returns `false` once all senders are gone and the queue is empty, i.e.
    /// nothing more will ever arrive.
    pub fn drain_now(&mut self, out: &mut Vec<String>) -> bool {
        loop {
            match self.rx.try_recv() {
                Ok(line) => out.push(line),
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
