//! Drain loop: periodically forwards everything queued to a [`Sink`].
//!
//! Each tick pops all rows available right now, forwards them as one batch
//! and clears the batch whether or not the sink accepted it. The loop ends
//! when `shutdown` is cancelled or every queue sender has been dropped; in
//! both cases whatever is still queued is flushed first.

use crate::queue::LineQueue;
use crate::sink::Sink;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainStats {
    /// Batches the sink accepted.
    pub batches: u64,
    /// Rows handed to the sink, accepted or not.
    pub rows: u64,
    /// Batches the sink rejected (and that were dropped).
    pub failures: u64,
}

pub async fn run_drain<S: Sink>(
    mut queue: LineQueue,
    mut sink: S,
    interval: Duration,
    shutdown: CancellationToken,
) -> DrainStats {
    let mut batch = Vec::new();
    let mut stats = DrainStats::default();

    loop {
        let open = queue.drain_now(&mut batch);
        forward(&mut sink, &mut batch, &mut stats).await;
        if !open {
            tracing::info!(?stats, "queue closed, drain loop finished");
            return stats;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown.cancelled() => {
                queue.drain_now(&mut batch);
                forward(&mut sink, &mut batch, &mut stats).await;
                tracing::info!(?stats, "shutdown requested, drain loop finished");
                return stats;
            }
        }
    }
}

async fn forward<S: Sink>(sink: &mut S, batch: &mut Vec<String>, stats: &mut DrainStats) {
    if batch.is_empty() {
        return;
    }
    stats.rows += batch.len() as u64;
    match sink.forward(batch).await {
        Ok(()) => {
            stats.batches += 1;
            tracing::debug!(rows = batch.len(), "batch forwarded");
        }
        Err(error) => {
            stats.failures += 1;
            tracing::warn!(rows = batch.len(), %error, "sink rejected batch, dropping it");
        }
    }
    batch.clear();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::line_queue;
    use crate::sink::MemorySink;
    use pretty_assertions::assert_eq;

    const TICK: Duration = Duration::from_secs(2);

    #[tokio::test(start_paused = true)]
    async fn rows_pushed_between_ticks_form_one_batch() {
        let (tx, queue) = line_queue();
        let sink = MemorySink::new();
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(run_drain(queue, sink.clone(), TICK, shutdown.clone()));

        // Let the first (empty) tick pass.
        tokio::time::sleep(Duration::from_millis(10)).await;
        tx.push("a".into()).unwrap();
        tx.push("b".into()).unwrap();
        tokio::time::sleep(TICK).await;
        tx.push("c".into()).unwrap();
        tokio::time::sleep(TICK).await;

        shutdown.cancel();
        let stats = task.await.unwrap();
        assert_eq!(sink.batches(), vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]]);
        assert_eq!(stats, DrainStats { batches: 2, rows: 3, failures: 0 });
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_flushes_pending_rows() {
        let (tx, queue) = line_queue();
        let sink = MemorySink::new();
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(run_drain(queue, sink.clone(), Duration::from_secs(3600), shutdown.clone()));

        tokio::time::sleep(Duration::from_millis(10)).await;
        tx.push("late".into()).unwrap();
        shutdown.cancel();
        task.await.unwrap();

        assert_eq!(sink.rows(), ["late"]);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_queue_ends_the_loop_after_flushing() {
        let (tx, queue) = line_queue();
        tx.push("only".into()).unwrap();
        drop(tx);

        let sink = MemorySink::new();
        let stats = run_drain(queue, sink.clone(), TICK, CancellationToken::new()).await;
        assert_eq!(sink.rows(), ["only"]);
        assert_eq!(stats.batches, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_batches_are_dropped_not_retried() {
        let (tx, queue) = line_queue();
        tx.push("x".into()).unwrap();
        tx.push("y".into()).unwrap();
        drop(tx);

        let sink = MemorySink::failing();
        let stats = run_drain(queue, sink.clone(), TICK, CancellationToken::new()).await;
        assert_eq!(sink.batches().len(), 1);
        assert_eq!(stats, DrainStats { batches: 0, rows: 2, failures: 1 });
    }
}
