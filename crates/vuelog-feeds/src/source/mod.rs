//! Line sources: transports that deliver raw text to an [`Ingestor`].
//!
//! - [`ReaderSource`]: any async byte stream, split on `\n`.
//! - [`BlockingSource`]: a blocking reader (stdin, pipes, e.g.
//!   `esphome logs vue.yaml | vuelog collect`) read on its own thread.
//! - [`FileSource`]: a log file, optionally followed as it grows.

mod file;

pub use file::FileSource;

use crate::ingest::Ingestor;
use anyhow::Context;
use std::future::Future;
use std::io::BufRead;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use vuelog_core::Origin;

/// Something that produces lines until it is exhausted or shut down.
pub trait LineSource: Send {
    /// Feed every line to `ingestor`; returns the number of lines read.
    fn run(
        self,
        ingestor: Ingestor,
        shutdown: CancellationToken,
    ) -> impl Future<Output = anyhow::Result<u64>> + Send;
}

/// Strip a trailing `\n` or `\r\n`.
pub(crate) fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Reads newline-delimited messages from an async reader until EOF.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    origin: Option<Origin>,
}

impl<R> ReaderSource<R> {
    pub fn new(reader: R, origin: Option<Origin>) -> Self {
        Self { reader, origin }
    }
}

impl<R> LineSource for ReaderSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn run(mut self, ingestor: Ingestor, shutdown: CancellationToken) -> anyhow::Result<u64> {
        let mut buf = Vec::with_capacity(256);
        let mut count = 0u64;
        loop {
            buf.clear();
            let n = tokio::select! {
                read = self.reader.read_until(b'\n', &mut buf) => read?,
                _ = shutdown.cancelled() => {
                    // `read_until` keeps what it read before being dropped.
                    if !buf.is_empty() {
                        ingestor.on_bytes(trim_line_ending(&buf), self.origin.as_ref())?;
                        count += 1;
                    }
                    break;
                }
            };
            if n == 0 {
                break;
            }
            ingestor.on_bytes(trim_line_ending(&buf), self.origin.as_ref())?;
            count += 1;
        }
        tracing::info!(lines = count, "reader source finished");
        Ok(count)
    }
}

/// Reads newline-delimited messages from a blocking reader on a dedicated
/// thread, handing complete lines to the async side over a channel.
///
/// Shutdown does not wait for the thread: a read blocked on an idle
/// terminal is abandoned and ends with the process.
#[derive(Debug)]
pub struct BlockingSource<R> {
    reader: R,
    origin: Option<Origin>,
}

impl<R> BlockingSource<R> {
    pub fn new(reader: R, origin: Option<Origin>) -> Self {
        Self { reader, origin }
    }
}

impl BlockingSource<std::io::BufReader<std::io::Stdin>> {
    pub fn stdin(origin: Option<Origin>) -> Self {
        Self::new(std::io::BufReader::new(std::io::stdin()), origin)
    }
}

const BLOCKING_CHANNEL_DEPTH: usize = 64;

fn read_lines<R: BufRead>(mut reader: R, tx: mpsc::Sender<std::io::Result<Vec<u8>>>) {
    loop {
        let mut buf = Vec::with_capacity(256);
        let read = match reader.read_until(b'\n', &mut buf) {
            Ok(0) => return,
            Ok(_) => Ok(buf),
            Err(err) => Err(err),
        };
        let failed = read.is_err();
        if tx.blocking_send(read).is_err() || failed {
            return;
        }
    }
}

impl<R> LineSource for BlockingSource<R>
where
    R: BufRead + Send + 'static,
{
    async fn run(self, ingestor: Ingestor, shutdown: CancellationToken) -> anyhow::Result<u64> {
        let (tx, mut rx) = mpsc::channel(BLOCKING_CHANNEL_DEPTH);
        let reader = self.reader;
        std::thread::Builder::new()
            .name("vuelog-reader".into())
            .spawn(move || read_lines(reader, tx))
            .context("spawning reader thread")?;

        let mut count = 0u64;
        loop {
            let line = tokio::select! {
                line = rx.recv() => match line {
                    Some(line) => line?,
                    None => break,
                },
                _ = shutdown.cancelled() => break,
            };
            ingestor.on_bytes(trim_line_ending(&line), self.origin.as_ref())?;
            count += 1;
        }
        // Lines the thread already handed over still count.
        while let Ok(line) = rx.try_recv() {
            ingestor.on_bytes(trim_line_ending(&line?), self.origin.as_ref())?;
            count += 1;
        }
        tracing::info!(lines = count, "blocking source finished");
        Ok(count)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
