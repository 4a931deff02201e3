//! File source: reads a log file from the start and, when following,
//! keeps ingesting lines appended to it.
//!
//! Following is driven by `notify` change events. A trailing partial line is
//! held back until its newline arrives. If the file shrinks below the read
//! position it is treated as truncated and re-read from offset 0. Renames
//! (log rotation) are not tracked.

use super::{trim_line_ending, LineSource};
use crate::ingest::Ingestor;
use anyhow::Context;
use notify::{RecursiveMode, Watcher};
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use vuelog_core::Origin;

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    follow: bool,
    origin: Option<Origin>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, origin: Option<Origin>) -> Self {
        Self {
            path: path.into(),
            follow: false,
            origin,
        }
    }

    pub fn follow(mut self, follow: bool) -> Self {
        self.follow = follow;
        self
    }
}

/// Read position and the unterminated tail of the last read.
struct Cursor {
    reader: BufReader<File>,
    offset: u64,
    pending: Vec<u8>,
    lines: u64,
}

impl Cursor {
    /// Ingest every complete line available now.
    async fn read_available(&mut self, ingestor: &Ingestor, origin: Option<&Origin>) -> anyhow::Result<()> {
        loop {
            let n = self.reader.read_until(b'\n', &mut self.pending).await?;
            if n == 0 {
                return Ok(());
            }
            self.offset += n as u64;
            if self.pending.last() == Some(&b'\n') {
                ingestor.on_bytes(trim_line_ending(&self.pending), origin)?;
                self.pending.clear();
                self.lines += 1;
            }
        }
    }

    /// Ingest a final unterminated line, if any.
    fn flush_pending(&mut self, ingestor: &Ingestor, origin: Option<&Origin>) -> anyhow::Result<()> {
        if !self.pending.is_empty() {
            ingestor.on_bytes(&self.pending, origin)?;
            self.pending.clear();
            self.lines += 1;
        }
        Ok(())
    }

    async fn rewind_if_truncated(&mut self, path: &Path) -> anyhow::Result<()> {
        let len = tokio::fs::metadata(path).await?.len();
        if len < self.offset {
            tracing::info!(path = %path.display(), len, offset = self.offset, "file truncated, re-reading from start");
            self.reader.seek(SeekFrom::Start(0)).await?;
            self.offset = 0;
            self.pending.clear();
        }
        Ok(())
    }
}

impl LineSource for FileSource {
    async fn run(self, ingestor: Ingestor, shutdown: CancellationToken) -> anyhow::Result<u64> {
        let file = File::open(&self.path)
            .await
            .with_context(|| format!("opening {}", self.path.display()))?;
        let mut cursor = Cursor {
            reader: BufReader::new(file),
            offset: 0,
            pending: Vec::new(),
            lines: 0,
        };
        let origin = self.origin.as_ref();

        if !self.follow {
            cursor.read_available(&ingestor, origin).await?;
            cursor.flush_pending(&ingestor, origin)?;
            tracing::info!(path = %self.path.display(), lines = cursor.lines, "file source finished");
            return Ok(cursor.lines);
        }

        let (tx, mut events) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |event: notify::Result<notify::Event>| {
            let _ = tx.send(event);
        })
        .context("creating file watcher")?;
        watcher
            .watch(&self.path, RecursiveMode::NonRecursive)
            .with_context(|| format!("watching {}", self.path.display()))?;
        tracing::info!(path = %self.path.display(), "following file");

        // Lines written before the watch was registered.
        cursor.read_available(&ingestor, origin).await?;

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(Ok(event)) if event.kind.is_modify() || event.kind.is_create() => {
                        cursor.rewind_if_truncated(&self.path).await?;
                        cursor.read_available(&ingestor, origin).await?;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(error)) => tracing::warn!(%error, "file watcher error"),
                    None => break,
                },
                _ = shutdown.cancelled() => break,
            }
        }

        cursor.read_available(&ingestor, origin).await?;
        cursor.flush_pending(&ingestor, origin)?;
        tracing::info!(path = %self.path.display(), lines = cursor.lines, "stopped following file");
        Ok(cursor.lines)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
