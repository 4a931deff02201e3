//! Sinks: where drained batches of line-protocol rows are forwarded.
//!
//! A sink sees each batch once. Whether the forward succeeds or not, the
//! drain loop discards the batch afterwards; sinks do not retry.

use anyhow::Context;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::io::AsyncWriteExt;

pub trait Sink: Send {
    fn forward(&mut self, batch: &[String]) -> impl Future<Output = anyhow::Result<()>> + Send;
}

fn join_rows(batch: &[String]) -> String {
    let mut buf = String::with_capacity(batch.iter().map(|l| l.len() + 1).sum());
    for line in batch {
        buf.push_str(line);
        buf.push('\n');
    }
    buf
}

// ---------------------------------------------------------------------------
// Stdout
// ---------------------------------------------------------------------------

/// Writes rows to standard output, one per line.
#[derive(Debug)]
pub struct StdoutSink {
    out: tokio::io::Stdout,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self { out: tokio::io::stdout() }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for StdoutSink {
    async fn forward(&mut self, batch: &[String]) -> anyhow::Result<()> {
        self.out.write_all(join_rows(batch).as_bytes()).await?;
        self.out.flush().await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File
// ---------------------------------------------------------------------------

/// Appends rows to a line-protocol file for a downstream loader to pick up.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: tokio::fs::File,
}

impl FileSink {
    pub async fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("opening sink file {}", path.display()))?;
        Ok(Self { path, file })
    }
}

impl Sink for FileSink {
    async fn forward(&mut self, batch: &[String]) -> anyhow::Result<()> {
        self.file
            .write_all(join_rows(batch).as_bytes())
            .await
            .with_context(|| format!("appending to {}", self.path.display()))?;
        self.file.flush().await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

/// Records every batch it is given. Cloned handles share the same storage,
/// so a test can keep one clone and give the other to the drain loop.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    batches: Arc<Mutex<Vec<Vec<String>>>>,
    fail: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that records each batch and then reports failure.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().map(|b| b.clone()).unwrap_or_default()
    }

    pub fn rows(&self) -> Vec<String> {
        self.batches().into_iter().flatten().collect()
    }
}

impl Sink for MemorySink {
    async fn forward(&mut self, batch: &[String]) -> anyhow::Result<()> {
        if let Ok(mut batches) = self.batches.lock() {
            batches.push(batch.to_vec());
        }
        if self.fail {
            anyhow::bail!("memory sink configured to fail");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
